//! Digital inputs
//!
//! The capacitance meter reads the astable oscillator's square wave on a
//! plain GPIO, wrapped in a [`PinSampler`](crate::PinSampler).

/// Digital input level
pub trait InputPin {
    /// Pin currently reads logic 1
    fn is_high(&self) -> bool;

    /// Pin currently reads logic 0
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
