//! GPIO inputs

use embassy_rp::gpio::Input;

/// Embassy input pin as a `zerox_hal::InputPin`
pub struct RpInput<'d>(Input<'d>);

impl<'d> RpInput<'d> {
    /// Wrap a configured input
    pub fn new(input: Input<'d>) -> Self {
        Self(input)
    }
}

impl zerox_hal::InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
