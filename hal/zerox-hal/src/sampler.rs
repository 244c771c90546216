//! Channel sampling abstractions
//!
//! A sampler returns the instantaneous reading of a channel. Readings are
//! produced fresh on every call and are never buffered; latency is one ADC
//! conversion or one GPIO read.

use crate::gpio::InputPin;

/// Physical input selector
///
/// For an ADC this is the multiplexer input, for a digital sampler it is
/// the pin number. The meaning of the index is up to the implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Create a channel from its selector index
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Selector index
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Errors that can occur while sampling a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleError {
    /// The channel is not wired to this sampler
    InvalidChannel,
    /// Conversion failed or did not complete
    Conversion,
}

/// Synchronous channel sampler
pub trait Sampler {
    /// Read the raw count of a channel
    ///
    /// Blocks for one conversion. The value lies in `0..=full_scale()`.
    fn read_raw(&mut self, channel: Channel) -> Result<u16, SampleError>;

    /// Largest raw count this sampler can return (e.g. 16383 for 14 bits)
    fn full_scale(&self) -> u16;
}

impl<T: Sampler + ?Sized> Sampler for &mut T {
    fn read_raw(&mut self, channel: Channel) -> Result<u16, SampleError> {
        (**self).read_raw(channel)
    }

    fn full_scale(&self) -> u16 {
        (**self).full_scale()
    }
}

/// Sampler that reads a single digital pin as a one-bit channel
///
/// High reads as `1`, low as `0`, so edge detection with the default
/// zero threshold works unchanged on square waves.
pub struct PinSampler<P> {
    channel: Channel,
    pin: P,
}

impl<P: InputPin> PinSampler<P> {
    /// Wrap a pin and expose it as `channel`
    pub fn new(channel: Channel, pin: P) -> Self {
        Self { channel, pin }
    }

    /// Release the wrapped pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Sampler for PinSampler<P> {
    fn read_raw(&mut self, channel: Channel) -> Result<u16, SampleError> {
        if channel != self.channel {
            return Err(SampleError::InvalidChannel);
        }
        Ok(self.pin.is_high() as u16)
    }

    fn full_scale(&self) -> u16 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakePin<'a>(&'a Cell<bool>);

    impl InputPin for FakePin<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_pin_sampler_levels() {
        let level = Cell::new(false);
        let mut sampler = PinSampler::new(Channel::new(6), FakePin(&level));

        assert_eq!(sampler.read_raw(Channel::new(6)), Ok(0));
        level.set(true);
        assert_eq!(sampler.read_raw(Channel::new(6)), Ok(1));
        assert_eq!(sampler.full_scale(), 1);
    }

    #[test]
    fn test_pin_sampler_rejects_other_channels() {
        let level = Cell::new(true);
        let mut sampler = PinSampler::new(Channel::new(6), FakePin(&level));

        assert_eq!(
            sampler.read_raw(Channel::new(7)),
            Err(SampleError::InvalidChannel)
        );
    }
}
