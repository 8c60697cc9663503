//! Digital output line abstraction.
//!
//! The refresh driver only needs to drive pins high and low. [`OutputLine`]
//! captures that, and [`HalLine`] adapts any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;

/// Trait for abstracting a single digital output line.
///
/// Implement this for your GPIO (or port register bit) to let the driver
/// control it. These methods cannot fail; handle hardware errors internally.
pub trait OutputLine {
    /// Drives the line high.
    fn set_high(&mut self);

    /// Drives the line low.
    fn set_low(&mut self);

    /// Drives the line to `high`.
    #[inline]
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Emits one rising edge, leaving the line low.
    #[inline]
    fn pulse(&mut self) {
        self.set_high();
        self.set_low();
    }
}

impl<L: OutputLine + ?Sized> OutputLine for &mut L {
    #[inline]
    fn set_high(&mut self) {
        (**self).set_high();
    }

    #[inline]
    fn set_low(&mut self) {
        (**self).set_low();
    }
}

/// [`OutputLine`] wrapper around an `embedded_hal::digital::OutputPin`.
///
/// Pin errors are discarded. On the GPIO peripherals this crate targets the
/// error type is `Infallible`.
pub struct HalLine<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> HalLine<P> {
    /// Wraps `pin`.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Returns the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> OutputLine for HalLine<P> {
    #[inline]
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
    }

    #[inline]
    fn set_low(&mut self) {
        let _ = self.pin.set_low();
    }
}
