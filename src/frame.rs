//! The current frame shared between content code and the refresh driver.

use crate::geometry::{LED_STATE_ALL_OFF, LED_STATE_MASK, LedState};
use core::cell::Cell;
use critical_section::Mutex;

/// A [`LedState`] cell that can be written from one context and read from
/// another (for example main loop and timer interrupt).
///
/// Every access runs inside a critical section, so readers never observe a
/// partially written word even on targets without 64-bit atomics. Bits
/// outside [`LED_STATE_MASK`] are dropped on store.
///
/// ```
/// use led_cube::{SharedFrame, geometry::pixel};
///
/// static FRAME: SharedFrame = SharedFrame::new(0);
///
/// FRAME.store(pixel(1, 2, 3));
/// assert_eq!(FRAME.load(), pixel(1, 2, 3));
/// ```
pub struct SharedFrame {
    state: Mutex<Cell<LedState>>,
}

impl SharedFrame {
    /// Creates a cell holding `initial`.
    pub const fn new(initial: LedState) -> Self {
        Self {
            state: Mutex::new(Cell::new(initial & LED_STATE_MASK)),
        }
    }

    /// Replaces the current frame.
    pub fn store(&self, state: LedState) {
        critical_section::with(|cs| self.state.borrow(cs).set(state & LED_STATE_MASK));
    }

    /// Reads the current frame.
    pub fn load(&self) -> LedState {
        critical_section::with(|cs| self.state.borrow(cs).get())
    }

    /// Applies `f` to the current frame as one atomic read-modify-write and
    /// returns the stored result.
    pub fn update<F>(&self, f: F) -> LedState
    where
        F: FnOnce(LedState) -> LedState,
    {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let next = f(cell.get()) & LED_STATE_MASK;
            cell.set(next);
            next
        })
    }
}

impl Default for SharedFrame {
    fn default() -> Self {
        Self::new(LED_STATE_ALL_OFF)
    }
}
