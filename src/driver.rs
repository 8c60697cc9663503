//! Multiplexed refresh driver.
//!
//! Provides [`RefreshDriver`], which lights the cube one cathode level at a
//! time through a 74HC595 chain. Each level goes through four phases:
//!
//! 1. [`RefreshPhase::Blank`]: output enable high, every cathode low.
//! 2. [`RefreshPhase::ShiftOut`]: clock the level's column pattern into the chain.
//! 3. [`RefreshPhase::Latch`]: pulse the storage clock.
//! 4. [`RefreshPhase::Enable`]: raise the level's cathode, then output enable low.
//!
//! The chain is wired C0..C15 from the first register's Q0 onward, so the
//! first bit shifted in ends up on C15. Columns are therefore shifted out
//! highest first.

use crate::frame::SharedFrame;
use crate::geometry::{COLUMNS, ColumnPattern, LEVELS, LedState, level_pattern};
use crate::line::OutputLine;
use crate::ticker::TickSource;

/// Phase of the per-level refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshPhase {
    /// Anodes disabled, cathodes released.
    Blank,
    /// Column pattern being clocked into the shift stage.
    ShiftOut,
    /// Shift stage copied to the output stage.
    Latch,
    /// Current level lit.
    Enable,
}

/// Control lines of the shift register chain.
pub struct ShiftRegisterLines<DS, SH, ST, OE> {
    /// Serial data input (DS).
    pub data: DS,
    /// Shift clock (SH); rising edge shifts one bit.
    pub shift_clock: SH,
    /// Storage clock (ST); rising edge transfers the shift stage to the outputs.
    pub storage_clock: ST,
    /// Output enable (OE), active low.
    pub output_enable: OE,
}

/// Drives the cube from a [`SharedFrame`] by cycling through cathode levels.
///
/// The frame is sampled once per full cube refresh, at the start of level 0,
/// so a new frame never mixes with the previous one inside a refresh.
///
/// # Type Parameters
/// * `'f` - Lifetime of the shared frame reference
/// * `DS`, `SH`, `ST`, `OE` - Shift register control line types
/// * `L` - Cathode line type
pub struct RefreshDriver<'f, DS, SH, ST, OE, L>
where
    DS: OutputLine,
    SH: OutputLine,
    ST: OutputLine,
    OE: OutputLine,
    L: OutputLine,
{
    lines: ShiftRegisterLines<DS, SH, ST, OE>,
    cathodes: [L; LEVELS],
    frame: &'f SharedFrame,
    level: usize,
    phase: RefreshPhase,
    advance_pending: bool,
    held_frame: LedState,
    pattern: ColumnPattern,
}

impl<'f, DS, SH, ST, OE, L> RefreshDriver<'f, DS, SH, ST, OE, L>
where
    DS: OutputLine,
    SH: OutputLine,
    ST: OutputLine,
    OE: OutputLine,
    L: OutputLine,
{
    /// Creates a driver with all outputs blanked, ready to refresh level 0.
    pub fn new(
        lines: ShiftRegisterLines<DS, SH, ST, OE>,
        cathodes: [L; LEVELS],
        frame: &'f SharedFrame,
    ) -> Self {
        let mut driver = Self {
            lines,
            cathodes,
            frame,
            level: 0,
            phase: RefreshPhase::Blank,
            advance_pending: false,
            held_frame: 0,
            pattern: 0,
        };
        driver.blank_outputs();
        driver.lines.shift_clock.set_low();
        driver.lines.storage_clock.set_low();
        driver
    }

    /// Executes the next phase and returns the phase that was executed.
    pub fn step(&mut self) -> RefreshPhase {
        let phase = self.phase;

        match phase {
            RefreshPhase::Blank => {
                self.blank_outputs();

                if self.advance_pending {
                    self.level = (self.level + 1) % LEVELS;
                    self.advance_pending = false;
                }

                if self.level == 0 {
                    self.held_frame = self.frame.load();
                    #[cfg(feature = "defmt")]
                    defmt::trace!("refresh: sampled frame {=u64:#x}", self.held_frame);
                }

                self.pattern = level_pattern(self.held_frame, self.level);
                self.phase = RefreshPhase::ShiftOut;
            }
            RefreshPhase::ShiftOut => {
                self.shift_out();
                self.phase = RefreshPhase::Latch;
            }
            RefreshPhase::Latch => {
                self.lines.storage_clock.pulse();
                self.phase = RefreshPhase::Enable;
            }
            RefreshPhase::Enable => {
                self.cathodes[self.level].set_high();
                self.lines.output_enable.set_low();
                self.advance_pending = true;
                self.phase = RefreshPhase::Blank;
            }
        }

        phase
    }

    /// Runs phases until the next level is lit.
    ///
    /// Call once per level-switch tick; the level stays lit until the next
    /// call blanks it.
    pub fn tick(&mut self) {
        while self.step() != RefreshPhase::Enable {}
    }

    /// Lights every level once.
    pub fn refresh_frame(&mut self) {
        for _ in 0..LEVELS {
            self.tick();
        }
    }

    /// Refreshes forever, waiting on `ticker` while each level is lit.
    pub fn run<K: TickSource>(&mut self, ticker: &mut K) -> ! {
        #[cfg(feature = "defmt")]
        defmt::debug!("refresh: entering run loop");

        loop {
            self.tick();
            ticker.wait_for_tick();
        }
    }

    /// Darkens the cube and restarts the cycle at level 0.
    ///
    /// The next step samples the shared frame again.
    pub fn blank(&mut self) {
        self.blank_outputs();
        self.level = 0;
        self.advance_pending = false;
        self.phase = RefreshPhase::Blank;
    }

    /// Level currently being shifted out or lit.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Phase that the next [`step`](Self::step) executes.
    pub fn next_phase(&self) -> RefreshPhase {
        self.phase
    }

    /// Frame sampled for the current full-cube refresh.
    pub fn held_frame(&self) -> LedState {
        self.held_frame
    }

    /// Column pattern of the current level.
    pub fn pattern(&self) -> ColumnPattern {
        self.pattern
    }

    /// Blanks the cube and returns the owned lines.
    pub fn release(mut self) -> (ShiftRegisterLines<DS, SH, ST, OE>, [L; LEVELS]) {
        self.blank_outputs();
        (self.lines, self.cathodes)
    }

    fn blank_outputs(&mut self) {
        self.lines.output_enable.set_high();
        for cathode in &mut self.cathodes {
            cathode.set_low();
        }
    }

    fn shift_out(&mut self) {
        for column in (0..COLUMNS).rev() {
            let bit = (self.pattern >> column) & 1 != 0;
            self.lines.data.set_level(bit);
            self.lines.shift_clock.pulse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LED_STATE_ALL_ON, pixel};
    use core::cell::Cell;

    struct CountingLine<'a> {
        rises: &'a Cell<u32>,
        high: bool,
    }

    impl<'a> CountingLine<'a> {
        fn new(rises: &'a Cell<u32>) -> Self {
            Self { rises, high: false }
        }
    }

    impl OutputLine for CountingLine<'_> {
        fn set_high(&mut self) {
            if !self.high {
                self.rises.set(self.rises.get() + 1);
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    #[test]
    fn phases_cycle_in_order() {
        let frame = SharedFrame::new(LED_STATE_ALL_ON);
        let counter = Cell::new(0);
        let lines = ShiftRegisterLines {
            data: CountingLine::new(&counter),
            shift_clock: CountingLine::new(&counter),
            storage_clock: CountingLine::new(&counter),
            output_enable: CountingLine::new(&counter),
        };
        let cathodes = core::array::from_fn(|_| CountingLine::new(&counter));
        let mut driver = RefreshDriver::new(lines, cathodes, &frame);

        let expected = [
            RefreshPhase::Blank,
            RefreshPhase::ShiftOut,
            RefreshPhase::Latch,
            RefreshPhase::Enable,
        ];
        for level in 0..LEVELS {
            for phase in expected {
                assert_eq!(driver.step(), phase);
                assert_eq!(driver.level(), level);
            }
        }

        assert_eq!(driver.next_phase(), RefreshPhase::Blank);
        driver.step();
        assert_eq!(driver.level(), 0);
    }

    #[test]
    fn shift_clock_pulses_once_per_column() {
        let frame = SharedFrame::new(pixel(0, 0, 0));
        let idle = Cell::new(0);
        let shifts = Cell::new(0);
        let latches = Cell::new(0);
        let lines = ShiftRegisterLines {
            data: CountingLine::new(&idle),
            shift_clock: CountingLine::new(&shifts),
            storage_clock: CountingLine::new(&latches),
            output_enable: CountingLine::new(&idle),
        };
        let cathodes = core::array::from_fn(|_| CountingLine::new(&idle));
        let mut driver = RefreshDriver::new(lines, cathodes, &frame);

        driver.tick();
        assert_eq!(shifts.get(), COLUMNS as u32);
        assert_eq!(latches.get(), 1);
        assert_eq!(driver.pattern(), 0x0001);

        driver.refresh_frame();
        assert_eq!(shifts.get(), (COLUMNS * (LEVELS + 1)) as u32);
        assert_eq!(latches.get(), LEVELS as u32 + 1);
    }

    #[test]
    fn blank_restarts_at_level_zero() {
        let frame = SharedFrame::new(LED_STATE_ALL_ON);
        let counter = Cell::new(0);
        let lines = ShiftRegisterLines {
            data: CountingLine::new(&counter),
            shift_clock: CountingLine::new(&counter),
            storage_clock: CountingLine::new(&counter),
            output_enable: CountingLine::new(&counter),
        };
        let cathodes = core::array::from_fn(|_| CountingLine::new(&counter));
        let mut driver = RefreshDriver::new(lines, cathodes, &frame);

        driver.tick();
        driver.tick();
        assert_eq!(driver.level(), 1);

        driver.blank();
        frame.store(0);
        driver.tick();
        assert_eq!(driver.level(), 0);
        assert_eq!(driver.held_frame(), 0);
    }
}
