//! Shared test infrastructure for led-cube integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};
use led_cube::{
    LEVELS, OutputLine, RefreshDriver, SharedFrame, ShiftRegisterLines, TimeDuration,
    TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps microseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TestDuration {
    pub fn millis(millis: u64) -> Self {
        TestDuration(millis * 1_000)
    }
}

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_micros(&self) -> u64 {
        self.0
    }

    fn from_micros(micros: u64) -> Self {
        TestDuration(micros)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(TestInstant(self.0 + duration.0))
    }
}

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Recording Output Lines
// ============================================================================

/// Identifies a hardware line in the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineId {
    Data,
    ShiftClock,
    StorageClock,
    OutputEnable,
    Cathode(usize),
}

/// One write to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvent {
    pub line: LineId,
    pub high: bool,
}

pub type EventLog = RefCell<heapless::Vec<LineEvent, 8192>>;

pub fn new_log() -> EventLog {
    RefCell::new(heapless::Vec::new())
}

/// Output line that appends every write to a shared log
pub struct RecordingLine<'a> {
    line: LineId,
    log: &'a EventLog,
}

impl<'a> RecordingLine<'a> {
    pub fn new(line: LineId, log: &'a EventLog) -> Self {
        Self { line, log }
    }

    fn record(&mut self, high: bool) {
        self.log
            .borrow_mut()
            .push(LineEvent {
                line: self.line,
                high,
            })
            .expect("event log full");
    }
}

impl OutputLine for RecordingLine<'_> {
    fn set_high(&mut self) {
        self.record(true);
    }

    fn set_low(&mut self) {
        self.record(false);
    }
}

pub type RecordingDriver<'f, 'a> = RefreshDriver<
    'f,
    RecordingLine<'a>,
    RecordingLine<'a>,
    RecordingLine<'a>,
    RecordingLine<'a>,
    RecordingLine<'a>,
>;

/// Builds a driver whose every line records into `log`
pub fn recording_driver<'f, 'a>(
    frame: &'f SharedFrame,
    log: &'a EventLog,
) -> RecordingDriver<'f, 'a> {
    let lines = ShiftRegisterLines {
        data: RecordingLine::new(LineId::Data, log),
        shift_clock: RecordingLine::new(LineId::ShiftClock, log),
        storage_clock: RecordingLine::new(LineId::StorageClock, log),
        output_enable: RecordingLine::new(LineId::OutputEnable, log),
    };
    let cathodes = core::array::from_fn(|level| RecordingLine::new(LineId::Cathode(level), log));
    RefreshDriver::new(lines, cathodes, frame)
}

// ============================================================================
// 74HC595 Chain Simulation
// ============================================================================

/// What the cube showed while one level was enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitLevel {
    pub level: usize,
    pub columns: u16,
}

/// Replays an event log against a model of the shift register chain and
/// cathode drivers, checking the hardware invariants on every edge.
#[derive(Debug, Default)]
pub struct ChainSimulator {
    data: bool,
    shift_clock: bool,
    storage_clock: bool,
    output_enable: bool,
    cathodes: [bool; LEVELS],
    shift_stage: u16,
    output_stage: u16,
    /// Shift clock rising edges per completed latch
    pub shifts_since_latch: usize,
    /// Data value of every bit shifted since the last latch
    pub ones_since_latch: usize,
    /// (shift count, one-bit count) for every latch
    pub shift_sequences: Vec<(usize, usize)>,
    /// Every level that was lit, in order
    pub lit: Vec<LitLevel>,
    /// Highest number of cathodes that were high at the same time
    pub max_active_cathodes: usize,
    /// Shift or storage edges seen while outputs were enabled
    pub glitches: usize,
}

impl ChainSimulator {
    pub fn new() -> Self {
        Self {
            // Outputs start disabled
            output_enable: true,
            ..Default::default()
        }
    }

    pub fn replay(&mut self, events: &[LineEvent]) {
        for event in events {
            self.apply(*event);
        }
    }

    fn outputs_enabled(&self) -> bool {
        !self.output_enable
    }

    fn active_cathodes(&self) -> usize {
        self.cathodes.iter().filter(|high| **high).count()
    }

    fn apply(&mut self, event: LineEvent) {
        match event.line {
            LineId::Data => self.data = event.high,
            LineId::ShiftClock => {
                if event.high && !self.shift_clock {
                    if self.outputs_enabled() {
                        self.glitches += 1;
                    }
                    self.shift_stage = (self.shift_stage << 1) | self.data as u16;
                    self.shifts_since_latch += 1;
                    self.ones_since_latch += self.data as usize;
                }
                self.shift_clock = event.high;
            }
            LineId::StorageClock => {
                if event.high && !self.storage_clock {
                    if self.outputs_enabled() {
                        self.glitches += 1;
                    }
                    self.output_stage = self.shift_stage;
                    self.shift_sequences
                        .push((self.shifts_since_latch, self.ones_since_latch));
                    self.shifts_since_latch = 0;
                    self.ones_since_latch = 0;
                }
                self.storage_clock = event.high;
            }
            LineId::OutputEnable => {
                let was_enabled = self.outputs_enabled();
                self.output_enable = event.high;
                if !was_enabled && self.outputs_enabled() {
                    self.record_lit();
                }
            }
            LineId::Cathode(level) => {
                self.cathodes[level] = event.high;
                self.max_active_cathodes = self.max_active_cathodes.max(self.active_cathodes());
            }
        }
    }

    fn record_lit(&mut self) {
        let level = self
            .cathodes
            .iter()
            .position(|high| *high)
            .expect("outputs enabled with no cathode selected");
        self.lit.push(LitLevel {
            level,
            columns: self.output_stage,
        });
    }
}

/// Replays the whole log of `log` and clears it
pub fn drain_into(simulator: &mut ChainSimulator, log: &EventLog) {
    let mut events = log.borrow_mut();
    simulator.replay(&events);
    events.clear();
}
