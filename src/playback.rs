//! Frame sequences played at the content frame rate.
//!
//! The refresh driver redraws the cube hundreds of times per second, but
//! content usually changes only a few times per second. [`FramePlayer`]
//! publishes the frames of a [`FrameSequence`] into a [`SharedFrame`] on the
//! cadence kept by a [`FramePacer`].

use crate::frame::SharedFrame;
use crate::geometry::{Axis, LedState};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::transform::shift;
use heapless::Vec;

/// How many times a sequence should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopCount {
    /// Repeat a specific number of times.
    Finite(u32),

    /// Repeat indefinitely.
    Infinite,
}

impl Default for LoopCount {
    fn default() -> Self {
        LoopCount::Finite(1)
    }
}

/// Sequence validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackError {
    /// No frames provided.
    EmptySequence,

    /// Sequence capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PlaybackError::EmptySequence => {
                write!(f, "sequence must have at least one frame")
            }
            PlaybackError::CapacityExceeded => {
                write!(f, "sequence capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PlaybackError {}

/// An ordered list of cube frames with loop behaviour.
///
/// # Type Parameters
/// * `N` - Maximum number of frames this sequence can hold
#[derive(Debug, Clone)]
pub struct FrameSequence<const N: usize> {
    frames: Vec<LedState, N>,
    loop_count: LoopCount,
    landing_frame: Option<LedState>,
}

impl<const N: usize> FrameSequence<N> {
    /// Creates a new sequence builder.
    pub fn builder() -> FrameSequenceBuilder<N> {
        FrameSequenceBuilder::new()
    }

    /// Frame to show after `elapsed_frames` frame periods.
    ///
    /// # Returns
    /// * `Some(frame)` - The frame to display
    /// * `None` - A finite sequence has played all its loops
    pub fn frame_at(&self, elapsed_frames: u32) -> Option<LedState> {
        let len = self.frames.len() as u64;
        let elapsed = elapsed_frames as u64;

        if let LoopCount::Finite(count) = self.loop_count {
            if elapsed >= len * count as u64 {
                return None;
            }
        }

        self.frames.get((elapsed % len) as usize).copied()
    }

    /// Returns the number of frames in one loop.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns the loop count configuration.
    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    /// Returns the frame shown after completion, if configured.
    pub fn landing_frame(&self) -> Option<LedState> {
        self.landing_frame
    }

    /// Returns the frame at the given index within one loop.
    pub fn get_frame(&self, index: usize) -> Option<LedState> {
        self.frames.get(index).copied()
    }
}

/// Builder for constructing validated frame sequences.
#[derive(Debug)]
pub struct FrameSequenceBuilder<const N: usize> {
    frames: Vec<LedState, N>,
    loop_count: LoopCount,
    landing_frame: Option<LedState>,
}

impl<const N: usize> FrameSequenceBuilder<N> {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            loop_count: LoopCount::default(),
            landing_frame: None,
        }
    }

    /// Appends a frame.
    ///
    /// # Errors
    /// Returns `CapacityExceeded` if the sequence already holds `N` frames.
    pub fn frame(mut self, frame: LedState) -> Result<Self, PlaybackError> {
        self.frames
            .push(frame)
            .map_err(|_| PlaybackError::CapacityExceeded)?;
        Ok(self)
    }

    /// Appends `steps` frames, each the previous one shifted along `axis`.
    ///
    /// # Errors
    /// * `EmptySequence` - There is no frame to shift yet
    /// * `CapacityExceeded` - The frames do not fit
    pub fn shifted(mut self, axis: Axis, steps: usize) -> Result<Self, PlaybackError> {
        let mut current = *self.frames.last().ok_or(PlaybackError::EmptySequence)?;
        for _ in 0..steps {
            current = shift(current, axis);
            self = self.frame(current)?;
        }
        Ok(self)
    }

    /// Sets how many times the sequence should loop.
    ///
    /// Default is `LoopCount::Finite(1)`.
    pub fn loop_count(mut self, count: LoopCount) -> Self {
        self.loop_count = count;
        self
    }

    /// Sets the frame to display after the sequence completes.
    ///
    /// Only relevant for finite loop counts.
    pub fn landing_frame(mut self, frame: LedState) -> Self {
        self.landing_frame = Some(frame);
        self
    }

    /// Builds and validates the sequence.
    ///
    /// # Errors
    /// * `EmptySequence` - No frames were added
    pub fn build(self) -> Result<FrameSequence<N>, PlaybackError> {
        if self.frames.is_empty() {
            return Err(PlaybackError::EmptySequence);
        }

        Ok(FrameSequence {
            frames: self.frames,
            loop_count: self.loop_count,
            landing_frame: self.landing_frame,
        })
    }
}

impl<const N: usize> Default for FrameSequenceBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a fixed content frame cadence against a [`TimeSource`].
///
/// Due times advance by exactly one period per frame, so late polls do not
/// accumulate drift. When polling falls more than a whole period behind, the
/// schedule restarts from the current time instead of replaying missed
/// frames in a burst.
pub struct FramePacer<'t, I: TimeInstant, T: TimeSource<I>> {
    time_source: &'t T,
    period: I::Duration,
    last_frame: Option<I>,
}

impl<'t, I: TimeInstant, T: TimeSource<I>> FramePacer<'t, I, T> {
    /// Creates a pacer; the first [`poll`](Self::poll) is always due.
    pub fn new(time_source: &'t T, period: I::Duration) -> Self {
        Self {
            time_source,
            period,
            last_frame: None,
        }
    }

    /// Returns true, and starts a new frame period, if a frame is due.
    pub fn poll(&mut self) -> bool {
        let now = self.time_source.now();

        let Some(last) = self.last_frame else {
            self.last_frame = Some(now);
            return true;
        };

        let elapsed = now.duration_since(last).as_micros();
        let period = self.period.as_micros();
        if elapsed < period {
            return false;
        }

        self.last_frame = if elapsed >= period.saturating_mul(2) {
            Some(now)
        } else {
            Some(last.checked_add(self.period).unwrap_or(now))
        };
        true
    }

    /// Time left until the next frame is due.
    pub fn time_until_due(&self) -> I::Duration {
        match self.last_frame {
            None => I::Duration::ZERO,
            Some(last) => {
                let elapsed = self.time_source.now().duration_since(last);
                self.period.saturating_sub(elapsed)
            }
        }
    }

    /// Forgets the schedule; the next poll is due immediately.
    pub fn reset(&mut self) {
        self.last_frame = None;
    }

    /// Interval between frames.
    pub fn period(&self) -> I::Duration {
        self.period
    }
}

/// Timing information returned by [`FramePlayer::service`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackTiming<D> {
    /// Service again after this delay.
    Delay(D),

    /// Sequence has completed. The landing frame (if any) is displayed.
    Complete,
}

/// Publishes the frames of a sequence into a [`SharedFrame`].
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared frame reference
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of frames in the sequence
pub struct FramePlayer<'a, 't, I: TimeInstant, T: TimeSource<I>, const N: usize> {
    sequence: FrameSequence<N>,
    pacer: FramePacer<'t, I, T>,
    frame: &'a SharedFrame,
    position: u32,
    complete: bool,
}

impl<'a, 't, I: TimeInstant, T: TimeSource<I>, const N: usize> FramePlayer<'a, 't, I, T, N> {
    /// Creates a player; the first frame is published on the first service.
    pub fn new(
        sequence: FrameSequence<N>,
        pacer: FramePacer<'t, I, T>,
        frame: &'a SharedFrame,
    ) -> Self {
        Self {
            sequence,
            pacer,
            frame,
            position: 0,
            complete: false,
        }
    }

    /// Publishes the next frame if one is due.
    ///
    /// # Returns
    /// - `PlaybackTiming::Delay(duration)` - Service again after this delay
    /// - `PlaybackTiming::Complete` - Finite sequence finished
    pub fn service(&mut self) -> PlaybackTiming<I::Duration> {
        if self.complete {
            return PlaybackTiming::Complete;
        }

        if !self.pacer.poll() {
            return PlaybackTiming::Delay(self.pacer.time_until_due());
        }

        match self.sequence.frame_at(self.position) {
            Some(next) => {
                self.frame.store(next);
                self.position = self.position.wrapping_add(1);
                PlaybackTiming::Delay(self.pacer.time_until_due())
            }
            None => {
                if let Some(landing) = self.sequence.landing_frame() {
                    self.frame.store(landing);
                }
                self.complete = true;

                #[cfg(feature = "defmt")]
                defmt::debug!("playback: complete after {=u32} frames", self.position);

                PlaybackTiming::Complete
            }
        }
    }

    /// Restarts the sequence from its first frame.
    pub fn restart(&mut self) {
        self.position = 0;
        self.complete = false;
        self.pacer.reset();
    }

    /// Number of frames published since the start.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns true once a finite sequence has finished.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns a reference to the sequence being played.
    pub fn sequence(&self) -> &FrameSequence<N> {
        &self.sequence
    }
}
