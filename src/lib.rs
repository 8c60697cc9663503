#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`LedState`**: The whole cube packed into one word, one bit per LED
//! - **`geometry`**: Bit index, level, column and axis-slice masks derived from `LEVELS`
//! - **`transform`**: Edge-dropping shifts along each axis, plus `Marquee` scrolling
//! - **`SharedFrame`**: The current frame, handed from content code to the driver atomically
//! - **`RefreshDriver`**: Multiplexes the frame onto the cube one cathode level at a time
//! - **`OutputLine`**: Trait to implement for your GPIO lines (or wrap them in `HalLine`)
//! - **`TickSource`**: The periodic level-switch event the driver waits on
//! - **`RefreshConfig`**: Validated level-switch and content frame rates
//! - **`FramePlayer`**: Plays a `FrameSequence` into a `SharedFrame` at the content frame rate
//! - **`TimeSource`**: Trait to implement for your timing system

pub mod config;
pub mod driver;
pub mod frame;
pub mod geometry;
pub mod line;
pub mod playback;
pub mod ticker;
pub mod time;
pub mod transform;

pub use config::{ConfigError, RefreshConfig, RefreshConfigBuilder};
pub use driver::{RefreshDriver, RefreshPhase, ShiftRegisterLines};
pub use frame::SharedFrame;
pub use geometry::{
    Axis, COLUMNS, ColumnPattern, GeometryError, LED_STATE_ALL_OFF, LED_STATE_ALL_ON,
    LED_STATE_MASK, LEVELS, LedState, STATE_BITS, Voxel,
};
pub use line::{HalLine, OutputLine};
pub use playback::{
    FramePacer, FramePlayer, FrameSequence, FrameSequenceBuilder, LoopCount, PlaybackError,
    PlaybackTiming,
};
pub use ticker::TickSource;
#[cfg(feature = "std")]
pub use ticker::SleepTicker;
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use transform::{Marquee, shift, translate, unshift};
