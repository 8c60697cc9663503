//! Refresh timing configuration.

use crate::geometry::LEVELS;
use crate::time::TimeDuration;

/// Default rate at which the driver switches cathode levels.
pub const DEFAULT_LEVEL_RATE_HZ: u32 = 500;

/// Default rate at which content is allowed to change.
pub const DEFAULT_FRAME_RATE_HZ: u32 = 4;

/// Slowest full-cube refresh that still looks flicker free.
pub const MIN_CUBE_REFRESH_HZ: u32 = 100;

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Content frame rate of zero.
    ZeroFrameRate,

    /// Level rate too low for a flicker-free full-cube refresh.
    LevelRateTooLow {
        /// Requested level-switch rate.
        level_rate_hz: u32,
        /// Smallest accepted level-switch rate.
        minimum_hz: u32,
    },

    /// Content would change faster than the cube is refreshed.
    FrameRateTooHigh {
        /// Requested content frame rate.
        frame_rate_hz: u32,
        /// Full-cube refresh rate implied by the level rate.
        cube_refresh_hz: u32,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroFrameRate => write!(f, "frame rate must be non-zero"),
            ConfigError::LevelRateTooLow {
                level_rate_hz,
                minimum_hz,
            } => {
                write!(
                    f,
                    "level rate {} Hz is below the flicker-free minimum of {} Hz",
                    level_rate_hz, minimum_hz
                )
            }
            ConfigError::FrameRateTooHigh {
                frame_rate_hz,
                cube_refresh_hz,
            } => {
                write!(
                    f,
                    "frame rate {} Hz must be below the cube refresh rate of {} Hz",
                    frame_rate_hz, cube_refresh_hz
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated refresh and content timing.
///
/// The level rate drives multiplexing; the frame rate is the much slower
/// cadence at which the displayed [`LedState`](crate::LedState) may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshConfig {
    level_rate_hz: u32,
    frame_rate_hz: u32,
}

impl RefreshConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RefreshConfigBuilder {
        RefreshConfigBuilder::new()
    }

    /// Level-switch rate in hertz.
    pub fn level_rate_hz(&self) -> u32 {
        self.level_rate_hz
    }

    /// Content frame rate in hertz.
    pub fn frame_rate_hz(&self) -> u32 {
        self.frame_rate_hz
    }

    /// Full-cube refresh rate (every level lit once) in hertz.
    pub fn cube_refresh_hz(&self) -> u32 {
        self.level_rate_hz / LEVELS as u32
    }

    /// Time each level stays lit, in microseconds.
    pub fn level_period_micros(&self) -> u64 {
        MICROS_PER_SECOND / self.level_rate_hz as u64
    }

    /// Time between content frames, in microseconds.
    pub fn frame_period_micros(&self) -> u64 {
        MICROS_PER_SECOND / self.frame_rate_hz as u64
    }

    /// Time each level stays lit.
    pub fn level_period<D: TimeDuration>(&self) -> D {
        D::from_micros(self.level_period_micros())
    }

    /// Time between content frames.
    pub fn frame_period<D: TimeDuration>(&self) -> D {
        D::from_micros(self.frame_period_micros())
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            level_rate_hz: DEFAULT_LEVEL_RATE_HZ,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }
}

/// Builder for [`RefreshConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RefreshConfigBuilder {
    level_rate_hz: u32,
    frame_rate_hz: u32,
}

impl RefreshConfigBuilder {
    /// Creates a builder with the default rates.
    pub fn new() -> Self {
        Self {
            level_rate_hz: DEFAULT_LEVEL_RATE_HZ,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
        }
    }

    /// Sets the level-switch rate.
    pub fn level_rate_hz(mut self, hz: u32) -> Self {
        self.level_rate_hz = hz;
        self
    }

    /// Sets the content frame rate.
    pub fn frame_rate_hz(mut self, hz: u32) -> Self {
        self.frame_rate_hz = hz;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `LevelRateTooLow` - Full-cube refresh would fall below [`MIN_CUBE_REFRESH_HZ`]
    /// * `ZeroFrameRate` - Frame rate is zero
    /// * `FrameRateTooHigh` - Frame rate is not below the full-cube refresh rate
    pub fn build(self) -> Result<RefreshConfig, ConfigError> {
        let minimum_hz = MIN_CUBE_REFRESH_HZ * LEVELS as u32;
        if self.level_rate_hz < minimum_hz {
            return Err(ConfigError::LevelRateTooLow {
                level_rate_hz: self.level_rate_hz,
                minimum_hz,
            });
        }

        if self.frame_rate_hz == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        let config = RefreshConfig {
            level_rate_hz: self.level_rate_hz,
            frame_rate_hz: self.frame_rate_hz,
        };

        if self.frame_rate_hz >= config.cube_refresh_hz() {
            return Err(ConfigError::FrameRateTooHigh {
                frame_rate_hz: self.frame_rate_hz,
                cube_refresh_hz: config.cube_refresh_hz(),
            });
        }

        Ok(config)
    }
}

impl Default for RefreshConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
