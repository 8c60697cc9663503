//! Level-switch tick sources.
//!
//! A [`TickSource`] blocks until the next level switch is due. On a bare
//! metal target this is usually a "wait for interrupt" on a timer; any
//! `FnMut()` closure works:
//!
//! ```ignore
//! driver.run(&mut || cortex_m::asm::wfi());
//! ```

/// Trait for abstracting the periodic level-switch event.
pub trait TickSource {
    /// Blocks until the next tick.
    fn wait_for_tick(&mut self);
}

impl<F: FnMut()> TickSource for F {
    #[inline]
    fn wait_for_tick(&mut self) {
        self()
    }
}

#[cfg(feature = "std")]
pub use self::sleep::SleepTicker;

#[cfg(feature = "std")]
mod sleep {
    use super::TickSource;
    use crate::config::RefreshConfig;
    use std::time::{Duration, Instant};

    /// Hosted tick source that sleeps the current thread until fixed
    /// deadlines spaced one level period apart.
    ///
    /// Deadlines advance by the period rather than from the wake-up time, so
    /// oversleeping does not accumulate drift. If a deadline is already
    /// missed the schedule restarts from now.
    pub struct SleepTicker {
        period: Duration,
        next_deadline: Instant,
    }

    impl SleepTicker {
        /// Creates a ticker firing at the configured level rate.
        pub fn new(config: &RefreshConfig) -> Self {
            Self::with_period(Duration::from_micros(config.level_period_micros()))
        }

        /// Creates a ticker with an explicit period.
        pub fn with_period(period: Duration) -> Self {
            Self {
                period,
                next_deadline: Instant::now() + period,
            }
        }

        /// Interval between ticks.
        pub fn period(&self) -> Duration {
            self.period
        }
    }

    impl TickSource for SleepTicker {
        fn wait_for_tick(&mut self) {
            let now = Instant::now();
            if self.next_deadline > now {
                std::thread::sleep(self.next_deadline - now);
                self.next_deadline += self.period;
            } else {
                self.next_deadline = now + self.period;
            }
        }
    }

}
