//! Recurring timer

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Calls a function now and then once per period until cancelled
///
/// The callback runs on the timer task itself, so it must not block; hand
/// anything slow to an [`ExecutionSlot`](super::ExecutionSlot).
#[derive(Debug)]
pub struct RecurringTimer {
    handle: JoinHandle<()>,
}

impl RecurringTimer {
    /// Starts the timer. The first call happens immediately.
    ///
    /// # Panics
    /// Panics if `period` is zero.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                on_tick();
            }
        });

        Self { handle }
    }

    /// Stops future calls. Safe to call more than once.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the timer still fires
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RecurringTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
