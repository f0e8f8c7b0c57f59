//! Scoped tick subscriptions for live-updating text.
//!
//! A renderer that shows relative time subscribes when it is mounted and
//! holds the returned [`TickSubscription`]. Dropping the subscription stops
//! the interval task, so an unmounted renderer never receives another tick.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::errors::TickError;

/// Handle to a running interval task. Aborts the task on drop.
#[derive(Debug)]
pub struct TickSubscription {
    handle: JoinHandle<()>,
    period: Duration,
}

impl TickSubscription {
    /// Interval between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Check if the interval task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the interval task now.
    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Send a clone of `message` on `sender` every `period`.
///
/// The first tick fires one period after subscribing. Ticks are dropped
/// rather than queued when the receiver lags, and the task ends on its own
/// once the receiver is gone.
pub fn subscribe<T>(
    period: Duration,
    sender: mpsc::Sender<T>,
    message: T,
) -> Result<TickSubscription, TickError>
where
    T: Clone + Send + 'static,
{
    if period.is_zero() {
        return Err(TickError::ZeroPeriod);
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| TickError::NoRuntime)?;

    let handle = runtime.spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match sender.try_send(message.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::trace!("Tick dropped, receiver is behind");
                }
                Err(TrySendError::Closed(_)) => break,
            }
        }
    });

    tracing::debug!(period_ms = period.as_millis() as u64, "Tick subscription started");

    Ok(TickSubscription { handle, period })
}
