use crate::error::SimError;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period a refresh loop will run at. `interval_at` panics on zero.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owner of one periodic refresh task.
///
/// The task runs until [`RefreshHandle::stop`] is awaited or the handle is
/// dropped; either cancels it before its next tick.
pub struct RefreshHandle {
    name: &'static str,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(refresh = self.name, "Refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Spawn a loop that replaces the value in `sender` every `period`.
///
/// The first refresh happens one period after spawning; callers seed the
/// channel with an initial value. A failed refresh keeps the previous
/// value. Periods below [`MIN_PERIOD`] are raised to it. Must be called from
/// within a tokio runtime.
pub fn spawn_refresh<T, F>(
    name: &'static str,
    period: Duration,
    sender: watch::Sender<T>,
    mut produce: F,
) -> RefreshHandle
where
    T: Send + Sync + 'static,
    F: FnMut() -> Result<T, SimError> + Send + 'static,
{
    let period = period.max(MIN_PERIOD);
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let task = tokio::spawn(async move {
        info!(refresh = name, period_ms = period.as_millis() as u64, "Refresh loop started");

        loop {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                _ = interval.tick() => {
                    match produce() {
                        Ok(value) => {
                            sender.send_replace(value);
                            debug!(refresh = name, "Refreshed");
                        }
                        Err(e) => warn!(refresh = name, "Refresh skipped: {}", e),
                    }
                }
            }
        }

        info!(refresh = name, "Refresh loop stopped");
    });

    RefreshHandle {
        name,
        token,
        task: Some(task),
    }
}
