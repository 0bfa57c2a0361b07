//! Periodic dashboard refresh.
//!
//! The timer is an explicitly owned, cancellable task tied to the view's
//! lifetime: started on mount, stopped on unmount or when auto-refresh is
//! toggled off. Stopping (or dropping the handle) cancels promptly, even
//! mid-cycle — no orphaned timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::dashboard::DashboardState;
use crate::api::Transport;

/// Handle to a running periodic refresh task.
pub struct RefreshTask {
    shutdown: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawn the refresh loop: sleep `interval`, refresh, repeat, until
    /// stopped.
    pub fn spawn(
        state: Arc<DashboardState>,
        transport: Arc<dyn Transport>,
        interval: Duration,
    ) -> Self {
        let shutdown = Arc::new(Notify::new());
        let stop = shutdown.clone();

        let handle = tokio::spawn(async move {
            log::debug!("refresh poller: started (interval {:?})", interval);
            loop {
                tokio::select! {
                    _ = stop.notified() => break,
                    _ = tokio::time::sleep(interval) => {
                        tokio::select! {
                            _ = stop.notified() => break,
                            _ = state.refresh(transport.as_ref()) => {}
                        }
                    }
                }
            }
            log::debug!("refresh poller: stopped");
        });

        Self { shutdown, handle }
    }

    /// Cancel the loop. Any in-flight cycle is abandoned; the epoch guard
    /// in the reconciler keeps a half-applied cycle from landing later.
    pub fn stop(self) {
        self.shutdown.notify_waiters();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
        self.handle.abort();
    }
}
