//! Background liveness polling of the chat backend.

use std::fmt;
use std::time::Duration;

use folio_types::ChatBackend;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How often [`HealthMonitor`] probes the backend.
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Reachability of the chat backend, as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiStatus {
    /// No probe has completed yet.
    #[default]
    Checking,
    /// The last probe succeeded.
    Online,
    /// The last probe or chat request failed; replies come from the canned table.
    Offline,
}

impl ApiStatus {
    /// Status line for display next to the chat.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ApiStatus::Checking => "Checking API...",
            ApiStatus::Online => "Connected to RAG API",
            ApiStatus::Offline => "Demo Mode (API Offline)",
        }
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Periodic health prober publishing into a `watch` channel.
///
/// Runs as its own task, independent of any in-flight chat request. A failed
/// probe only flips the status; it never blocks sending.
#[derive(Debug)]
pub struct HealthMonitor {
    status: watch::Receiver<ApiStatus>,
    sender: watch::Sender<ApiStatus>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    /// Probe `backend` now and then every `interval` until `cancel` fires.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<B>(backend: B, interval: Duration, cancel: CancellationToken) -> Self
    where
        B: ChatBackend + 'static,
    {
        let (sender, status) = watch::channel(ApiStatus::Checking);
        let task_sender = sender.clone();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let next = tokio::select! {
                    () = task_cancel.cancelled() => break,
                    result = backend.health() => match result {
                        Ok(health) => {
                            tracing::debug!(status = %health.status, "backend health probe succeeded");
                            ApiStatus::Online
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "backend health probe failed");
                            ApiStatus::Offline
                        }
                    },
                };
                task_sender.send_replace(next);
            }
            tracing::trace!("health monitor stopped");
        });

        Self {
            status,
            sender,
            cancel,
            handle,
        }
    }

    /// A receiver observing every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ApiStatus> {
        self.status.clone()
    }

    /// The most recently published status.
    #[must_use]
    pub fn status(&self) -> ApiStatus {
        *self.status.borrow()
    }

    /// A sender for the same channel, for
    /// [`ChatSession::attach_status`](crate::ChatSession::attach_status).
    #[must_use]
    pub fn status_sender(&self) -> watch::Sender<ApiStatus> {
        self.sender.clone()
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "health monitor task ended abnormally");
        }
    }
}
