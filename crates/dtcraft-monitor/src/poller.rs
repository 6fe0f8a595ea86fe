use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::source::StatusSource;
use crate::view::ClusterView;

/// Delay between the end of one fetch and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

/// Cancellation token for a running poll loop.
///
/// Owns the liveness flag the loop checks before every fetch and every
/// apply, plus the loop task itself.
#[derive(Debug)]
pub struct PollHandle {
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
    view: ClusterView,
}

impl PollHandle {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.task.is_finished()
    }

    fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.task.abort();
        self.view.barrier();
    }

    /// Cancel and wait until the loop task is gone.
    async fn shutdown(self) {
        self.cancel();
        if let Err(err) = self.task.await {
            if err.is_panic() {
                tracing::warn!(error = %err, "status poll loop panicked");
            }
        }
    }
}

/// Periodically refreshes a [`ClusterView`] from a [`StatusSource`].
///
/// ```text
/// Idle --start()--> Polling --stop()--> Idle
/// ```
///
/// Fetches never overlap: the next one is scheduled `interval` after the
/// previous one settled, whether it succeeded or not. Failed fetches leave
/// the view untouched.
pub struct StatusPoller<S: ?Sized> {
    source: Arc<S>,
    view: ClusterView,
    config: PollerConfig,
    handle: Option<PollHandle>,
}

impl<S> StatusPoller<S>
where
    S: StatusSource + ?Sized + 'static,
{
    pub fn new(source: Arc<S>, view: ClusterView, config: PollerConfig) -> Self {
        Self {
            source,
            view,
            config,
            handle: None,
        }
    }

    pub fn view(&self) -> &ClusterView {
        &self.view
    }

    pub fn state(&self) -> PollerState {
        match &self.handle {
            Some(handle) if handle.is_alive() => PollerState::Polling,
            _ => PollerState::Idle,
        }
    }

    /// Issue a fetch right away and keep polling until [`StatusPoller::stop`].
    /// Does nothing if already polling. Must be called within a Tokio runtime.
    pub fn start(&mut self) {
        match &self.handle {
            Some(handle) if handle.is_alive() => {
                tracing::debug!("status poller already running");
                return;
            }
            Some(_) => {
                tracing::warn!("status poll loop ended unexpectedly, restarting");
                self.handle = None;
            }
            None => {}
        }

        let alive = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(poll_loop(
            self.source.clone(),
            self.view.clone(),
            self.config.interval,
            alive.clone(),
        ));
        self.handle = Some(PollHandle {
            alive,
            task,
            view: self.view.clone(),
        });

        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            "status poller started"
        );
    }

    /// Cancel the loop. Once this returns no fetch is issued and no response,
    /// including one already in flight, reaches the view.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown().await;
            tracing::info!("status poller stopped");
        }
    }
}

impl<S: ?Sized> Drop for StatusPoller<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

async fn poll_loop<S>(
    source: Arc<S>,
    view: ClusterView,
    interval: Duration,
    alive: Arc<AtomicBool>,
) where
    S: StatusSource + ?Sized,
{
    let mut cycle: u64 = 0;
    while alive.load(Ordering::SeqCst) {
        cycle += 1;
        match source.fetch().await {
            Ok(status) => {
                if !view.apply_if_alive(&alive, status) {
                    tracing::debug!(cycle, "discarding status that arrived after teardown");
                    break;
                }
                tracing::trace!(cycle, "cluster view updated");
            }
            Err(err) => {
                tracing::debug!(cycle, error = %err, "status fetch failed");
            }
        }
        tokio::time::sleep(interval).await;
    }
}
