use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use dtcraft_common::{AgentInfo, ClusterStatus, MasterInfo};

/// What the dashboard shows. Empty until the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    pub master: Option<MasterInfo>,
    pub agents: Vec<AgentInfo>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClusterSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.updated_at.is_some()
    }
}

impl From<ClusterStatus> for ClusterSnapshot {
    fn from(status: ClusterStatus) -> Self {
        Self {
            master: Some(status.master),
            agents: status.agents,
            updated_at: Some(Utc::now()),
        }
    }
}

/// Shared view-model written by a poller and read by renderers.
///
/// Cloning yields another handle onto the same view.
#[derive(Debug, Clone)]
pub struct ClusterView {
    tx: Arc<watch::Sender<ClusterSnapshot>>,
}

impl ClusterView {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ClusterSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> ClusterSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClusterSnapshot> {
        self.tx.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn updates(&self) -> WatchStream<ClusterSnapshot> {
        WatchStream::new(self.subscribe())
    }

    /// Replace `master` and `agents` wholesale with `status`, but only while
    /// `alive` is set. The flag is read under the view's write lock, so once
    /// a writer has cleared it and passed [`ClusterView::barrier`] no further
    /// apply can land.
    pub(crate) fn apply_if_alive(&self, alive: &AtomicBool, status: ClusterStatus) -> bool {
        self.tx.send_if_modified(move |view| {
            if !alive.load(Ordering::SeqCst) {
                return false;
            }
            *view = ClusterSnapshot::from(status);
            true
        })
    }

    /// Wait out any apply currently holding the write lock.
    pub(crate) fn barrier(&self) {
        self.tx.send_if_modified(|_| false);
    }
}

impl Default for ClusterView {
    fn default() -> Self {
        Self::new()
    }
}
