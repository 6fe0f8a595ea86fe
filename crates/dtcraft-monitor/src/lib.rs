pub mod error;
pub mod poller;
pub mod source;
pub mod view;

pub use error::SourceError;
pub use poller::{PollHandle, PollerConfig, PollerState, StatusPoller, DEFAULT_POLL_INTERVAL};
pub use source::{HttpSourceConfig, HttpStatusSource, ResponseFormat, StatusSource};
pub use view::{ClusterSnapshot, ClusterView};
