pub mod bytes;
pub mod cluster;
pub mod telemetry;

pub use bytes::{format_byte_count, format_bytes};
pub use cluster::{AgentInfo, ClusterStatus, MasterInfo, Resource};
