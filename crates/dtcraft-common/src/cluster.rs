use serde::{Deserialize, Serialize};

/// Snapshot of the cluster as reported by the master's `/cluster` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterStatus {
    pub master: MasterInfo,
    pub agents: Vec<AgentInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasterInfo {
    pub host: String,
    pub num_agents: u64,
    pub num_graphs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInfo {
    pub host: String,
    /// Total capacity the agent registered with.
    pub resource: Resource,
    /// Capacity not currently claimed by running tasks.
    pub released: Resource,
    pub num_tasks: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub num_cpus: u64,
    pub memory_limit_in_bytes: u64,
    pub space_limit_in_bytes: u64,
}
