use std::fmt;

/// Multi-disk usage for one storage path, from `dog node md info -r`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
    pub path: String,
    pub size_bytes: u64,
    pub used_bytes: u64,
    pub avail_bytes: u64,
    /// Always within 0..=100
    pub use_percent: u64,
}

/// Traffic role of a node-stat row.
///
/// `dog node stat -r` does not label its rows; the role comes from the row's
/// position (first = client, second = peer). This is an assumption about the
/// tool's output order, not something the tool documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Client,
    Peer,
}

impl NodeRole {
    /// Roles in the order their rows appear
    pub const ORDERED: [NodeRole; 2] = [NodeRole::Client, NodeRole::Peer];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Client => "client",
            NodeRole::Peer => "peer",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request statistics for one traffic role, from `dog node stat -r`.
///
/// `active` is instantaneous; every other field is cumulative since the
/// node started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStat {
    pub role: NodeRole,
    pub active: u64,
    pub total: u64,
    pub write_count: u64,
    pub read_count: u64,
    pub remove_count: u64,
    pub flush_count: u64,
    pub all_write_count: u64,
    pub all_read_count: u64,
}
