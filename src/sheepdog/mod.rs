//! Sheepdog `dog` CLI access
//!
//! - [`runner`] spawns `dog` and captures its output
//! - [`parser`] turns raw output lines into typed records
//! - [`types`] holds the records themselves

pub mod parser;
pub mod runner;
pub mod types;

pub use parser::{decode_lines, parse_md_info, parse_node_stat};
pub use runner::{CommandRunner, ProcessRunner};
pub use types::{NodeRole, NodeStat, VolumeInfo};

/// `dog node md info -r`: one raw line per multi-disk path
pub const MD_INFO_ARGS: &[&str] = &["node", "md", "info", "-r"];

/// `dog node stat -r`: two raw lines, client traffic then peer traffic
pub const NODE_STAT_ARGS: &[&str] = &["node", "stat", "-r"];
