//! Node Statistics Collector
//!
//! Runs `dog node stat -r`.
//!
//! # Metrics Produced
//! - `sheepdog_node_stat_active` - Running requests (gauge)
//! - `sheepdog_node_stat_{total,write,read,remove,flush,write_all,read_all}` - Request counters
//!   - Labels: type (`client` or `peer`)

use super::{collect_with_handler, CollectionStatus, ScrapeResult};
use crate::sheepdog::{parse_node_stat, CommandRunner, NODE_STAT_ARGS};

pub async fn collect_node_stat_metrics<R: CommandRunner>(
    runner: &R,
    result: &mut ScrapeResult,
) -> CollectionStatus {
    collect_with_handler("node stat", runner, NODE_STAT_ARGS, parse_node_stat, |stats| {
        result.node_stats = stats.into();
    })
    .await
}
