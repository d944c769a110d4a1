//! Multi-Disk Info Collector
//!
//! Runs `dog node md info -r`.
//!
//! # Metrics Produced
//! - `sheepdog_md_info_size` - Total size in bytes
//! - `sheepdog_md_info_used` - Used size in bytes
//! - `sheepdog_md_info_avail` - Available size in bytes
//! - `sheepdog_md_info_use` - Usage in percent
//!   - Labels: path

use super::{collect_with_handler, CollectionStatus, ScrapeResult};
use crate::sheepdog::{parse_md_info, CommandRunner, MD_INFO_ARGS};

/// Collects multi-disk records into `result.volumes`
///
/// The returned status decides `sheepdog_up`: only
/// `CollectionStatus::CommandFailed` reports the exporter as down.
pub async fn collect_md_info_metrics<R: CommandRunner>(
    runner: &R,
    result: &mut ScrapeResult,
) -> CollectionStatus {
    collect_with_handler("md info", runner, MD_INFO_ARGS, parse_md_info, |volumes| {
        result.volumes = volumes;
    })
    .await
}
