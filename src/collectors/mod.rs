//! Metrics Collectors
//!
//! One scrape runs two `dog` queries in sequence and projects the parsed
//! records through the [`MetricSchema`].
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Run one fixed `dog` query through a [`CommandRunner`]
//! - Decode the captured lines and parse them into typed records
//! - Store the records in the scrape's [`ScrapeResult`]
//! - Return a [`CollectionStatus`] saying how far the query got
//!
//! # Error Handling
//!
//! Query failures are non-fatal: they are logged as warnings and the affected
//! metrics are simply absent. `sheepdog_up` follows the md-info query only.
//! Nothing is cached or retried between scrapes.

use crate::error::{ExporterError, ParseError};
use crate::metrics::MetricSchema;
use crate::sheepdog::{decode_lines, CommandRunner, NodeStat, VolumeInfo};
use prometheus::Registry;
use tracing::{debug, warn};

/// Shared context passed to every scrape
pub struct CollectionContext<'a, R> {
    /// Runner used for both `dog` queries
    pub runner: &'a R,
    /// Immutable metric catalog, shared by all scrapes
    pub schema: &'a MetricSchema,
}

/// Status of a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Records were parsed and stored
    Success,
    /// `dog` could not be spawned or exited with an error
    CommandFailed,
    /// `dog` ran but its output was malformed or not UTF-8
    ParseFailed,
}

/// Everything one scrape produced. Never outlives the scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResult {
    pub volumes: Vec<VolumeInfo>,
    /// Empty, or client then peer
    pub node_stats: Vec<NodeStat>,
    pub up: bool,
}

/// Helper to reduce boilerplate in collectors
///
/// Runs one query with consistent error handling:
/// - On success: hands the parsed records to `process`, returns `CollectionStatus::Success`
/// - On command failure: logs a warning, returns `CollectionStatus::CommandFailed`
/// - On malformed or undecodable output: logs each bad line, returns `CollectionStatus::ParseFailed`
pub async fn collect_with_handler<R, T, P, H>(
    name: &str,
    runner: &R,
    args: &[&str],
    parse: P,
    process: H,
) -> CollectionStatus
where
    R: CommandRunner,
    P: FnOnce(&[String]) -> Result<T, ParseError>,
    H: FnOnce(T),
{
    let raw = match runner.run(args).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to query {}: {}", name, e);
            return CollectionStatus::CommandFailed;
        }
    };

    match decode_lines(&raw).and_then(|lines| parse(&lines)) {
        Ok(records) => {
            process(records);
            debug!("Updated {} metrics", name);
            CollectionStatus::Success
        }
        Err(ParseError::Lines(errors)) => {
            for e in &errors {
                warn!("Malformed {} output: {}", name, e);
            }
            CollectionStatus::ParseFailed
        }
        Err(e) => {
            warn!("Unexpected {} output: {}", name, ExporterError::Parse(e));
            CollectionStatus::ParseFailed
        }
    }
}

/// Runs both queries of one scrape, md info first.
pub async fn scrape<R: CommandRunner>(runner: &R) -> ScrapeResult {
    let mut result = ScrapeResult::default();

    let md_status = collect_md_info_metrics(runner, &mut result).await;
    result.up = md_status != CollectionStatus::CommandFailed;

    // Independent of `up`
    collect_node_stat_metrics(runner, &mut result).await;

    result
}

/// Scrapes Sheepdog and registers the resulting metric set on `registry`.
pub async fn collect<R: CommandRunner>(
    ctx: &CollectionContext<'_, R>,
    registry: &Registry,
) -> prometheus::Result<ScrapeResult> {
    debug!("Collecting metrics from Sheepdog");
    let result = scrape(ctx.runner).await;
    ctx.schema.register(registry, &result)?;
    Ok(result)
}

// Collector modules
pub mod md_info;
pub mod node_stat;

// Re-export collector functions for convenient access
pub use md_info::collect_md_info_metrics;
pub use node_stat::collect_node_stat_metrics;
