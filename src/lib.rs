//! Sheepdog Prometheus Exporter
//!
//! A Prometheus metrics exporter for Sheepdog distributed storage nodes.
//!
//! # Overview
//!
//! On every scrape the exporter shells out to the Sheepdog `dog` CLI, parses
//! its raw output into typed records, and republishes them as labelled
//! Prometheus metrics. Nothing is cached between scrapes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   dog node md info -r  ┌──────────────┐
//! │  Sheepdog   │ ◄────────────────────  │   Exporter   │
//! │    node     │   dog node stat -r     │              │
//! └─────────────┘                        │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                        │  │ Runner │  │ ◄────────────► │ Prometheus │
//!                                        │  └────────┘  │   /metrics     └────────────┘
//!                                        │  ┌────────┐  │
//!                                        │  │ Parser │  │
//!                                        │  └────────┘  │
//!                                        │  ┌────────┐  │
//!                                        │  │ Schema │  │
//!                                        │  └────────┘  │
//!                                        └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`sheepdog`] - `dog` process runner, output parser and record types
//! - [`metrics`] - Prometheus metric schema
//! - [`collectors`] - per-scrape orchestration
//! - [`process`] - Sheepdog process metrics from a pid file
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use sheepdog_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod process;
pub mod server;
pub mod sheepdog;
