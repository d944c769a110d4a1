//! Prometheus Metrics Schema
//!
//! This module defines every metric the Sheepdog exporter emits and projects
//! the records of one scrape onto them.
//!
//! # Metric Catalog
//!
//! ## Multi-disk info (`sheepdog_md_info_*`, label `path`)
//! - `size`, `used`, `avail` in bytes and `use` in percent. All gauges.
//!
//! ## Node statistics (`sheepdog_node_stat_*`, label `type` = `client`|`peer`)
//! - `active` is a gauge of in-flight requests
//! - `total`, `write`, `read`, `remove`, `flush`, `write_all`, `read_all` are
//!   counters, cumulative since the node started
//!
//! ## Liveness
//! - `sheepdog_up` (no labels): 1 if `dog node md info` ran successfully
//!
//! # Projection
//!
//! [`MetricSchema`] is built once at startup and never mutated. Each scrape
//! calls [`MetricSchema::register`] with a fresh [`Registry`], so values from
//! one scrape can never leak into another.

use crate::collectors::ScrapeResult;
use crate::sheepdog::{NodeStat, VolumeInfo};
use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::fmt;

pub const NAMESPACE: &str = "sheepdog";
pub const MD_INFO_SUBSYSTEM: &str = "md_info";
pub const NODE_STAT_SUBSYSTEM: &str = "node_stat";

/// Label key of multi-disk metrics
pub const PATH_LABEL: &str = "path";
/// Label key of node-stat metrics, carrying the [`crate::sheepdog::NodeRole`]
pub const ROLE_LABEL: &str = "type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Instantaneous value
    Gauge,
    /// Monotonic value, cumulative since node start
    Counter,
}

/// One metric fed by one field of record type `T`
pub struct MetricDef<T> {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: ValueKind,
    pub value: fn(&T) -> u64,
}

// Derived impls would demand `T: Copy`
impl<T> Clone for MetricDef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MetricDef<T> {}

impl<T> fmt::Debug for MetricDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

pub const MD_INFO_METRICS: [MetricDef<VolumeInfo>; 4] = [
    MetricDef {
        name: "size",
        help: "Multi-disk total size in bytes by path.",
        kind: ValueKind::Gauge,
        value: |v| v.size_bytes,
    },
    MetricDef {
        name: "used",
        help: "Multi-disk used size in bytes by path.",
        kind: ValueKind::Gauge,
        value: |v| v.used_bytes,
    },
    MetricDef {
        name: "avail",
        help: "Multi-disk available size in bytes by path.",
        kind: ValueKind::Gauge,
        value: |v| v.avail_bytes,
    },
    MetricDef {
        name: "use",
        help: "Multi-disk usage in percentage by path.",
        kind: ValueKind::Gauge,
        value: |v| v.use_percent,
    },
];

pub const NODE_STAT_METRICS: [MetricDef<NodeStat>; 8] = [
    MetricDef {
        name: "active",
        help: "Number of running requests by type.",
        kind: ValueKind::Gauge,
        value: |s| s.active,
    },
    MetricDef {
        name: "total",
        help: "Total numbers of requests received by type.",
        kind: ValueKind::Counter,
        value: |s| s.total,
    },
    MetricDef {
        name: "write",
        help: "Number of write requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.write_count,
    },
    MetricDef {
        name: "read",
        help: "Number of read requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.read_count,
    },
    MetricDef {
        name: "remove",
        help: "Number of remove requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.remove_count,
    },
    MetricDef {
        name: "flush",
        help: "Number of flush requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.flush_count,
    },
    MetricDef {
        name: "write_all",
        help: "Number of all write requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.all_write_count,
    },
    MetricDef {
        name: "read_all",
        help: "Number of all read requests by type.",
        kind: ValueKind::Counter,
        value: |s| s.all_read_count,
    },
];

/// A [`MetricDef`] bound to its fully qualified options
#[derive(Debug, Clone)]
struct Family<T> {
    def: MetricDef<T>,
    opts: Opts,
    label: &'static str,
}

impl<T> Family<T> {
    fn new(def: MetricDef<T>, subsystem: &str, label: &'static str) -> Self {
        let opts = Opts::new(def.name, def.help)
            .namespace(NAMESPACE)
            .subsystem(subsystem);
        Self { def, opts, label }
    }

    fn fq_name(&self) -> String {
        self.opts.fq_name()
    }

    /// Registers one fresh metric vector holding a sample per record
    fn register<'r>(
        &self,
        registry: &Registry,
        records: impl IntoIterator<Item = &'r T>,
        label_of: impl Fn(&T) -> &str,
    ) -> prometheus::Result<()>
    where
        T: 'r,
    {
        match self.def.kind {
            ValueKind::Gauge => {
                let vec = GaugeVec::new(self.opts.clone(), &[self.label])?;
                for record in records {
                    vec.with_label_values(&[label_of(record)])
                        .set((self.def.value)(record) as f64);
                }
                registry.register(Box::new(vec))
            }
            ValueKind::Counter => {
                let vec = IntCounterVec::new(self.opts.clone(), &[self.label])?;
                for record in records {
                    vec.with_label_values(&[label_of(record)])
                        .inc_by((self.def.value)(record));
                }
                registry.register(Box::new(vec))
            }
        }
    }
}

/// Immutable catalog of every metric the exporter emits
#[derive(Debug, Clone)]
pub struct MetricSchema {
    md_info: Vec<Family<VolumeInfo>>,
    node_stat: Vec<Family<NodeStat>>,
    up: Opts,
}

impl MetricSchema {
    pub fn new() -> Self {
        Self {
            md_info: MD_INFO_METRICS
                .iter()
                .map(|def| Family::new(*def, MD_INFO_SUBSYSTEM, PATH_LABEL))
                .collect(),
            node_stat: NODE_STAT_METRICS
                .iter()
                .map(|def| Family::new(*def, NODE_STAT_SUBSYSTEM, ROLE_LABEL))
                .collect(),
            up: Opts::new("up", "Whether the last query of Sheepdog was successful.")
                .namespace(NAMESPACE),
        }
    }

    /// Fully qualified names of all metrics, `sheepdog_up` first
    pub fn metric_names(&self) -> Vec<String> {
        std::iter::once(self.up.fq_name())
            .chain(self.md_info.iter().map(Family::fq_name))
            .chain(self.node_stat.iter().map(Family::fq_name))
            .collect()
    }

    /// Value kind of a fully qualified metric name
    pub fn kind_of(&self, fq_name: &str) -> Option<ValueKind> {
        if fq_name == self.up.fq_name() {
            return Some(ValueKind::Gauge);
        }
        self.md_info
            .iter()
            .find(|f| f.fq_name() == fq_name)
            .map(|f| f.def.kind)
            .or_else(|| {
                self.node_stat
                    .iter()
                    .find(|f| f.fq_name() == fq_name)
                    .map(|f| f.def.kind)
            })
    }

    /// Projects one scrape onto `registry`.
    ///
    /// `sheepdog_up` is always registered. Record families without records
    /// are registered empty and therefore left out of the gathered output.
    pub fn register(&self, registry: &Registry, result: &ScrapeResult) -> prometheus::Result<()> {
        let up = Gauge::with_opts(self.up.clone())?;
        up.set(if result.up { 1.0 } else { 0.0 });
        registry.register(Box::new(up))?;

        for family in &self.md_info {
            family.register(registry, &result.volumes, |v| v.path.as_str())?;
        }
        for family in &self.node_stat {
            family.register(registry, &result.node_stats, |s| s.role.as_str())?;
        }
        Ok(())
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a registry in Prometheus text format
pub fn render(registry: &Registry) -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
