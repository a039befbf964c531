//! Observability settings copied from the `config-observability` ConfigMap of
//! the controller into each adapter.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exporter protocol that disables export.
pub const PROTOCOL_NONE: &str = "none";

/// Keys missing from the JSON representation decode to their zero values, so
/// `{}` is the zero config.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub metrics: MetricsConfig,
    pub tracing: TracingConfig,
    pub runtime: RuntimeConfig,
    /// Whether the adapter reports failed sink deliveries as Kubernetes events.
    #[serde(rename = "sinkEventErrorReporting", skip_serializing_if = "std::ops::Not::not")]
    pub enable_sink_event_error_reporting: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsConfig {
    pub protocol: String,
    pub endpoint: String,
    #[serde(with = "knative::duration::nanos")]
    pub export_interval: Duration,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TracingConfig {
    pub protocol: String,
    pub endpoint: String,
    pub sampling_rate: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    pub profiling: String,
    #[serde(with = "knative::duration::nanos")]
    pub export_interval: Duration,
}

fn exports(protocol: &str) -> bool {
    !protocol.is_empty() && protocol != PROTOCOL_NONE
}

impl Config {
    pub fn metrics_enabled(&self) -> bool {
        exports(&self.metrics.protocol)
    }

    pub fn tracing_enabled(&self) -> bool {
        exports(&self.tracing.protocol) && self.tracing.sampling_rate > 0.0
    }
}
