//! Leader election component configuration, as handed from a controller to the
//! workloads it runs. Only the configuration lives here; the election itself is
//! run by whichever process consumes it.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// ComponentConfig represents the leader election config for a single component.
///
/// Keys missing from the JSON representation decode to their zero values.
/// Keys match exactly, so a differently cased key such as `Buckets` is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentConfig {
    /// Component is the name of the component being elected.
    pub component: String,
    /// Buckets is the number of buckets the key space is partitioned into,
    /// each with its own elected leader.
    pub buckets: u32,
    #[serde(with = "crate::duration::nanos")]
    pub lease_duration: Duration,
    #[serde(with = "crate::duration::nanos")]
    pub renew_deadline: Duration,
    #[serde(with = "crate::duration::nanos")]
    pub retry_period: Duration,
    /// Identity is the unique string identifying a candidate. Usually the pod name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}
