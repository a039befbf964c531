use knative::{source_types::Destination, status_types::Status};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The CloudEvent type of the events a [`SampleSource`] emits.
pub const SAMPLE_SOURCE_EVENT_TYPE: &str = "dev.knative.sample.source";

/// SampleSource emits an event to its sink at a fixed interval.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[kube(
    kind = "SampleSource",
    group = "samples.knative.dev",
    status = "SampleSourceStatus",
    version = "v1alpha1",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SampleSourceSpec {
    /// The name of the Kubernetes service account as which the underlying K8s
    /// resources should be run. Defaults to the "default" service account of
    /// the namespace in which the SampleSource exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
    /// The time interval between events, e.g. "300ms", "-1.5h" or "2h45m".
    /// Valid time units are "ns", "us" (or "µs"), "ms", "s", "m", "h".
    pub interval: String,
    /// A reference to an object that will resolve to a host name to use as the sink.
    pub sink: Option<Destination>,
}

/// Communicates the observed state of the [`SampleSource`] (from the controller).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleSourceStatus {
    /// inherits [`Status`], which currently provides:
    /// * observed_generation
    /// * conditions
    #[serde(flatten)]
    pub status: Status,
    /// The current active sink URI that has been configured for the SampleSource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink_uri: Option<url::Url>,
}
