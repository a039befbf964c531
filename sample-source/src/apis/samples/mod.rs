pub mod v1alpha1;

/// The API group of the sample resources.
pub const GROUP_NAME: &str = "samples.knative.dev";
