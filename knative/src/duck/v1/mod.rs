pub mod knative_reference;
pub mod source_types;
pub mod status_types;
