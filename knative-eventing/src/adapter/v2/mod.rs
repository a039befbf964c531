//! Runtime configuration of a source adapter, resolved from the environment
//! variables its controller projects into the adapter's container.
mod config;
mod error;

pub use config::*;
pub use error::Error;
