pub mod apis;
mod duck;
pub mod duration;
pub mod error;
pub mod leaderelection;
pub mod logging;
pub mod types;

// expose only v1 types
pub use duck::v1::*;
