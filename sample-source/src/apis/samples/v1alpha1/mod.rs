mod samplesource_defaults;
mod samplesource_lifecycle;
mod samplesource_types;

pub use samplesource_defaults::DEFAULT_SERVICE_ACCOUNT_NAME;
pub use samplesource_types::*;
