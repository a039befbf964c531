//! Logging configuration shared by Knative components, and the [`Logger`] handle
//! built from it.
//!
//! The configuration has the shape of the `config-logging` ConfigMap: a
//! `zap-logger-config` key holding the logger JSON and any number of
//! `loglevel.<component>` keys overriding the level of a single component.
//! Loggers are backed by `tracing` and never install a global subscriber.
mod config;
mod logger;
pub mod testing;

pub use config::{
    config_to_json, json_to_config, Config, Level, LOGGER_CONFIG_KEY, LOG_LEVEL_KEY_PREFIX,
};
pub use logger::{new_logger_from_config, Logger};
