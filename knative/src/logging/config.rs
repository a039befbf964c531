use crate::error::Error;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Key holding the logger JSON.
pub const LOGGER_CONFIG_KEY: &str = "zap-logger-config";
/// Prefix of the keys overriding the level of a single component.
pub const LOG_LEVEL_KEY_PREFIX: &str = "loglevel.";

pub(crate) const DEFAULT_LOGGER_CONFIG: &str = r#"{
  "level": "info",
  "development": false,
  "outputPaths": ["stdout"],
  "errorOutputPaths": ["stderr"],
  "encoding": "json",
  "encoderConfig": {
    "timeKey": "ts",
    "levelKey": "level",
    "nameKey": "logger",
    "callerKey": "caller",
    "messageKey": "msg",
    "stacktraceKey": "stacktrace",
    "lineEnding": "",
    "levelEncoder": "",
    "timeEncoder": "iso8601",
    "durationEncoder": "",
    "callerEncoder": ""
  }
}"#;

/// Log levels as they appear in Knative logging configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    DPanic,
    Panic,
    Fatal,
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" | "" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> LevelFilter {
        match level {
            Level::Debug => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            // tracing has nothing above error
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => LevelFilter::ERROR,
        }
    }
}

/// The parsed logging configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// The logger JSON.
    pub logging_config: String,
    /// Per-component level overrides, keyed by component name.
    pub logging_level: BTreeMap<String, Level>,
}

impl Config {
    /// Build a config from ConfigMap-style data. A missing or empty logger JSON
    /// is replaced by the production default.
    pub fn from_map(data: &BTreeMap<String, String>) -> Result<Config, Error> {
        let logging_config = match data.get(LOGGER_CONFIG_KEY) {
            Some(json) if !json.is_empty() => json.clone(),
            _ => DEFAULT_LOGGER_CONFIG.to_string(),
        };

        let mut logging_level = BTreeMap::new();
        for (key, value) in data {
            if let Some(component) = key.strip_prefix(LOG_LEVEL_KEY_PREFIX) {
                let level = value.parse::<Level>().map_err(|_| Error::InvalidLevel {
                    key: key.clone(),
                    value: value.clone(),
                })?;
                logging_level.insert(component.to_string(), level);
            }
        }

        Ok(Config {
            logging_config,
            logging_level,
        })
    }
}

/// Parse a config serialized by [`config_to_json`].
pub fn json_to_config(json: &str) -> Result<Config, Error> {
    if json.is_empty() {
        return Err(Error::EmptyLoggingConfig);
    }
    let data: BTreeMap<String, String> = serde_json::from_str(json)?;
    Config::from_map(&data)
}

/// Serialize a config into the flat JSON object understood by [`json_to_config`].
pub fn config_to_json(config: &Config) -> Result<String, Error> {
    let mut data = BTreeMap::new();
    data.insert(LOGGER_CONFIG_KEY.to_string(), config.logging_config.clone());
    for (component, level) in &config.logging_level {
        data.insert(format!("{LOG_LEVEL_KEY_PREFIX}{component}"), level.to_string());
    }
    Ok(serde_json::to_string(&data)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_json_is_an_error() {
        assert!(matches!(json_to_config(""), Err(Error::EmptyLoggingConfig)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(json_to_config("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn empty_object_uses_default_logger_config() {
        let config = json_to_config("{}").unwrap();
        assert_eq!(config.logging_config, DEFAULT_LOGGER_CONFIG);
        assert!(config.logging_level.is_empty());
    }

    #[test]
    fn reads_component_levels() {
        let json = r#"{"loglevel.controller":"debug","loglevel.webhook":"ERROR"}"#;
        let config = json_to_config(json).unwrap();
        assert_eq!(config.logging_level.get("controller"), Some(&Level::Debug));
        assert_eq!(config.logging_level.get("webhook"), Some(&Level::Error));
    }

    #[test]
    fn invalid_level_is_an_error() {
        let err = json_to_config(r#"{"loglevel.foo":"bogus"}"#).unwrap_err();
        match err {
            Error::InvalidLevel { key, value } => {
                assert_eq!(key, "loglevel.foo");
                assert_eq!(value, "bogus");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut data = BTreeMap::new();
        data.insert(LOGGER_CONFIG_KEY.to_string(), r#"{"level":"warn"}"#.to_string());
        data.insert("loglevel.adapter".to_string(), "debug".to_string());
        let config = Config::from_map(&data).unwrap();

        let json = config_to_json(&config).unwrap();
        assert_eq!(json_to_config(&json).unwrap(), config);
    }

    #[test]
    fn levels_above_error_collapse_to_error() {
        assert_eq!(LevelFilter::from(Level::Fatal), LevelFilter::ERROR);
        assert_eq!(LevelFilter::from(Level::Warn), LevelFilter::WARN);
    }
}
