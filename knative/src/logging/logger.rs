use super::config::{Config, Level};
use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Encoding {
    #[default]
    Json,
    Console,
}

/// The subset of the logger JSON we act on. Unknown keys are ignored.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase", default)]
struct LoggerSettings {
    level: String,
    development: bool,
    encoding: Encoding,
    output_paths: Vec<String>,
}

impl Default for LoggerSettings {
    // production: info level JSON on stderr
    fn default() -> Self {
        LoggerSettings {
            level: "info".to_string(),
            development: false,
            encoding: Encoding::Json,
            output_paths: vec!["stderr".to_string()],
        }
    }
}

impl LoggerSettings {
    /// Parse the logger JSON, resolving the level for `component`.
    fn parse(config: &Config, component: &str) -> Result<(LoggerSettings, Level), Error> {
        if config.logging_config.is_empty() {
            return Err(Error::EmptyLoggingConfig);
        }
        let settings: LoggerSettings = serde_json::from_str(&config.logging_config)?;
        let level = match config.logging_level.get(component) {
            Some(level) => *level,
            None => settings.level.parse().map_err(|_| Error::InvalidLevel {
                key: "level".to_string(),
                value: settings.level.clone(),
            })?,
        };
        Ok((settings, level))
    }

    fn make_writer(&self) -> Result<BoxMakeWriter, Error> {
        let mut writers = self.output_paths.iter().map(|path| open_output(path));
        let first = match writers.next() {
            Some(writer) => writer?,
            None => BoxMakeWriter::new(std::io::stderr),
        };
        writers.try_fold(first, |acc, writer| Ok(BoxMakeWriter::new(acc.and(writer?))))
    }
}

fn open_output(path: &str) -> Result<BoxMakeWriter, Error> {
    match path {
        "stdout" => Ok(BoxMakeWriter::new(std::io::stdout)),
        "stderr" => Ok(BoxMakeWriter::new(std::io::stderr)),
        _ => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path.trim_start_matches("file://"))
                .map_err(|source| Error::Output {
                    path: path.to_string(),
                    source,
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
    }
}

/// A named logger. Cloning is cheap and clones share the same underlying
/// subscriber, see [`Logger::ptr_eq`].
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    component: String,
    dispatch: Dispatch,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("component", &self.inner.component)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Build a logger for `component` that writes to `make_writer` instead of the
    /// outputs named in the config. A malformed logger JSON falls back to the
    /// production settings.
    pub fn with_writer<W>(config: &Config, component: &str, make_writer: W) -> Logger
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let (settings, level) = LoggerSettings::parse(config, component)
            .unwrap_or_else(|_| (LoggerSettings::default(), Level::Info));
        Logger::build(&settings, level, component, make_writer)
    }

    fn build<W>(settings: &LoggerSettings, level: Level, component: &str, make_writer: W) -> Logger
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let builder = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::from(level))
            .with_ansi(false)
            .with_file(settings.development)
            .with_line_number(settings.development)
            .with_writer(make_writer);
        let dispatch = match settings.encoding {
            Encoding::Json => Dispatch::new(builder.json().flatten_event(true).finish()),
            Encoding::Console => Dispatch::new(builder.finish()),
        };

        Logger {
            inner: Arc::new(Inner {
                component: component.to_string(),
                dispatch,
            }),
        }
    }

    pub fn component(&self) -> &str {
        &self.inner.component
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    /// Whether both handles refer to the same logger instance.
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run `f` with this logger as the default subscriber, so that `tracing`
    /// macros called inside are recorded by it.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.inner.dispatch, f)
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::debug!(logger = %self.inner.component, "{}", message))
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::info!(logger = %self.inner.component, "{}", message))
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::warn!(logger = %self.inner.component, "{}", message))
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.in_scope(|| tracing::error!(logger = %self.inner.component, "{}", message))
    }
}

/// Build the logger for `component` from `config`.
///
/// The level of `component` is taken from its `loglevel.<component>` entry if
/// there is one, otherwise from the logger JSON. If the logger JSON cannot be
/// parsed or one of its outputs cannot be opened, an info level JSON logger on
/// stderr is returned instead and the failure is logged through it.
pub fn new_logger_from_config(config: &Config, component: &str) -> Logger {
    let built = LoggerSettings::parse(config, component).and_then(|(settings, level)| {
        let make_writer = settings.make_writer()?;
        Ok(Logger::build(&settings, level, component, make_writer))
    });

    match built {
        Ok(logger) => logger,
        Err(err) => {
            let logger = Logger::build(
                &LoggerSettings::default(),
                Level::Info,
                component,
                BoxMakeWriter::new(std::io::stderr),
            );
            logger.error(format_args!(
                "failed to build logger from config, using production default: {err}"
            ));
            logger
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::logging::testing::LogBuffer;
    use std::collections::BTreeMap;

    fn config(logger_json: &str, levels: &[(&str, Level)]) -> Config {
        Config {
            logging_config: logger_json.to_string(),
            logging_level: levels
                .iter()
                .map(|(component, level)| (component.to_string(), *level))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn level_filters_events() {
        let buffer = LogBuffer::default();
        let warn_only = config(r#"{"level":"warn"}"#, &[]);
        let logger = Logger::with_writer(&warn_only, "adapter", buffer.clone());
        logger.info("hidden");
        logger.warn("shown");

        let entries = buffer.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["level"], "WARN");
        assert_eq!(entries[0]["message"], "shown");
        assert_eq!(entries[0]["logger"], "adapter");
    }

    #[test]
    fn component_level_overrides_logger_level() {
        let buffer = LogBuffer::default();
        let logger = Logger::with_writer(
            &config(r#"{"level":"error"}"#, &[("adapter", Level::Debug)]),
            "adapter",
            buffer.clone(),
        );
        logger.debug("details");
        assert_eq!(buffer.entries_at("DEBUG").len(), 1);
    }

    #[test]
    fn malformed_logger_json_uses_production_level() {
        let buffer = LogBuffer::default();
        let logger = Logger::with_writer(&config("{bad", &[]), "adapter", buffer.clone());
        logger.debug("hidden");
        logger.info("shown");
        assert_eq!(buffer.entries().len(), 1);
    }

    #[test]
    fn console_encoding_is_not_json() {
        let buffer = LogBuffer::default();
        let console = config(r#"{"encoding":"console"}"#, &[]);
        let logger = Logger::with_writer(&console, "adapter", buffer.clone());
        logger.info("plain text");
        assert!(buffer.contents().contains("plain text"));
        assert!(buffer.entries().is_empty());
    }

    #[test]
    fn writes_to_file_outputs() {
        let path = std::env::temp_dir().join(format!("knative-logger-{}.log", std::process::id()));
        let json = serde_json::json!({
            "level": "info",
            "outputPaths": [path.to_string_lossy()],
        })
        .to_string();
        let logger = new_logger_from_config(&config(&json, &[]), "adapter");
        logger.info("to file");

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("to file"));
    }

    #[test]
    fn unopenable_output_falls_back() {
        let json = r#"{"outputPaths":["/nonexistent-dir/knative/adapter.log"]}"#;
        let logger = new_logger_from_config(&config(json, &[]), "adapter");
        assert_eq!(logger.component(), "adapter");
    }

    #[test]
    fn clones_share_identity() {
        let logger = new_logger_from_config(&config("{}", &[]), "adapter");
        let other = new_logger_from_config(&config("{}", &[]), "adapter");
        assert!(logger.ptr_eq(&logger.clone()));
        assert!(!logger.ptr_eq(&other));
    }
}
