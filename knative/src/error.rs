use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The logging config JSON was an empty string
    #[error("empty json logging config")]
    EmptyLoggingConfig,
    /// The logging config could not be read or written as JSON
    #[error("invalid json logging config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid log level {value:?} for {key}")]
    InvalidLevel { key: String, value: String },
    #[error("unable to open log output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
