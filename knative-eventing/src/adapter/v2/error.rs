use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A JSON encoded environment variable could not be decoded
    #[error("unable to decode {var}: {source}")]
    Decode {
        var: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to encode leader election config: {0}")]
    Encode(#[source] serde_json::Error),
}
