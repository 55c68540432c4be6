use std::io;
use thiserror::Error;

/// Errors that terminate the reader stage
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("error resolving {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("error getting host name: no address for {endpoint}")]
    NoAddress { endpoint: String },

    #[error("error connecting to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    #[error("read error: {0}")]
    Read(#[source] io::Error),
}
