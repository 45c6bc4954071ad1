//! Error types raised by the query layer.

use std::process::{ExitCode, Termination};

use crate::query::region::RegionError;

/// Errors of the query operations.
///
/// All variants except `Transport` are raised before any RPC is issued.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error("invalid range: start={start}, end={end}")]
    InvalidRange { start: i64, end: i64 },
    #[error("unknown chromosome: {0:?}")]
    UnknownChromosome(String),
    #[error("empty sample identifier for {0}")]
    EmptySampleIdentifier(&'static str),
    #[error("unknown sample: {0}")]
    UnknownSample(String),
    #[error("invalid tool call: {0}")]
    InvalidToolCall(#[from] serde_json::Error),
    #[error("transport failure: {0}")]
    Transport(#[from] tonic::Status),
}

impl From<RegionError> for QueryError {
    fn from(err: RegionError) -> Self {
        match err {
            RegionError::InvalidRange { start, end } => QueryError::InvalidRange { start, end },
            RegionError::UnknownChromosome(name) => QueryError::UnknownChromosome(name),
        }
    }
}

impl QueryError {
    /// Whether the error was raised before any network I/O.
    pub fn is_validation(&self) -> bool {
        !matches!(self, QueryError::Transport(_))
    }
}

impl Termination for QueryError {
    fn report(self) -> ExitCode {
        match self {
            QueryError::Transport(_) => ExitCode::from(2),
            _ => ExitCode::from(1),
        }
    }
}

/// Errors when setting up the channel to the server.
#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("invalid endpoint {uri:?}: {source}")]
    Endpoint {
        uri: String,
        source: tonic::transport::Error,
    },
    #[error("problem configuring TLS: {0}")]
    Tls(#[source] tonic::transport::Error),
}
