use thiserror::Error;

/// Result alias for pipeline calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures a fetch can surface to the caller.
///
/// An empty country match or an empty series is NOT an error; callers get an
/// empty result and can distinguish "service is down" from "nothing to show".
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure: DNS, connection refused, timeout, or an HTTP
    /// error status. Never retried; surfaced to the caller immediately.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A response arrived but is not the expected `[metadata, records]` JSON
    /// envelope.
    #[error("protocol error: {0}")]
    Protocol(String),
}
