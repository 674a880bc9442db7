use thiserror::Error;

/// Configuration problems that abort a scan before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL '{0}' has no host")]
    MissingHost(String),
    #[error("candidate path list is empty")]
    EmptyCandidateSet,
    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Per-request transport failures. Always non-fatal from the scan's point of
/// view: the prober counts them, the coordinator skips the payload.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("result collection timed out after {0:?}")]
    CollectionTimeout(std::time::Duration),
    #[error("malformed response: {0}")]
    Malformed(String),
}
