use thiserror::Error;

pub type Result<T> = std::result::Result<T, P1ibError>;

/// Any failure to obtain a usable response from the P1ib over HTTP.
///
/// Transport errors, non-2xx statuses and undecodable bodies all end up here;
/// callers are not expected to tell them apart.
#[derive(Debug, Error)]
#[error("failed to fetch `{url}`: {source}")]
pub struct ConnectionError {
    pub url: String,
    #[source]
    pub source: reqwest::Error,
}

#[derive(Debug, Error)]
pub enum P1ibError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("meter data carries no `info.rssi` signal strength")]
    MissingSignalStrength,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("no P1ib address configured")]
    NoAddress,
}
