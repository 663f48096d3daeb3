use thiserror::Error;

/// Failures that abort a whole request. Detail-page failures never end up
/// here: they only leave an entity without coordinates.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid endpoint url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch listing {url}: {source:#}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("listing {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}
