use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Terminal failure of one request once the retry policy gave up.
    /// `source` is the cause reported by the last attempt.
    #[error("request to {url} ({params}) failed after {attempts} attempts: {source}")]
    Fetch {
        url: String,
        params: String,
        attempts: u32,
        #[source]
        source: Box<ScraperError>,
    },

    /// The body was valid JSON but did not have the expected shape.
    #[error("malformed payload for {context}: {source}")]
    MalformedPage {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("page worker terminated abnormally: {0}")]
    WorkerPanicked(String),
}
