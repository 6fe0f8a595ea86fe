#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed cluster status: {0}")]
    Decode(#[from] serde_json::Error),
}

