use thiserror::Error;

/// Errors raised while talking to the content service
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("document {document} is missing field `{field}`")]
    MissingField { document: String, field: String },
    #[error("content API exposes no master ref")]
    NoMasterRef,
}
