#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("completion response had no choices")]
    EmptyChoices,
}

pub type Result<T> = std::result::Result<T, ClientError>;
