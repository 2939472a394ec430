use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Map a non-2xx status plus its extracted message to a typed error.
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            404 => ApiError::NotFound(message),
            401 => ApiError::Unauthorized(message),
            400 => ApiError::BadRequest(message),
            _ => ApiError::Api(message),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
