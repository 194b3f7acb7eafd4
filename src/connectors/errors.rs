/// Errors that can occur while talking to a credential backend
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Service unreachable or timeout
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Invalid response format from external service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Authentication error (401/403) against the backend itself
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// Internal error in connector
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::ServiceUnavailable(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::ServiceUnavailable(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}
