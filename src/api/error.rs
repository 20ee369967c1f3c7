use thiserror::Error;

/// Failures at the REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP request error: {0}")]
    Request(String),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    HttpStatus {
        status: u16,
        message: Option<String>,
    },
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
    #[error("Case data is incomplete: missing or invalid `{0}`")]
    IncompleteDraft(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl ApiError {
    /// Text shown to the user in the wizard's error slot.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::HttpStatus {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Timeout => "The server took too long to respond. Please retry.".into(),
            ApiError::Request(_) => "Could not reach the server. Please retry.".into(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_prefer_server_message() {
        let err = ApiError::HttpStatus {
            status: 422,
            message: Some("Patient already has an open case".into()),
        };
        assert_eq!(err.to_string(), "HTTP 422: Patient already has an open case");
        assert_eq!(err.display_message(), "Patient already has an open case");

        let bare = ApiError::HttpStatus {
            status: 500,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP 500: request failed");
    }
}
