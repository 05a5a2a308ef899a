use shared::{error::ApiError, upload::UploadRejection};
use thiserror::Error;

/// Failure of a single editor or backend operation. Nothing here is fatal;
/// callers surface the message and leave their state as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// The server or its store answered with an error. The message is the
    /// one the server sent.
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn no_record(index: usize) -> Self {
        Self::Validation(format!("no record at position {index}"))
    }

    /// Builds a remote error from a non-success response body, preferring the
    /// server's `ApiError` message when the body carries one.
    pub(crate) fn from_response_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ApiError>(body) {
            Ok(api_error) => api_error.message,
            Err(_) if body.trim().is_empty() => format!("request failed with status {status}"),
            Err(_) => body.trim().to_string(),
        };
        Self::Remote { status, message }
    }
}

impl From<UploadRejection> for ClientError {
    fn from(value: UploadRejection) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_prefers_api_error_message() {
        let err = ClientError::from_response_body(
            500,
            r#"{"code":"storage","message":"The resource already exists"}"#,
        );
        assert_eq!(
            err,
            ClientError::Remote {
                status: 500,
                message: "The resource already exists".into()
            }
        );
        assert_eq!(err.to_string(), "The resource already exists");
    }

    #[test]
    fn remote_error_falls_back_to_raw_body_or_status() {
        assert_eq!(
            ClientError::from_response_body(413, "length limit exceeded").to_string(),
            "length limit exceeded"
        );
        assert_eq!(
            ClientError::from_response_body(502, "").to_string(),
            "request failed with status 502"
        );
    }
}
