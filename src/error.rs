// ABOUTME: Error types for the admin client and its draft editing
// ABOUTME: Separates transport failures from backend rejections and upload failures

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP error {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request rejected by backend: {message}")]
    Rejected { message: String },
    #[error("Upload error: {0}")]
    Upload(String),
}

impl ClientError {
    pub fn rejected(message: Option<&str>) -> Self {
        ClientError::Rejected {
            message: message.unwrap_or("no message").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("No draft is open")]
    NoDraft,
    #[error("'{0}' is not an editable list on this resource")]
    UnknownArrayField(String),
    #[error("'{0}' is not a list")]
    NotAnArray(String),
    #[error("'{0}' is not an object")]
    NotAnObject(String),
    #[error("Index {index} is out of range for '{field}' (length {len})")]
    IndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_without_message() {
        let err = ClientError::rejected(None);
        assert_eq!(err.to_string(), "Request rejected by backend: no message");
    }

    #[test]
    fn test_http_error_display() {
        let err = ClientError::Http {
            status: StatusCode::NOT_FOUND,
            body: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 404 Not Found: missing");
    }
}
