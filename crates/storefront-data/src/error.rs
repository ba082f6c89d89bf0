//! HTTP client error types.

use storefront_commerce::checkout::GatewayError;
use thiserror::Error;

/// Errors that can occur when calling the storefront API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A 2xx response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured base URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Api { status, .. } => Some(*status),
            FetchError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<FetchError> for GatewayError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Api { status, message } => GatewayError::Rejected { status, message },
            FetchError::Parse(message) => GatewayError::InvalidResponse(message),
            FetchError::Http(e) => GatewayError::Transport(e.to_string()),
            FetchError::InvalidUrl(url) => GatewayError::Transport(format!("invalid URL {url}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_rejected() {
        let err = FetchError::Api {
            status: 422,
            message: "bad phone".into(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            GatewayError::from(err),
            GatewayError::Rejected {
                status: 422,
                message: "bad phone".into()
            }
        );
    }

    #[test]
    fn test_parse_error_maps_to_invalid_response() {
        let err = FetchError::Parse("missing _id".into());
        assert_eq!(err.status(), None);
        assert!(matches!(
            GatewayError::from(err),
            GatewayError::InvalidResponse(_)
        ));
    }
}
