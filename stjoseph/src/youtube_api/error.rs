//! Errors reported by the YouTube Data API.

use http::StatusCode;
use serde::Deserialize;

/// A non-success response from the YouTube Data API.
///
/// Google wraps failures in an envelope like
/// `{"error": {"code": 403, "message": "...", "errors": [{"reason": "quotaExceeded"}]}}`;
/// the first `reason` found is kept since that is what retry classification keys on.
///
/// See: <https://developers.google.com/youtube/v3/docs/errors>
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("YouTube API request failed with status {status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: Option<String>,
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl ApiError {
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope { error }) => Self {
                status,
                reason: error.errors.into_iter().find_map(|d| d.reason),
                message: error.message.unwrap_or_else(|| body.to_string()),
            },
            Err(_) => Self {
                status,
                reason: None,
                message: body.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_google_error_envelope() {
        let body = r#"{
            "error": {
                "code": 403,
                "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [
                    {"message": "quota", "domain": "youtube.quota", "reason": "quotaExceeded"}
                ]
            }
        }"#;
        let err = ApiError::from_body(StatusCode::FORBIDDEN, body);
        assert_eq!(err.reason.as_deref(), Some("quotaExceeded"));
        assert_eq!(
            err.message,
            "The request cannot be completed because you have exceeded your quota."
        );
    }

    #[test]
    fn keeps_unstructured_bodies_verbatim() {
        let err = ApiError::from_body(StatusCode::BAD_GATEWAY, "upstream went away");
        assert_eq!(err.reason, None);
        assert_eq!(err.message, "upstream went away");
    }
}
