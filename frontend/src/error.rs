use serde_json::Value;
use thiserror::Error;

/// Failure of a call against the finance backend.
///
/// `Clone` so a single failed request can be handed to every caller that
/// was waiting on the same cached response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned status {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("could not decode response: {0}")]
    Decode(String),

    /// A 2xx body that reports an error of its own.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Builds a status error, pulling FastAPI's `detail` string out of the body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("detail").and_then(Value::as_str).map(str::to_string));
        ApiError::Status { status, detail }
    }

    /// Text shown inline to the user. Backend-provided explanations are
    /// surfaced as-is; everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Rejected(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => ApiError::Decode(err.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// The backend answers some failures with `200` and a status body
/// (`{"status": "error", "message": ...}` or `{"error": ...}`).
pub fn check_status_body(body: &Value) -> Result<(), ApiError> {
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return Err(ApiError::Rejected(message.to_string()));
    }
    if body.get("status").and_then(Value::as_str) == Some("error") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Request failed.");
        return Err(ApiError::Rejected(message.to_string()));
    }
    Ok(())
}

/// Input rejected locally, before any request is made. `Display` is the
/// inline message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an account first!")]
    MissingAccount,

    #[error("Please upload a valid file format (CSV, TXT, or Excel)")]
    UnsupportedFileType,

    #[error("File size must be less than 10MB")]
    FileTooLarge,

    #[error("Please provide both an account name and type.")]
    MissingAccountFields,

    #[error("Please enter a category name.")]
    EmptyCategory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_extracts_fastapi_detail() {
        let err = ApiError::from_status(400, r#"{"detail": "Unsupported file"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                detail: Some("Unsupported file".to_string())
            }
        );
        assert_eq!(err.user_message("generic"), "Unsupported file");
    }

    #[test]
    fn status_error_ignores_structured_detail() {
        let err = ApiError::from_status(422, r#"{"detail": [{"loc": ["body"]}]}"#);
        assert_eq!(err.user_message("generic"), "generic");

        let err = ApiError::from_status(502, "<html>bad gateway</html>");
        assert_eq!(err.user_message("generic"), "generic");
    }

    #[test]
    fn network_errors_use_fallback_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.user_message("Try again."), "Try again.");
    }

    #[test]
    fn status_body_with_error_field_is_rejected() {
        let body = json!({"error": "No records to save."});
        assert_eq!(
            check_status_body(&body),
            Err(ApiError::Rejected("No records to save.".to_string()))
        );
    }

    #[test]
    fn status_body_with_error_status_is_rejected() {
        let body = json!({"status": "error", "message": "Account not found."});
        assert_eq!(
            check_status_body(&body),
            Err(ApiError::Rejected("Account not found.".to_string()))
        );
        assert!(check_status_body(&json!({"status": "success"})).is_ok());
        assert!(check_status_body(&json!({"message": "Uploaded 3"})).is_ok());
    }
}
