use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Rejected(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        // The service reports failures as {"error":"..."} bodies; surface
        // that message rather than the raw JSON when it parses.
        let message = extract_error_message(body).unwrap_or_else(|| Self::truncate_body(body));
        match status.as_u16() {
            404 => ApiError::NotFound(message),
            400 => ApiError::Rejected(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_extracts_error_message() {
        let err = ApiError::from_status(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"error":"Vehicle not found"}"#,
        );
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Vehicle not found"));
    }

    #[test]
    fn test_from_status_falls_back_to_body() {
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, ApiError::ServerError(ref m) if m == "boom"));
    }
}
