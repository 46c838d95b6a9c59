//! LLM error types

use thiserror::Error;

/// Errors that can occur while talking to the chat completion endpoint
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key missing or placeholder (checked ${0})")]
    MissingApiKey(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Configuration problems, detected before any request is sent
    pub fn is_config(&self) -> bool {
        matches!(self, LlmError::MissingApiKey(_) | LlmError::InvalidEndpoint(_))
    }

    /// Transport failures that terminate a turn
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LlmError::ApiError { .. } | LlmError::Network(_) | LlmError::Stream(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_config() {
        assert!(LlmError::MissingApiKey("MOONSHOT_API_KEY".to_string()).is_config());
        assert!(LlmError::InvalidEndpoint("not a url".to_string()).is_config());

        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(!err.is_config());
    }

    #[test]
    fn test_is_transport() {
        assert!(
            LlmError::ApiError {
                status: 502,
                message: "Bad gateway".to_string()
            }
            .is_transport()
        );

        assert!(!LlmError::MissingApiKey("MOONSHOT_API_KEY".to_string()).is_transport());
        assert!(!LlmError::InvalidResponse("empty choices".to_string()).is_transport());
    }

    #[test]
    fn test_display_formats() {
        let err = LlmError::ApiError {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: Unauthorized");

        let err = LlmError::MissingApiKey("MOONSHOT_API_KEY".to_string());
        assert!(err.to_string().contains("MOONSHOT_API_KEY"));
    }
}
