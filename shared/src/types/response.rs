//! API response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome body returned by the account endpoints
///
/// `status_code` is `1` on success and `0` on failure, independent of the
/// HTTP status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status_code: i32,
    pub message: String,
}

impl StatusResponse {
    /// Successful outcome
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status_code: 1,
            message: message.into(),
        }
    }

    /// Failed outcome
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 1
    }
}

/// Error body for failures that are not tied to an account operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: String::from("healthy"),
            service: service.into(),
            version: version.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_wire_format() {
        let body = serde_json::to_value(StatusResponse::failure("Incorrect password detected."))
            .unwrap();
        assert_eq!(body["statusCode"], 0);
        assert_eq!(body["message"], "Incorrect password detected.");
    }

    #[test]
    fn test_status_response_success() {
        let status = StatusResponse::success("User registered successfully!");
        assert!(status.is_success());
        assert_eq!(status.status_code, 1);
    }
}
