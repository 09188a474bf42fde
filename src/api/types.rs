use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SecretString;

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

// Response DTOs

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Envelope of every JSON response.
///
/// `translate` is a stable dotted key (`article.create.success`,
/// `user.not.found`) for clients that localize messages.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: Status,
    pub message: String,
    pub translate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, translate: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            translate: translate.into(),
            data,
        }
    }

    pub fn error(message: impl Into<String>, translate: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            translate: translate.into(),
            data: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TokenData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenData")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_empty_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("token required", "unauthorized"))
            .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "status": "error",
                "message": "token required",
                "translate": "unauthorized",
            })
        );
    }

    #[test]
    fn test_envelope_with_data() {
        let body = serde_json::to_value(ApiResponse::success(
            "article successfully retrieved",
            "article.get.success",
            Some(vec![1, 2]),
        ))
        .unwrap();

        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_login_request_password_is_redacted() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"a@example.com","password":"hunter22"}"#).unwrap();
        assert!(!format!("{req:?}").contains("hunter22"));
    }
}
