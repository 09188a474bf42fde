use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// Wire shape: `{"id": 1, "exp": 1700086400, "iat": 1700000000, "iss": "blogkit"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user id the token was issued for.
    pub id: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    pub iss: String,
}

impl SessionClaims {
    pub fn user_id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_names_on_the_wire() {
        let claims = SessionClaims {
            id: 7,
            exp: 200,
            iat: 100,
            iss: "blogkit".to_owned(),
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "exp": 200, "iat": 100, "iss": "blogkit"})
        );
    }
}
