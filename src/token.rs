//! App token generation
//!
//! Tokens are self-signed with the app secret (HMAC-SHA256), so issuance
//! needs no platform round trip. Any party holding the same secret can
//! verify them; no server-side session state is created.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credentials::CredentialSet;
use crate::error::Result;

/// Token lifetime: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 24 * 3600;

/// Claims of a 100ms app token. Field names are fixed by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppTokenClaims {
    pub access_key: String,
    pub room_id: String,
    pub user_id: String,
    pub role: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub version: u32,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

impl AppTokenClaims {
    /// Build the claims for a room/user pair, valid from `issued_at` (Unix
    /// seconds) for [`TOKEN_TTL_SECS`].
    pub fn new(access_key: &str, room_id: &str, user_id: &str, role: &str, issued_at: i64) -> Self {
        Self {
            access_key: access_key.to_string(),
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            token_type: "app".to_string(),
            version: 2,
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Sign an app token for the given room/user with the resolved credentials.
pub fn issue_app_token(
    credentials: &CredentialSet,
    room_id: &str,
    user_id: &str,
    role: &str,
    issued_at: i64,
) -> Result<String> {
    let claims = AppTokenClaims::new(&credentials.access_key, room_id, user_id, role, issued_at);

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(credentials.app_secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const ISSUED_AT: i64 = 1704067200; // 2024-01-01 00:00:00 UTC

    fn credentials() -> CredentialSet {
        CredentialSet {
            management_token: String::new(),
            access_key: "app-access-key".into(),
            app_secret: "app-secret".into(),
        }
    }

    fn decode_with(token: &str, secret: &str) -> jsonwebtoken::errors::Result<AppTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        decode::<AppTokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
    }

    #[test]
    fn issued_token_carries_the_expected_claims() {
        let token =
            issue_app_token(&credentials(), "room-1", "user-1", "guest", ISSUED_AT).unwrap();
        let claims = decode_with(&token, "app-secret").unwrap();

        assert_eq!(claims.access_key, "app-access-key");
        assert_eq!(claims.room_id, "room-1");
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.role, "guest");
        assert_eq!(claims.token_type, "app");
        assert_eq!(claims.version, 2);
        assert_eq!(claims.iat, ISSUED_AT);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn token_type_serializes_as_type() {
        let claims = AppTokenClaims::new("k", "r", "u", "host", ISSUED_AT);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "app");
        assert!(value.get("token_type").is_none());
    }

    #[test]
    fn each_token_gets_a_fresh_id() {
        let creds = credentials();
        let a = issue_app_token(&creds, "r", "u", "guest", ISSUED_AT).unwrap();
        let b = issue_app_token(&creds, "r", "u", "guest", ISSUED_AT).unwrap();

        let jti_a = decode_with(&a, "app-secret").unwrap().jti;
        let jti_b = decode_with(&b, "app-secret").unwrap().jti;
        assert_ne!(jti_a, jti_b);
    }

    #[test]
    fn verification_requires_the_signing_secret() {
        let token = issue_app_token(&credentials(), "r", "u", "guest", ISSUED_AT).unwrap();
        assert!(decode_with(&token, "other-secret").is_err());
    }
}
