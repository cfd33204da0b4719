use crate::{config::AuthConfig, error::Result, services::identity::UserIdentity};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Verifies access tokens minted by the identity provider (HS256)
pub struct JWTService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JWTService {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // The provider stamps its own audience; signature and expiry are what matter here
        let mut validation = Validation::default();
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    crate::error::ApiError::ExpiredToken
                }
                _ => crate::error::ApiError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Validate a bearer token and turn it into the caller's identity
    pub fn identity_from_token(&self, token: &str) -> Result<UserIdentity> {
        let claims = self.validate_token(token)?;

        if claims.sub.trim().is_empty() {
            return Err(crate::error::ApiError::InvalidToken(
                "Token has no subject".to_string(),
            ));
        }

        Ok(UserIdentity {
            user_id: claims.sub,
            access_token: token.to_string(),
        })
    }
}
