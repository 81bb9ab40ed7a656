use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::{AuthError, Claims, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
use crate::models::User;

/// JWT token service for creating and validating tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: Duration,
    refresh_token_expires_in: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("access_token_expires_in", &self.access_token_expires_in)
            .field("refresh_token_expires_in", &self.refresh_token_expires_in)
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: Duration::minutes(15),
            refresh_token_expires_in: Duration::days(30),
        }
    }

    pub fn access_token_lifetime_secs(&self) -> usize {
        self.access_token_expires_in.num_seconds() as usize
    }

    /// Create an access token for a user
    pub fn create_access_token(&self, user: &User) -> Result<String, AuthError> {
        self.create_token(user, TOKEN_TYPE_ACCESS, self.access_token_expires_in)
    }

    /// Create a refresh token for a user
    pub fn create_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        self.create_token(user, TOKEN_TYPE_REFRESH, self.refresh_token_expires_in)
    }

    fn create_token(
        &self,
        user: &User,
        token_type: &str,
        expires_in: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            token_type: token_type.to_string(),
            exp: (now + expires_in).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Decode a token and check it carries the expected type.
    pub fn decode_token(&self, token: &str, expected_type: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            },
        )?;

        if data.claims.token_type != expected_type {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "athlete@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            is_new: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_round_trips() {
        let service = JwtService::new("test-secret");
        let user = user();

        let token = service.create_access_token(&user).unwrap();
        let claims = service.decode_token(&token, TOKEN_TYPE_ACCESS).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
    }

    #[test]
    fn refresh_token_is_rejected_where_access_is_expected() {
        let service = JwtService::new("test-secret");
        let token = service.create_refresh_token(&user()).unwrap();

        let err = service.decode_token(&token, TOKEN_TYPE_ACCESS).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let service = JwtService::new("test-secret");
        let other = JwtService::new("other-secret");
        let token = other.create_access_token(&user()).unwrap();

        let err = service.decode_token(&token, TOKEN_TYPE_ACCESS).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
