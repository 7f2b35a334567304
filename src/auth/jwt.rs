use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use crate::auth::AuthContext;
use crate::errors::{ServiceError, ServiceResult, DomainError};
use crate::types::UserRole;

/// Access tokens stay valid for this many minutes
const ACCESS_TOKEN_MINUTES: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signs and verifies HS256 bearer tokens with a shared secret
#[derive(Clone)]
pub struct JwtCodec {
    secret: String,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec").field("secret", &"<redacted>").finish()
    }
}

impl JwtCodec {
    pub fn new(secret: &str) -> ServiceResult<Self> {
        if secret.trim().is_empty() {
            return Err(ServiceError::Configuration("JWT secret must not be empty".to_string()));
        }
        Ok(Self { secret: secret.to_string() })
    }

    /// Generate an access token for the given user
    pub fn generate_token(
        &self,
        user_id: &Uuid,
        role: &UserRole,
    ) -> ServiceResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(ACCESS_TOKEN_MINUTES);

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Domain(DomainError::Internal(format!("JWT encoding error: {}", e))))?;

        Ok((token, expiry))
    }

    /// Verify a JWT token
    pub fn verify_token(&self, token: &str) -> ServiceResult<Claims> {
        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(self.secret.as_bytes()),
            &jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::SessionExpired,
            _ => ServiceError::Authentication(format!("Invalid token: {}", e)),
        })?;

        Ok(token_data.claims)
    }

    /// Verify a token and turn its claims into an auth context
    pub fn authenticate(&self, token: &str) -> ServiceResult<AuthContext> {
        let claims = self.verify_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Authentication("Invalid user ID in token".to_string()))?;
        let role = UserRole::from_str(&claims.role)
            .ok_or_else(|| ServiceError::Authentication("Invalid role in token".to_string()))?;

        Ok(AuthContext::new(user_id, role))
    }
}
