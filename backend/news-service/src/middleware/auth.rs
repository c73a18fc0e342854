/// Bearer token verification
///
/// Tokens are issued by the site's account system. HS256 with a shared
/// secret is the default; an RS256 public key takes precedence when
/// configured.
use crate::config::AuthConfig;
use crate::error::AppError;
use crate::models::AuthenticatedUser;
use anyhow::{anyhow, Context};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from reader tokens. `sub` is the numeric user id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    fn into_user(self) -> Result<AuthenticatedUser, AppError> {
        let id = self
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid user ID".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            name: self.name.filter(|n| !n.trim().is_empty()),
            email: self.email.filter(|e| !e.trim().is_empty()),
        })
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn hs256(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn rs256_pem(public_key_pem: &str) -> anyhow::Result<Self> {
        let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .context("invalid RSA public key")?;

        Ok(Self {
            key,
            validation: Validation::new(Algorithm::RS256),
        })
    }

    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        if let Some(pem) = config.jwt_public_key_pem.as_deref() {
            return Self::rs256_pem(pem);
        }

        config
            .jwt_secret
            .as_deref()
            .map(Self::hs256)
            .ok_or_else(|| anyhow!("JWT_SECRET or JWT_PUBLIC_KEY_PEM must be set"))
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|err| {
            tracing::debug!(error = %err, "token rejected");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        data.claims.into_user()
    }
}
