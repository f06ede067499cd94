//! Authentication middleware for bearer token validation
//!
//! Tokens are issued by the external identity provider. The middleware only
//! verifies them and turns the claims into a [`CurrentUser`]; it never talks
//! to the database.

use anyhow::Result;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{config::AuthConfig, error::ApiError, state::AppState};

/// Claims the identity provider puts in its session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user identifier
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,
    /// Expiration time
    pub exp: u64,
    /// Issued at time
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Authenticated caller, as resolved from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            first_name: claims.given_name,
            last_name: claims.family_name,
            image_url: claims.picture,
        }
    }
}

/// Verifies identity-provider tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier from the `auth` configuration section
    ///
    /// A public key selects RS256; otherwise a shared secret selects HS256.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let (decoding_key, algorithm) = if let Some(public_key) = &config.jwt_public_key {
            let pem = load_pem(public_key)?;
            (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256)
        } else if let Some(secret) = &config.jwt_secret {
            (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
        } else {
            anyhow::bail!("either auth.jwt_public_key or auth.jwt_secret must be configured");
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// HS256 verifier with a shared secret
    pub fn hs256(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the caller it identifies
    pub fn verify(&self, token: &str) -> Result<CurrentUser> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.sub.trim().is_empty() {
            anyhow::bail!("token has an empty subject");
        }

        Ok(token_data.claims.into())
    }
}

/// Accept either an inline PEM or a path to a PEM file (tried from the CWD,
/// then relative to the crate root).
fn load_pem(value: &str) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    let pem = std::fs::read_to_string(value)
        .or_else(|_| {
            let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            path.push(value);
            std::fs::read_to_string(path)
        })
        .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?;

    Ok(pem.trim().to_string())
}

/// Authentication middleware
///
/// Rejects the request with `Unauthenticated` unless it carries a valid
/// `Authorization: Bearer` token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Authorization(bearer) = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthenticated)?;

    let user = state.verifier.verify(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthenticated
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
