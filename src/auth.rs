use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::AppState;
use crate::error::ApiError;
use crate::models::{Role, User};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated caller, resolved from storage on every request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

pub fn issue_token(settings: &Settings, user_id: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(settings.jwt_ttl_days)).timestamp(),
    };
    let key = EncodingKey::from_secret(settings.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

pub fn decode_token(settings: &Settings, token: &str) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(settings.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(data.claims)
}

pub fn hash_password(settings: &Settings, password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, settings.bcrypt_cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Validate the bearer header (or `token` query parameter) and return the user id it names.
pub fn verify_token(
    settings: &Settings,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<String, ApiError> {
    let provided_token = auth
        .map(|a| a.token().to_string())
        .or_else(|| query_token.map(|s| s.to_string()));

    let Some(token) = provided_token else {
        return Err(ApiError::Unauthorized("Not authorized, no token".into()));
    };

    decode_token(settings, &token)
        .map(|claims| claims.sub)
        .map_err(|err| {
            debug!(error = %err, "rejected token");
            ApiError::Unauthorized("Not authorized, token failed".into())
        })
}

/// Resolve the caller. A token for a user that no longer exists is rejected.
pub async fn authenticate(
    state: &AppState,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<(Identity, User), ApiError> {
    let user_id = verify_token(&state.settings, auth, query_token)?;
    let user = state
        .db
        .users()
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authorized, token failed".into()))?;

    let identity = Identity {
        user_id: user.id.clone(),
        role: user.role,
    };
    Ok((identity, user))
}

pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            identity.role.as_str()
        )))
    }
}
