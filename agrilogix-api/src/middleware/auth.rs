use agrilogix_core::actor::{Actor, Role};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActorClaims {
    pub sub: String,
    pub role: String,
    pub name: String,
    pub exp: usize,
}

/// Extracts the calling actor from the bearer token. Every ledger operation
/// receives this explicitly instead of reading ambient request state.
pub struct AuthActor(pub Actor);

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::AuthenticationError("Missing bearer token".to_string()))?;

        let token_data = decode::<ActorClaims>(
            bearer.token(),
            &DecodingKey::from_secret(state.auth.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::AuthenticationError(e.to_string()))?;

        let claims = token_data.claims;
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthenticationError("Invalid token subject".to_string()))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| AppError::AuthenticationError(format!("Unknown role: {}", claims.role)))?;

        Ok(AuthActor(Actor::new(id, role, claims.name)))
    }
}
