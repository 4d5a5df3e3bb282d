use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::ActorClaims, state::AppState};

#[derive(Debug, Deserialize)]
struct TokenRequest {
    user_id: Option<Uuid>,
    role: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/auth/token", post(issue_token))
}

/// Issue a bearer token for an identity already verified upstream. Credential
/// handling itself lives outside this service.
async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // Reject unknown roles up front rather than on first use
    req.role
        .parse::<agrilogix_core::actor::Role>()
        .map_err(|_| AppError::ValidationError(format!("Unknown role: {}", req.role)))?;

    let claims = ActorClaims {
        sub: req.user_id.unwrap_or_else(Uuid::new_v4).to_string(),
        role: req.role,
        name: req.name,
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}
