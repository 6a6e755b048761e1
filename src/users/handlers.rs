use axum::{
    extract::{FromRef, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::TokenResponse, jwt::JwtKeys, password::hash_password},
    error::ApiError,
    state::AppState,
    users::{avatar::gravatar_url, dto::RegisterRequest, repo::User},
};

/// POST /api/users: registration. Creates the user with a salted hash and a
/// deterministic avatar, then issues a token straight away.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    let email = payload
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let password = payload.password.as_deref().unwrap_or("");

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("Name is required");
    }
    if !crate::auth::is_valid_email(&email) {
        errors.push("Please include a valid email");
    }
    if password.chars().count() < 6 {
        errors.push("Please enter a password with 6 or more characters");
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!("registration with taken email");
        return Err(ApiError::Validation(vec!["User already exists"]));
    }

    let avatar = gravatar_url(&email);
    let hash = hash_password(password)?;
    let user = User::create(&state.db, &name, &email, &hash, &avatar).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user registered");
    Ok(Json(TokenResponse { token }))
}
