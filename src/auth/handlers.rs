use axum::{
    extract::{FromRef, State},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        jwt::{AuthUser, JwtKeys},
        password::verify_password,
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

/// GET /api/auth: the authenticated user, password hash omitted from the body.
#[instrument(skip(state))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(user))
}

/// POST /api/auth: credential check and token issuance.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let password = payload.password.as_deref().unwrap_or("");

    let mut errors = Vec::new();
    if !crate::auth::is_valid_email(&email) {
        errors.push("Please include a valid email");
    }
    if password.is_empty() {
        errors.push("Password is required");
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // Identical body for an unknown email and a wrong password: the response
    // must not disclose which check failed.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!("login with unknown email");
            return Err(ApiError::Validation(vec!["Invalid Credentials"]));
        }
    };
    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Validation(vec!["Invalid Credentials"]));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse { token }))
}
