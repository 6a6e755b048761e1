use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    profile::{
        dto::{EducationRequest, ExperienceRequest, ProfileRequest, ProfileResponse},
        repo,
    },
    state::AppState,
    users::repo::User,
};

async fn full_profile(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileResponse>> {
    let Some(rec) = repo::find_by_user(db, user_id).await? else {
        return Ok(None);
    };
    let experience = repo::experiences(db, user_id).await?;
    let education = repo::educations(db, user_id).await?;
    Ok(Some(ProfileResponse::from_parts(rec, experience, education)))
}

async fn own_profile(db: &PgPool, user_id: Uuid) -> Result<Json<ProfileResponse>, ApiError> {
    full_profile(db, user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::BadRequest("There is no profile for this user"))
}

/// POST /api/profile: create the acting user's profile.
#[instrument(skip(state, payload))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    repo::insert(&state.db, user_id, &fields).await?;
    info!(user_id = %user_id, "profile created");
    own_profile(&state.db, user_id).await
}

/// PUT /api/profile: update the acting user's profile.
#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    let touched = repo::update(&state.db, user_id, &fields).await?;
    if touched == 0 {
        return Err(ApiError::BadRequest("There is no profile for this user"));
    }
    own_profile(&state.db, user_id).await
}

/// GET /api/profile/me
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    own_profile(&state.db, user_id).await
}

/// GET /api/profile/user/:user_id (public). A malformed id reads the same as
/// a missing profile.
#[instrument(skip(state))]
pub async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = user_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::BadRequest("Profile not found"))?;
    full_profile(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::BadRequest("Profile not found"))
}

/// GET /api/profile (public).
#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let recs = repo::list(&state.db).await?;
    let mut out = Vec::with_capacity(recs.len());
    for rec in recs {
        let experience = repo::experiences(&state.db, rec.user_id).await?;
        let education = repo::educations(&state.db, rec.user_id).await?;
        out.push(ProfileResponse::from_parts(rec, experience, education));
    }
    Ok(Json(out))
}

/// DELETE /api/profile: delete the account. The profile and its sub-records
/// cascade; the user's posts keep their author snapshot.
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    User::delete_by_id(&state.db, user_id).await?;
    info!(user_id = %user_id, "account deleted");
    Ok(Json(serde_json::json!({ "msg": "User Deleted" })))
}

/// POST /api/profile/experience
#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExperienceRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    repo::add_experience(&state.db, user_id, &fields).await?;
    own_profile(&state.db, user_id).await
}

/// PUT /api/profile/experience/:exp_id
#[instrument(skip(state, payload))]
pub async fn update_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
    Json(payload): Json<ExperienceRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let exp_id = exp_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::NotFound("Experience not found"))?;
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    let touched = repo::update_experience(&state.db, user_id, exp_id, &fields).await?;
    if touched == 0 {
        return Err(ApiError::NotFound("Experience not found"));
    }
    own_profile(&state.db, user_id).await
}

/// DELETE /api/profile/experience/:exp_id. The statement is scoped to the
/// acting user's rows; deleting an id that is not yours is a no-op.
#[instrument(skip(state))]
pub async fn delete_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if let Ok(exp_id) = exp_id.parse::<Uuid>() {
        repo::delete_experience(&state.db, user_id, exp_id).await?;
    }
    own_profile(&state.db, user_id).await
}

/// POST /api/profile/education
#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<EducationRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    repo::add_education(&state.db, user_id, &fields).await?;
    own_profile(&state.db, user_id).await
}

/// PUT /api/profile/education/:edu_id
#[instrument(skip(state, payload))]
pub async fn update_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
    Json(payload): Json<EducationRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let edu_id = edu_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::NotFound("Education not found"))?;
    let fields = payload.into_fields().map_err(ApiError::Validation)?;
    let touched = repo::update_education(&state.db, user_id, edu_id, &fields).await?;
    if touched == 0 {
        return Err(ApiError::NotFound("Education not found"));
    }
    own_profile(&state.db, user_id).await
}

/// DELETE /api/profile/education/:edu_id
#[instrument(skip(state))]
pub async fn delete_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    if let Ok(edu_id) = edu_id.parse::<Uuid>() {
        repo::delete_education(&state.db, user_id, edu_id).await?;
    }
    own_profile(&state.db, user_id).await
}

/// GET /api/profile/github/:username (public): the user's five most recently
/// created repositories, proxied through the server.
#[instrument(skip(state))]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let url =
        format!("https://api.github.com/users/{username}/repos?per_page=5&sort=created:asc");
    let mut req = state.http.get(&url);
    if let Some(token) = &state.config.github_token {
        req = req.bearer_auth(token);
    }
    let resp = req.send().await.map_err(anyhow::Error::from)?;
    if !resp.status().is_success() {
        warn!(username = %username, status = %resp.status(), "github lookup failed");
        return Err(ApiError::NotFound("No Github profile found"));
    }
    let repos: serde_json::Value = resp.json().await.map_err(anyhow::Error::from)?;
    Ok(Json(repos))
}
