use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub(crate) mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/profile",
            post(handlers::create_profile)
                .put(handlers::update_profile)
                .get(handlers::list_profiles)
                .delete(handlers::delete_account),
        )
        .route("/api/profile/me", get(handlers::me))
        .route("/api/profile/user/:user_id", get(handlers::by_user))
        .route("/api/profile/experience", post(handlers::add_experience))
        .route(
            "/api/profile/experience/:exp_id",
            put(handlers::update_experience).delete(handlers::delete_experience),
        )
        .route("/api/profile/education", post(handlers::add_education))
        .route(
            "/api/profile/education/:edu_id",
            put(handlers::update_education).delete(handlers::delete_education),
        )
        .route("/api/profile/github/:username", get(handlers::github_repos))
}
