use axum::{routing::post, Router};

use crate::state::AppState;

mod avatar;
mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users", post(handlers::register))
}
