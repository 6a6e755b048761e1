use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub(crate) mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts",
            post(handlers::create_post).get(handlers::list_posts),
        )
        .route(
            "/api/posts/:id",
            get(handlers::get_post).delete(handlers::delete_post),
        )
        .route("/api/posts/like/:id", put(handlers::like_post))
        .route("/api/posts/unlike/:id", put(handlers::unlike_post))
        .route("/api/posts/comment/:id", post(handlers::add_comment))
        .route(
            "/api/posts/comment/:id/:comment_id",
            delete(handlers::delete_comment),
        )
}
