use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    posts::{
        dto::{CommentRequest, CreatePostRequest, PostResponse},
        repo,
    },
    state::AppState,
    users::repo::User,
};

fn parse_post_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse().map_err(|_| ApiError::NotFound("Post not found"))
}

/// POST /api/posts: create a post carrying the author's name/avatar snapshot.
#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let text = payload.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return Err(ApiError::Validation(vec!["Post text is required"]));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    let post = repo::insert(&state.db, user_id, &text, &user.name, &user.avatar).await?;
    info!(user_id = %user_id, post_id = %post.id, "post created");
    Ok(Json(PostResponse {
        post,
        likes: Vec::new(),
        comments: Vec::new(),
    }))
}

/// GET /api/posts: the whole feed, newest-first.
#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = repo::list(&state.db).await?;
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let mut likes = repo::likes_by_post(&state.db, &ids).await?;
    let mut comments = repo::comments_by_post(&state.db, &ids).await?;
    let out = posts
        .into_iter()
        .map(|post| {
            let likes = likes.remove(&post.id).unwrap_or_default();
            let comments = comments.remove(&post.id).unwrap_or_default();
            PostResponse {
                post,
                likes,
                comments,
            }
        })
        .collect();
    Ok(Json(out))
}

/// GET /api/posts/:id
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;
    let likes = repo::likes(&state.db, id).await?;
    let comments = repo::comments(&state.db, id).await?;
    Ok(Json(PostResponse {
        post,
        likes,
        comments,
    }))
}

/// DELETE /api/posts/:id: owner only.
#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    if post.user_id != user_id {
        warn!(post_id = %id, user_id = %user_id, "post delete denied");
        return Err(ApiError::Unauthorized("Not Authorized"));
    }

    repo::delete(&state.db, id).await?;
    info!(post_id = %id, "post removed");
    Ok(Json(serde_json::json!({ "msg": "Post Removed" })))
}

/// PUT /api/posts/like/:id
#[instrument(skip(state))]
pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<repo::Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    if repo::like(&state.db, id, user_id).await? == 0 {
        return Err(ApiError::BadRequest("Post already liked"));
    }
    Ok(Json(repo::likes(&state.db, id).await?))
}

/// PUT /api/posts/unlike/:id
#[instrument(skip(state))]
pub async fn unlike_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<repo::Like>>, ApiError> {
    let id = parse_post_id(&id)?;
    repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    if repo::unlike(&state.db, id, user_id).await? == 0 {
        return Err(ApiError::BadRequest("Post has not been liked yet"));
    }
    Ok(Json(repo::likes(&state.db, id).await?))
}

/// POST /api/posts/comment/:id
#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Vec<repo::Comment>>, ApiError> {
    let text = payload.text.as_deref().unwrap_or("").trim().to_string();
    if text.is_empty() {
        return Err(ApiError::Validation(vec!["You didnt write anything"]));
    }

    let id = parse_post_id(&id)?;
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;
    repo::find(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Post not found"))?;

    repo::insert_comment(&state.db, id, user_id, &text, &user.name, &user.avatar).await?;
    info!(post_id = %id, user_id = %user_id, "comment added");
    Ok(Json(repo::comments(&state.db, id).await?))
}

/// DELETE /api/posts/comment/:id/:comment_id: comment owner only.
#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<repo::Comment>>, ApiError> {
    let id = parse_post_id(&id)?;
    let comment_id = comment_id
        .parse::<Uuid>()
        .map_err(|_| ApiError::NotFound("Comment does not exist"))?;

    let comment = repo::find_comment(&state.db, id, comment_id)
        .await?
        .ok_or(ApiError::NotFound("Comment does not exist"))?;

    if comment.user_id != user_id {
        warn!(comment_id = %comment_id, user_id = %user_id, "comment delete denied");
        return Err(ApiError::Unauthorized("User not authorized"));
    }

    repo::delete_comment(&state.db, comment_id).await?;
    info!(comment_id = %comment_id, "comment removed");
    Ok(Json(repo::comments(&state.db, id).await?))
}
