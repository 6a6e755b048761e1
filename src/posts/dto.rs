use serde::{Deserialize, Serialize};

use crate::posts::repo::{Comment, Like, PostRow};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// A post with its like and comment lists embedded, newest-first.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: PostRow,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}
