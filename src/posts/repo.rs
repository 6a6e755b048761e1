use std::collections::HashMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Post row. `name` and `avatar` are the author snapshot taken at creation
/// time; they never track later profile edits.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "date")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Like {
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "date")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(rename = "date")]
    pub created_at: OffsetDateTime,
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    text: &str,
    name: &str,
    avatar: &str,
) -> anyhow::Result<PostRow> {
    let post = sqlx::query_as::<_, PostRow>(
        r#"
        INSERT INTO posts (user_id, text, name, avatar)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, text, name, avatar, created_at
        "#,
    )
    .bind(user_id)
    .bind(text)
    .bind(name)
    .bind(avatar)
    .fetch_one(db)
    .await?;
    Ok(post)
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<PostRow>> {
    let posts = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, text, name, avatar, created_at
        FROM posts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(posts)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<PostRow>> {
    let post = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, text, name, avatar, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(post)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn likes(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Like>> {
    let rows = sqlx::query_as::<_, Like>(
        r#"
        SELECT user_id, created_at
        FROM post_likes
        WHERE post_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Atomic like: the (post_id, user_id) primary key makes the second like by
/// the same user a zero-row insert rather than a lost update.
pub async fn like(db: &PgPool, post_id: Uuid, user_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO post_likes (post_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (post_id, user_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn unlike(db: &PgPool, post_id: Uuid, user_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn comments(db: &PgPool, post_id: Uuid) -> anyhow::Result<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, text, name, avatar, created_at
        FROM post_comments
        WHERE post_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert_comment(
    db: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    text: &str,
    name: &str,
    avatar: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO post_comments (post_id, user_id, text, name, avatar)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(text)
    .bind(name)
    .bind(avatar)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_comment(
    db: &PgPool,
    post_id: Uuid,
    comment_id: Uuid,
) -> anyhow::Result<Option<Comment>> {
    let row = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, text, name, avatar, created_at
        FROM post_comments
        WHERE id = $1 AND post_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete_comment(db: &PgPool, comment_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM post_comments WHERE id = $1")
        .bind(comment_id)
        .execute(db)
        .await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct LikeRow {
    post_id: Uuid,
    user_id: Uuid,
    created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
struct CommentRow {
    post_id: Uuid,
    id: Uuid,
    user_id: Uuid,
    text: String,
    name: String,
    avatar: String,
    created_at: OffsetDateTime,
}

/// Likes for a set of posts in two round trips instead of one per post.
pub async fn likes_by_post(
    db: &PgPool,
    post_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<Like>>> {
    let rows = sqlx::query_as::<_, LikeRow>(
        r#"
        SELECT post_id, user_id, created_at
        FROM post_likes
        WHERE post_id = ANY($1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(post_ids)
    .fetch_all(db)
    .await?;
    let mut map: HashMap<Uuid, Vec<Like>> = HashMap::new();
    for r in rows {
        map.entry(r.post_id).or_default().push(Like {
            user_id: r.user_id,
            created_at: r.created_at,
        });
    }
    Ok(map)
}

pub async fn comments_by_post(
    db: &PgPool,
    post_ids: &[Uuid],
) -> anyhow::Result<HashMap<Uuid, Vec<Comment>>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT post_id, id, user_id, text, name, avatar, created_at
        FROM post_comments
        WHERE post_id = ANY($1)
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(post_ids)
    .fetch_all(db)
    .await?;
    let mut map: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for r in rows {
        map.entry(r.post_id).or_default().push(Comment {
            id: r.id,
            user_id: r.user_id,
            text: r.text,
            name: r.name,
            avatar: r.avatar,
            created_at: r.created_at,
        });
    }
    Ok(map)
}
