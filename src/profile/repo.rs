use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::profile::dto::{EducationFields, ExperienceFields, ProfileFields, SocialLinks};

/// Profile row joined with its owner's name and avatar.
#[derive(Debug, FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub name: String,
    pub avatar: String,
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Option<Json<SocialLinks>>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "from")]
    pub from_date: Date,
    #[serde(rename = "to", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<Date>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    #[serde(rename = "from")]
    pub from_date: Date,
    #[serde(rename = "to", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<Date>,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

const PROFILE_COLUMNS: &str = r#"
    p.user_id, u.name, u.avatar, p.status, p.skills, p.company, p.website,
    p.location, p.bio, p.githubusername, p.social, p.created_at
"#;

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRecord>> {
    let rec = sqlx::query_as::<_, ProfileRecord>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = $1
        "#
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(rec)
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ProfileRecord>> {
    let recs = sqlx::query_as::<_, ProfileRecord>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC
        "#
    ))
    .fetch_all(db)
    .await?;
    Ok(recs)
}

pub async fn insert(db: &PgPool, user_id: Uuid, f: &ProfileFields) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, status, skills, company, website, location,
                              bio, githubusername, social)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(user_id)
    .bind(&f.status)
    .bind(&f.skills)
    .bind(&f.company)
    .bind(&f.website)
    .bind(&f.location)
    .bind(&f.bio)
    .bind(&f.githubusername)
    .bind(Json(&f.social))
    .execute(db)
    .await?;
    Ok(())
}

/// Returns the number of rows touched; zero means no profile exists yet.
pub async fn update(db: &PgPool, user_id: Uuid, f: &ProfileFields) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET status = $2, skills = $3, company = $4, website = $5, location = $6,
            bio = $7, githubusername = $8, social = $9
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(&f.status)
    .bind(&f.skills)
    .bind(&f.company)
    .bind(&f.website)
    .bind(&f.location)
    .bind(&f.bio)
    .bind(&f.githubusername)
    .bind(Json(&f.social))
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn experiences(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Experience>> {
    let rows = sqlx::query_as::<_, Experience>(
        r#"
        SELECT id, title, company, location, from_date, to_date, current, description
        FROM profile_experience
        WHERE user_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn add_experience(
    db: &PgPool,
    user_id: Uuid,
    f: &ExperienceFields,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profile_experience (user_id, title, company, location, from_date,
                                        to_date, current, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user_id)
    .bind(&f.title)
    .bind(&f.company)
    .bind(&f.location)
    .bind(f.from)
    .bind(f.to)
    .bind(f.current)
    .bind(&f.description)
    .execute(db)
    .await?;
    Ok(())
}

/// Scoped to the acting user's profile; that scoping is the whole
/// authorization story on this route.
pub async fn update_experience(
    db: &PgPool,
    user_id: Uuid,
    exp_id: Uuid,
    f: &ExperienceFields,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE profile_experience
        SET title = $3, company = $4, location = $5, from_date = $6, to_date = $7,
            current = $8, description = $9
        WHERE id = $2 AND user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(exp_id)
    .bind(&f.title)
    .bind(&f.company)
    .bind(&f.location)
    .bind(f.from)
    .bind(f.to)
    .bind(f.current)
    .bind(&f.description)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_experience(db: &PgPool, user_id: Uuid, exp_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM profile_experience WHERE id = $2 AND user_id = $1")
        .bind(user_id)
        .bind(exp_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn educations(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Education>> {
    let rows = sqlx::query_as::<_, Education>(
        r#"
        SELECT id, school, degree, fieldofstudy, from_date, to_date, current, description
        FROM profile_education
        WHERE user_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn add_education(db: &PgPool, user_id: Uuid, f: &EducationFields) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profile_education (user_id, school, degree, fieldofstudy, from_date,
                                       to_date, current, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user_id)
    .bind(&f.school)
    .bind(&f.degree)
    .bind(&f.fieldofstudy)
    .bind(f.from)
    .bind(f.to)
    .bind(f.current)
    .bind(&f.description)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update_education(
    db: &PgPool,
    user_id: Uuid,
    edu_id: Uuid,
    f: &EducationFields,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE profile_education
        SET school = $3, degree = $4, fieldofstudy = $5, from_date = $6, to_date = $7,
            current = $8, description = $9
        WHERE id = $2 AND user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(edu_id)
    .bind(&f.school)
    .bind(&f.degree)
    .bind(&f.fieldofstudy)
    .bind(f.from)
    .bind(f.to)
    .bind(f.current)
    .bind(&f.description)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_education(db: &PgPool, user_id: Uuid, edu_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM profile_education WHERE id = $2 AND user_id = $1")
        .bind(user_id)
        .bind(edu_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
