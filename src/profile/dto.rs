use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::profile::repo::{Education, Experience, ProfileRecord};

/// Social links sub-object. Only links that were actually provided are stored
/// and rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Create/update body. Skills arrive as one comma-separated string.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub status: Option<String>,
    pub skills: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Validated profile fields ready for the repo.
#[derive(Debug)]
pub struct ProfileFields {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: SocialLinks,
}

fn none_if_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl ProfileRequest {
    pub fn into_fields(self) -> Result<ProfileFields, Vec<&'static str>> {
        let mut errors = Vec::new();
        let status = self.status.as_deref().unwrap_or("").trim().to_string();
        if status.is_empty() {
            errors.push("Status is required");
        }
        let skills_raw = self.skills.as_deref().unwrap_or("").trim().to_string();
        if skills_raw.is_empty() {
            errors.push("Skills are required");
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        let skills = skills_raw.split(',').map(|s| s.trim().to_string()).collect();
        Ok(ProfileFields {
            status,
            skills,
            company: none_if_blank(self.company),
            website: none_if_blank(self.website),
            location: none_if_blank(self.location),
            bio: none_if_blank(self.bio),
            githubusername: none_if_blank(self.githubusername),
            social: SocialLinks {
                youtube: none_if_blank(self.youtube),
                twitter: none_if_blank(self.twitter),
                facebook: none_if_blank(self.facebook),
                linkedin: none_if_blank(self.linkedin),
                instagram: none_if_blank(self.instagram),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct ExperienceFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: Date,
    pub to: Option<Date>,
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceRequest {
    pub fn into_fields(self) -> Result<ExperienceFields, Vec<&'static str>> {
        let mut errors = Vec::new();
        let title = self.title.as_deref().unwrap_or("").trim().to_string();
        if title.is_empty() {
            errors.push("Job title is required");
        }
        let company = self.company.as_deref().unwrap_or("").trim().to_string();
        if company.is_empty() {
            errors.push("Company Name is required");
        }
        let Some(from) = self.from else {
            errors.push("Starting date is required");
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ExperienceFields {
            title,
            company,
            location: none_if_blank(self.location),
            from,
            to: self.to,
            current: self.current.unwrap_or(false),
            description: none_if_blank(self.description),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct EducationFields {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: Date,
    pub to: Option<Date>,
    pub current: bool,
    pub description: Option<String>,
}

impl EducationRequest {
    pub fn into_fields(self) -> Result<EducationFields, Vec<&'static str>> {
        let mut errors = Vec::new();
        let school = self.school.as_deref().unwrap_or("").trim().to_string();
        if school.is_empty() {
            errors.push("School name is required");
        }
        let degree = self.degree.as_deref().unwrap_or("").trim().to_string();
        if degree.is_empty() {
            errors.push("Major is required");
        }
        let fieldofstudy = self.fieldofstudy.as_deref().unwrap_or("").trim().to_string();
        if fieldofstudy.is_empty() {
            errors.push("Field of study is required");
        }
        let Some(from) = self.from else {
            errors.push("Starting date is required");
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(EducationFields {
            school,
            degree,
            fieldofstudy,
            from,
            to: self.to,
            current: self.current.unwrap_or(false),
            description: none_if_blank(self.description),
        })
    }
}

/// Populated owner snippet, mirroring the `user` population on reads.
#[derive(Debug, Serialize)]
pub struct ProfileUser {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ProfileUser,
    pub status: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    pub social: SocialLinks,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    #[serde(rename = "date")]
    pub created_at: OffsetDateTime,
}

impl ProfileResponse {
    pub fn from_parts(
        rec: ProfileRecord,
        experience: Vec<Experience>,
        education: Vec<Education>,
    ) -> Self {
        Self {
            user: ProfileUser {
                id: rec.user_id,
                name: rec.name,
                avatar: rec.avatar,
            },
            status: rec.status,
            skills: rec.skills,
            company: rec.company,
            website: rec.website,
            location: rec.location,
            bio: rec.bio,
            githubusername: rec.githubusername,
            social: rec.social.map(|j| j.0).unwrap_or_default(),
            experience,
            education,
            created_at: rec.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> ProfileRequest {
        ProfileRequest {
            status: Some("Developer".into()),
            skills: Some("Rust, SQL ,Axum".into()),
            company: None,
            website: None,
            location: None,
            bio: None,
            githubusername: None,
            youtube: None,
            twitter: None,
            facebook: None,
            linkedin: None,
            instagram: None,
        }
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        let fields = base_request().into_fields().expect("valid request");
        assert_eq!(fields.skills, vec!["Rust", "SQL", "Axum"]);
    }

    #[test]
    fn missing_status_and_skills_are_both_reported() {
        let mut req = base_request();
        req.status = None;
        req.skills = Some("   ".into());
        let errors = req.into_fields().unwrap_err();
        assert_eq!(errors, vec!["Status is required", "Skills are required"]);
    }

    #[test]
    fn blank_optionals_are_dropped() {
        let mut req = base_request();
        req.company = Some("  ".into());
        req.youtube = Some(String::new());
        let fields = req.into_fields().expect("valid request");
        assert!(fields.company.is_none());
        assert!(fields.social.youtube.is_none());
    }

    #[test]
    fn experience_requires_title_company_and_from() {
        let req = ExperienceRequest {
            title: None,
            company: Some("".into()),
            location: None,
            from: None,
            to: None,
            current: None,
            description: None,
        };
        let errors = req.into_fields().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Job title is required",
                "Company Name is required",
                "Starting date is required"
            ]
        );
    }

    #[test]
    fn unset_social_links_are_omitted_from_json() {
        let social = SocialLinks {
            twitter: Some("https://twitter.com/a".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&social).expect("serialize");
        assert_eq!(json, r#"{"twitter":"https://twitter.com/a"}"#);
    }
}
