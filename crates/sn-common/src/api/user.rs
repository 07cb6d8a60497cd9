use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").unwrap()
});

const NAME_MAX: usize = 100;
const TITLE_MAX: usize = 100;
const LOCATION_MAX: usize = 100;
const BIO_MAX: usize = 500;
const SKILL_NAME_MAX: usize = 50;
const COMPANY_NAME_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Payload accepted by `POST /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
}

fn check_len(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UserCreate {
    /// Trim free-text fields, lowercase the email and dedupe skill names
    /// (first spelling wins).
    pub fn normalized(self) -> Self {
        let mut seen = BTreeSet::new();
        let skills = self
            .skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .filter(|skill| seen.insert(skill.to_lowercase()))
            .collect();

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            title: trimmed(self.title),
            location: trimmed(self.location),
            bio: trimmed(self.bio),
            skills,
            company: trimmed(self.company),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_len("name", &self.name, 1, NAME_MAX)?;

        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::new("email", "is not a valid email address"));
        }
        if let Some(title) = &self.title {
            check_len("title", title, 0, TITLE_MAX)?;
        }
        if let Some(location) = &self.location {
            check_len("location", location, 0, LOCATION_MAX)?;
        }
        if let Some(bio) = &self.bio {
            check_len("bio", bio, 0, BIO_MAX)?;
        }
        for skill in &self.skills {
            check_len("skills", skill, 1, SKILL_NAME_MAX)?;
        }
        if let Some(company) = &self.company {
            check_len("company", company, 1, COMPANY_NAME_MAX)?;
        }

        Ok(())
    }
}

/// List view of a user with relationship counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub connection_count: u32,
    pub skill_count: u32,
}

/// Detail view of a user including skills, employer and connection ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub connections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionResponse {
    pub user_id: String,
    pub connected_user_id: String,
    /// false when the two users were already connected
    pub created: bool,
}
