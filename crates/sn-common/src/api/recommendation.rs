use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use thiserror::Error;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 50;
pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {0}")]
pub struct LimitError(pub i64);

/// Number of results a recommendation request may return (1..=50).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimit(usize);

impl RecommendationLimit {
    pub fn new(value: i64) -> Result<Self, LimitError> {
        if (MIN_LIMIT..=MAX_LIMIT).contains(&value) {
            Ok(Self(value as usize))
        } else {
            Err(LimitError(value))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RecommendationLimit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT as usize)
    }
}

impl TryFrom<i64> for RecommendationLimit {
    type Error = LimitError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
pub enum FriendReason {
    #[serde(rename = "Many mutual connections")]
    #[strum(serialize = "Many mutual connections")]
    ManyMutualConnections,
    #[serde(rename = "Similar skills")]
    #[strum(serialize = "Similar skills")]
    SimilarSkills,
    #[serde(rename = "Mutual connections")]
    #[strum(serialize = "Mutual connections")]
    MutualConnections,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRecommendation {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub mutual_connections: u32,
    pub common_skills: Vec<String>,
    /// Clamped to [0, 1].
    pub score: f64,
    pub reason: FriendReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub required_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub skill_match_rate: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSuggestion {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub mutual_connections: u32,
    pub common_skills: u32,
    pub same_company: bool,
    /// Hop count of the shortest KNOWS path; not part of the score.
    pub connection_path_length: Option<u32>,
    pub score: f64,
}
