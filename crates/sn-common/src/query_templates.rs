//! Template-based natural-language query translation.
//!
//! A prompt is reduced to lowercase tokens and matched against a fixed rule
//! list; the first matching rule picks the canned statement a backend runs.

use serde_json::Value;
use strum::AsRefStr;

use crate::api::ExampleQuery;

/// Row cap applied by every list-shaped template.
pub const TEMPLATE_ROW_LIMIT: i64 = 10;

pub const ML_SKILLS: &[&str] = &["Machine Learning", "Deep Learning", "NLP", "Data Analysis"];
pub const WEB_SKILLS: &[&str] = &[
    "JavaScript",
    "React",
    "Vue.js",
    "Angular",
    "Node.js",
    "Django",
    "FastAPI",
];

#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum QueryTemplate {
    MostConnected,
    PopularSkills,
    MlDevelopers,
    WebDevelopers,
    NetworkStatistics,
    TopCompanies,
    SkillDistribution,
    UserConnections { user_id: String },
    SampleUsers,
}

/// What a backend produced for a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOutput {
    pub statement: String,
    pub rows: Vec<Value>,
}

impl QueryTemplate {
    pub fn query_type(&self) -> &'static str {
        match self {
            QueryTemplate::MostConnected | QueryTemplate::UserConnections { .. } => "connections",
            QueryTemplate::PopularSkills
            | QueryTemplate::MlDevelopers
            | QueryTemplate::WebDevelopers
            | QueryTemplate::SkillDistribution => "skills",
            QueryTemplate::NetworkStatistics => "statistics",
            QueryTemplate::TopCompanies => "companies",
            QueryTemplate::SampleUsers => "fallback",
        }
    }

    pub fn explanation(&self) -> String {
        match self {
            QueryTemplate::MostConnected => {
                "Users ranked by their number of direct connections.".to_string()
            }
            QueryTemplate::PopularSkills => {
                "Skills ranked by how many users list them.".to_string()
            }
            QueryTemplate::MlDevelopers => format!(
                "Users with machine learning or data skills ({}).",
                ML_SKILLS.join(", ")
            ),
            QueryTemplate::WebDevelopers => format!(
                "Users with web development skills ({}).",
                WEB_SKILLS.join(", ")
            ),
            QueryTemplate::NetworkStatistics => {
                "Totals for users, connections, skills and companies.".to_string()
            }
            QueryTemplate::TopCompanies => {
                "Companies ranked by number of employees in the network.".to_string()
            }
            QueryTemplate::SkillDistribution => {
                "Skill and user counts per skill category.".to_string()
            }
            QueryTemplate::UserConnections { user_id } => {
                format!("Direct connections of user {user_id}.")
            }
            QueryTemplate::SampleUsers => {
                "No template matched the query. Showing sample users.".to_string()
            }
        }
    }
}

fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick the template for a prompt. `user_id` enables the personal
/// "my connections" template.
pub fn translate(query: &str, user_id: Option<&str>) -> QueryTemplate {
    let tokens = tokenize(query);
    let has = |word: &str| tokens.iter().any(|t| t == word);
    let has_prefix = |prefix: &str| tokens.iter().any(|t| t.starts_with(prefix));
    let lowered = query.to_lowercase();

    if let Some(user_id) = user_id.filter(|id| !id.trim().is_empty()) {
        if has("my") && (has_prefix("connection") || has_prefix("friend") || has_prefix("network"))
        {
            return QueryTemplate::UserConnections {
                user_id: user_id.trim().to_string(),
            };
        }
    }

    if has("connected") || (has("most") && has_prefix("connection")) {
        QueryTemplate::MostConnected
    } else if has("distribution") || has_prefix("categor") {
        QueryTemplate::SkillDistribution
    } else if has("popular") && has_prefix("skill") {
        QueryTemplate::PopularSkills
    } else if has("ml") || lowered.contains("machine learning") || has_prefix("scien") {
        QueryTemplate::MlDevelopers
    } else if has("web") || has("frontend") {
        QueryTemplate::WebDevelopers
    } else if has_prefix("statistic") || has("stats") {
        QueryTemplate::NetworkStatistics
    } else if has_prefix("compan") || has("employers") {
        QueryTemplate::TopCompanies
    } else {
        QueryTemplate::SampleUsers
    }
}

pub fn example_queries() -> Vec<ExampleQuery> {
    [
        (
            "Who are the most connected users?",
            "Find users with the most connections in the network",
        ),
        ("What are the popular skills?", "Discover the most in-demand skills"),
        (
            "Show me ML developers",
            "Find machine learning and data science professionals",
        ),
        ("Show me web developers", "Find web development professionals"),
        (
            "What are the network statistics?",
            "Get overall statistics about the social network",
        ),
        (
            "Show me top companies",
            "Find companies with the most employees in the network",
        ),
        (
            "What is the skill distribution?",
            "Analyze how skills are distributed across categories",
        ),
        (
            "Who are my connections?",
            "List your direct connections (requires user_id)",
        ),
    ]
    .into_iter()
    .map(|(query, description)| ExampleQuery {
        query: query.to_string(),
        description: description.to_string(),
    })
    .collect()
}
