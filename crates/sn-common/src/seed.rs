//! Deterministic demo network.
//!
//! The same `SeedConfig` always yields the same users, skills, employers and
//! connections, so a seeded memory backend and a seeded database agree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct CompanySeed {
    pub name: &'static str,
    pub industry: &'static str,
    pub location: &'static str,
    pub size: &'static str,
}

pub const COMPANIES: &[CompanySeed] = &[
    CompanySeed { name: "TechCorp", industry: "Technology", location: "San Francisco, CA", size: "500+" },
    CompanySeed { name: "DataSystems Inc", industry: "Software", location: "New York, NY", size: "201-500" },
    CompanySeed { name: "CloudWorks", industry: "Cloud Computing", location: "Seattle, WA", size: "500+" },
    CompanySeed { name: "AI Innovations", industry: "Artificial Intelligence", location: "Boston, MA", size: "51-200" },
    CompanySeed { name: "FinTech Solutions", industry: "Finance", location: "London, UK", size: "201-500" },
    CompanySeed { name: "HealthTech", industry: "Healthcare", location: "Austin, TX", size: "51-200" },
    CompanySeed { name: "EduPlatform", industry: "Education", location: "Chicago, IL", size: "11-50" },
    CompanySeed { name: "GreenEnergy Co", industry: "Energy", location: "Portland, OR", size: "201-500" },
];

/// `(name, category)`
pub const SKILLS: &[(&str, &str)] = &[
    ("Python", "Programming"),
    ("JavaScript", "Programming"),
    ("Java", "Programming"),
    ("C++", "Programming"),
    ("Go", "Programming"),
    ("Rust", "Programming"),
    ("React", "Frontend"),
    ("Vue.js", "Frontend"),
    ("Angular", "Frontend"),
    ("Node.js", "Backend"),
    ("Django", "Backend"),
    ("FastAPI", "Backend"),
    ("PostgreSQL", "Database"),
    ("MongoDB", "Database"),
    ("Neo4j", "Database"),
    ("Redis", "Database"),
    ("Docker", "DevOps"),
    ("Kubernetes", "DevOps"),
    ("AWS", "Cloud"),
    ("Azure", "Cloud"),
    ("GCP", "Cloud"),
    ("Machine Learning", "AI/ML"),
    ("Deep Learning", "AI/ML"),
    ("NLP", "AI/ML"),
    ("Data Analysis", "Data Science"),
    ("Data Visualization", "Data Science"),
    ("Product Management", "Management"),
    ("Agile", "Management"),
    ("UX Design", "Design"),
    ("UI Design", "Design"),
];

pub const JOB_TITLES: &[&str] = &[
    "Software Engineer",
    "Senior Software Engineer",
    "Staff Software Engineer",
    "Data Scientist",
    "Senior Data Scientist",
    "Machine Learning Engineer",
    "DevOps Engineer",
    "Cloud Architect",
    "Product Manager",
    "Engineering Manager",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "UX Designer",
    "UI Designer",
    "Database Administrator",
    "Security Engineer",
    "QA Engineer",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken", "Frances", "Edsger",
    "Radia", "Donald", "Katherine", "John", "Hedy", "Tim", "Anita", "Guido", "Sophie", "Bjarne",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Hopper", "Torvalds", "Hamilton", "Ritchie", "Liskov", "Thompson",
    "Allen", "Dijkstra", "Perlman", "Knuth", "Johnson", "McCarthy", "Lamarr", "Berners-Lee",
    "Borg", "Rossum", "Wilson", "Stroustrup",
];

const CITIES: &[&str] = &[
    "San Francisco, CA",
    "New York, NY",
    "Seattle, WA",
    "Boston, MA",
    "Austin, TX",
    "Chicago, IL",
    "Portland, OR",
    "Denver, CO",
];

const SKILL_PROBABILITY: f64 = 0.15;
const MAX_CONNECTION_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedConfig {
    pub users: usize,
    pub avg_connections: usize,
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 100,
            avg_connections: 15,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub location: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeedNetwork {
    pub users: Vec<SeedUser>,
    /// Undirected edges as `(lower id, higher id)`.
    pub connections: Vec<(String, String)>,
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Per-pair edge probability that yields roughly `avg_connections` per user.
pub fn connection_probability(users: usize, avg_connections: usize) -> f64 {
    if users == 0 {
        return 0.0;
    }
    ((avg_connections * 2) as f64 / users as f64).min(MAX_CONNECTION_PROBABILITY)
}

pub fn generate(config: SeedConfig) -> SeedNetwork {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let users: Vec<SeedUser> = (1..=config.users)
        .map(|n| {
            let first = pick(&mut rng, FIRST_NAMES);
            let last = pick(&mut rng, LAST_NAMES);
            let title = pick(&mut rng, JOB_TITLES);
            let location = pick(&mut rng, CITIES);
            let company = COMPANIES[rng.gen_range(0..COMPANIES.len())].name;
            let skills = SKILLS
                .iter()
                .filter(|_| rng.gen_bool(SKILL_PROBABILITY))
                .map(|(name, _)| name.to_string())
                .collect();

            SeedUser {
                user_id: format!("user-{n}"),
                name: format!("{first} {last}"),
                email: format!("{first}.{last}.{n}@example.com").to_lowercase(),
                title: title.to_string(),
                location: location.to_string(),
                bio: format!("{title} based in {location}."),
                skills,
                company: company.to_string(),
            }
        })
        .collect();

    let probability = connection_probability(users.len(), config.avg_connections);
    let mut connections = Vec::new();
    for (i, a) in users.iter().enumerate() {
        for b in &users[i + 1..] {
            if rng.gen_bool(probability) {
                let (low, high) = if a.user_id < b.user_id {
                    (&a.user_id, &b.user_id)
                } else {
                    (&b.user_id, &a.user_id)
                };
                connections.push((low.clone(), high.clone()));
            }
        }
    }

    SeedNetwork { users, connections }
}

pub fn skill_category(name: &str) -> Option<&'static str> {
    SKILLS
        .iter()
        .find(|(skill, _)| *skill == name)
        .map(|(_, category)| *category)
}
