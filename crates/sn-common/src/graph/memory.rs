//! In-process graph used by tests and the `memory` backend.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Value, json};
use tracing::debug;
use ulid::Ulid;

use super::{
    DEFAULT_MAX_PATH_DEPTH, GraphAnalytics, GraphError, GraphQuery, MAX_PATH_DEPTH,
    RequesterContext, UserRepository,
};
use crate::api::{PathNode, User, UserCreate, UserResponse};
use crate::insights::NetworkSnapshot;
use crate::query_templates::{ML_SKILLS, QueryTemplate, TEMPLATE_ROW_LIMIT, TemplateOutput, WEB_SKILLS};
use crate::recommend::signals::{
    CandidateProfile, EmployerProfile, EmployerSignal, FriendSignal, PeopleSignal,
};
use crate::seed::{COMPANIES, SeedNetwork, skill_category};

#[derive(Debug, Clone)]
struct UserRecord {
    name: String,
    email: String,
    title: Option<String>,
    location: Option<String>,
    bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct CompanyRecord {
    industry: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Default)]
struct GraphData {
    users: BTreeMap<String, UserRecord>,
    skills: BTreeMap<String, Option<String>>,
    companies: BTreeMap<String, CompanyRecord>,
    knows: BTreeMap<String, BTreeSet<String>>,
    user_skills: BTreeMap<String, BTreeSet<String>>,
    employment: BTreeMap<String, String>,
}

impl GraphData {
    fn neighbours(&self, user_id: &str) -> impl Iterator<Item = &String> {
        self.knows.get(user_id).into_iter().flatten()
    }

    fn skills_of(&self, user_id: &str) -> Option<&BTreeSet<String>> {
        self.user_skills.get(user_id)
    }

    fn connection_count(&self, user_id: &str) -> usize {
        self.knows.get(user_id).map_or(0, BTreeSet::len)
    }

    fn profile(&self, user_id: &str, record: &UserRecord) -> CandidateProfile {
        CandidateProfile {
            user_id: user_id.to_string(),
            name: record.name.clone(),
            title: record.title.clone(),
        }
    }

    fn path_node(&self, user_id: &str) -> Option<PathNode> {
        self.users.get(user_id).map(|record| PathNode {
            user_id: user_id.to_string(),
            name: record.name.clone(),
            title: record.title.clone(),
            company: self.employment.get(user_id).cloned(),
        })
    }

    fn ensure_skill(&mut self, name: &str) {
        self.skills
            .entry(name.to_string())
            .or_insert_with(|| skill_category(name).map(str::to_string));
    }

    fn ensure_company(&mut self, name: &str) {
        self.companies.entry(name.to_string()).or_insert_with(|| {
            COMPANIES
                .iter()
                .find(|c| c.name == name)
                .map(|c| CompanyRecord {
                    industry: Some(c.industry.to_string()),
                    location: Some(c.location.to_string()),
                })
                .unwrap_or_default()
        });
    }

    fn require_user(&self, user_id: &str) -> Result<(), GraphError> {
        if self.users.contains_key(user_id) {
            Ok(())
        } else {
            Err(GraphError::NotFound(format!("user {user_id}")))
        }
    }

    fn link(&mut self, a: &str, b: &str) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::Invalid("a user cannot connect to themselves".into()));
        }
        self.require_user(a)?;
        self.require_user(b)?;

        let created = self
            .knows
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.knows
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        Ok(created)
    }

    fn user_response(&self, user_id: &str) -> Option<UserResponse> {
        let record = self.users.get(user_id)?;
        Some(UserResponse {
            user_id: user_id.to_string(),
            name: record.name.clone(),
            email: record.email.clone(),
            title: record.title.clone(),
            location: record.location.clone(),
            bio: record.bio.clone(),
            skills: self
                .skills_of(user_id)
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_default(),
            company: self.employment.get(user_id).cloned(),
            connections: self.neighbours(user_id).cloned().collect(),
        })
    }

    /// Users sorted by name then id.
    fn users_by_name(&self) -> Vec<(&String, &UserRecord)> {
        let mut users: Vec<_> = self.users.iter().collect();
        users.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        users
    }

    fn users_with_any_skill(&self, wanted: &[&str]) -> Vec<Value> {
        let mut matches: Vec<(&String, &UserRecord, Vec<&String>)> = self
            .users
            .iter()
            .filter_map(|(id, record)| {
                let held: Vec<&String> = self
                    .skills_of(id)?
                    .iter()
                    .filter(|s| wanted.contains(&s.as_str()))
                    .collect();
                (!held.is_empty()).then_some((id, record, held))
            })
            .collect();
        matches.sort_by(|a, b| {
            b.2.len()
                .cmp(&a.2.len())
                .then_with(|| a.1.name.cmp(&b.1.name))
                .then_with(|| a.0.cmp(b.0))
        });

        matches
            .into_iter()
            .take(TEMPLATE_ROW_LIMIT as usize)
            .map(|(id, record, held)| {
                json!({
                    "user_id": id,
                    "name": record.name,
                    "title": record.title,
                    "skills": held,
                })
            })
            .collect()
    }

    fn template_rows(&self, template: &QueryTemplate) -> Vec<Value> {
        let limit = TEMPLATE_ROW_LIMIT as usize;
        match template {
            QueryTemplate::MostConnected => {
                let mut users: Vec<_> = self.users.iter().collect();
                users.sort_by(|a, b| {
                    self.connection_count(b.0)
                        .cmp(&self.connection_count(a.0))
                        .then_with(|| a.1.name.cmp(&b.1.name))
                        .then_with(|| a.0.cmp(b.0))
                });
                users
                    .into_iter()
                    .take(limit)
                    .map(|(id, record)| {
                        json!({
                            "user_id": id,
                            "name": record.name,
                            "title": record.title,
                            "connections": self.connection_count(id),
                        })
                    })
                    .collect()
            }
            QueryTemplate::PopularSkills => {
                let mut counts: BTreeMap<&String, usize> = BTreeMap::new();
                for skills in self.user_skills.values() {
                    for skill in skills {
                        *counts.entry(skill).or_default() += 1;
                    }
                }
                let mut counts: Vec<_> = counts.into_iter().collect();
                counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                counts
                    .into_iter()
                    .take(limit)
                    .map(|(skill, user_count)| {
                        json!({
                            "skill": skill,
                            "category": self.skills.get(skill).cloned().flatten(),
                            "user_count": user_count,
                        })
                    })
                    .collect()
            }
            QueryTemplate::MlDevelopers => self.users_with_any_skill(ML_SKILLS),
            QueryTemplate::WebDevelopers => self.users_with_any_skill(WEB_SKILLS),
            QueryTemplate::NetworkStatistics => {
                let total_users = self.users.len();
                let endpoints: usize = self.knows.values().map(BTreeSet::len).sum();
                let avg_connections = if total_users == 0 {
                    0.0
                } else {
                    endpoints as f64 / total_users as f64
                };
                vec![json!({
                    "total_users": total_users,
                    "total_connections": endpoints / 2,
                    "total_skills": self.skills.len(),
                    "total_companies": self.companies.len(),
                    "avg_connections": avg_connections,
                })]
            }
            QueryTemplate::TopCompanies => {
                let mut employees: BTreeMap<&String, usize> =
                    self.companies.keys().map(|name| (name, 0)).collect();
                for company in self.employment.values() {
                    *employees.entry(company).or_default() += 1;
                }
                let mut employees: Vec<_> = employees.into_iter().collect();
                employees.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                employees
                    .into_iter()
                    .take(limit)
                    .map(|(company, employee_count)| {
                        json!({
                            "company": company,
                            "industry": self.companies.get(company).and_then(|c| c.industry.clone()),
                            "employee_count": employee_count,
                        })
                    })
                    .collect()
            }
            QueryTemplate::SkillDistribution => {
                let mut categories: BTreeMap<String, (usize, BTreeSet<&String>)> = BTreeMap::new();
                for category in self.skills.values() {
                    let category = category.clone().unwrap_or_else(|| "Uncategorized".into());
                    categories.entry(category).or_default().0 += 1;
                }
                for (user_id, skills) in &self.user_skills {
                    for skill in skills {
                        let category = self
                            .skills
                            .get(skill)
                            .cloned()
                            .flatten()
                            .unwrap_or_else(|| "Uncategorized".into());
                        categories.entry(category).or_default().1.insert(user_id);
                    }
                }
                let mut categories: Vec<_> = categories
                    .into_iter()
                    .map(|(category, (skill_count, users))| (category, skill_count, users.len()))
                    .collect();
                categories.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
                categories
                    .into_iter()
                    .map(|(category, skill_count, user_count)| {
                        json!({
                            "category": category,
                            "skill_count": skill_count,
                            "user_count": user_count,
                        })
                    })
                    .collect()
            }
            QueryTemplate::UserConnections { user_id } => {
                let mut friends: Vec<PathNode> = self
                    .neighbours(user_id)
                    .filter_map(|id| self.path_node(id))
                    .collect();
                friends.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));
                friends
                    .into_iter()
                    .take(limit)
                    .map(|node| {
                        json!({
                            "user_id": node.user_id,
                            "name": node.name,
                            "title": node.title,
                            "company": node.company,
                        })
                    })
                    .collect()
            }
            QueryTemplate::SampleUsers => self
                .users_by_name()
                .into_iter()
                .take(limit)
                .map(|(id, record)| {
                    json!({
                        "user_id": id,
                        "name": record.name,
                        "title": record.title,
                    })
                })
                .collect(),
        }
    }

    /// Breadth-first search over sorted neighbour sets, bounded by `max_depth` hops.
    fn bfs(&self, from: &str, to: &str, max_depth: usize) -> Option<Vec<String>> {
        if from == to {
            return Some(vec![from.to_string()]);
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(from, 0)]);
        parents.insert(from, from);

        while let Some((current, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            for next in self.neighbours(current).map(String::as_str) {
                if parents.contains_key(next) {
                    continue;
                }
                parents.insert(next, current);
                if next == to {
                    let mut path = vec![to.to_string()];
                    let mut cursor = to;
                    while let Some(&parent) = parents.get(cursor).filter(|_| cursor != from) {
                        cursor = parent;
                        path.push(cursor.to_string());
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back((next, depth + 1));
            }
        }
        None
    }
}

/// Thread-safe in-memory social graph.
#[derive(Debug)]
pub struct InMemoryGraph {
    data: RwLock<GraphData>,
    max_path_depth: usize,
}

impl Default for InMemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(GraphData::default()),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }

    pub fn with_max_path_depth(mut self, depth: usize) -> Self {
        self.max_path_depth = depth;
        self
    }

    /// Load a generated demo network.
    pub fn from_seed(network: &SeedNetwork) -> Self {
        let mut data = GraphData::default();
        for company in COMPANIES {
            data.ensure_company(company.name);
        }
        for user in &network.users {
            data.users.insert(
                user.user_id.clone(),
                UserRecord {
                    name: user.name.clone(),
                    email: user.email.clone(),
                    title: Some(user.title.clone()),
                    location: Some(user.location.clone()),
                    bio: Some(user.bio.clone()),
                },
            );
            for skill in &user.skills {
                data.ensure_skill(skill);
                data.user_skills
                    .entry(user.user_id.clone())
                    .or_default()
                    .insert(skill.clone());
            }
            data.ensure_company(&user.company);
            data.employment
                .insert(user.user_id.clone(), user.company.clone());
        }
        for (a, b) in &network.connections {
            data.knows.entry(a.clone()).or_default().insert(b.clone());
            data.knows.entry(b.clone()).or_default().insert(a.clone());
        }

        debug!(
            users = data.users.len(),
            connections = network.connections.len(),
            "loaded seed network into memory graph"
        );

        Self {
            data: RwLock::new(data),
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, GraphData>, GraphError> {
        self.data
            .read()
            .map_err(|_| GraphError::Unavailable("memory graph lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, GraphData>, GraphError> {
        self.data
            .write()
            .map_err(|_| GraphError::Unavailable("memory graph lock poisoned".into()))
    }

    /// Insert or replace a user with a placeholder email.
    pub fn add_user(&self, user_id: &str, name: &str, title: Option<&str>) -> Result<(), GraphError> {
        let mut data = self.write()?;
        data.users.insert(
            user_id.to_string(),
            UserRecord {
                name: name.to_string(),
                email: format!("{user_id}@example.com"),
                title: title.map(str::to_string),
                location: None,
                bio: None,
            },
        );
        Ok(())
    }

    pub fn add_skill(&self, user_id: &str, skill: &str) -> Result<(), GraphError> {
        let mut data = self.write()?;
        data.require_user(user_id)?;
        data.ensure_skill(skill);
        data.user_skills
            .entry(user_id.to_string())
            .or_default()
            .insert(skill.to_string());
        Ok(())
    }

    /// Replaces any previous employer.
    pub fn set_employer(&self, user_id: &str, company: &str) -> Result<(), GraphError> {
        let mut data = self.write()?;
        data.require_user(user_id)?;
        data.ensure_company(company);
        data.employment
            .insert(user_id.to_string(), company.to_string());
        Ok(())
    }

    pub fn connect(&self, a: &str, b: &str) -> Result<bool, GraphError> {
        self.write()?.link(a, b)
    }
}

impl GraphQuery for InMemoryGraph {
    async fn requester_context(
        &self,
        user_id: &str,
    ) -> Result<Option<RequesterContext>, GraphError> {
        let data = self.read()?;
        if !data.users.contains_key(user_id) {
            return Ok(None);
        }

        Ok(Some(RequesterContext {
            user_id: user_id.to_string(),
            connections: data.neighbours(user_id).cloned().collect(),
            skills: data.skills_of(user_id).cloned().unwrap_or_default(),
            employer: data.employment.get(user_id).cloned(),
        }))
    }

    async fn two_hop_candidates(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<FriendSignal>, GraphError> {
        let data = self.read()?;
        let mut connectors: BTreeMap<&String, BTreeSet<&String>> = BTreeMap::new();
        for friend in &requester.connections {
            for candidate in data.neighbours(friend) {
                if !requester.excludes(candidate) {
                    connectors.entry(candidate).or_default().insert(friend);
                }
            }
        }

        Ok(connectors
            .into_iter()
            .filter_map(|(candidate, via)| {
                let record = data.users.get(candidate)?;
                let common_skills = data
                    .skills_of(candidate)
                    .map(|skills| skills.intersection(&requester.skills).cloned().collect())
                    .unwrap_or_default();
                Some(FriendSignal {
                    candidate: data.profile(candidate, record),
                    mutual_count: via.len() as u32,
                    common_skills,
                })
            })
            .collect())
    }

    async fn employer_skill_overlap(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<EmployerSignal>, GraphError> {
        if requester.skills.is_empty() {
            return Ok(Vec::new());
        }

        let data = self.read()?;
        let mut company_skills: BTreeMap<&String, BTreeSet<String>> = BTreeMap::new();
        for (user_id, skills) in &data.user_skills {
            if *user_id == requester.user_id || skills.is_disjoint(&requester.skills) {
                continue;
            }
            let Some(company) = data.employment.get(user_id) else {
                continue;
            };
            if requester.employer.as_ref() == Some(company) {
                continue;
            }
            company_skills
                .entry(company)
                .or_default()
                .extend(skills.iter().cloned());
        }

        Ok(company_skills
            .into_iter()
            .map(|(company, skills)| {
                let location = data.companies.get(company).and_then(|c| c.location.clone());
                EmployerSignal::new(
                    EmployerProfile {
                        name: company.clone(),
                        location,
                    },
                    skills,
                    &requester.skills,
                )
            })
            .collect())
    }

    async fn people_signals(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<PeopleSignal>, GraphError> {
        let data = self.read()?;

        Ok(data
            .users
            .iter()
            .filter(|(id, _)| !requester.excludes(id))
            .map(|(id, record)| {
                let mutual_count = data
                    .neighbours(id)
                    .filter(|n| requester.connections.contains(*n))
                    .count() as u32;
                let common_skill_count = data.skills_of(id).map_or(0, |skills| {
                    skills.intersection(&requester.skills).count() as u32
                });
                let company = data.employment.get(id).cloned();
                let same_employer =
                    company.is_some() && company.as_ref() == requester.employer.as_ref();

                PeopleSignal {
                    candidate: data.profile(id, record),
                    company,
                    mutual_count,
                    common_skill_count,
                    same_employer,
                }
            })
            .collect())
    }

    async fn shortest_path(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<PathNode>>, GraphError> {
        let data = self.read()?;
        if !data.users.contains_key(from) || !data.users.contains_key(to) {
            return Ok(None);
        }

        Ok(data.bfs(from, to, self.max_path_depth).map(|ids| {
            ids.iter()
                .filter_map(|id| data.path_node(id))
                .collect()
        }))
    }

    async fn shortest_path_hops(&self, from: &str, to: &str) -> Result<Option<u32>, GraphError> {
        let data = self.read()?;
        if !data.users.contains_key(from) || !data.users.contains_key(to) {
            return Ok(None);
        }

        Ok(data
            .bfs(from, to, MAX_PATH_DEPTH)
            .map(|ids| ids.len().saturating_sub(1) as u32))
    }
}

impl UserRepository for InMemoryGraph {
    async fn create_user(&self, input: &UserCreate) -> Result<UserResponse, GraphError> {
        let mut data = self.write()?;
        if data.users.values().any(|u| u.email == input.email) {
            return Err(GraphError::Conflict(format!(
                "email {} is already registered",
                input.email
            )));
        }

        let user_id = Ulid::new().to_string();
        data.users.insert(
            user_id.clone(),
            UserRecord {
                name: input.name.clone(),
                email: input.email.clone(),
                title: input.title.clone(),
                location: input.location.clone(),
                bio: input.bio.clone(),
            },
        );
        for skill in &input.skills {
            data.ensure_skill(skill);
            data.user_skills
                .entry(user_id.clone())
                .or_default()
                .insert(skill.clone());
        }
        if let Some(company) = &input.company {
            data.ensure_company(company);
            data.employment.insert(user_id.clone(), company.clone());
        }

        data.user_response(&user_id)
            .ok_or_else(|| GraphError::Query(format!("user {user_id} vanished after insert")))
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserResponse>, GraphError> {
        Ok(self.read()?.user_response(user_id))
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, GraphError> {
        let data = self.read()?;
        let offset = usize::try_from(offset.max(0)).unwrap_or(0);
        let limit = usize::try_from(limit.max(0)).unwrap_or(0);

        Ok(data
            .users_by_name()
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(id, record)| User {
                user_id: id.clone(),
                name: record.name.clone(),
                email: record.email.clone(),
                title: record.title.clone(),
                location: record.location.clone(),
                bio: record.bio.clone(),
                connection_count: data.connection_count(id) as u32,
                skill_count: data.skills_of(id).map_or(0, BTreeSet::len) as u32,
            })
            .collect())
    }

    async fn connect_users(&self, user_id: &str, other_id: &str) -> Result<bool, GraphError> {
        self.connect(user_id, other_id)
    }
}

impl GraphAnalytics for InMemoryGraph {
    async fn ping(&self) -> Result<(), GraphError> {
        self.read().map(|_| ())
    }

    async fn run_template(&self, template: &QueryTemplate) -> Result<TemplateOutput, GraphError> {
        let data = self.read()?;
        Ok(TemplateOutput {
            statement: format!("memory:{}", template.as_ref()),
            rows: data.template_rows(template),
        })
    }

    async fn network_snapshot(
        &self,
        user_id: &str,
    ) -> Result<Option<NetworkSnapshot>, GraphError> {
        let data = self.read()?;
        let Some(record) = data.users.get(user_id) else {
            return Ok(None);
        };

        let friends: Vec<&String> = data.neighbours(user_id).collect();
        let mut triangles = 0u32;
        for (i, a) in friends.iter().enumerate() {
            for b in &friends[i + 1..] {
                if data.knows.get(*a).is_some_and(|n| n.contains(*b)) {
                    // ordered pairs: once per direction
                    triangles += 2;
                }
            }
        }

        Ok(Some(NetworkSnapshot {
            user_id: user_id.to_string(),
            name: record.name.clone(),
            title: record.title.clone(),
            company: data.employment.get(user_id).cloned(),
            connection_count: friends.len() as u32,
            skills: data
                .skills_of(user_id)
                .map(|s| s.iter().cloned().collect())
                .unwrap_or_default(),
            triangles,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{SeedConfig, generate};

    /// me - a - c, me - b - c, a - d, b - e (e shares employer with me)
    fn sample() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for id in ["me", "a", "b", "c", "d", "e"] {
            graph.add_user(id, &id.to_uppercase(), None).unwrap();
        }
        for (x, y) in [("me", "a"), ("me", "b"), ("a", "c"), ("b", "c"), ("a", "d"), ("b", "e")] {
            graph.connect(x, y).unwrap();
        }
        for (user, skill) in [
            ("me", "Rust"),
            ("me", "Go"),
            ("c", "Rust"),
            ("c", "Python"),
            ("d", "Go"),
            ("d", "Docker"),
        ] {
            graph.add_skill(user, skill).unwrap();
        }
        graph.set_employer("me", "Home").unwrap();
        graph.set_employer("e", "Home").unwrap();
        graph.set_employer("c", "CloudWorks").unwrap();
        graph.set_employer("d", "CloudWorks").unwrap();
        graph
    }

    #[tokio::test]
    async fn unknown_requester_has_no_context() {
        let graph = sample();
        assert!(graph.requester_context("ghost").await.unwrap().is_none());

        let context = graph.requester_context("me").await.unwrap().unwrap();
        assert_eq!(context.connections.len(), 2);
        assert_eq!(context.employer.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn two_hop_counts_distinct_connectors() {
        let graph = sample();
        let context = graph.requester_context("me").await.unwrap().unwrap();

        let signals = graph.two_hop_candidates(&context).await.unwrap();
        let c = signals.iter().find(|s| s.candidate.user_id == "c").unwrap();

        assert_eq!(c.mutual_count, 2);
        assert_eq!(c.common_skills, ["Rust".to_string()].into_iter().collect());
        assert!(signals.iter().all(|s| !context.excludes(&s.candidate.user_id)));
    }

    #[tokio::test]
    async fn employer_overlap_unions_all_skills_of_sharing_employees() {
        let graph = sample();
        let context = graph.requester_context("me").await.unwrap().unwrap();

        let signals = graph.employer_skill_overlap(&context).await.unwrap();

        assert_eq!(signals.len(), 1);
        let cloud = &signals[0];
        assert_eq!(cloud.employer.name, "CloudWorks");
        assert_eq!(cloud.company_skills.len(), 4);
        assert_eq!(cloud.matching_skills.len(), 2);
    }

    #[tokio::test]
    async fn people_signals_flag_shared_employer() {
        let graph = sample();
        let context = graph.requester_context("me").await.unwrap().unwrap();

        let signals = graph.people_signals(&context).await.unwrap();
        let e = signals.iter().find(|s| s.candidate.user_id == "e").unwrap();

        assert!(e.same_employer);
        assert_eq!(e.mutual_count, 1);
        assert!(signals.iter().all(|s| s.candidate.user_id != "a"));
    }

    #[tokio::test]
    async fn shortest_path_is_bounded_by_depth() {
        let graph = sample();
        let path = graph.shortest_path("me", "d").await.unwrap().unwrap();
        let ids: Vec<_> = path.iter().map(|n| n.user_id.as_str()).collect();
        assert_eq!(ids, vec!["me", "a", "d"]);
        assert_eq!(graph.shortest_path_hops("me", "d").await.unwrap(), Some(2));

        let shallow = sample().with_max_path_depth(1);
        assert!(shallow.shortest_path("me", "d").await.unwrap().is_none());
        assert!(graph.shortest_path("me", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn hop_count_ignores_configured_path_depth() {
        let shallow = sample().with_max_path_depth(1);

        assert!(shallow.shortest_path("me", "d").await.unwrap().is_none());
        assert_eq!(shallow.shortest_path_hops("me", "d").await.unwrap(), Some(2));
        assert_eq!(shallow.shortest_path_hops("me", "ghost").await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let graph = InMemoryGraph::new();
        let input = UserCreate {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            title: None,
            location: None,
            bio: None,
            skills: vec!["Rust".into()],
            company: Some("TechCorp".into()),
        };

        let created = graph.create_user(&input).await.unwrap();
        assert_eq!(created.skills, vec!["Rust".to_string()]);
        assert_eq!(created.company.as_deref(), Some("TechCorp"));

        let err = graph.create_user(&input).await.unwrap_err();
        assert!(matches!(err, GraphError::Conflict(_)));
    }

    #[tokio::test]
    async fn connect_is_idempotent_and_validated() {
        let graph = sample();
        assert!(graph.connect_users("c", "e").await.unwrap());
        assert!(!graph.connect_users("e", "c").await.unwrap());
        assert!(matches!(
            graph.connect_users("c", "c").await,
            Err(GraphError::Invalid(_))
        ));
        assert!(matches!(
            graph.connect_users("c", "ghost").await,
            Err(GraphError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_users_orders_by_name_and_pages() {
        let graph = sample();
        let page = graph.list_users(2, 1).await.unwrap();
        let names: Vec<_> = page.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(page[0].connection_count, 3);
    }

    #[tokio::test]
    async fn snapshot_counts_connected_friend_pairs() {
        let graph = sample();
        graph.connect("a", "b").unwrap();

        let snapshot = graph.network_snapshot("me").await.unwrap().unwrap();
        assert_eq!(snapshot.connection_count, 2);
        assert_eq!(snapshot.triangles, 2);

        // a, b and c now all know each other
        graph.connect("me", "c").unwrap();
        let snapshot = graph.network_snapshot("me").await.unwrap().unwrap();
        assert_eq!(snapshot.connection_count, 3);
        assert_eq!(snapshot.triangles, 6);
        assert!(graph.network_snapshot("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn templates_run_against_seeded_network() {
        let graph = InMemoryGraph::from_seed(&generate(SeedConfig::default()));

        let stats = graph
            .run_template(&QueryTemplate::NetworkStatistics)
            .await
            .unwrap();
        assert_eq!(stats.statement, "memory:network_statistics");
        assert_eq!(stats.rows[0]["total_users"], 100);
        assert_eq!(stats.rows[0]["total_companies"], 8);

        let connected = graph.run_template(&QueryTemplate::MostConnected).await.unwrap();
        assert_eq!(connected.rows.len(), 10);
        let counts: Vec<u64> = connected
            .rows
            .iter()
            .map(|row| row["connections"].as_u64().unwrap())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }
}
