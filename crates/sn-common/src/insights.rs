use serde::{Deserialize, Serialize};

/// Raw per-user network figures returned by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSnapshot {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub connection_count: u32,
    pub skills: Vec<String>,
    /// Ordered pairs of the user's connections that know each other, so every
    /// triangle through the user counts twice.
    pub triangles: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInsights {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub connection_count: u32,
    pub skills: Vec<String>,
    pub triangles: u32,
    pub network_status: String,
    pub clustering_insight: String,
}

pub fn network_status(connection_count: u32) -> &'static str {
    match connection_count {
        c if c > 20 => "Highly Connected",
        c if c > 10 => "Well Connected",
        c if c > 5 => "Moderately Connected",
        _ => "Limited Connections",
    }
}

pub fn clustering_insight(triangles: u32) -> &'static str {
    match triangles {
        t if t > 10 => "Strong network clustering",
        t if t > 5 => "Moderate clustering",
        _ => "Low clustering",
    }
}

impl From<NetworkSnapshot> for NetworkInsights {
    fn from(snapshot: NetworkSnapshot) -> Self {
        Self {
            network_status: network_status(snapshot.connection_count).to_string(),
            clustering_insight: clustering_insight(snapshot.triangles).to_string(),
            user_id: snapshot.user_id,
            name: snapshot.name,
            title: snapshot.title,
            company: snapshot.company,
            connection_count: snapshot.connection_count,
            skills: snapshot.skills,
            triangles: snapshot.triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_boundaries_are_exclusive() {
        assert_eq!(network_status(21), "Highly Connected");
        assert_eq!(network_status(20), "Well Connected");
        assert_eq!(network_status(11), "Well Connected");
        assert_eq!(network_status(10), "Moderately Connected");
        assert_eq!(network_status(6), "Moderately Connected");
        assert_eq!(network_status(5), "Limited Connections");
        assert_eq!(network_status(0), "Limited Connections");
    }

    #[test]
    fn clustering_boundaries_are_exclusive() {
        assert_eq!(clustering_insight(11), "Strong network clustering");
        assert_eq!(clustering_insight(10), "Moderate clustering");
        assert_eq!(clustering_insight(6), "Moderate clustering");
        assert_eq!(clustering_insight(5), "Low clustering");
    }

    #[test]
    fn snapshot_converts_into_insights() {
        let insights = NetworkInsights::from(NetworkSnapshot {
            user_id: "user-1".into(),
            name: "Ada".into(),
            title: None,
            company: Some("TechCorp".into()),
            connection_count: 15,
            skills: vec!["Rust".into()],
            triangles: 8,
        });

        assert_eq!(insights.network_status, "Well Connected");
        assert_eq!(insights.clustering_insight, "Moderate clustering");
        assert_eq!(insights.company.as_deref(), Some("TechCorp"));
    }
}
