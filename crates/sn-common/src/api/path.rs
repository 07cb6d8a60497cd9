use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    pub from_user_id: String,
    pub to_user_id: String,
    /// Number of KNOWS hops; 0 when no path exists.
    pub path_length: u32,
    pub nodes: Vec<PathNode>,
    pub exists: bool,
}

impl ShortestPath {
    pub fn from_nodes(
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        nodes: Option<Vec<PathNode>>,
    ) -> Self {
        let from_user_id = from_user_id.into();
        let to_user_id = to_user_id.into();

        match nodes {
            Some(nodes) if !nodes.is_empty() => Self {
                from_user_id,
                to_user_id,
                path_length: (nodes.len() - 1) as u32,
                nodes,
                exists: true,
            },
            _ => Self {
                from_user_id,
                to_user_id,
                path_length: 0,
                nodes: Vec::new(),
                exists: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> PathNode {
        PathNode {
            user_id: id.into(),
            name: id.to_uppercase(),
            title: None,
            company: None,
        }
    }

    #[test]
    fn path_length_counts_hops() {
        let path = ShortestPath::from_nodes("a", "c", Some(vec![node("a"), node("b"), node("c")]));
        assert!(path.exists);
        assert_eq!(path.path_length, 2);
    }

    #[test]
    fn missing_path_is_reported_as_not_existing() {
        let path = ShortestPath::from_nodes("a", "z", None);
        assert!(!path.exists);
        assert_eq!(path.path_length, 0);
        assert!(path.nodes.is_empty());
    }
}
