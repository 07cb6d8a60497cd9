#![allow(async_fn_in_trait)]

//! Graph collaborator contracts.
//!
//! Traversal lives behind these traits so the recommendation engine can run
//! against PostgreSQL in production and [`InMemoryGraph`] in tests.

pub mod backend;
pub mod memory;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::api::{PathNode, User, UserCreate, UserResponse};
use crate::insights::NetworkSnapshot;
use crate::query_templates::{QueryTemplate, TemplateOutput};
use crate::recommend::signals::{EmployerSignal, FriendSignal, PeopleSignal};

pub use backend::GraphBackend;
pub use memory::InMemoryGraph;

/// Hop bound for shortest-path searches unless configured otherwise.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 6;

/// Largest accepted path depth. Hop counts on people suggestions always search
/// this far, whatever depth the path endpoint is configured with.
pub const MAX_PATH_DEPTH: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("graph backend unavailable: {0}")]
    Unavailable(String),
    #[error("graph query failed: {0}")]
    Query(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl GraphError {
    /// Only connectivity failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GraphError::Unavailable(_))
    }
}

/// Everything the scorers need to know about the requesting user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequesterContext {
    pub user_id: String,
    /// Direct `KNOWS` neighbours.
    pub connections: BTreeSet<String>,
    pub skills: BTreeSet<String>,
    pub employer: Option<String>,
}

impl RequesterContext {
    /// True for the requester and any direct connection.
    pub fn excludes(&self, candidate_id: &str) -> bool {
        candidate_id == self.user_id || self.connections.contains(candidate_id)
    }
}

/// Raw signal provider for the recommendation engine.
pub trait GraphQuery {
    /// `None` when the user does not exist.
    async fn requester_context(&self, user_id: &str)
    -> Result<Option<RequesterContext>, GraphError>;

    /// Users exactly two hops away with their mutual connector count and
    /// skills shared with the requester.
    async fn two_hop_candidates(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<FriendSignal>, GraphError>;

    /// Employers of other users sharing at least one skill with the requester.
    async fn employer_skill_overlap(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<EmployerSignal>, GraphError>;

    /// Every other user not directly connected to the requester.
    async fn people_signals(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<PeopleSignal>, GraphError>;

    /// Nodes along one shortest undirected path, both ends included.
    async fn shortest_path(&self, from: &str, to: &str)
    -> Result<Option<Vec<PathNode>>, GraphError>;

    /// Edge count of a shortest path. Backends with a configurable depth
    /// override this to search up to [`MAX_PATH_DEPTH`].
    async fn shortest_path_hops(&self, from: &str, to: &str) -> Result<Option<u32>, GraphError> {
        Ok(self
            .shortest_path(from, to)
            .await?
            .map(|nodes| nodes.len().saturating_sub(1) as u32))
    }
}

pub trait UserRepository {
    /// Expects an already normalized and validated payload.
    async fn create_user(&self, input: &UserCreate) -> Result<UserResponse, GraphError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserResponse>, GraphError>;

    /// Ordered by name, then id.
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, GraphError>;

    /// Returns `false` when the edge already existed.
    async fn connect_users(&self, user_id: &str, other_id: &str) -> Result<bool, GraphError>;
}

pub trait GraphAnalytics {
    async fn ping(&self) -> Result<(), GraphError>;

    async fn run_template(&self, template: &QueryTemplate) -> Result<TemplateOutput, GraphError>;

    async fn network_snapshot(&self, user_id: &str)
    -> Result<Option<NetworkSnapshot>, GraphError>;
}
