use std::sync::Arc;

use super::{
    GraphAnalytics, GraphError, GraphQuery, InMemoryGraph, RequesterContext, UserRepository,
};
use crate::api::{PathNode, User, UserCreate, UserResponse};
use crate::db::PgGraph;
use crate::insights::NetworkSnapshot;
use crate::query_templates::{QueryTemplate, TemplateOutput};
use crate::recommend::signals::{EmployerSignal, FriendSignal, PeopleSignal};

/// Backend selected at startup. Dispatch is a plain `match` so the futures
/// handed to axum stay `Send` without boxing.
#[derive(Debug, Clone)]
pub enum GraphBackend {
    Postgres(PgGraph),
    Memory(Arc<InMemoryGraph>),
}

impl GraphBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            GraphBackend::Postgres(_) => "postgres",
            GraphBackend::Memory(_) => "memory",
        }
    }
}

impl From<InMemoryGraph> for GraphBackend {
    fn from(graph: InMemoryGraph) -> Self {
        GraphBackend::Memory(Arc::new(graph))
    }
}

impl From<PgGraph> for GraphBackend {
    fn from(graph: PgGraph) -> Self {
        GraphBackend::Postgres(graph)
    }
}

macro_rules! dispatch {
    ($self:ident, $graph:ident => $call:expr) => {
        match $self {
            GraphBackend::Postgres($graph) => $call,
            GraphBackend::Memory($graph) => $call,
        }
    };
}

impl GraphQuery for GraphBackend {
    async fn requester_context(
        &self,
        user_id: &str,
    ) -> Result<Option<RequesterContext>, GraphError> {
        dispatch!(self, g => g.requester_context(user_id).await)
    }

    async fn two_hop_candidates(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<FriendSignal>, GraphError> {
        dispatch!(self, g => g.two_hop_candidates(requester).await)
    }

    async fn employer_skill_overlap(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<EmployerSignal>, GraphError> {
        dispatch!(self, g => g.employer_skill_overlap(requester).await)
    }

    async fn people_signals(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<PeopleSignal>, GraphError> {
        dispatch!(self, g => g.people_signals(requester).await)
    }

    async fn shortest_path(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<PathNode>>, GraphError> {
        dispatch!(self, g => g.shortest_path(from, to).await)
    }

    async fn shortest_path_hops(&self, from: &str, to: &str) -> Result<Option<u32>, GraphError> {
        dispatch!(self, g => g.shortest_path_hops(from, to).await)
    }
}

impl UserRepository for GraphBackend {
    async fn create_user(&self, input: &UserCreate) -> Result<UserResponse, GraphError> {
        dispatch!(self, g => g.create_user(input).await)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserResponse>, GraphError> {
        dispatch!(self, g => g.get_user(user_id).await)
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, GraphError> {
        dispatch!(self, g => g.list_users(limit, offset).await)
    }

    async fn connect_users(&self, user_id: &str, other_id: &str) -> Result<bool, GraphError> {
        dispatch!(self, g => g.connect_users(user_id, other_id).await)
    }
}

impl GraphAnalytics for GraphBackend {
    async fn ping(&self) -> Result<(), GraphError> {
        dispatch!(self, g => g.ping().await)
    }

    async fn run_template(&self, template: &QueryTemplate) -> Result<TemplateOutput, GraphError> {
        dispatch!(self, g => g.run_template(template).await)
    }

    async fn network_snapshot(
        &self,
        user_id: &str,
    ) -> Result<Option<NetworkSnapshot>, GraphError> {
        dispatch!(self, g => g.network_snapshot(user_id).await)
    }
}
