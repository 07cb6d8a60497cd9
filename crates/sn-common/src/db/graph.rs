use std::fmt;

use crate::api::{PathNode, User, UserCreate, UserResponse};
use crate::db::{
    AnalyticsError, PathQueryError, PgPool, SignalFetchError, UserStorageError, analytics,
    paths, pg_to_graph_error, pool_to_graph_error, signals, users,
};
use crate::graph::{
    GraphAnalytics, GraphError, GraphQuery, MAX_PATH_DEPTH, RequesterContext, UserRepository,
};
use crate::insights::NetworkSnapshot;
use crate::query_templates::{QueryTemplate, TemplateOutput};
use crate::recommend::signals::{EmployerSignal, FriendSignal, PeopleSignal};

/// PostgreSQL-backed graph collaborator.
#[derive(Clone)]
pub struct PgGraph {
    pool: PgPool,
    max_path_depth: usize,
}

impl fmt::Debug for PgGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgGraph")
            .field("pool_size", &self.pool.status().size)
            .field("max_path_depth", &self.max_path_depth)
            .finish()
    }
}

impl PgGraph {
    pub fn new(pool: PgPool, max_path_depth: usize) -> Self {
        Self {
            pool,
            max_path_depth,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<SignalFetchError> for GraphError {
    fn from(err: SignalFetchError) -> Self {
        match err {
            SignalFetchError::Pool(err) => pool_to_graph_error(err),
            SignalFetchError::Postgres(err) => pg_to_graph_error(err),
        }
    }
}

impl From<PathQueryError> for GraphError {
    fn from(err: PathQueryError) -> Self {
        match err {
            PathQueryError::Pool(err) => pool_to_graph_error(err),
            PathQueryError::Postgres(err) => pg_to_graph_error(err),
        }
    }
}

impl From<AnalyticsError> for GraphError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Pool(err) => pool_to_graph_error(err),
            AnalyticsError::Postgres(err) => pg_to_graph_error(err),
        }
    }
}

impl From<UserStorageError> for GraphError {
    fn from(err: UserStorageError) -> Self {
        match err {
            UserStorageError::Pool(err) => pool_to_graph_error(err),
            UserStorageError::Postgres(err) => pg_to_graph_error(err),
            UserStorageError::EmailTaken(email) => {
                GraphError::Conflict(format!("email {email} is already registered"))
            }
            UserStorageError::UserNotFound(id) => GraphError::NotFound(format!("user {id}")),
            UserStorageError::SelfConnection => {
                GraphError::Invalid("a user cannot connect to themselves".into())
            }
        }
    }
}

impl GraphQuery for PgGraph {
    async fn requester_context(
        &self,
        user_id: &str,
    ) -> Result<Option<RequesterContext>, GraphError> {
        Ok(signals::fetch_requester_context(&self.pool, user_id).await?)
    }

    async fn two_hop_candidates(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<FriendSignal>, GraphError> {
        Ok(signals::fetch_two_hop_candidates(&self.pool, requester).await?)
    }

    async fn employer_skill_overlap(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<EmployerSignal>, GraphError> {
        Ok(signals::fetch_employer_overlap(&self.pool, requester).await?)
    }

    async fn people_signals(
        &self,
        requester: &RequesterContext,
    ) -> Result<Vec<PeopleSignal>, GraphError> {
        Ok(signals::fetch_people_signals(&self.pool, requester).await?)
    }

    async fn shortest_path(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Option<Vec<PathNode>>, GraphError> {
        Ok(paths::fetch_shortest_path(&self.pool, from, to, self.max_path_depth).await?)
    }

    async fn shortest_path_hops(&self, from: &str, to: &str) -> Result<Option<u32>, GraphError> {
        let nodes = paths::fetch_shortest_path(&self.pool, from, to, MAX_PATH_DEPTH).await?;
        Ok(nodes.map(|nodes| nodes.len().saturating_sub(1) as u32))
    }
}

impl UserRepository for PgGraph {
    async fn create_user(&self, input: &UserCreate) -> Result<UserResponse, GraphError> {
        Ok(users::insert_user(&self.pool, input).await?)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<UserResponse>, GraphError> {
        Ok(users::fetch_user(&self.pool, user_id).await?)
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, GraphError> {
        Ok(users::list_users(&self.pool, limit, offset).await?)
    }

    async fn connect_users(&self, user_id: &str, other_id: &str) -> Result<bool, GraphError> {
        Ok(users::connect_users(&self.pool, user_id, other_id).await?)
    }
}

impl GraphAnalytics for PgGraph {
    async fn ping(&self) -> Result<(), GraphError> {
        Ok(analytics::ping(&self.pool).await?)
    }

    async fn run_template(&self, template: &QueryTemplate) -> Result<TemplateOutput, GraphError> {
        Ok(analytics::run_template(&self.pool, template).await?)
    }

    async fn network_snapshot(
        &self,
        user_id: &str,
    ) -> Result<Option<NetworkSnapshot>, GraphError> {
        Ok(analytics::fetch_network_snapshot(&self.pool, user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_graph_errors() {
        assert!(matches!(
            GraphError::from(UserStorageError::EmailTaken("a@b.io".into())),
            GraphError::Conflict(_)
        ));
        assert!(matches!(
            GraphError::from(UserStorageError::UserNotFound("u".into())),
            GraphError::NotFound(_)
        ));
        assert!(matches!(
            GraphError::from(UserStorageError::SelfConnection),
            GraphError::Invalid(_)
        ));
    }
}
