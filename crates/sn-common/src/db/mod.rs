use deadpool_postgres::PoolError;
use tokio_postgres::Error as PgError;
use tokio_postgres::error::SqlState;

use crate::graph::GraphError;

/// Storage error enum with the pool and postgres variants every query module
/// needs, plus any module-specific variants passed in the braces.
macro_rules! db_error {
    ($name:ident { $($variants:tt)* }) => {
        #[derive(Debug, thiserror::Error)]
        pub enum $name {
            #[error("failed to get postgres connection: {0}")]
            Pool(#[from] deadpool_postgres::PoolError),
            #[error("postgres error: {0}")]
            Postgres(#[from] tokio_postgres::Error),
            $($variants)*
        }
    };
}

pub(crate) use db_error;

pub mod analytics;
pub mod graph;
pub mod migrations;
pub mod paths;
pub mod pool;
pub mod seed;
pub mod signals;
pub mod users;
pub mod util;

pub use analytics::{AnalyticsError, fetch_network_snapshot, ping, run_template};
pub use graph::PgGraph;
pub use migrations::{MigrationError, run_migrations};
pub use paths::{PathQueryError, fetch_shortest_path};
pub use pool::{DbPoolError, PgPool, create_pool_from_url};
pub use seed::{SeedError, SeedSummary, apply_seed};
pub use signals::{
    SignalFetchError, fetch_employer_overlap, fetch_people_signals, fetch_requester_context,
    fetch_two_hop_candidates,
};
pub use users::{UserStorageError, connect_users, fetch_user, insert_user, list_users};

pub(crate) fn is_unique_violation(err: &PgError) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

pub(crate) fn pool_to_graph_error(err: PoolError) -> GraphError {
    GraphError::Unavailable(err.to_string())
}

/// Errors without a SQLSTATE come from the connection itself.
pub(crate) fn pg_to_graph_error(err: PgError) -> GraphError {
    match err.code() {
        None => GraphError::Unavailable(err.to_string()),
        Some(code) if *code == SqlState::UNIQUE_VIOLATION => GraphError::Conflict(err.to_string()),
        Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
            GraphError::NotFound(err.to_string())
        }
        Some(code) if *code == SqlState::CHECK_VIOLATION => GraphError::Invalid(err.to_string()),
        Some(_) => GraphError::Query(err.to_string()),
    }
}
