pub mod api;
pub mod db;
pub mod graph;
pub mod insights;
pub mod logging;
pub mod query_templates;
pub mod recommend;
pub mod seed;

pub use graph::{GraphAnalytics, GraphBackend, GraphError, GraphQuery, UserRepository};
pub use recommend::{RecommendError, RecommendationEngine};
