pub mod path;
pub mod query;
pub mod recommendation;
pub mod user;

pub use path::{PathNode, ShortestPath};
pub use query::{ExampleQuery, NaturalQueryRequest, NaturalQueryResponse};
pub use recommendation::{
    FriendReason, FriendRecommendation, JobRecommendation, LimitError, PersonSuggestion,
    RecommendationLimit,
};
pub use user::{ConnectionRequest, ConnectionResponse, User, UserCreate, UserResponse, ValidationError};
