//! Recommendation scoring.
//!
//! Backends supply raw signals through [`GraphQuery`](crate::graph::GraphQuery);
//! everything here is formula, clamping, ordering and truncation.

pub mod engine;
pub mod friends;
pub mod jobs;
pub mod people;
pub mod ranking;
pub mod signals;
pub mod weights;

pub use engine::{RecommendError, RecommendationEngine};
pub use signals::{
    CandidateProfile, EmployerProfile, EmployerSignal, FriendSignal, PeopleSignal,
};
