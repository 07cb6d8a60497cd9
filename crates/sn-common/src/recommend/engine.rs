use thiserror::Error;
use tracing::{debug, instrument};

use super::{friends, jobs, people};
use crate::api::recommendation::{
    FriendRecommendation, JobRecommendation, PersonSuggestion, RecommendationLimit,
};
use crate::graph::{GraphError, GraphQuery, RequesterContext};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("user not found: {0}")]
    RequesterNotFound(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Ranks recommendations for one request. Holds nothing but a borrowed
/// collaborator, so it is cheap to build per call.
pub struct RecommendationEngine<'a, G> {
    graph: &'a G,
}

impl<'a, G: GraphQuery> RecommendationEngine<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self { graph }
    }

    async fn context(&self, requester: &str) -> Result<RequesterContext, RecommendError> {
        self.graph
            .requester_context(requester)
            .await?
            .ok_or_else(|| RecommendError::RequesterNotFound(requester.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn rank_friends(
        &self,
        requester: &str,
        limit: RecommendationLimit,
    ) -> Result<Vec<FriendRecommendation>, RecommendError> {
        let context = self.context(requester).await?;
        let signals = self.graph.two_hop_candidates(&context).await?;
        debug!(candidates = signals.len(), "friend candidates fetched");

        Ok(friends::rank_friend_signals(&context, signals, limit.get()))
    }

    #[instrument(skip(self))]
    pub async fn rank_jobs(
        &self,
        requester: &str,
        limit: RecommendationLimit,
    ) -> Result<Vec<JobRecommendation>, RecommendError> {
        let context = self.context(requester).await?;
        if context.skills.is_empty() {
            debug!("requester has no skills; skipping employer lookup");
            return Ok(Vec::new());
        }

        let signals = self.graph.employer_skill_overlap(&context).await?;
        debug!(employers = signals.len(), "employer candidates fetched");

        Ok(jobs::rank_employer_signals(&context, signals, limit.get()))
    }

    /// Path length is looked up only for the entries that survive truncation
    /// and is reported as-is; it does not influence the score.
    #[instrument(skip(self))]
    pub async fn rank_people(
        &self,
        requester: &str,
        limit: RecommendationLimit,
    ) -> Result<Vec<PersonSuggestion>, RecommendError> {
        let context = self.context(requester).await?;
        let signals = self.graph.people_signals(&context).await?;
        debug!(candidates = signals.len(), "people candidates fetched");

        let mut ranked = people::rank_people_signals(&context, signals, limit.get());
        for suggestion in &mut ranked {
            suggestion.connection_path_length = self
                .graph
                .shortest_path_hops(&context.user_id, &suggestion.user_id)
                .await?;
        }

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::api::PathNode;
    use crate::api::recommendation::FriendReason;
    use crate::graph::InMemoryGraph;
    use crate::recommend::signals::{EmployerSignal, FriendSignal, PeopleSignal};

    fn limit(n: i64) -> RecommendationLimit {
        RecommendationLimit::new(n).unwrap()
    }

    /// me knows a, b; a and b both know c; a knows d; e works with me;
    /// f only shares a skill.
    fn network() -> InMemoryGraph {
        let graph = InMemoryGraph::new();
        for id in ["me", "a", "b", "c", "d", "e", "f", "loner"] {
            graph.add_user(id, &format!("User {id}"), None).unwrap();
        }
        for (x, y) in [("me", "a"), ("me", "b"), ("a", "c"), ("b", "c"), ("a", "d")] {
            graph.connect(x, y).unwrap();
        }
        for (user, skill) in [
            ("me", "Rust"),
            ("me", "Go"),
            ("c", "Rust"),
            ("f", "Go"),
            ("f", "Kubernetes"),
        ] {
            graph.add_skill(user, skill).unwrap();
        }
        graph.set_employer("me", "Home").unwrap();
        graph.set_employer("e", "Home").unwrap();
        graph.set_employer("f", "CloudWorks").unwrap();
        graph
    }

    #[tokio::test]
    async fn friends_prefer_more_mutual_connections() {
        let graph = network();
        let engine = RecommendationEngine::new(&graph);

        let ranked = engine.rank_friends("me", limit(10)).await.unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.user_id.as_str()).collect();

        assert_eq!(ids, vec!["c", "d"]);
        assert_eq!(ranked[0].mutual_connections, 2);
        assert!((ranked[0].score - 0.16).abs() < 1e-9);
        assert_eq!(ranked[0].reason, FriendReason::MutualConnections);
    }

    #[tokio::test]
    async fn unknown_requester_is_reported_for_every_scorer() {
        let graph = network();
        let engine = RecommendationEngine::new(&graph);

        assert!(matches!(
            engine.rank_friends("ghost", limit(5)).await,
            Err(RecommendError::RequesterNotFound(id)) if id == "ghost"
        ));
        assert!(matches!(
            engine.rank_jobs("ghost", limit(5)).await,
            Err(RecommendError::RequesterNotFound(_))
        ));
        assert!(matches!(
            engine.rank_people("ghost", limit(5)).await,
            Err(RecommendError::RequesterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn jobs_use_employer_of_skill_sharing_users() {
        let graph = network();
        let engine = RecommendationEngine::new(&graph);

        let jobs = engine.rank_jobs("me", limit(10)).await.unwrap();

        // CloudWorks: {Go, Kubernetes} observed, {Go} matching
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_id, "job_CloudWorks");
        assert!((jobs[0].skill_match_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn people_attach_path_length_without_changing_score() {
        let graph = network();
        let engine = RecommendationEngine::new(&graph);

        let people = engine.rank_people("me", limit(10)).await.unwrap();
        let ids: Vec<_> = people.iter().map(|p| p.user_id.as_str()).collect();

        assert_eq!(ids, vec!["e", "c", "d", "f"]);
        let e = &people[0];
        assert!((e.score - 0.2).abs() < 1e-9);
        assert_eq!(e.connection_path_length, None);

        let c = &people[1];
        assert!((c.score - 0.13).abs() < 1e-9);
        assert_eq!(c.connection_path_length, Some(2));
        assert!(people.iter().all(|p| p.user_id != "loner"));
    }

    #[tokio::test]
    async fn shorter_limit_is_a_prefix() {
        let graph = network();
        let engine = RecommendationEngine::new(&graph);

        for k in 1..4 {
            let short = engine.rank_people("me", limit(k)).await.unwrap();
            let long = engine.rank_people("me", limit(k + 1)).await.unwrap();
            assert_eq!(short[..], long[..short.len()]);
        }
    }

    #[tokio::test]
    async fn scores_stay_within_unit_interval() {
        let graph = InMemoryGraph::from_seed(&crate::seed::generate(Default::default()));
        let engine = RecommendationEngine::new(&graph);

        for user in ["user-1", "user-17", "user-64"] {
            let friends = engine.rank_friends(user, limit(50)).await.unwrap();
            let jobs = engine.rank_jobs(user, limit(50)).await.unwrap();
            let people = engine.rank_people(user, limit(50)).await.unwrap();

            assert!(friends.iter().all(|r| (0.0..=1.0).contains(&r.score)));
            assert!(jobs.iter().all(|r| r.score > 0.3 && r.score <= 1.0));
            assert!(people.iter().all(|r| (0.0..=1.0).contains(&r.score)));
            assert!(friends.windows(2).all(|w| w[0].score >= w[1].score));
            assert!(people.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    /// Counts employer lookups so the empty-skills short circuit is observable.
    struct CountingGraph {
        inner: InMemoryGraph,
        employer_calls: Cell<u32>,
    }

    impl GraphQuery for CountingGraph {
        async fn requester_context(
            &self,
            user_id: &str,
        ) -> Result<Option<RequesterContext>, GraphError> {
            self.inner.requester_context(user_id).await
        }

        async fn two_hop_candidates(
            &self,
            requester: &RequesterContext,
        ) -> Result<Vec<FriendSignal>, GraphError> {
            self.inner.two_hop_candidates(requester).await
        }

        async fn employer_skill_overlap(
            &self,
            requester: &RequesterContext,
        ) -> Result<Vec<EmployerSignal>, GraphError> {
            self.employer_calls.set(self.employer_calls.get() + 1);
            self.inner.employer_skill_overlap(requester).await
        }

        async fn people_signals(
            &self,
            requester: &RequesterContext,
        ) -> Result<Vec<PeopleSignal>, GraphError> {
            self.inner.people_signals(requester).await
        }

        async fn shortest_path(
            &self,
            from: &str,
            to: &str,
        ) -> Result<Option<Vec<PathNode>>, GraphError> {
            self.inner.shortest_path(from, to).await
        }
    }

    #[tokio::test]
    async fn jobs_skip_collaborator_when_requester_has_no_skills() {
        let graph = CountingGraph {
            inner: network(),
            employer_calls: Cell::new(0),
        };
        let engine = RecommendationEngine::new(&graph);

        assert!(engine.rank_jobs("loner", limit(5)).await.unwrap().is_empty());
        assert_eq!(graph.employer_calls.get(), 0);

        engine.rank_jobs("me", limit(5)).await.unwrap();
        assert_eq!(graph.employer_calls.get(), 1);
    }

    struct FailingGraph;

    impl GraphQuery for FailingGraph {
        async fn requester_context(
            &self,
            user_id: &str,
        ) -> Result<Option<RequesterContext>, GraphError> {
            Ok(Some(RequesterContext {
                user_id: user_id.to_string(),
                ..Default::default()
            }))
        }

        async fn two_hop_candidates(
            &self,
            _requester: &RequesterContext,
        ) -> Result<Vec<FriendSignal>, GraphError> {
            Err(GraphError::Unavailable("connection refused".into()))
        }

        async fn employer_skill_overlap(
            &self,
            _requester: &RequesterContext,
        ) -> Result<Vec<EmployerSignal>, GraphError> {
            Err(GraphError::Unavailable("connection refused".into()))
        }

        async fn people_signals(
            &self,
            _requester: &RequesterContext,
        ) -> Result<Vec<PeopleSignal>, GraphError> {
            Err(GraphError::Query("bad statement".into()))
        }

        async fn shortest_path(
            &self,
            _from: &str,
            _to: &str,
        ) -> Result<Option<Vec<PathNode>>, GraphError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn collaborator_failures_are_not_masked_as_empty() {
        let engine = RecommendationEngine::new(&FailingGraph);

        assert!(matches!(
            engine.rank_friends("me", limit(5)).await,
            Err(RecommendError::Graph(GraphError::Unavailable(_)))
        ));
        assert!(matches!(
            engine.rank_people("me", limit(5)).await,
            Err(RecommendError::Graph(GraphError::Query(_)))
        ));
    }
}
