use std::cmp::Ordering;

use super::ranking::{clamp_score, rank_top_k, score_desc};
use super::signals::FriendSignal;
use super::weights::{
    FRIEND_WEIGHTS, MANY_MUTUAL_THRESHOLD, SCORE_NORMALIZER, SIMILAR_SKILLS_THRESHOLD,
};
use crate::api::recommendation::{FriendReason, FriendRecommendation};
use crate::graph::RequesterContext;

/// `min((mutual * 0.6 + |common_skills| * 0.4) / 10, 1)`
pub fn score_friend(mutual_count: u32, common_skill_count: usize) -> f64 {
    let raw = (f64::from(mutual_count) * FRIEND_WEIGHTS.mutual
        + common_skill_count as f64 * FRIEND_WEIGHTS.skills)
        / SCORE_NORMALIZER;
    clamp_score(raw)
}

/// First matching rule wins.
pub fn friend_reason(mutual_count: u32, common_skill_count: usize) -> FriendReason {
    if mutual_count > MANY_MUTUAL_THRESHOLD {
        FriendReason::ManyMutualConnections
    } else if common_skill_count > SIMILAR_SKILLS_THRESHOLD {
        FriendReason::SimilarSkills
    } else {
        FriendReason::MutualConnections
    }
}

fn compare(a: &FriendRecommendation, b: &FriendRecommendation) -> Ordering {
    score_desc(a.score, b.score)
        .then_with(|| b.mutual_connections.cmp(&a.mutual_connections))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Score, order and truncate friend-of-friend candidates.
///
/// The requester and anyone in `context.connections` are dropped even if the
/// backend returned them.
pub fn rank_friend_signals(
    context: &RequesterContext,
    signals: Vec<FriendSignal>,
    limit: usize,
) -> Vec<FriendRecommendation> {
    let scored = signals
        .into_iter()
        .filter(|signal| !context.excludes(&signal.candidate.user_id))
        .map(|signal| {
            let common = signal.common_skills.len();
            FriendRecommendation {
                score: score_friend(signal.mutual_count, common),
                reason: friend_reason(signal.mutual_count, common),
                user_id: signal.candidate.user_id,
                name: signal.candidate.name,
                title: signal.candidate.title,
                mutual_connections: signal.mutual_count,
                common_skills: signal.common_skills.into_iter().collect(),
            }
        })
        .collect();

    rank_top_k(scored, limit, compare)
}
