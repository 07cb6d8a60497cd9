use std::cmp::Ordering;

use super::ranking::{clamp_score, rank_top_k, score_desc};
use super::signals::PeopleSignal;
use super::weights::{PEOPLE_WEIGHTS, SCORE_NORMALIZER};
use crate::api::recommendation::PersonSuggestion;
use crate::graph::RequesterContext;

/// `min((mutual * 0.5 + common * 0.3 + (2 if same employer)) / 10, 1)`
pub fn score_person(mutual_count: u32, common_skill_count: u32, same_employer: bool) -> f64 {
    let employer_bonus = if same_employer {
        PEOPLE_WEIGHTS.same_employer
    } else {
        0.0
    };
    let raw = (f64::from(mutual_count) * PEOPLE_WEIGHTS.mutual
        + f64::from(common_skill_count) * PEOPLE_WEIGHTS.skills
        + employer_bonus)
        / SCORE_NORMALIZER;
    clamp_score(raw)
}

/// A candidate needs at least one non-zero signal to be surfaced.
pub fn has_signal(signal: &PeopleSignal) -> bool {
    signal.mutual_count > 0 || signal.common_skill_count > 0 || signal.same_employer
}

fn compare(a: &PersonSuggestion, b: &PersonSuggestion) -> Ordering {
    score_desc(a.score, b.score)
        .then_with(|| b.mutual_connections.cmp(&a.mutual_connections))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Score, order and truncate "people you may know" candidates.
///
/// `connection_path_length` is left empty here; the engine fills it in for
/// the surviving entries only.
pub fn rank_people_signals(
    context: &RequesterContext,
    signals: Vec<PeopleSignal>,
    limit: usize,
) -> Vec<PersonSuggestion> {
    let scored = signals
        .into_iter()
        .filter(|signal| !context.excludes(&signal.candidate.user_id))
        .filter(has_signal)
        .map(|signal| PersonSuggestion {
            score: score_person(
                signal.mutual_count,
                signal.common_skill_count,
                signal.same_employer,
            ),
            user_id: signal.candidate.user_id,
            name: signal.candidate.name,
            title: signal.candidate.title,
            company: signal.company,
            mutual_connections: signal.mutual_count,
            common_skills: signal.common_skill_count,
            same_company: signal.same_employer,
            connection_path_length: None,
        })
        .collect();

    rank_top_k(scored, limit, compare)
}
