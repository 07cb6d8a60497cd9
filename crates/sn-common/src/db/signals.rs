//! Recommendation signal queries. Each returns raw rows for the scorers and
//! applies no weighting of its own.

use std::collections::BTreeSet;

use tracing::instrument;

use crate::db::util::{TimedClientExt, count_to_u32};
use crate::db::{PgPool, db_error};
use crate::graph::RequesterContext;
use crate::recommend::signals::{
    CandidateProfile, EmployerProfile, EmployerSignal, FriendSignal, PeopleSignal,
};

db_error!(SignalFetchError {});

fn to_set(values: Vec<String>) -> BTreeSet<String> {
    values.into_iter().collect()
}

#[instrument(skip(pool))]
pub async fn fetch_requester_context(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<RequesterContext>, SignalFetchError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt(
            "SELECT u.user_id,
                    COALESCE((SELECT array_agg(k.dst) FROM sn.knows k WHERE k.src = u.user_id), '{}') AS connections,
                    COALESCE((SELECT array_agg(us.skill_name) FROM sn.user_skills us WHERE us.user_id = u.user_id), '{}') AS skills,
                    e.company_name AS employer
             FROM sn.users u
             LEFT JOIN sn.employment e ON e.user_id = u.user_id
             WHERE u.user_id = $1",
            &[&user_id],
            "fetch_requester_context",
        )
        .await?;

    Ok(row.map(|row| RequesterContext {
        user_id: row.get("user_id"),
        connections: to_set(row.get("connections")),
        skills: to_set(row.get("skills")),
        employer: row.get("employer"),
    }))
}

/// Users exactly two hops away, with distinct connector counts and the skills
/// they share with the requester.
#[instrument(skip(pool, requester), fields(requester = %requester.user_id))]
pub async fn fetch_two_hop_candidates(
    pool: &PgPool,
    requester: &RequesterContext,
) -> Result<Vec<FriendSignal>, SignalFetchError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            "WITH friends AS (
                 SELECT dst AS friend_id FROM sn.knows WHERE src = $1
             ),
             candidates AS (
                 SELECT k.dst AS candidate_id, COUNT(DISTINCT k.src) AS mutual_count
                 FROM sn.knows k
                 JOIN friends f ON f.friend_id = k.src
                 WHERE k.dst <> $1
                   AND k.dst NOT IN (SELECT friend_id FROM friends)
                 GROUP BY k.dst
             )
             SELECT c.candidate_id, u.name, u.title, c.mutual_count,
                    COALESCE((SELECT array_agg(cs.skill_name ORDER BY cs.skill_name)
                              FROM sn.user_skills cs
                              JOIN sn.user_skills rs
                                ON rs.skill_name = cs.skill_name AND rs.user_id = $1
                              WHERE cs.user_id = c.candidate_id), '{}') AS common_skills
             FROM candidates c
             JOIN sn.users u ON u.user_id = c.candidate_id",
            &[&requester.user_id],
            "fetch_two_hop_candidates",
        )
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| FriendSignal {
            candidate: CandidateProfile {
                user_id: row.get("candidate_id"),
                name: row.get("name"),
                title: row.get("title"),
            },
            mutual_count: count_to_u32(row.get("mutual_count")),
            common_skills: to_set(row.get("common_skills")),
        })
        .collect())
}

/// Employers of skill-sharing users other than the requester's own, with
/// every skill those employees hold.
#[instrument(skip(pool, requester), fields(requester = %requester.user_id))]
pub async fn fetch_employer_overlap(
    pool: &PgPool,
    requester: &RequesterContext,
) -> Result<Vec<EmployerSignal>, SignalFetchError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            "WITH requester_skills AS (
                 SELECT skill_name FROM sn.user_skills WHERE user_id = $1
             ),
             peers AS (
                 SELECT DISTINCT us.user_id
                 FROM sn.user_skills us
                 JOIN requester_skills rs ON rs.skill_name = us.skill_name
                 WHERE us.user_id <> $1
             )
             SELECT e.company_name, c.location,
                    array_agg(DISTINCT ps.skill_name ORDER BY ps.skill_name) AS company_skills
             FROM peers p
             JOIN sn.employment e ON e.user_id = p.user_id
             JOIN sn.companies c ON c.name = e.company_name
             JOIN sn.user_skills ps ON ps.user_id = p.user_id
             WHERE e.company_name IS DISTINCT FROM $2
             GROUP BY e.company_name, c.location",
            &[&requester.user_id, &requester.employer],
            "fetch_employer_overlap",
        )
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            EmployerSignal::new(
                EmployerProfile {
                    name: row.get("company_name"),
                    location: row.get("location"),
                },
                to_set(row.get("company_skills")),
                &requester.skills,
            )
        })
        .collect())
}

/// Every user other than the requester and their direct connections.
#[instrument(skip(pool, requester), fields(requester = %requester.user_id))]
pub async fn fetch_people_signals(
    pool: &PgPool,
    requester: &RequesterContext,
) -> Result<Vec<PeopleSignal>, SignalFetchError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            "WITH friends AS (
                 SELECT dst AS friend_id FROM sn.knows WHERE src = $1
             ),
             requester_skills AS (
                 SELECT skill_name FROM sn.user_skills WHERE user_id = $1
             )
             SELECT u.user_id, u.name, u.title, e.company_name AS company,
                    (SELECT COUNT(*) FROM sn.knows k
                       JOIN friends f ON f.friend_id = k.dst
                      WHERE k.src = u.user_id) AS mutual_count,
                    (SELECT COUNT(*) FROM sn.user_skills us
                       JOIN requester_skills rs ON rs.skill_name = us.skill_name
                      WHERE us.user_id = u.user_id) AS common_skill_count,
                    COALESCE(e.company_name = $2, false) AS same_employer
             FROM sn.users u
             LEFT JOIN sn.employment e ON e.user_id = u.user_id
             WHERE u.user_id <> $1
               AND u.user_id NOT IN (SELECT friend_id FROM friends)",
            &[&requester.user_id, &requester.employer],
            "fetch_people_signals",
        )
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| PeopleSignal {
            candidate: CandidateProfile {
                user_id: row.get("user_id"),
                name: row.get("name"),
                title: row.get("title"),
            },
            company: row.get("company"),
            mutual_count: count_to_u32(row.get("mutual_count")),
            common_skill_count: count_to_u32(row.get("common_skill_count")),
            same_employer: row.get("same_employer"),
        })
        .collect())
}
