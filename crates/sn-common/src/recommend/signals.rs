//! Raw per-candidate signals produced by a [`GraphQuery`](crate::graph::GraphQuery)
//! backend. Scorers never query the graph themselves; they only consume these.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
}

/// Friend-of-friend candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendSignal {
    pub candidate: CandidateProfile,
    /// Distinct connectors shared with the requester.
    pub mutual_count: u32,
    pub common_skills: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerProfile {
    pub name: String,
    pub location: Option<String>,
}

/// Employer of at least one user sharing a skill with the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerSignal {
    pub employer: EmployerProfile,
    /// Union of the skills of that employer's skill-sharing employees.
    pub company_skills: BTreeSet<String>,
    /// `company_skills ∩ requester skills`
    pub matching_skills: BTreeSet<String>,
}

impl EmployerSignal {
    pub fn new(
        employer: EmployerProfile,
        company_skills: BTreeSet<String>,
        requester_skills: &BTreeSet<String>,
    ) -> Self {
        let matching_skills = company_skills
            .intersection(requester_skills)
            .cloned()
            .collect();

        Self {
            employer,
            company_skills,
            matching_skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleSignal {
    pub candidate: CandidateProfile,
    pub company: Option<String>,
    pub mutual_count: u32,
    pub common_skill_count: u32,
    pub same_employer: bool,
}
