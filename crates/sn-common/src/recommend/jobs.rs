use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::ranking::{clamp_score, rank_top_k, score_desc};
use super::signals::EmployerSignal;
use super::weights::JOB_MATCH_THRESHOLD;
use crate::api::recommendation::JobRecommendation;
use crate::graph::RequesterContext;

/// `|matching| / |company|`, or 0 when the employer has no observed skills.
pub fn match_rate(matching: usize, company: usize) -> f64 {
    if company == 0 {
        return 0.0;
    }
    matching as f64 / company as f64
}

/// Strictly greater than the threshold.
pub fn passes_match_threshold(rate: f64) -> bool {
    rate > JOB_MATCH_THRESHOLD
}

fn compare(a: &JobRecommendation, b: &JobRecommendation) -> Ordering {
    score_desc(a.score, b.score).then_with(|| a.company.cmp(&b.company))
}

/// Turn employer skill overlaps into ranked job suggestions.
///
/// The requester's own employer is skipped. Only the part of
/// `matching_skills` that is also in `company_skills` counts towards the
/// rate, which keeps it within `[0, 1]`.
pub fn rank_employer_signals(
    context: &RequesterContext,
    signals: Vec<EmployerSignal>,
    limit: usize,
) -> Vec<JobRecommendation> {
    if context.skills.is_empty() {
        return Vec::new();
    }

    let scored = signals
        .into_iter()
        .filter(|signal| context.employer.as_deref() != Some(signal.employer.name.as_str()))
        .filter_map(|signal| {
            let matching: BTreeSet<String> = signal
                .matching_skills
                .intersection(&signal.company_skills)
                .cloned()
                .collect();
            let rate = match_rate(matching.len(), signal.company_skills.len());
            if !passes_match_threshold(rate) {
                return None;
            }

            let company = signal.employer.name;
            Some(JobRecommendation {
                job_id: format!("job_{company}"),
                title: format!("Position at {company}"),
                location: signal.employer.location,
                required_skills: signal.company_skills.into_iter().collect(),
                matching_skills: matching.into_iter().collect(),
                skill_match_rate: rate,
                score: clamp_score(rate),
                company,
            })
        })
        .collect();

    rank_top_k(scored, limit, compare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::signals::EmployerProfile;

    fn skills(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn context(own_skills: &[&str], employer: Option<&str>) -> RequesterContext {
        RequesterContext {
            user_id: "me".into(),
            connections: BTreeSet::new(),
            skills: skills(own_skills),
            employer: employer.map(str::to_string),
        }
    }

    fn employer(name: &str, company_skills: &[&str], requester: &RequesterContext) -> EmployerSignal {
        EmployerSignal::new(
            EmployerProfile {
                name: name.into(),
                location: Some("Remote".into()),
            },
            skills(company_skills),
            &requester.skills,
        )
    }

    #[test]
    fn exactly_point_three_is_excluded() {
        let ctx = context(&["a", "b", "c"], None);
        // 3 of 10 observed skills overlap
        let signal = employer(
            "Edge",
            &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"],
            &ctx,
        );

        assert_eq!(match_rate(3, 10), 0.3);
        assert!(rank_employer_signals(&ctx, vec![signal], 10).is_empty());
    }

    #[test]
    fn just_above_threshold_is_included() {
        assert!(passes_match_threshold(0.30001));
        assert!(!passes_match_threshold(0.3));
        assert!(!passes_match_threshold(0.29999));
    }

    #[test]
    fn requester_without_skills_gets_nothing() {
        let ctx = context(&[], None);
        let signal = EmployerSignal {
            employer: EmployerProfile {
                name: "Any".into(),
                location: None,
            },
            company_skills: skills(&["rust"]),
            matching_skills: skills(&["rust"]),
        };

        assert!(rank_employer_signals(&ctx, vec![signal], 10).is_empty());
    }

    #[test]
    fn skips_own_employer_and_synthesizes_titles() {
        let ctx = context(&["rust", "go"], Some("Home"));
        let signals = vec![
            employer("Home", &["rust"], &ctx),
            employer("CloudWorks", &["rust", "go", "k8s"], &ctx),
        ];

        let ranked = rank_employer_signals(&ctx, signals, 10);

        assert_eq!(ranked.len(), 1);
        let job = &ranked[0];
        assert_eq!(job.job_id, "job_CloudWorks");
        assert_eq!(job.title, "Position at CloudWorks");
        assert_eq!(job.matching_skills, vec!["go".to_string(), "rust".to_string()]);
        assert!((job.score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(job.score, job.skill_match_rate);
    }

    #[test]
    fn orders_by_rate_then_company_name() {
        let ctx = context(&["rust"], None);
        let signals = vec![
            employer("Zeta", &["rust"], &ctx),
            employer("Alpha", &["rust"], &ctx),
            employer("Mid", &["rust", "go"], &ctx),
        ];

        let ranked = rank_employer_signals(&ctx, signals, 2);
        let names: Vec<_> = ranked.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn empty_company_skills_never_qualify() {
        let ctx = context(&["rust"], None);
        let signal = employer("Empty", &[], &ctx);
        assert_eq!(match_rate(0, 0), 0.0);
        assert!(rank_employer_signals(&ctx, vec![signal], 10).is_empty());
    }
}
