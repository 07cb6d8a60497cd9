/// Friend recommendation weights (mutual connections dominate).
pub const FRIEND_WEIGHTS: FriendWeights = FriendWeights {
    mutual: 0.6,
    skills: 0.4,
};

/// People-you-may-know weights. `same_employer` is a flat addend, not a share.
pub const PEOPLE_WEIGHTS: PeopleWeights = PeopleWeights {
    mutual: 0.5,
    skills: 0.3,
    same_employer: 2.0,
};

/// Divisor that maps weighted signal sums into the score range before clamping.
pub const SCORE_NORMALIZER: f64 = 10.0;

/// Job matches must exceed this rate; equality does not qualify.
pub const JOB_MATCH_THRESHOLD: f64 = 0.3;

/// `mutual_count` above this yields "Many mutual connections".
pub const MANY_MUTUAL_THRESHOLD: u32 = 5;
/// `|common_skills|` above this yields "Similar skills".
pub const SIMILAR_SKILLS_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct FriendWeights {
    pub mutual: f64,
    pub skills: f64,
}

impl FriendWeights {
    pub fn sum(&self) -> f64 {
        self.mutual + self.skills
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PeopleWeights {
    pub mutual: f64,
    pub skills: f64,
    pub same_employer: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friend_weights_sum_to_one() {
        assert!((FRIEND_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn employer_bonus_alone_scores_point_two() {
        assert!((PEOPLE_WEIGHTS.same_employer / SCORE_NORMALIZER - 0.2).abs() < 1e-9);
    }
}
