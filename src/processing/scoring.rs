//! Role-aware ATS scoring and the low-score boost policy

use crate::config::ScoringConfig;
use serde::{Deserialize, Serialize};

/// Points for a found skill that the role prioritizes
const ROLE_SKILL_POINTS: usize = 2;
/// Points for any other found skill
const JD_SKILL_POINTS: usize = 1;

/// Raw role-weighted score in [0, 100].
///
/// `max_score = |jd_skills| + |role_skills|`; each found skill earns 2 points
/// when it is a role skill and 1 otherwise. The ratio is floored to a whole
/// percentage. An empty JD skill list scores 0.
pub fn calculate_weighted_ats(
    found_skills: &[String],
    jd_skills: &[String],
    role_skills: &[String],
) -> u32 {
    if jd_skills.is_empty() {
        return 0;
    }

    let max_score = jd_skills.len() + role_skills.len();
    let points: usize = found_skills
        .iter()
        .map(|skill| {
            if role_skills.contains(skill) {
                ROLE_SKILL_POINTS
            } else {
                JD_SKILL_POINTS
            }
        })
        .sum();

    let percent = points * 100 / max_score;
    percent.min(100) as u32
}

/// Floor-boosting heuristic applied after raw scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostPolicy {
    /// Raw scores strictly below this are boosted
    pub below: u32,
    pub bonus: u32,
    pub cap: u32,
}

impl Default for BoostPolicy {
    fn default() -> Self {
        Self {
            below: 40,
            bonus: 20,
            cap: 100,
        }
    }
}

impl From<&ScoringConfig> for BoostPolicy {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            below: config.boost_below,
            bonus: config.boost_amount,
            cap: config.max_score,
        }
    }
}

impl BoostPolicy {
    /// Add the bonus to low scores, then cap
    pub fn apply(&self, raw: u32) -> u32 {
        let boosted = if raw < self.below {
            raw.saturating_add(self.bonus)
        } else {
            raw
        };
        boosted.min(self.cap)
    }
}

/// Both stages of an ATS score, kept for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsScore {
    pub raw: u32,
    pub boosted: bool,
    pub value: u32,
}

impl AtsScore {
    pub fn compute(
        found_skills: &[String],
        jd_skills: &[String],
        role_skills: &[String],
        policy: &BoostPolicy,
    ) -> Self {
        let raw = calculate_weighted_ats(found_skills, jd_skills, role_skills);
        let value = policy.apply(raw);
        Self {
            raw,
            boosted: value != raw,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weighted_scenario() {
        let jd = skills(&["python", "sql", "docker"]);
        let role = skills(&["sql"]);
        let found = skills(&["python", "sql"]);

        let raw = calculate_weighted_ats(&found, &jd, &role);
        assert_eq!(raw, 75);
        assert_eq!(BoostPolicy::default().apply(raw), 75);
    }

    #[test]
    fn test_empty_jd_scores_zero() {
        let found = skills(&["python"]);
        let role = skills(&["python", "sql"]);
        assert_eq!(calculate_weighted_ats(&found, &[], &role), 0);
        assert_eq!(calculate_weighted_ats(&[], &[], &[]), 0);
    }

    #[test]
    fn test_boost_policy_boundaries() {
        let policy = BoostPolicy::default();
        assert_eq!(policy.apply(39), 59);
        assert_eq!(policy.apply(40), 40);
        assert_eq!(policy.apply(95), 95);
        assert_eq!(policy.apply(85), 85);
        assert_eq!(policy.apply(0), 20);
    }

    #[test]
    fn test_boost_respects_cap() {
        let policy = BoostPolicy {
            below: 90,
            bonus: 20,
            cap: 100,
        };
        assert_eq!(policy.apply(89), 100);
    }

    #[test]
    fn test_oversized_bonus_is_capped() {
        let policy = BoostPolicy {
            below: 40,
            bonus: u32::MAX,
            cap: 100,
        };
        assert_eq!(policy.apply(39), 100);
        assert_eq!(policy.apply(0), 100);
        assert_eq!(policy.apply(40), 40);
    }

    #[test]
    fn test_score_within_bounds() {
        let jd = skills(&["python", "sql", "docker", "aws"]);
        let role = skills(&["python", "sql", "docker", "aws"]);
        let raw = calculate_weighted_ats(&jd, &jd, &role);
        assert_eq!(raw, 100);

        for n in 0..=jd.len() {
            let score = AtsScore::compute(&jd[..n], &jd, &role, &BoostPolicy::default());
            assert!(score.value <= 100);
        }
    }

    #[test]
    fn test_adding_role_skill_never_decreases_score() {
        let jd = skills(&["python", "sql", "docker", "react", "aws"]);
        let role = skills(&["sql", "aws", "system design"]);
        let mut found = skills(&["python"]);

        let mut previous = calculate_weighted_ats(&found, &jd, &role);
        for skill in ["sql", "aws"] {
            found.push(skill.to_string());
            let next = calculate_weighted_ats(&found, &jd, &role);
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn test_compute_records_boost() {
        let jd = skills(&["python", "sql", "docker", "react"]);
        let score = AtsScore::compute(&skills(&["react"]), &jd, &[], &BoostPolicy::default());
        assert_eq!(score.raw, 25);
        assert!(score.boosted);
        assert_eq!(score.value, 45);
    }

    #[test]
    fn test_policy_from_config() {
        let config = ScoringConfig {
            boost_below: 50,
            boost_amount: 10,
            max_score: 100,
        };
        let policy = BoostPolicy::from(&config);
        assert_eq!(policy.apply(49), 59);
        assert_eq!(policy.apply(50), 50);
    }
}
