//! Engine policy: the thresholds, weights and probabilities the persona
//! rules run under.
//!
//! Loaded from the `[engine]` section of the configuration file. The
//! defaults reproduce the standard rule set; deployments that ran the older
//! rule variant tune these values instead of swapping in different code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Allowed range for score offsets (base, bonuses, penalties)
const OFFSET_RANGE: std::ops::RangeInclusive<i64> = -1000..=1000;

/// Allowed range for per-post and per-comment weights
const WEIGHT_RANGE: std::ops::RangeInclusive<i64> = 0..=1000;

/// Complete rule configuration for one engine instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaPolicy {
    pub tags: TagPolicy,
    pub scores: ScorePolicy,
    pub narrative: NarrativePolicy,
}

/// Tag derivation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPolicy {
    /// More than this many activities earns the active-member tag
    pub active_member_threshold: usize,

    /// Probability of the rising-talent tag when no activity data exists
    pub rising_talent_probability: f64,

    /// Tenure (years) for the founding-member tag
    pub founding_member_years: i32,

    /// Tenure (years) for the senior-member tag
    pub senior_member_years: i32,

    /// Tenure below this many years earns the new-member tag
    pub new_member_years: i32,

    /// Join date assumed when a profile has neither join nor creation date
    pub default_join_date: NaiveDate,
}

/// Score baseline, adjustments and social-axis weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorePolicy {
    pub base: i64,
    pub admin_bonus: i64,
    pub senior_level_bonus: i64,
    pub student_penalty: i64,

    /// Extra practical-ability points for students
    pub student_practice_bonus: i64,

    /// Jitter is drawn uniformly from `0..jitter_range`
    pub jitter_range: u32,

    /// Member level labels that count as the senior tier
    pub senior_levels: Vec<String>,

    /// Academic exchange starting point before engagement
    pub academic_base: i64,
    pub academic_per_post: i64,
    pub academic_per_comment: i64,

    /// Industry influence points per post
    pub influence_per_post: i64,

    /// Ceiling for the engagement-driven axes
    pub social_ceiling: i64,
}

/// Narrative thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativePolicy {
    /// Number of leading tags quoted in the introduction
    pub top_tag_count: usize,

    /// Interactions at or above this count read as an active contributor
    pub active_interaction_threshold: u32,

    /// Academic exchange above this value earns the highlight clause
    pub academic_highlight_threshold: u8,
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self {
            active_member_threshold: 5,
            rising_talent_probability: 0.5,
            founding_member_years: 10,
            senior_member_years: 5,
            new_member_years: 1,
            default_join_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        }
    }
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            base: 60,
            admin_bonus: 20,
            senior_level_bonus: 15,
            student_penalty: 5,
            student_practice_bonus: 10,
            jitter_range: 15,
            senior_levels: vec!["senior".to_string(), "高级会员".to_string()],
            academic_base: 60,
            academic_per_post: 5,
            academic_per_comment: 2,
            influence_per_post: 3,
            social_ceiling: 95,
        }
    }
}

impl Default for NarrativePolicy {
    fn default() -> Self {
        Self {
            top_tag_count: 3,
            active_interaction_threshold: 5,
            academic_highlight_threshold: 80,
        }
    }
}

impl ScorePolicy {
    pub fn is_senior_level(&self, level: &str) -> bool {
        self.senior_levels.iter().any(|l| l == level)
    }
}

impl PersonaPolicy {
    /// Check that the policy can only produce in-range results.
    pub fn validate(&self) -> Result<()> {
        let tags = &self.tags;
        if !(0.0..=1.0).contains(&tags.rising_talent_probability) {
            return Err(Error::config_field_invalid(
                "engine.tags.rising_talent_probability",
                "must be between 0.0 and 1.0",
            ));
        }
        if !(tags.new_member_years <= tags.senior_member_years
            && tags.senior_member_years <= tags.founding_member_years)
        {
            return Err(Error::config_field_invalid(
                "engine.tags",
                "tenure thresholds must satisfy new <= senior <= founding",
            ));
        }

        let scores = &self.scores;
        if scores.jitter_range == 0 {
            return Err(Error::config_field_invalid(
                "engine.scores.jitter_range",
                "must be at least 1",
            ));
        }
        if !(0..=100).contains(&scores.social_ceiling) {
            return Err(Error::config_field_invalid(
                "engine.scores.social_ceiling",
                "must be between 0 and 100",
            ));
        }
        let offsets = [
            ("engine.scores.base", scores.base),
            ("engine.scores.admin_bonus", scores.admin_bonus),
            ("engine.scores.senior_level_bonus", scores.senior_level_bonus),
            ("engine.scores.student_penalty", scores.student_penalty),
            ("engine.scores.student_practice_bonus", scores.student_practice_bonus),
            ("engine.scores.academic_base", scores.academic_base),
        ];
        for (field, value) in offsets {
            if !OFFSET_RANGE.contains(&value) {
                return Err(Error::config_field_invalid(field, "must be between -1000 and 1000"));
            }
        }

        let weights = [
            ("engine.scores.academic_per_post", scores.academic_per_post),
            ("engine.scores.academic_per_comment", scores.academic_per_comment),
            ("engine.scores.influence_per_post", scores.influence_per_post),
        ];
        for (field, value) in weights {
            if !WEIGHT_RANGE.contains(&value) {
                return Err(Error::config_field_invalid(field, "must be between 0 and 1000"));
            }
        }

        if self.narrative.academic_highlight_threshold > 100 {
            return Err(Error::config_field_invalid(
                "engine.narrative.academic_highlight_threshold",
                "must be between 0 and 100",
            ));
        }

        Ok(())
    }
}
