//! Ability score model.
//!
//! Three axes (research depth, practical ability, innovation) are the
//! profile baseline plus random jitter. The two engagement axes (academic
//! exchange, industry influence) are pure functions of the activity metrics,
//! so more real activity always moves them the same way.

use tracing::trace;

use super::policy::ScorePolicy;
use super::random::RandomSource;
use super::types::{ActivityMetrics, Axis, MemberProfile, ScoreAxis};

/// Computes the five-axis ability vector.
#[derive(Debug, Clone)]
pub struct ScoreModel<'a> {
    policy: &'a ScorePolicy,
}

impl<'a> ScoreModel<'a> {
    pub fn new(policy: &'a ScorePolicy) -> Self {
        Self { policy }
    }

    /// Profile baseline before jitter and per-axis adjustments.
    pub fn baseline(&self, profile: &MemberProfile) -> i64 {
        let mut base = self.policy.base;
        if profile.is_admin() {
            base = base.saturating_add(self.policy.admin_bonus);
        }
        if profile
            .member_level()
            .is_some_and(|level| self.policy.is_senior_level(level))
        {
            base = base.saturating_add(self.policy.senior_level_bonus);
        }
        if profile.is_student {
            base = base.saturating_sub(self.policy.student_penalty);
        }
        base
    }

    /// Academic exchange: driven only by posts and comments.
    pub fn academic_exchange(&self, metrics: &ActivityMetrics) -> i64 {
        let raw = self
            .policy
            .academic_base
            .saturating_add(weighted(self.policy.academic_per_post, metrics.post_count))
            .saturating_add(weighted(self.policy.academic_per_comment, metrics.comment_count));
        raw.min(self.policy.social_ceiling)
    }

    /// Industry influence: baseline plus a per-post increment.
    pub fn industry_influence(&self, base: i64, metrics: &ActivityMetrics) -> i64 {
        let raw = base.saturating_add(weighted(self.policy.influence_per_post, metrics.post_count));
        raw.min(self.policy.social_ceiling)
    }

    /// Compute all five axes in display order. Missing metrics count as zero.
    pub fn compute(
        &self,
        profile: &MemberProfile,
        metrics: Option<&ActivityMetrics>,
        rng: &mut dyn RandomSource,
    ) -> Vec<ScoreAxis> {
        let metrics = metrics.copied().unwrap_or_default();
        let base = self.baseline(profile);
        let practice_bonus = if profile.is_student {
            self.policy.student_practice_bonus
        } else {
            0
        };

        let scores: Vec<ScoreAxis> = Axis::all()
            .iter()
            .map(|&axis| {
                let raw = match axis {
                    Axis::ResearchDepth | Axis::Innovation => base.saturating_add(self.jitter(rng)),
                    Axis::PracticalAbility => base
                        .saturating_add(self.jitter(rng))
                        .saturating_add(practice_bonus),
                    Axis::AcademicExchange => self.academic_exchange(&metrics),
                    Axis::IndustryInfluence => self.industry_influence(base, &metrics),
                };
                ScoreAxis::new(axis, raw)
            })
            .collect();

        trace!(member_id = %profile.id, base, "Scores computed");
        scores
    }

    fn jitter(&self, rng: &mut dyn RandomSource) -> i64 {
        i64::from(rng.below(self.policy.jitter_range))
    }
}

/// Per-count weight; saturates so extreme policies clamp instead of wrapping.
fn weighted(weight: i64, count: u32) -> i64 {
    weight.saturating_mul(i64::from(count))
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
