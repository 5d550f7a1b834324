//! Persona assembler: the single entry point callers use.
//!
//! Runs tag derivation, scoring and narrative composition in order and
//! packages the results. Holds only the policy, so one assembler can be
//! shared across threads and called from sync or async code alike.

use chrono::{Datelike, Utc};
use tracing::debug;

use crate::error::{Error, Result};

use super::narrative::NarrativeComposer;
use super::policy::PersonaPolicy;
use super::random::{RandomSource, ThreadRandom};
use super::scores::ScoreModel;
use super::tags::TagDeriver;
use super::types::{ActivityMetrics, ActivityRecord, MemberProfile, Persona};

/// Builds personas under one policy.
#[derive(Debug, Clone, Default)]
pub struct PersonaAssembler {
    policy: PersonaPolicy,
}

impl PersonaAssembler {
    pub fn new(policy: PersonaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PersonaPolicy {
        &self.policy
    }

    /// Build a persona using the thread-local random source and the current
    /// UTC year.
    pub fn build_persona(
        &self,
        profile: Option<&MemberProfile>,
        activities: Option<&[ActivityRecord]>,
        metrics: Option<&ActivityMetrics>,
    ) -> Result<Persona> {
        self.build_persona_with(
            profile,
            activities,
            metrics,
            Utc::now().year(),
            &mut ThreadRandom,
        )
    }

    /// Build a persona with an explicit reference year and random source.
    ///
    /// Fails with `InvalidInput` when `profile` is absent; every other
    /// input defaults to empty or zero.
    pub fn build_persona_with(
        &self,
        profile: Option<&MemberProfile>,
        activities: Option<&[ActivityRecord]>,
        metrics: Option<&ActivityMetrics>,
        current_year: i32,
        rng: &mut dyn RandomSource,
    ) -> Result<Persona> {
        let profile = profile.ok_or_else(|| Error::invalid_input("member profile is required"))?;

        let tags = TagDeriver::new(&self.policy.tags).derive(profile, activities, current_year, rng);
        let scores = ScoreModel::new(&self.policy.scores).compute(profile, metrics, rng);

        let composer = NarrativeComposer::new(&self.policy.narrative);
        let introduction = composer.compose_introduction(profile, &tags, rng);
        let analysis = composer.compose_analysis(&scores, metrics);

        debug!(
            member_id = %profile.id,
            tags = tags.len(),
            activities = activities.map_or(0, <[ActivityRecord]>::len),
            "Persona assembled"
        );

        Ok(Persona {
            tags,
            introduction,
            scores,
            analysis,
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
