//! Tag derivation.
//!
//! Rules run in a fixed order (professional field, activity, tenure, role)
//! and feed an ordered set, so a tag keeps the position of its first
//! occurrence and exact repeats are dropped.

use std::collections::HashSet;

use chrono::Datelike;
use tracing::trace;

use super::policy::TagPolicy;
use super::random::RandomSource;
use super::types::{labels, ActivityRecord, MemberProfile, Tag, TagCategory};

/// Insertion-ordered set of tags.
#[derive(Debug, Default)]
pub struct TagSet {
    tags: Vec<Tag>,
    seen: HashSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless an identical one is already present. Returns whether
    /// it was added.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.seen.contains(tag.as_str()) {
            return false;
        }
        self.seen.insert(tag.as_str().to_string());
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.seen.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.tags
    }
}

/// Tenure band of a member, by whole calendar years since joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tenure {
    Founding,
    Senior,
    New,
    /// Between the new and senior thresholds; carries no tag
    Established,
}

impl Tenure {
    pub fn classify(join_years: i32, policy: &TagPolicy) -> Self {
        if join_years >= policy.founding_member_years {
            Tenure::Founding
        } else if join_years >= policy.senior_member_years {
            Tenure::Senior
        } else if join_years < policy.new_member_years {
            Tenure::New
        } else {
            Tenure::Established
        }
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Tenure::Founding => Some(labels::FOUNDING_MEMBER),
            Tenure::Senior => Some(labels::SENIOR_MEMBER),
            Tenure::New => Some(labels::NEW_MEMBER),
            Tenure::Established => None,
        }
    }
}

/// Derives the descriptive tags of a member.
#[derive(Debug, Clone)]
pub struct TagDeriver<'a> {
    policy: &'a TagPolicy,
}

impl<'a> TagDeriver<'a> {
    pub fn new(policy: &'a TagPolicy) -> Self {
        Self { policy }
    }

    /// Derive the ordered, duplicate-free tag list.
    ///
    /// `current_year` anchors tenure; `rng` is consulted only when there is
    /// no activity data.
    pub fn derive(
        &self,
        profile: &MemberProfile,
        activities: Option<&[ActivityRecord]>,
        current_year: i32,
        rng: &mut dyn RandomSource,
    ) -> Vec<Tag> {
        let mut tags = TagSet::new();

        self.professional_tags(profile, &mut tags);
        self.activity_tags(activities.unwrap_or_default(), rng, &mut tags);
        self.tenure_tag(profile, current_year, &mut tags);
        self.role_tags(profile, &mut tags);

        trace!(member_id = %profile.id, count = tags.len(), "Tags derived");
        tags.into_vec()
    }

    /// Whole years between the effective join date and `current_year`.
    pub fn join_years(&self, profile: &MemberProfile, current_year: i32) -> i32 {
        let joined = profile
            .effective_join_date()
            .unwrap_or(self.policy.default_join_date);
        current_year - joined.year()
    }

    fn professional_tags(&self, profile: &MemberProfile, tags: &mut TagSet) {
        let fields = profile.professional_fields();
        if !fields.is_empty() {
            for field in fields {
                tags.insert(Tag::categorized(TagCategory::Professional, field));
            }
        } else if let Some(position) = profile.position() {
            tags.insert(Tag::categorized(TagCategory::Position, position));
        }
    }

    fn activity_tags(
        &self,
        activities: &[ActivityRecord],
        rng: &mut dyn RandomSource,
        tags: &mut TagSet,
    ) {
        if activities.is_empty() {
            if rng.chance(self.policy.rising_talent_probability) {
                tags.insert(Tag::plain(labels::RISING_TALENT));
            }
            return;
        }

        for activity in activities {
            tags.insert(Tag::categorized(TagCategory::Activity, activity.type_label()));
        }
        if activities.len() > self.policy.active_member_threshold {
            tags.insert(Tag::plain(labels::ACTIVE_MEMBER));
        }
    }

    fn tenure_tag(&self, profile: &MemberProfile, current_year: i32, tags: &mut TagSet) {
        let years = self.join_years(profile, current_year);
        if let Some(label) = Tenure::classify(years, self.policy).tag() {
            tags.insert(Tag::plain(label));
        }
    }

    fn role_tags(&self, profile: &MemberProfile, tags: &mut TagSet) {
        if profile.is_admin() {
            tags.insert(Tag::plain(labels::ADMINISTRATOR));
        }
        if profile.is_student {
            tags.insert(Tag::plain(labels::STUDENT_MEMBER));
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
