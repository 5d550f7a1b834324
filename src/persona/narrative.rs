//! Introduction and analysis text.
//!
//! The introduction picks one of a few sentence templates at random for
//! variety. The analysis is fully deterministic: the same metrics always
//! produce the same coaching text.

use super::policy::NarrativePolicy;
use super::random::RandomSource;
use super::types::{has_tag, labels, score_of, ActivityMetrics, Axis, MemberProfile, ScoreAxis, Tag};

const DEFAULT_NAME: &str = "会员";
const DEFAULT_ORGANIZATION: &str = "所在单位";
const NO_TOP_TAGS: &str = "多项技能";
const TOP_TAG_SEPARATOR: &str = "、";

/// Values substituted into an introduction template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroContext<'a> {
    pub name: &'a str,
    pub organization: &'a str,
    pub top_tags: String,
    pub seniority: &'static str,
    pub activity_level: &'static str,
}

type Template = fn(&IntroContext<'_>) -> String;

const INTRO_TEMPLATES: [Template; 3] = [intro_focus, intro_workplace, intro_engagement];

fn intro_focus(c: &IntroContext<'_>) -> String {
    format!("我是{}，一位专注于{}的自动化领域专业人士。", c.name, c.top_tags)
}

fn intro_workplace(c: &IntroContext<'_>) -> String {
    format!("{}，{}自动化专家，在{}从事相关工作。", c.name, c.seniority, c.organization)
}

fn intro_engagement(c: &IntroContext<'_>) -> String {
    format!("作为{}，我活跃于学会的各类活动中。", c.activity_level)
}

/// Composes the human-readable parts of a persona.
#[derive(Debug, Clone)]
pub struct NarrativeComposer<'a> {
    policy: &'a NarrativePolicy,
}

impl<'a> NarrativeComposer<'a> {
    pub fn new(policy: &'a NarrativePolicy) -> Self {
        Self { policy }
    }

    /// Number of available introduction templates.
    pub fn template_count() -> usize {
        INTRO_TEMPLATES.len()
    }

    /// One self-introduction sentence, template chosen by `rng`.
    pub fn compose_introduction(
        &self,
        profile: &MemberProfile,
        tags: &[Tag],
        rng: &mut dyn RandomSource,
    ) -> String {
        let context = self.intro_context(profile, tags);
        let template = INTRO_TEMPLATES[rng.pick_index(INTRO_TEMPLATES.len())];
        template(&context)
    }

    pub fn intro_context<'p>(&self, profile: &'p MemberProfile, tags: &[Tag]) -> IntroContext<'p> {
        let top = top_tags(tags, self.policy.top_tag_count);
        IntroContext {
            name: profile.display_name().unwrap_or(DEFAULT_NAME),
            organization: profile.organization().unwrap_or(DEFAULT_ORGANIZATION),
            top_tags: if top.is_empty() {
                NO_TOP_TAGS.to_string()
            } else {
                top.join(TOP_TAG_SEPARATOR)
            },
            seniority: seniority(tags),
            activity_level: activity_level(tags),
        }
    }

    /// Three-part coaching text: engagement opening, optional academic
    /// highlight, closing suggestion.
    pub fn compose_analysis(
        &self,
        scores: &[ScoreAxis],
        metrics: Option<&ActivityMetrics>,
    ) -> String {
        let metrics = metrics.copied().unwrap_or_default();
        let mut analysis = String::new();

        analysis.push_str(self.opening(metrics.total_interactions()));

        if score_of(scores, Axis::AcademicExchange)
            .is_some_and(|v| v > self.policy.academic_highlight_threshold)
        {
            analysis.push_str("您的【学术交流】指数表现优异，显示出强烈的分享意愿。");
        }

        analysis.push_str(if metrics.post_count == 0 {
            "建议您尝试发布第一篇学术帖子，展示您的研究成果，这将显著提升您的【行业影响】指数。"
        } else if metrics.comment_count == 0 {
            "多参与他人帖子的讨论，可以进一步提升您的【学术交流】评分。"
        } else {
            "请继续保持活跃，您的贡献正在帮助构建更繁荣的学术社区。"
        });

        analysis
    }

    fn opening(&self, interactions: u32) -> &'static str {
        if interactions == 0 {
            "您在学术论坛中暂时处于潜水状态。"
        } else if interactions < self.policy.active_interaction_threshold {
            "您在学术论坛中初露头角，开始参与讨论。"
        } else {
            "您是学术论坛的活跃贡献者，积极分享观点。"
        }
    }
}

/// The first `n` tags with category prefixes stripped.
pub fn top_tags(tags: &[Tag], n: usize) -> Vec<&str> {
    tags.iter().take(n).map(Tag::label).collect()
}

/// Seniority adjective, read from tenure tags in priority order.
pub fn seniority(tags: &[Tag]) -> &'static str {
    if has_tag(tags, labels::FOUNDING_MEMBER) {
        "资深元老级"
    } else if has_tag(tags, labels::SENIOR_MEMBER) {
        "经验丰富的"
    } else if has_tag(tags, labels::NEW_MEMBER) {
        "充满活力的"
    } else {
        "专业的"
    }
}

pub fn activity_level(tags: &[Tag]) -> &'static str {
    if has_tag(tags, labels::ACTIVE_MEMBER) {
        "学会的活跃中坚"
    } else {
        "学会的一员"
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
