//! Core types for the persona engine.
//!
//! Inputs (`MemberProfile`, `ActivityRecord`, `ActivityMetrics`) are owned by
//! the caller and only ever borrowed. The output (`Persona`) is built fresh
//! per call and handed back by value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────
// Member Role
// ─────────────────────────────────────────────────────────────────

/// Account role of a member. Anything that is not `admin` reads as a
/// regular member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberRole {
    #[default]
    Member,
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Admin => "admin",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("admin") {
            Ok(MemberRole::Admin)
        } else {
            Ok(MemberRole::Member)
        }
    }
}

impl From<String> for MemberRole {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(role) => role,
            Err(never) => match never {},
        }
    }
}

impl From<MemberRole> for String {
    fn from(role: MemberRole) -> Self {
        role.as_str().to_string()
    }
}

// ─────────────────────────────────────────────────────────────────
// Member Profile
// ─────────────────────────────────────────────────────────────────

/// A member's profile as resolved by the data service.
///
/// Every field except `id` is optional; a missing field only suppresses
/// the tags and score adjustments that depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberProfile {
    /// Opaque identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "role_or_member")]
    pub role: MemberRole,

    /// Free-form membership tier label, e.g. "高级会员"
    #[serde(default, alias = "memberLevel", skip_serializing_if = "Option::is_none")]
    pub member_level: Option<String>,

    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Affiliated unit
    #[serde(default, alias = "unit", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Comma-separated field names, e.g. "自动化,机器人"
    #[serde(default, alias = "professionalField", skip_serializing_if = "Option::is_none")]
    pub professional_field: Option<String>,

    #[serde(default, alias = "isStudent")]
    pub is_student: bool,

    #[serde(
        default,
        alias = "joinDate",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub join_date: Option<NaiveDate>,

    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDate>,
}

impl MemberProfile {
    /// Create a profile with only an identifier set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    /// `join_date` if present, else `created_at`.
    pub fn effective_join_date(&self) -> Option<NaiveDate> {
        self.join_date.or(self.created_at)
    }

    /// Display name, ignoring blank values.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn position(&self) -> Option<&str> {
        non_blank(self.position.as_deref())
    }

    pub fn organization(&self) -> Option<&str> {
        non_blank(self.organization.as_deref())
    }

    pub fn member_level(&self) -> Option<&str> {
        non_blank(self.member_level.as_deref())
    }

    /// Trimmed, non-empty professional field segments in input order.
    pub fn professional_fields(&self) -> Vec<&str> {
        self.professional_field
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse the timestamp shapes the data service hands out. Only the calendar
/// date is kept.
///
/// Accepted: RFC 3339, RFC 2822, `YYYY-MM-DD` and `YYYY/MM/DD`, each of the
/// last two optionally followed by a time (`T` or space separated, with
/// optional fractional seconds). Anything else is `None`.
pub fn parse_member_date(raw: &str) -> Option<NaiveDate> {
    const DATE_TIMES: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%dT%H:%M:%S%.f",
    ];
    const DATES: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    DATE_TIMES
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| DATES.iter().find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok()))
}

/// Timestamps arrive as strings or as epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Millis(i64),
    Other(serde::de::IgnoredAny),
}

impl RawDate {
    fn into_date(self) -> Option<NaiveDate> {
        match self {
            RawDate::Text(text) => parse_member_date(&text),
            RawDate::Millis(ms) => DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive()),
            RawDate::Other(_) => None,
        }
    }
}

/// A null or missing role is a regular member.
fn role_or_member<'de, D>(deserializer: D) -> Result<MemberRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(MemberRole::from).unwrap_or_default())
}

/// Unparseable timestamps are treated as absent rather than rejected.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDate> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(RawDate::into_date))
}

// ─────────────────────────────────────────────────────────────────
// Activity Data
// ─────────────────────────────────────────────────────────────────

/// One recorded activity. Only the type matters to the engine; other
/// fields in the record are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(default, alias = "activityType", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
}

impl ActivityRecord {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: Some(activity_type.into()),
        }
    }

    /// Category label; untyped records fall into "unknown".
    pub fn type_label(&self) -> &str {
        non_blank(self.activity_type.as_deref()).unwrap_or("unknown")
    }
}

/// Aggregate forum engagement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    #[serde(default, alias = "postCount")]
    pub post_count: u32,

    #[serde(default, alias = "commentCount")]
    pub comment_count: u32,
}

impl ActivityMetrics {
    pub fn new(post_count: u32, comment_count: u32) -> Self {
        Self {
            post_count,
            comment_count,
        }
    }

    pub fn total_interactions(&self) -> u32 {
        self.post_count.saturating_add(self.comment_count)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────

/// Semantic source of a prefixed tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// From the professional field list
    Professional,
    /// From recorded activity types
    Activity,
    /// From the job title
    Position,
}

impl TagCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            TagCategory::Professional => "专业:",
            TagCategory::Activity => "活动:",
            TagCategory::Position => "职务:",
        }
    }

    pub fn all() -> &'static [TagCategory] {
        &[
            TagCategory::Professional,
            TagCategory::Activity,
            TagCategory::Position,
        ]
    }
}

/// Fixed, unprefixed tags.
pub mod labels {
    pub const ACTIVE_MEMBER: &str = "活跃分子";
    pub const RISING_TALENT: &str = "潜力新人";
    pub const FOUNDING_MEMBER: &str = "元老会员";
    pub const SENIOR_MEMBER: &str = "资深会员";
    pub const NEW_MEMBER: &str = "新晋会员";
    pub const ADMINISTRATOR: &str = "系统管理员";
    pub const STUDENT_MEMBER: &str = "学生会员";
}

/// A descriptive label, optionally carrying a category prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// An unprefixed tag.
    pub fn plain(label: impl Into<String>) -> Self {
        Tag(label.into())
    }

    pub fn categorized(category: TagCategory, value: &str) -> Self {
        Tag(format!("{}{}", category.prefix(), value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> Option<TagCategory> {
        TagCategory::all()
            .iter()
            .copied()
            .find(|c| self.0.starts_with(c.prefix()))
    }

    /// The tag text with any category prefix removed.
    pub fn label(&self) -> &str {
        match self.category() {
            Some(c) => &self.0[c.prefix().len()..],
            None => &self.0,
        }
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// True if `tags` holds a tag equal to `label`.
pub fn has_tag(tags: &[Tag], label: &str) -> bool {
    tags.iter().any(|t| t == label)
}

// ─────────────────────────────────────────────────────────────────
// Score Axes
// ─────────────────────────────────────────────────────────────────

/// The five ability axes, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    ResearchDepth,
    PracticalAbility,
    AcademicExchange,
    Innovation,
    IndustryInfluence,
}

impl Axis {
    pub fn all() -> &'static [Axis; 5] {
        &[
            Axis::ResearchDepth,
            Axis::PracticalAbility,
            Axis::AcademicExchange,
            Axis::Innovation,
            Axis::IndustryInfluence,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Axis::ResearchDepth => "研究深度",
            Axis::PracticalAbility => "实践能力",
            Axis::AcademicExchange => "学术交流",
            Axis::Innovation => "创新思维",
            Axis::IndustryInfluence => "行业影响",
        }
    }

    /// Chart color hint for the presentation layer.
    pub fn color(&self) -> &'static str {
        match self {
            Axis::ResearchDepth => "#8884d8",
            Axis::PracticalAbility => "#83a6ed",
            Axis::AcademicExchange => "#8dd1e1",
            Axis::Innovation => "#82ca9d",
            Axis::IndustryInfluence => "#a4de6c",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named, bounded score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAxis {
    pub name: String,
    /// Always within 0..=100
    pub value: u8,
    pub color: String,
}

impl ScoreAxis {
    /// Build an axis entry, clamping `raw` into 0..=100.
    pub fn new(axis: Axis, raw: i64) -> Self {
        Self {
            name: axis.name().to_string(),
            value: raw.clamp(0, 100) as u8,
            color: axis.color().to_string(),
        }
    }

    pub fn is(&self, axis: Axis) -> bool {
        self.name == axis.name()
    }
}

/// Value of `axis` in a score vector, if present.
pub fn score_of(scores: &[ScoreAxis], axis: Axis) -> Option<u8> {
    scores.iter().find(|s| s.is(axis)).map(|s| s.value)
}

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// The assembled description of one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub tags: Vec<Tag>,
    pub introduction: String,
    pub scores: Vec<ScoreAxis>,
    pub analysis: String,
}

impl Persona {
    pub fn score(&self, axis: Axis) -> Option<u8> {
        score_of(&self.scores, axis)
    }

    pub fn has_tag(&self, label: &str) -> bool {
        has_tag(&self.tags, label)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<MemberRole>().unwrap(), MemberRole::Admin);
        assert_eq!("ADMIN".parse::<MemberRole>().unwrap(), MemberRole::Admin);
        assert_eq!("member".parse::<MemberRole>().unwrap(), MemberRole::Member);
        assert_eq!("editor".parse::<MemberRole>().unwrap(), MemberRole::Member);
    }

    #[test]
    fn test_profile_from_snake_case_json() {
        let json = r#"{
            "id": "u-1",
            "name": "张三",
            "role": "admin",
            "member_level": "高级会员",
            "professional_field": "自动化, 机器人",
            "is_student": true,
            "join_date": "2014-05-01T08:00:00+08:00",
            "unit": "自动化研究所"
        }"#;
        let profile: MemberProfile = serde_json::from_str(json).unwrap();

        assert!(profile.is_admin());
        assert!(profile.is_student);
        assert_eq!(profile.member_level(), Some("高级会员"));
        assert_eq!(profile.organization(), Some("自动化研究所"));
        assert_eq!(profile.professional_fields(), vec!["自动化", "机器人"]);
        assert_eq!(
            profile.join_date,
            Some(NaiveDate::from_ymd_opt(2014, 5, 1).unwrap())
        );
    }

    #[test]
    fn test_profile_from_camel_case_json() {
        let json = r#"{
            "id": "u-2",
            "professionalField": "控制",
            "isStudent": true,
            "createdAt": "2020-01-02 03:04:05.123"
        }"#;
        let profile: MemberProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.role, MemberRole::Member);
        assert!(profile.is_student);
        assert_eq!(
            profile.effective_join_date(),
            Some(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let json = r#"{"id": "u-3", "role": null, "join_date": "someday", "created_at": null}"#;
        let profile: MemberProfile = serde_json::from_str(json).unwrap();
        assert!(profile.effective_join_date().is_none());
        assert_eq!(profile.role, MemberRole::Member);
    }

    #[test]
    fn test_epoch_millis_date() {
        let json = r#"{"id": "u-6", "created_at": 1420070400000, "join_date": true}"#;
        let profile: MemberProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.created_at, NaiveDate::from_ymd_opt(2015, 1, 1));
        assert!(profile.join_date.is_none());
    }

    #[test]
    fn test_accepted_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 7, 1);
        for raw in [
            "2019-07-01",
            "2019/07/01",
            "2019-07-01 08:30:00",
            "2019/07/01 08:30:00.250",
            "2019-07-01T08:30:00",
            "2019-07-01T08:30:00.000Z",
            "2019-07-01T08:30:00+08:00",
            "Mon, 01 Jul 2019 08:30:00 +0000",
        ] {
            assert_eq!(parse_member_date(raw), expected, "{raw}");
        }
        assert_eq!(parse_member_date("07/01/2019"), None);
        assert_eq!(parse_member_date("   "), None);
    }

    #[test]
    fn test_join_date_preferred_over_created_at() {
        let mut profile = MemberProfile::new("u-4");
        profile.created_at = NaiveDate::from_ymd_opt(2010, 1, 1);
        profile.join_date = NaiveDate::from_ymd_opt(2018, 1, 1);
        assert_eq!(profile.effective_join_date(), profile.join_date);
    }

    #[test]
    fn test_blank_fields_read_as_absent() {
        let mut profile = MemberProfile::new("u-5");
        profile.name = Some("  ".into());
        profile.professional_field = Some(" , ,".into());
        assert!(profile.display_name().is_none());
        assert!(profile.professional_fields().is_empty());
    }

    #[test]
    fn test_activity_type_label() {
        assert_eq!(ActivityRecord::new("学术年会").type_label(), "学术年会");
        assert_eq!(ActivityRecord::default().type_label(), "unknown");

        let record: ActivityRecord =
            serde_json::from_str(r#"{"activityType": "讲座", "id": 7}"#).unwrap();
        assert_eq!(record.type_label(), "讲座");
    }

    #[test]
    fn test_metrics_defaults_and_aliases() {
        let metrics: ActivityMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(metrics, ActivityMetrics::default());

        let metrics: ActivityMetrics =
            serde_json::from_str(r#"{"postCount": 3, "comment_count": 4}"#).unwrap();
        assert_eq!(metrics.total_interactions(), 7);
    }

    #[test]
    fn test_tag_category_and_label() {
        let tag = Tag::categorized(TagCategory::Professional, "自动化");
        assert_eq!(tag.as_str(), "专业:自动化");
        assert_eq!(tag.category(), Some(TagCategory::Professional));
        assert_eq!(tag.label(), "自动化");

        let plain = Tag::plain(labels::ACTIVE_MEMBER);
        assert_eq!(plain.category(), None);
        assert_eq!(plain.label(), "活跃分子");
    }

    #[test]
    fn test_score_axis_clamps() {
        assert_eq!(ScoreAxis::new(Axis::Innovation, 140).value, 100);
        assert_eq!(ScoreAxis::new(Axis::Innovation, -3).value, 0);
        let axis = ScoreAxis::new(Axis::AcademicExchange, 72);
        assert_eq!(axis.name, "学术交流");
        assert_eq!(axis.color, "#8dd1e1");
    }

    #[test]
    fn test_axis_order() {
        let names: Vec<_> = Axis::all().iter().map(Axis::name).collect();
        assert_eq!(names, vec!["研究深度", "实践能力", "学术交流", "创新思维", "行业影响"]);
    }

    #[test]
    fn test_tag_serializes_as_string() {
        let json = serde_json::to_string(&Tag::plain("学生会员")).unwrap();
        assert_eq!(json, "\"学生会员\"");
    }
}
