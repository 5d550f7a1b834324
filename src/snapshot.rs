//! Member snapshot input
//!
//! A snapshot is the already-fetched data for one member, as JSON:
//!
//! ```json
//! {
//!   "profile": { "id": "m-1", "name": "张三", "professional_field": "自动化" },
//!   "activities": [{ "activity_type": "学术年会" }],
//!   "metrics": { "post_count": 2, "comment_count": 3 }
//! }
//! ```
//!
//! Every key is optional at the decoding level. A missing or null profile
//! is rejected later, when the persona is assembled.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::persona::{ActivityMetrics, ActivityRecord, MemberProfile};

/// Path value that selects standard input
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberSnapshot {
    pub profile: Option<MemberProfile>,
    pub activities: Option<Vec<ActivityRecord>>,
    pub metrics: Option<ActivityMetrics>,
}

impl MemberSnapshot {
    /// Decode a snapshot from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a snapshot from a file, or from stdin when `path` is `-`
    pub fn load(path: &str) -> Result<Self> {
        let content = if path == STDIN_PATH {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::IoRead {
                    path: PathBuf::from("<stdin>"),
                    source: e,
                })?;
            buf
        } else {
            let path = Path::new(path);
            fs::read_to_string(path).map_err(|e| Error::IoRead {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        let snapshot = Self::from_json(&content)?;
        debug!(
            source = path,
            has_profile = snapshot.profile.is_some(),
            activities = snapshot.activities.as_ref().map_or(0, Vec::len),
            "Member snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn profile(&self) -> Option<&MemberProfile> {
        self.profile.as_ref()
    }

    pub fn activities(&self) -> Option<&[ActivityRecord]> {
        self.activities.as_deref()
    }

    pub fn metrics(&self) -> Option<&ActivityMetrics> {
        self.metrics.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_snapshot() {
        let snapshot = MemberSnapshot::from_json(
            r#"{
                "profile": {"id": "m-1", "name": "张三", "professionalField": "自动化", "isStudent": true},
                "activities": [{"activityType": "学术年会"}, {}],
                "metrics": {"postCount": 2, "commentCount": 3}
            }"#,
        )
        .unwrap();

        let profile = snapshot.profile().unwrap();
        assert_eq!(profile.id, "m-1");
        assert!(profile.is_student);
        assert_eq!(snapshot.activities().unwrap().len(), 2);
        assert_eq!(snapshot.activities().unwrap()[1].type_label(), "unknown");
        assert_eq!(snapshot.metrics().unwrap().total_interactions(), 5);
    }

    #[test]
    fn test_empty_object() {
        let snapshot = MemberSnapshot::from_json("{}").unwrap();
        assert!(snapshot.profile().is_none());
        assert!(snapshot.activities().is_none());
        assert!(snapshot.metrics().is_none());
    }

    #[test]
    fn test_null_sections() {
        let snapshot =
            MemberSnapshot::from_json(r#"{"profile": null, "activities": null, "metrics": null}"#)
                .unwrap();
        assert_eq!(snapshot, MemberSnapshot::default());
    }

    #[test]
    fn test_epoch_millis_created_at() {
        let snapshot =
            MemberSnapshot::from_json(r#"{"profile": {"id": "x", "created_at": 1420070400000}}"#)
                .unwrap();
        let profile = snapshot.profile().unwrap();
        assert_eq!(
            profile.effective_join_date(),
            chrono::NaiveDate::from_ymd_opt(2015, 1, 1)
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = MemberSnapshot::from_json("{\"profile\": ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InputMalformed);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"profile": {{"id": "f-1"}}}}"#).unwrap();

        let snapshot = MemberSnapshot::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(snapshot.profile().unwrap().id, "f-1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = MemberSnapshot::load("/nonexistent/member.json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::IoRead);
        assert_eq!(err.exit_code(), 20);
    }
}
