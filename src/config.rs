//! Configuration system for member-persona
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (MEMBER_PERSONA_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::persona::PersonaPolicy;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "MEMBER_PERSONA_";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persona rule thresholds and weights
    pub engine: PersonaPolicy,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of daily log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match Self::find_config_file(config_path)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without applying overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = toml::from_str(&content)
            .map_err(|e| Error::config_parse(format!("{}", path.display()), e))?;
        info!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // An explicit path must exist
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(Error::config_not_found(path))
            };
        }

        let search_paths = default_search_paths();
        for path in &search_paths {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    ///
    /// Covers the scalar engine knobs and the logging settings. List values
    /// such as `senior_levels` are file-only. Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        let tags = &mut self.engine.tags;
        override_from_env(&mut tags.active_member_threshold, "ACTIVE_MEMBER_THRESHOLD");
        override_from_env(&mut tags.rising_talent_probability, "RISING_TALENT_PROBABILITY");
        override_from_env(&mut tags.founding_member_years, "FOUNDING_MEMBER_YEARS");
        override_from_env(&mut tags.senior_member_years, "SENIOR_MEMBER_YEARS");
        override_from_env(&mut tags.new_member_years, "NEW_MEMBER_YEARS");
        override_from_env(&mut tags.default_join_date, "DEFAULT_JOIN_DATE");

        let scores = &mut self.engine.scores;
        override_from_env(&mut scores.base, "SCORE_BASE");
        override_from_env(&mut scores.admin_bonus, "ADMIN_BONUS");
        override_from_env(&mut scores.senior_level_bonus, "SENIOR_LEVEL_BONUS");
        override_from_env(&mut scores.student_penalty, "STUDENT_PENALTY");
        override_from_env(&mut scores.student_practice_bonus, "STUDENT_PRACTICE_BONUS");
        override_from_env(&mut scores.jitter_range, "JITTER_RANGE");
        override_from_env(&mut scores.academic_base, "ACADEMIC_BASE");
        override_from_env(&mut scores.academic_per_post, "ACADEMIC_PER_POST");
        override_from_env(&mut scores.academic_per_comment, "ACADEMIC_PER_COMMENT");
        override_from_env(&mut scores.influence_per_post, "INFLUENCE_PER_POST");
        override_from_env(&mut scores.social_ceiling, "SOCIAL_CEILING");

        let narrative = &mut self.engine.narrative;
        override_from_env(&mut narrative.top_tag_count, "TOP_TAG_COUNT");
        override_from_env(
            &mut narrative.active_interaction_threshold,
            "ACTIVE_INTERACTION_THRESHOLD",
        );
        override_from_env(
            &mut narrative.academic_highlight_threshold,
            "ACADEMIC_HIGHLIGHT_THRESHOLD",
        );

        if let Some(val) = env_var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = env_var("LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = env_var("LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
        override_from_env(&mut self.logging.max_files, "LOG_MAX_FILES");
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.logging.max_files == 0 {
            return Err(Error::config_field_invalid(
                "logging.max_files",
                "must keep at least one file",
            ));
        }

        Ok(())
    }
}

/// Standard config file locations, searched in order
fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("member-persona.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("member-persona").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".member-persona").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/member-persona/config.toml"));
    paths
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, name)).ok()
}

fn override_from_env<T: std::str::FromStr>(target: &mut T, name: &str) {
    if let Some(value) = env_var(name).and_then(|v| v.trim().parse().ok()) {
        *target = value;
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".member-persona")
                .join("config.toml")
        });

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# member-persona configuration

[engine.tags]
# More than this many activities earns the "活跃分子" tag
active_member_threshold = 5

# Probability of the "潜力新人" tag when no activity data exists
rising_talent_probability = 0.5

# Tenure thresholds in years
founding_member_years = 10
senior_member_years = 5
new_member_years = 1

# Join date assumed when a profile has neither join nor creation date
default_join_date = "2023-01-01"

[engine.scores]
base = 60
admin_bonus = 20
senior_level_bonus = 15
student_penalty = 5
student_practice_bonus = 10

# Jitter is drawn uniformly from 0..jitter_range
jitter_range = 15

# Member level labels counted as the senior tier
senior_levels = ["senior", "高级会员"]

# Academic exchange = academic_base + per_post * posts + per_comment * comments
academic_base = 60
academic_per_post = 5
academic_per_comment = 2

# Industry influence = base + influence_per_post * posts
influence_per_post = 3

# Ceiling for the two engagement-driven axes
social_ceiling = 95

[engine.narrative]
# Leading tags quoted in the introduction
top_tag_count = 3

# Interactions at or above this count read as an active contributor
active_interaction_threshold = 5

# Academic exchange above this value earns the highlight sentence
academic_highlight_threshold = 80

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.member-persona/logs/persona.log"

# Number of daily log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.engine.scores.base, 60);
        assert_eq!(config.engine.tags.rising_talent_probability, 0.5);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_env_override() {
        env::set_var("MEMBER_PERSONA_JITTER_RANGE", "3");
        env::set_var("MEMBER_PERSONA_RISING_TALENT_PROBABILITY", "0.25");
        env::set_var("MEMBER_PERSONA_LOG_LEVEL", "debug");

        let mut config = AppConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.engine.scores.jitter_range, 3);
        assert_eq!(config.engine.tags.rising_talent_probability, 0.25);
        assert_eq!(config.logging.level, "debug");

        env::remove_var("MEMBER_PERSONA_JITTER_RANGE");
        env::remove_var("MEMBER_PERSONA_RISING_TALENT_PROBABILITY");
        env::remove_var("MEMBER_PERSONA_LOG_LEVEL");
    }

    #[test]
    fn test_env_override_tenure_and_ceiling() {
        env::set_var("MEMBER_PERSONA_FOUNDING_MEMBER_YEARS", "12");
        env::set_var("MEMBER_PERSONA_NEW_MEMBER_YEARS", "2");
        env::set_var("MEMBER_PERSONA_DEFAULT_JOIN_DATE", "2019-07-01");
        env::set_var("MEMBER_PERSONA_SOCIAL_CEILING", "90");
        env::set_var("MEMBER_PERSONA_TOP_TAG_COUNT", "5");

        let mut config = AppConfig::default();
        config.apply_env_overrides();

        assert_eq!(config.engine.tags.founding_member_years, 12);
        assert_eq!(config.engine.tags.senior_member_years, 5);
        assert_eq!(config.engine.tags.new_member_years, 2);
        assert_eq!(
            config.engine.tags.default_join_date,
            chrono::NaiveDate::from_ymd_opt(2019, 7, 1).unwrap()
        );
        assert_eq!(config.engine.scores.social_ceiling, 90);
        assert_eq!(config.engine.narrative.top_tag_count, 5);

        for key in [
            "FOUNDING_MEMBER_YEARS",
            "NEW_MEMBER_YEARS",
            "DEFAULT_JOIN_DATE",
            "SOCIAL_CEILING",
            "TOP_TAG_COUNT",
        ] {
            env::remove_var(format!("MEMBER_PERSONA_{}", key));
        }
    }

    #[test]
    fn test_env_score_base_is_bounded() {
        env::set_var("MEMBER_PERSONA_SCORE_BASE", "9223372036854775807");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        env::remove_var("MEMBER_PERSONA_SCORE_BASE");

        assert_eq!(config.engine.scores.base, i64::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_files_rejected() {
        let mut config = AppConfig::default();
        config.logging.max_files = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_env_value_ignored() {
        env::set_var("MEMBER_PERSONA_ACTIVE_MEMBER_THRESHOLD", "many");
        let mut config = AppConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.engine.tags.active_member_threshold, 5);
        env::remove_var("MEMBER_PERSONA_ACTIVE_MEMBER_THRESHOLD");
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_engine() {
        let mut config = AppConfig::default();
        config.engine.scores.social_ceiling = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_generated_default_matches_defaults() {
        let parsed: AppConfig = toml::from_str(&generate_default_config()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(parsed.engine, defaults.engine);
        assert_eq!(parsed.logging.level, defaults.logging.level);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.engine, config.engine);
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = AppConfig::load(Some("/nonexistent/member-persona.toml")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_init_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        let written = init_config(Some(path_str), false).unwrap();
        assert_eq!(written, path);
        assert!(init_config(Some(path_str), false).is_err());
        assert!(init_config(Some(path_str), true).is_ok());

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.engine.narrative.top_tag_count, 3);
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[engine.tags]
rising_talent_probability = 0.0

[engine.scores]
base = 50
senior_levels = ["gold"]

[logging]
level = "debug"
"#;

        let config: AppConfig = toml::from_str(config_str).unwrap();

        assert_eq!(config.engine.tags.rising_talent_probability, 0.0);
        assert_eq!(config.engine.tags.founding_member_years, 10);
        assert_eq!(config.engine.scores.base, 50);
        assert!(config.engine.scores.is_senior_level("gold"));
        assert!(!config.engine.scores.is_senior_level("高级会员"));
        assert_eq!(config.logging.level, "debug");
    }
}
