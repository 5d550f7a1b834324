//! Common test utilities and fixtures
//!
//! Shared by the integration test binaries; not every binary uses every helper.
#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Fixture path as a CLI argument
pub fn fixture_arg(name: &str) -> String {
    fixture_path(name).to_string_lossy().into_owned()
}

/// Read a fixture file into a string
pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Get a command for the member-persona binary, isolated from the
/// caller's environment overrides
pub fn persona_cmd() -> Command {
    let mut cmd = Command::cargo_bin("member-persona").unwrap();
    for (key, _) in std::env::vars() {
        if key.starts_with("MEMBER_PERSONA_") {
            cmd.env_remove(key);
        }
    }
    cmd.env_remove("RUST_LOG");
    cmd
}
