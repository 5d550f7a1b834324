//! Embeds the values printed by `member-persona version` as
//! `MEMBER_PERSONA_*` compile-time env vars.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let dirty = run("git", &["status", "--porcelain"]).map(|out| (!out.is_empty()).to_string());

    let values = [
        ("GIT_HASH", run("git", &["rev-parse", "--short=8", "HEAD"])),
        ("GIT_BRANCH", run("git", &["rev-parse", "--abbrev-ref", "HEAD"])),
        ("GIT_DIRTY", dirty),
        (
            "BUILD_TIMESTAMP",
            Some(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
        ("TARGET", env::var("TARGET").ok()),
        ("PROFILE", env::var("PROFILE").ok()),
        ("RUSTC_VERSION", run(&rustc, &["--version"])),
    ];

    for (key, value) in values {
        let value = value.as_deref().unwrap_or("unknown");
        println!("cargo:rustc-env=MEMBER_PERSONA_{key}={value}");
    }
}

/// Trimmed stdout of a successful command.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok().map(|s| s.trim().to_string())
}
