//! Logging setup.
//!
//! Events go to stderr so stdout only ever carries the persona itself. A log
//! file, when configured, rolls over daily and keeps `max_files` old files.
//! `RUST_LOG` takes precedence over the configured level for other crates.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Flushes the file writer when dropped. Hold it until output is done.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber for a `generate` run.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuard> {
    let level = effective_level(&settings.level, verbose, quiet);

    let mut layers = vec![fmt_layer(io::stderr, settings.json_format, true)];
    let mut file_guard = None;
    if let Some(ref file) = settings.file {
        let (layer, guard) = file_layer(Path::new(file), settings.max_files, settings.json_format)?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(build_filter(level)?)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(%level, file = ?settings.file, "Logging initialized");
    Ok(LogGuard { _file: file_guard })
}

/// Console-only logging for short-lived commands.
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt_layer(io::stderr, false, true))
        .with(build_filter(level)?)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// `-q` wins over `-v`; without flags the configured level applies.
fn effective_level(configured: &str, verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => configured.parse().unwrap_or(Level::WARN),
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_filter(level: Level) -> Result<EnvFilter> {
    let own: Directive = format!("member_persona={}", level.as_str().to_ascii_lowercase())
        .parse()
        .map_err(|e| Error::Config(format!("Invalid log directive: {}", e)))?;

    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
        .add_directive(own))
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi).with_target(true);
    if json {
        Box::new(layer.json())
    } else {
        Box::new(layer.compact())
    }
}

/// `path` names the log file; the appender adds the date to its stem.
fn file_layer(path: &Path, max_files: u32, json: bool) -> Result<(BoxedLayer, WorkerGuard)> {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&directory).map_err(|e| Error::IoWrite {
        path: directory.clone(),
        source: e,
    })?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("member-persona");
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(stem)
        .filename_suffix("log")
        .max_log_files(max_files as usize)
        .build(&directory)
        .map_err(|e| Error::Config(format!("Failed to open log file in {}: {}", directory.display(), e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((fmt_layer(writer, json, false), guard))
}
