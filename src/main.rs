//! member-persona - Digital personas for association members
//!
//! Main entry point for the member-persona binary.

mod cli;

use chrono::{Datelike, Utc};
use clap::Parser;
use tracing::{error, info};

use member_persona::config::{self, AppConfig};
use member_persona::error::{Error, Result};
use member_persona::logging;
use member_persona::persona::{Persona, PersonaAssembler, RandomSource, SeededRandom, ThreadRandom};
use member_persona::snapshot::MemberSnapshot;
use member_persona::version;

use crate::cli::{Cli, Commands, ConfigSubcommand, OutputFormat};

/// Characters of the member id shown in the text report header
const SHORT_ID_LEN: usize = 8;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            version::print_version();
            Ok(())
        }
        Commands::Config { subcommand } => {
            // Config commands use minimal logging
            logging::init_simple(tracing::Level::WARN)?;
            handle_config_command(subcommand)
        }
        Commands::Generate {
            input,
            config,
            seed,
            year,
            format,
        } => {
            let config = AppConfig::load(config.as_deref())?;

            // The guards must be kept alive until output is flushed
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

            let build = version::build_info();
            info!(version = %build.full_version(), "Starting member-persona");

            handle_generate(config, &input, seed, year, format).map_err(|e| {
                error!("{}", e.format_for_log());
                e
            })
        }
    }
}

/// Build one persona from a snapshot and print it
fn handle_generate(
    config: AppConfig,
    input: &str,
    seed: Option<u64>,
    year: Option<i32>,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = MemberSnapshot::load(input)?;
    let assembler = PersonaAssembler::new(config.engine);

    let current_year = year.unwrap_or_else(|| Utc::now().year());
    let mut seeded;
    let mut thread = ThreadRandom;
    let rng: &mut dyn RandomSource = match seed {
        Some(seed) => {
            seeded = SeededRandom::new(seed);
            &mut seeded
        }
        None => &mut thread,
    };

    let persona = assembler.build_persona_with(
        snapshot.profile(),
        snapshot.activities(),
        snapshot.metrics(),
        current_year,
        rng,
    )?;

    info!(
        tags = persona.tags.len(),
        year = current_year,
        seeded = seed.is_some(),
        "Persona generated"
    );

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&persona)
                .map_err(|e| Error::Internal(format!("Failed to encode persona: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            // build_persona_with has already rejected a missing profile
            let (name, id) = snapshot
                .profile()
                .map(|p| (p.display_name().unwrap_or("会员"), p.id.as_str()))
                .unwrap_or(("会员", ""));
            print!("{}", render_text(name, id, &persona));
        }
    }

    Ok(())
}

/// Plain-text persona report
fn render_text(name: &str, id: &str, persona: &Persona) -> String {
    let short_id: String = id.chars().take(SHORT_ID_LEN).collect();
    let tags: Vec<&str> = persona.tags.iter().map(|t| t.as_str()).collect();

    let mut out = format!("{} 的数字分身 (ID: {})\n\n", name, short_id);
    out.push_str(&format!("{}\n\n", persona.introduction));
    out.push_str(&format!("标签: {}\n\n", tags.join(" ")));
    out.push_str("能力评估:\n");
    for score in &persona.scores {
        out.push_str(&format!("  {}  {:>3}\n", score.name, score.value));
    }
    out.push_str(&format!("\n{}\n", persona.analysis));
    out
}

/// Handle config subcommands
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = AppConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration written to {}", written.display());
        }
        ConfigSubcommand::Validate { config } => {
            AppConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
