#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans a room described by a TOML file.

mod plan_transfer;
mod room_file;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use room_planner_rendering::{Presentation, RenderingBackend, TextBackend};
use room_planner_system_layout::Planner;

#[derive(Debug, Parser)]
#[command(name = "room-planner", version, about = "One-shot room layout planner")]
struct Cli {
    /// Raises log verbosity; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plans the room and prints the result.
    Plan {
        /// Room file to plan.
        room: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
        format: OutputFormat,
        /// Overrides the number of extensions to place.
        #[arg(long)]
        extensions: Option<usize>,
    },
    /// Decodes a transfer string and prints the plan as JSON.
    Decode {
        /// String produced by `plan --format transfer`.
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Character overview of the room.
    Ascii,
    /// Overview followed by every debug label.
    Labels,
    /// Pretty-printed plan document.
    Json,
    /// Single-line `plan:v1:` transfer string.
    Transfer,
}

/// Entry point for the room planner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Plan {
            room,
            format,
            extensions,
        } => plan_room(room, format, extensions),
        Command::Decode { value } => {
            let plan = plan_transfer::decode(&value).context("failed to decode plan")?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn plan_room(path: PathBuf, format: OutputFormat, extensions: Option<usize>) -> Result<()> {
    let room = room_file::load(&path)?;
    let mut config = room.config;
    if let Some(target) = extensions {
        config.extension_target = target;
    }
    log::info!(
        "planning {} from {} with {} extensions",
        room.name,
        path.display(),
        config.extension_target
    );

    let outcome = Planner::new(config)
        .plan(&room.snapshot)
        .with_context(|| format!("failed to plan room {}", room.name))?;
    for issue in &outcome.issues {
        eprintln!("[room-planner] {}: {issue}", room.name);
    }

    match format {
        OutputFormat::Ascii | OutputFormat::Labels => {
            let presentation = Presentation::of_plan(room.name.as_str(), &room.snapshot, &outcome.plan)
                .context("failed to build presentation")?;
            let mut backend = TextBackend::new(io::stdout().lock());
            if format == OutputFormat::Labels {
                backend = backend.with_labels();
            }
            backend.present(&presentation)?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Transfer => {
            println!(
                "{}",
                plan_transfer::encode(&outcome.plan).context("failed to encode plan")?
            );
        }
    }
    Ok(())
}
