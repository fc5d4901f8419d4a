//! Gold Hook entry point
//!
//! Runs seeded autoplay sessions headlessly and prints a JSON summary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use gold_hook::Settings;
use gold_hook::autoplay::IntelligenceTier;
use gold_hook::engine::Game;
use gold_hook::headless::{FRAME_MS, HeadlessDriver};

#[derive(Parser, Debug)]
#[command(name = "gold-hook")]
#[command(about = "Headless hook targeting and autoplay runner")]
struct Cli {
    /// Settings file (JSON); built-in defaults when omitted
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play levels with autoplay and print a summary
    Play {
        #[arg(long)]
        seed: Option<u64>,
        /// First level (0-based)
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// How many levels to play at most
        #[arg(long, default_value_t = 5)]
        levels: usize,
        #[arg(long, value_enum)]
        tier: Option<CliTier>,
        #[arg(long)]
        risk: Option<f32>,
        /// Keep going past the last configured level
        #[arg(long, default_value_t = false)]
        endless: bool,
        #[arg(long, default_value_t = FRAME_MS)]
        frame_ms: f32,
        /// Write the summary here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective settings as JSON
    Settings,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliTier {
    Basic,
    Advanced,
    Expert,
}

impl From<CliTier> for IntelligenceTier {
    fn from(value: CliTier) -> Self {
        match value {
            CliTier::Basic => IntelligenceTier::Basic,
            CliTier::Advanced => IntelligenceTier::Advanced,
            CliTier::Expert => IntelligenceTier::Expert,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let Cli { settings, command } = Cli::parse();
    let mut settings = match settings {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match command {
        Commands::Play {
            seed,
            start,
            levels,
            tier,
            risk,
            endless,
            frame_ms,
            output,
        } => {
            if levels == 0 {
                bail!("--levels must be at least 1");
            }
            if let Some(risk) = risk {
                if !(0.0..=1.0).contains(&risk) {
                    bail!("--risk must be within 0.0..=1.0, got {risk}");
                }
                settings.autoplay.risk_tolerance = risk;
            }
            if let Some(tier) = tier {
                settings.autoplay.tier = tier.into();
            }
            if seed.is_some() {
                settings.seed = seed;
            }
            settings.endless |= endless;
            settings.autoplay.enabled = true;

            let mut game = Game::new(&settings);
            let summary = HeadlessDriver::new(frame_ms).play(&mut game, start, levels);
            log::info!(
                "Finished level {} with {} ({:?})",
                summary.level + 1,
                summary.score,
                summary.status
            );

            let encoded = serde_json::to_string_pretty(&summary)?;
            match output {
                Some(path) => {
                    fs::write(&path, encoded)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("wrote={}", path.display());
                }
                None => println!("{encoded}"),
            }
        }
        Commands::Settings => {
            println!("{}", settings.to_json()?);
        }
    }
    Ok(())
}
