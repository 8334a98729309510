mod runner;
mod score_store;
mod screens;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;

use meteors_core::sim::{ExitReason, MemoryScoreStore, SessionConfig};

use runner::{run_session, GunnerPilot, RunMetrics, ScriptPilot};
use score_store::JsonScoreStore;
use screens::{MenuInput, ScreenFlow};

#[derive(Parser)]
#[command(name = "meteors", about = "Headless driver for the meteors gameplay simulation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PilotKind {
    /// Stationary turret bot.
    Gunner,
    /// Replay a recorded input-byte script.
    Script,
}

#[derive(Subcommand)]
enum Command {
    /// Run one seeded session and persist any beaten high scores.
    Run {
        /// Session seed, decimal or 0x-prefixed hex.
        #[arg(long, default_value = "1")]
        seed: String,
        /// Frame cap; 18000 frames is five minutes at 60 FPS.
        #[arg(long, default_value_t = 18_000)]
        frames: u32,
        #[arg(long, value_enum, default_value = "gunner")]
        pilot: PilotKind,
        /// Input-byte script, required by the script pilot.
        #[arg(long)]
        script: Option<PathBuf>,
        #[arg(long, default_value = "meteors_scores.json")]
        score_file: PathBuf,
    },
    /// Run many seeded sessions in parallel and print their metrics.
    Batch {
        #[arg(long, default_value = "1")]
        seed_base: String,
        #[arg(long, default_value_t = 16)]
        runs: u32,
        #[arg(long, default_value_t = 18_000)]
        frames: u32,
    },
    /// Walk the menu flow into a short piloted session.
    Demo {
        #[arg(long, default_value = "1")]
        seed: String,
    },
}

fn parse_seed(text: &str) -> Result<u32> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed '{text}'"))
    } else {
        text.parse()
            .with_context(|| format!("invalid seed '{text}'"))
    }
}

fn print_metrics(metrics: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(metrics)?);
    Ok(())
}

fn cmd_run(
    seed: &str,
    frames: u32,
    pilot: PilotKind,
    script: Option<PathBuf>,
    score_file: PathBuf,
) -> Result<()> {
    let config = SessionConfig::with_seed(parse_seed(seed)?);
    let store = JsonScoreStore::open(&score_file);
    let metrics = match pilot {
        PilotKind::Gunner => run_session(config, store, &mut GunnerPilot, frames),
        PilotKind::Script => {
            let path = script.context("--script is required with the script pilot")?;
            let bytes = fs::read(&path)
                .with_context(|| format!("reading input script {}", path.display()))?;
            run_session(config, store, &mut ScriptPilot::new(bytes), frames)
        }
    };
    log::info!(
        "seed {} finished after {} frames with score {}",
        metrics.seed,
        metrics.frames,
        metrics.final_score
    );
    print_metrics(&metrics)
}

fn cmd_batch(seed_base: &str, runs: u32, frames: u32) -> Result<()> {
    let base = parse_seed(seed_base)?;
    let all: Vec<RunMetrics> = (0..runs)
        .into_par_iter()
        .map(|offset| {
            run_session(
                SessionConfig::with_seed(base.wrapping_add(offset)),
                MemoryScoreStore::new(),
                &mut GunnerPilot,
                frames,
            )
        })
        .collect();

    let best = all.iter().map(|m| m.final_score).max().unwrap_or(0);
    let game_overs = all
        .iter()
        .filter(|m| m.exit == Some(ExitReason::GameOver))
        .count();
    log::info!(
        "{} runs complete: best score {}, {} ended in game over",
        all.len(),
        best,
        game_overs
    );
    print_metrics(&all)
}

fn cmd_demo(seed: &str) -> Result<()> {
    let seed = parse_seed(seed)?;
    let mut flow = ScreenFlow::new();
    log::info!("screen: {:?}", flow.screen());

    // Tour the menus: options (nudge the volume), credits, then play.
    flow.handle(MenuInput::down());
    flow.handle(MenuInput::select());
    log::info!("screen: {:?}", flow.screen());
    flow.handle(MenuInput::right());
    log::info!("volume: {}", flow.volume());
    flow.handle(MenuInput::back());

    flow.handle(MenuInput::down());
    flow.handle(MenuInput::select());
    log::info!("screen: {:?}", flow.screen());
    flow.handle(MenuInput::back());

    flow.handle(MenuInput::up());
    flow.handle(MenuInput::up());
    flow.handle(MenuInput::select());
    log::info!("screen: {:?}", flow.screen());

    // One minute of piloted gameplay.
    let metrics = run_session(
        SessionConfig::with_seed(seed),
        MemoryScoreStore::new(),
        &mut GunnerPilot,
        3_600,
    );
    flow.finish_gameplay(metrics.exit.unwrap_or(ExitReason::Quit));
    log::info!("screen: {:?}", flow.screen());
    print_metrics(&metrics)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            seed,
            frames,
            pilot,
            script,
            score_file,
        } => cmd_run(&seed, frames, pilot, script, score_file),
        Command::Batch {
            seed_base,
            runs,
            frames,
        } => cmd_batch(&seed_base, runs, frames),
        Command::Demo { seed } => cmd_demo(&seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_parse_from_decimal_and_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed("0xDEADBEEF").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed(" 7 ").unwrap(), 7);
        assert!(parse_seed("nope").is_err());
        assert!(parse_seed("0xZZ").is_err());
    }
}
