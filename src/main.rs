//! Paddle Pong entry point
//!
//! Handles setup (logging, settings, platform, assets), runs the game loop and
//! prints the final score once the terminal has been restored.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use paddle_pong::assets::{AssetManifest, Assets};
use paddle_pong::clock::FrameClock;
use paddle_pong::platform::headless::HeadlessPlatform;
use paddle_pong::platform::terminal::TerminalPlatform;
use paddle_pong::sim::Scoreboard;
use paddle_pong::{Game, Settings};

/// Two-player Pong in the terminal. Player 1: Up/Down, player 2: W/S, quit: Esc or q.
#[derive(Debug, Parser)]
#[command(name = "paddle-pong", version, about)]
struct Args {
    /// Settings file (JSON); defaults are used if it does not exist
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Write the effective settings back to --settings before starting
    #[arg(long, requires = "settings")]
    save_settings: bool,

    /// Seed for serve directions (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Silence all sound effects
    #[arg(long)]
    mute: bool,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Run this many frames without a terminal or frame pacing, then print the score as JSON
    #[arg(long, value_name = "FRAMES", value_parser = clap::value_parser!(u64).range(1..))]
    headless: Option<u64>,
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    // Log lines on stderr would tear through the game screen
    let default_filter = if log_file.is_some() || headless { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.mute {
        settings.muted = true;
    }
    if args.save_settings {
        if let Some(path) = &args.settings {
            settings.save(path)?;
        }
    }
    Ok(settings)
}

fn run_terminal(seed: u64, settings: &Settings) -> Result<Scoreboard> {
    let mut platform =
        TerminalPlatform::open(settings.terminal_bell).context("failed to set up the terminal")?;
    let assets =
        Assets::load(&mut platform, &AssetManifest::default()).context("failed to load assets")?;

    let mut game = Game::new(seed, assets, settings);
    game.run(&mut platform).context("game loop failed")?;
    Ok(game.state().scoreboard)
}

fn run_headless(seed: u64, settings: &Settings, frames: u64) -> Result<Scoreboard> {
    let mut platform = HeadlessPlatform::new().quit_after(frames);
    let assets =
        Assets::load(&mut platform, &AssetManifest::default()).context("failed to load assets")?;

    let mut game = Game::new(seed, assets, settings).with_clock(FrameClock::unpaced());
    game.run(&mut platform).context("game loop failed")?;
    Ok(game.state().scoreboard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref(), args.headless.is_some())?;
    log::info!("Paddle Pong starting...");

    let settings = load_settings(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);

    match args.headless {
        Some(frames) => {
            let score = run_headless(seed, &settings, frames)?;
            println!("{}", serde_json::to_string(&score)?);
        }
        None => {
            // The terminal is restored by the time run_terminal returns
            let score = run_terminal(seed, &settings)?;
            println!(
                "Final score: player 1 {} - player 2 {}",
                score.player1, score.player2
            );
        }
    }
    Ok(())
}
