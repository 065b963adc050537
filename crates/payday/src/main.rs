use std::io;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use payday::{default_data_dir, init_logging, load_config, run_batch, run_config, run_play};
use payday_core::{AutoplayOptions, Strategy};

#[derive(Parser, Debug)]
#[command(name = "payday")]
#[command(about = "A round-based personal finance game, played by an autopilot")]
struct Args {
    /// Path to a YAML game config (default: ~/.payday/config.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to `payday.log` in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game and narrate every round
    Play {
        #[command(flatten)]
        game: GameArgs,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Print only the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play many seeded games and summarize them
    Batch {
        #[command(flatten)]
        game: GameArgs,

        #[arg(short = 'n', long, default_value_t = 100)]
        games: usize,

        /// Seed of the first game; the rest count up from it
        #[arg(long, default_value_t = 0)]
        base_seed: u64,

        #[arg(long)]
        json: bool,
    },
    /// Print the effective config as YAML
    Config,
}

#[derive(ClapArgs, Debug)]
struct GameArgs {
    /// frugal, balanced or spender
    #[arg(short, long, default_value = "balanced", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Difficulty id from the config (easy, med, hard)
    #[arg(short, long, default_value = "med")]
    difficulty: String,

    /// Housing id from the config (shared, apt, lux)
    #[arg(long, default_value = "apt")]
    housing: String,

    /// Stop after this round even if the game is still running
    #[arg(long, default_value_t = 27)]
    max_round: u32,
}

impl GameArgs {
    fn into_options(self) -> AutoplayOptions {
        AutoplayOptions {
            strategy: self.strategy,
            difficulty: self.difficulty,
            housing: self.housing,
            max_round: self.max_round,
        }
    }
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_dir.as_deref(), &args.log_level)?;

    let config = load_config(args.config.as_deref(), &default_data_dir())?;
    let mut out = io::stdout().lock();

    match args.command {
        Command::Play { game, seed, json } => {
            run_play(config, &game.into_options(), seed, json, &mut out)?;
        }
        Command::Batch {
            game,
            games,
            base_seed,
            json,
        } => {
            run_batch(&config, &game.into_options(), games, base_seed, json, &mut out)?;
        }
        Command::Config => run_config(&config, &mut out)?,
    }

    tracing::debug!("payday exiting");
    Ok(())
}
