//! Subcommand bodies, kept free of argument parsing so they can be tested
//! against an in-memory writer.

use std::io::Write;

use color_eyre::eyre::WrapErr;
use payday_core::autoplay::Autopilot;
use payday_core::{AutoplayOptions, Game, GameConfig, GameSummary, simulate_games};

use crate::report::{
    BatchReport, format_batch, format_endgame, format_notices, format_round_log,
    format_status_line,
};
use crate::settings::config_to_yaml;

/// Play one seeded game with the autopilot, narrating each round.
///
/// With `json` set only the final [`GameSummary`] is written.
pub fn run_play(
    config: GameConfig,
    options: &AutoplayOptions,
    seed: u64,
    json: bool,
    out: &mut dyn Write,
) -> color_eyre::Result<GameSummary> {
    let mut game = Game::new(config, &options.difficulty, &options.housing, seed)?;
    let pilot = Autopilot::new(options.strategy, options.max_round);
    tracing::info!(
        seed,
        strategy = %options.strategy,
        difficulty = %options.difficulty,
        housing = %options.housing,
        "autopilot taking the wheel"
    );

    if !json {
        writeln!(out, "{}", format_status_line(&game.snapshot()))?;
    }

    let mut last_logged_round = None;
    while !game.is_over() {
        if let Some(decision) = game.pending_decision().cloned() {
            if !json {
                writeln!(out, "? {}", decision.prompt())?;
            }
            pilot
                .decide(&mut game, &decision)
                .wrap_err("autopilot could not answer a prompt")?;
        } else if game.round() > options.max_round {
            break;
        } else {
            pilot.play_turn(&mut game);
            game.advance_round()?;
        }

        let notices = game.take_notices();
        if json {
            continue;
        }
        if let Some(log) = &game.state().last_log {
            if last_logged_round != Some(log.round) {
                last_logged_round = Some(log.round);
                write!(out, "{}", format_round_log(log))?;
            }
        }
        write!(out, "{}", format_notices(&notices))?;
        if !game.is_over() && game.pending_decision().is_none() {
            writeln!(out, "{}", format_status_line(&game.snapshot()))?;
        }
    }

    let summary = GameSummary {
        seed,
        strategy: options.strategy,
        status: game.state().status(),
        endgame: game.endgame_summary(),
    };
    tracing::info!(
        seed,
        round = summary.endgame.round,
        net_worth = summary.endgame.net_worth,
        "game finished"
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_endgame(&summary.status, &summary.endgame))?;
    }
    Ok(summary)
}

/// Play `games` seeded games and print the aggregate.
pub fn run_batch(
    config: &GameConfig,
    options: &AutoplayOptions,
    games: usize,
    base_seed: u64,
    json: bool,
    out: &mut dyn Write,
) -> color_eyre::Result<()> {
    let (summary, results) = simulate_games(config, options, games, base_seed)?;

    if json {
        let report = BatchReport {
            summary: &summary,
            games: &results,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", format_batch(&summary))?;
    }
    Ok(())
}

/// Print the effective config as YAML.
pub fn run_config(config: &GameConfig, out: &mut dyn Write) -> color_eyre::Result<()> {
    write!(out, "{}", config_to_yaml(config)?)?;
    Ok(())
}
