//! Plain-text rendering of game progress and results

use std::fmt::Write;

use payday_core::model::{EndgameSummary, RoundLog};
use payday_core::{BatchSummary, GameSnapshot, GameStatus, GameSummary};
use serde::Serialize;

/// Header line for the state after a round opens
pub fn format_status_line(snapshot: &GameSnapshot) -> String {
    format!(
        "Round {:>2} | cash ${} | debt ${} | savings ${} | QoL {} | net worth ${}",
        snapshot.round,
        snapshot.cash,
        snapshot.debt,
        snapshot.savings.total(),
        snapshot.qol,
        snapshot.net_worth
    )
}

pub fn format_round_log(log: &RoundLog) -> String {
    let mut out = format!("Round {} recap:\n", log.round);
    for line in &log.lines {
        let _ = writeln!(out, "  - {line}");
    }
    out
}

pub fn format_notices(notices: &[String]) -> String {
    notices.iter().map(|n| format!("  * {n}\n")).collect()
}

pub fn format_endgame(status: &GameStatus, summary: &EndgameSummary) -> String {
    let headline = match status {
        GameStatus::Victory => "Victory! You made it through the year.".to_string(),
        GameStatus::GameOver { reason } => reason.clone(),
        GameStatus::InProgress | GameStatus::AwaitingDecision { .. } => {
            format!("Stopped at round {}.", summary.round)
        }
    };

    let savings = &summary.savings;
    let mut out = format!("{headline}\n");
    let _ = writeln!(out, "  Net worth:  ${}", summary.net_worth);
    let _ = writeln!(out, "  Liquidity:  ${}", summary.liquidity);
    let _ = writeln!(out, "  Nest egg:   ${}", summary.nest_egg);
    let _ = writeln!(out, "  Debt:       ${}", summary.debt);
    let _ = writeln!(
        out,
        "  Breakdown:  cash ${} | emergency ${} | HYSA ${} | vacation ${} | retirement ${}",
        summary.cash, savings.emergency, savings.hysa, savings.vacation, savings.retirement
    );
    let _ = writeln!(out, "  QoL:        {}", summary.qol);
    let _ = writeln!(out, "  Outlook:    {}", summary.outlook.description());
    out
}

pub fn format_batch(summary: &BatchSummary) -> String {
    let mut out = format!(
        "{} games with the {} strategy\n",
        summary.games, summary.strategy
    );
    let _ = writeln!(
        out,
        "  Victories:  {} | Game overs: {}",
        summary.victories, summary.game_overs
    );
    let _ = writeln!(
        out,
        "  Net worth:  mean ${:.0} | median ${} | min ${} | max ${}",
        summary.mean_net_worth,
        summary.median_net_worth,
        summary.min_net_worth,
        summary.max_net_worth
    );
    let _ = writeln!(
        out,
        "  Final QoL:  mean {:.1} | Debt: mean ${:.0}",
        summary.mean_final_qol, summary.mean_debt
    );
    out
}

/// JSON document written by `payday batch --json`
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub summary: &'a BatchSummary,
    pub games: &'a [GameSummary],
}
