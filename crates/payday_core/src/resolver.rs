//! Round resolver
//!
//! The round state machine:
//!
//! ```text
//! AwaitingInput --advance--> [obligations?] --> Resolving --> RoundStarted --> AwaitingInput
//!                                 |                  |              |
//!                          AwaitingDecision    AwaitingDecision  AwaitingDecision
//!                            (obligations)        (victory)     (burnout / bonus)
//! ```
//!
//! Any QoL drop to zero ends the game on the spot; the pipeline stops at the
//! step that caused it.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::deck::generate_cards;
use crate::events::{EventFlow, run_events};
use crate::game_state::{EventStep, GameState, Phase};
use crate::interest::apply_interest;
use crate::model::{
    CardKind, DebtCorrelation, Dollars, ObligationPreview, PendingDecision, SavingsBucket,
    TrackKey,
};
use crate::random::RandomSource;
use crate::round_log::{DebtConversion, RoundFacts, build_round_log};
use crate::scheduler::process_due;
use crate::variable;

/// Where a state-machine transition left the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// A round is open for player input
    Ready { round: u32 },
    DecisionRequired { decision: PendingDecision },
    /// Advance was declined; nothing changed
    Cancelled,
    GameOver { reason: String },
    Victory,
}

impl RoundOutcome {
    fn from_phase(state: &GameState) -> Self {
        match &state.phase {
            Phase::AwaitingInput => RoundOutcome::Ready { round: state.round },
            Phase::AwaitingDecision { decision } => RoundOutcome::DecisionRequired {
                decision: decision.clone(),
            },
            Phase::GameOver { reason } => RoundOutcome::GameOver {
                reason: reason.clone(),
            },
            Phase::Victory => RoundOutcome::Victory,
        }
    }
}

/// Unpaid bills that turn into debt if the round ends now.
pub fn expiring_obligations(state: &GameState, config: &GameConfig) -> Vec<ObligationPreview> {
    let bills = &config.bills;
    state
        .deck
        .cards()
        .iter()
        .filter(|c| c.is_expiring_obligation())
        .map(|c| {
            let owed = (c.amount - c.paid()).max(0);
            ObligationPreview {
                card_id: c.id,
                title: c.title.clone(),
                kind: c.kind,
                owed,
                debt_added: c.debt_on_miss.unwrap_or(owed + bills.missed_penalty),
                qol_penalty: if c.kind == CardKind::Fixed {
                    bills.fixed_miss_qol
                } else {
                    bills.event_miss_qol
                },
            }
        })
        .collect()
}

/// Entry point for "advance round": asks first when bills would be missed.
pub(crate) fn advance<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> RoundOutcome {
    let obligations = expiring_obligations(state, config);
    if obligations.is_empty() {
        return resolve_round(state, config, rng);
    }

    tracing::info!(
        round = state.round,
        count = obligations.len(),
        "unpaid obligations need confirmation"
    );
    let decision = PendingDecision::Obligations { obligations };
    state.phase = Phase::AwaitingDecision {
        decision: decision.clone(),
    };
    RoundOutcome::DecisionRequired { decision }
}

/// Close the current round and open the next one.
pub fn resolve_round<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> RoundOutcome {
    state.phase = Phase::AwaitingInput;
    let finishing = state.round;
    tracing::debug!(round = finishing, "resolving round");

    // Missed obligations become debt
    let conversions: Vec<DebtConversion> = expiring_obligations(state, config)
        .into_iter()
        .map(|o| DebtConversion {
            card_id: o.card_id,
            title: o.title,
            kind: o.kind,
            owed: o.owed,
            debt_added: o.debt_added,
            qol_penalty: o.qol_penalty,
        })
        .collect();
    for conversion in &conversions {
        let reason = if conversion.kind == CardKind::Fixed {
            format!(
                "Unpaid {} (includes ${} penalty)",
                conversion.title, config.bills.missed_penalty
            )
        } else {
            format!("Unpaid {} moved to debt", conversion.title)
        };
        state.record_debt(
            conversion.debt_added,
            reason,
            DebtCorrelation::card(conversion.card_id),
        );
        state.adjust_qol(-conversion.qol_penalty);
    }
    if state.is_over() {
        return RoundOutcome::from_phase(state);
    }

    // Variable spending
    let variable = variable::evaluate(&state.deck, &config.variable, &mut state.variable_tracker);
    state.adjust_qol(variable.qol_delta());
    if state.is_over() {
        return RoundOutcome::from_phase(state);
    }

    track_dental(state, config.event_costs.dental_miss_limit);

    // Goal balances already live in their buckets; only the stacks reset
    let kept_savings: Vec<(SavingsBucket, Dollars)> = [SavingsBucket::Vacation, SavingsBucket::Retirement]
        .into_iter()
        .map(|b| (b, state.ledger.balance(b)))
        .filter(|(_, balance)| *balance > 0)
        .collect();
    for bucket in [
        SavingsBucket::Emergency,
        SavingsBucket::Hysa,
        SavingsBucket::Vacation,
        SavingsBucket::Retirement,
    ] {
        state.deck.clear_goal_payments(bucket);
    }

    let swept_cash = sweep_cash(state);

    let log = build_round_log(&RoundFacts {
        round: finishing,
        cards: state.deck.cards(),
        conversions: &conversions,
        variable: &variable,
        rules: &config.variable,
        kept_savings: &kept_savings,
        swept_cash,
    });
    state.last_log = Some(log);

    state.round += config.round_step;
    tracing::info!(
        finished = finishing,
        next = state.round,
        debt = state.ledger.debt,
        qol = state.qol,
        "round resolved"
    );

    if state.round > state.flags.next_victory_round && !state.flags.offered_victory {
        state.flags.offered_victory = true;
        let decision = PendingDecision::Victory { round: state.round };
        state.phase = Phase::AwaitingDecision {
            decision: decision.clone(),
        };
        tracing::info!(round = state.round, "victory offered");
        return RoundOutcome::DecisionRequired { decision };
    }

    start_round(state, config, rng)
}

fn track_dental(state: &mut GameState, miss_limit: u32) {
    let Some(paid_in_full) = state
        .deck
        .tracked(TrackKey::DentalCheckup)
        .map(|c| c.is_paid_in_full())
    else {
        return;
    };

    let flags = &mut state.flags;
    if paid_in_full {
        flags.dental_misses = 0;
    } else {
        flags.dental_misses += 1;
        if flags.dental_misses >= miss_limit {
            flags.dental_bomb_pending = true;
            flags.dental_misses = 0;
        }
    }
}

/// Move leftover cash into the emergency fund. Returns the amount moved.
fn sweep_cash(state: &mut GameState) -> Dollars {
    let leftover = state.ledger.cash.max(0);
    if leftover > 0 {
        state.ledger.deposit(SavingsBucket::Emergency, leftover);
        state.ledger.cash = 0;
        state.notify(format!("Leftover cash moved to Emergency Fund: ${leftover}"));
    }
    leftover
}

/// Open the current round: arrivals, interest, payday, deck and events.
pub fn start_round<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> RoundOutcome {
    if state.is_over() {
        return RoundOutcome::from_phase(state);
    }
    state.phase = Phase::AwaitingInput;
    state.retirement_match_this_round = 0;

    process_due(state);

    let report = apply_interest(state, config, rng);
    let messages = report.messages();
    if !messages.is_empty() {
        state.notify(messages.join("; "));
    }

    if state.flags.layoff_rounds_left > 0 {
        state.flags.layoff_rounds_left -= 1;
        state.notify("Layoff: No paycheck this round.");
    } else {
        state.ledger.credit_cash(state.job.pay);
        state.notify(format!("Payday! +${}", state.job.pay));
    }

    state.deck.age();
    generate_cards(state, config, rng);

    tracing::info!(
        round = state.round,
        cash = state.ledger.cash,
        debt = state.ledger.debt,
        qol = state.qol,
        cards = state.deck.len(),
        "round started"
    );

    if state.is_over() {
        return RoundOutcome::from_phase(state);
    }
    if state.round < config.unlocks.event_round {
        return RoundOutcome::Ready { round: state.round };
    }
    let flow = run_events(state, config, rng, EventStep::FIRST);
    settle_events(state, flow)
}

/// Continue the event engine after a burnout or bonus answer.
pub(crate) fn resume_events<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> RoundOutcome {
    state.phase = Phase::AwaitingInput;
    let flow = match state.event_cursor.take() {
        Some(step) => run_events(state, config, rng, step),
        None if state.is_over() => EventFlow::GameOver,
        None => EventFlow::Completed,
    };
    settle_events(state, flow)
}

fn settle_events(state: &mut GameState, flow: EventFlow) -> RoundOutcome {
    match flow {
        EventFlow::Completed => RoundOutcome::Ready { round: state.round },
        EventFlow::Paused(decision) => {
            state.phase = Phase::AwaitingDecision {
                decision: decision.clone(),
            };
            RoundOutcome::DecisionRequired { decision }
        }
        EventFlow::GameOver => RoundOutcome::from_phase(state),
    }
}

/// Answer the year-end offer: exit as a winner or play another year.
pub(crate) fn finish_year<R: RandomSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    keep_playing: bool,
) -> RoundOutcome {
    if !keep_playing {
        tracing::info!(round = state.round, "player retired a winner");
        state.phase = Phase::Victory;
        return RoundOutcome::Victory;
    }
    state.flags.offered_victory = false;
    state.flags.next_victory_round += config.rounds_per_year;
    state.phase = Phase::AwaitingInput;
    start_round(state, config, rng)
}
