//! Game configuration
//!
//! `GameConfig::default()` reproduces the contractual constants of the game:
//! job pay, housing costs, interest rates, match rules, card amounts, unlock
//! rounds, opportunity payoffs, event odds and event costs. Every field is `#[serde(default)]`, so a config file
//! only has to mention what it overrides.
//!
//! # Builder
//!
//! ```ignore
//! use payday_core::config::{GameBuilder, GameConfig};
//!
//! let game = GameBuilder::new()
//!     .config(GameConfig::default())
//!     .difficulty("med")
//!     .housing("apt")
//!     .seed(42)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Dollars, SavingsBucket, SpendCategory};

pub mod builder;

pub use builder::GameBuilder;

/// A job the player can take; `pay` is per round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOption {
    pub id: String,
    pub label: String,
    pub pay: Dollars,
}

/// A housing tier; `cost` is the monthly rent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingOption {
    pub id: String,
    pub label: String,
    pub cost: Dollars,
}

/// Which rounds of each yearly cycle count as winter or summer (1-indexed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    pub winter: Vec<u32>,
    pub summer: Vec<u32>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            winter: vec![1, 2, 3, 4, 22, 23, 24, 25, 26],
            summer: vec![10, 11, 12, 13, 14, 15],
        }
    }
}

/// Interest and market assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsConfig {
    pub emergency_apy: f64,
    pub hysa_apy: f64,
    pub vacation_apy: f64,
    /// Retirement APY before the per-round market factor is applied
    pub retirement_base_apy: f64,
    pub market_factor_min: f64,
    pub market_factor_max: f64,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            emergency_apy: 0.0001,
            hysa_apy: 0.035,
            vacation_apy: 0.035,
            retirement_base_apy: 0.09,
            market_factor_min: -0.25,
            market_factor_max: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployerMatch {
    pub percent: f64,
    pub cap_per_round: Dollars,
}

impl Default for EmployerMatch {
    fn default() -> Self {
        Self {
            percent: 0.5,
            cap_per_round: 75,
        }
    }
}

/// Recurring fixed bills and the cost of missing them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillSchedule {
    /// Fixed bills appear on rounds where `round % cycle == 1`
    pub cycle: u32,
    pub ttl: u32,
    pub utilities: Dollars,
    pub car_payment: Dollars,
    pub student_loan: Dollars,
    pub health_premium: Dollars,
    /// Added on top of the unpaid part of a missed fixed bill
    pub missed_penalty: Dollars,
    pub fixed_miss_qol: i32,
    pub event_miss_qol: i32,
}

impl Default for BillSchedule {
    fn default() -> Self {
        Self {
            cycle: 4,
            ttl: 2,
            utilities: 50,
            car_payment: 750,
            student_loan: 200,
            health_premium: 150,
            missed_penalty: 50,
            fixed_miss_qol: 5,
            event_miss_qol: 3,
        }
    }
}

/// Diminishing-returns rule for one variable spending category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub title: String,
    /// Face value of the category's own card
    pub card_amount: Dollars,
    pub base: Dollars,
    pub max: Dollars,
    pub qol_boost_max: i32,
    /// Largest penalty a miss streak can reach
    pub penalty_cap: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableRules {
    pub food: CategoryRule,
    pub entertainment: CategoryRule,
    pub transit: Dollars,
    pub dining_out: Dollars,
}

impl VariableRules {
    pub fn rule(&self, category: SpendCategory) -> &CategoryRule {
        match category {
            SpendCategory::Food => &self.food,
            SpendCategory::Entertainment => &self.entertainment,
        }
    }
}

impl Default for VariableRules {
    fn default() -> Self {
        Self {
            food: CategoryRule {
                title: "Food".into(),
                card_amount: 200,
                base: 120,
                max: 200,
                qol_boost_max: 8,
                penalty_cap: 15,
            },
            entertainment: CategoryRule {
                title: "Entertainment".into(),
                card_amount: 100,
                base: 60,
                max: 180,
                qol_boost_max: 10,
                penalty_cap: 12,
            },
            transit: 120,
            dining_out: 120,
        }
    }
}

/// Suggested deposit on each savings goal card. Deposits are not capped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalTargets {
    pub emergency: Dollars,
    pub hysa: Dollars,
    pub vacation: Dollars,
    pub retirement: Dollars,
}

impl GoalTargets {
    pub fn target(&self, bucket: SavingsBucket) -> Dollars {
        match bucket {
            SavingsBucket::Emergency => self.emergency,
            SavingsBucket::Hysa => self.hysa,
            SavingsBucket::Vacation => self.vacation,
            SavingsBucket::Retirement => self.retirement,
            SavingsBucket::Other => 0,
        }
    }
}

impl Default for GoalTargets {
    fn default() -> Self {
        Self {
            emergency: 100,
            hysa: 150,
            vacation: 50,
            retirement: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unlocks {
    pub opportunity_round: u32,
    pub event_round: u32,
}

impl Default for Unlocks {
    fn default() -> Self {
        Self {
            opportunity_round: 4,
            event_round: 6,
        }
    }
}

/// Probabilities and thresholds for the event engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventOdds {
    pub speeding_ticket: f64,
    pub winter_slip: f64,
    pub heating_spike: f64,
    pub burnout: f64,
    /// Burnout can only strike below this QoL
    pub burnout_qol_below: i32,
    pub review_interval: u32,
    pub review_good_qol: i32,
    pub review_poor_qol: i32,
    pub layoff_base: f64,
    pub layoff_per_risk: f64,
    pub bonus: f64,
    pub car_breakdown: f64,
    pub rent_hike_round: u32,
}

impl Default for EventOdds {
    fn default() -> Self {
        Self {
            speeding_ticket: 0.3,
            winter_slip: 0.15,
            heating_spike: 0.1,
            burnout: 0.15,
            burnout_qol_below: 35,
            review_interval: 6,
            review_good_qol: 60,
            review_poor_qol: 40,
            layoff_base: 0.04,
            layoff_per_risk: 0.02,
            bonus: 0.08,
            car_breakdown: 0.08,
            rent_hike_round: 13,
        }
    }
}

/// Prices and payoffs of opportunity cards. QoL values are magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityCosts {
    pub dental_checkup: Dollars,
    /// Checkups are offered when `round % dental_cycle == 1`
    pub dental_cycle: u32,
    pub health_enrollment: Dollars,
    pub bootcamp: Dollars,
    pub bootcamp_raise: f64,
    pub bootcamp_qol: i32,
    /// Raise requests are offered when `round % raise_cycle == 1`
    pub raise_cycle: u32,
    /// A raise is one of these two percentages with equal odds
    pub raise_small: f64,
    pub raise_large: f64,
    pub ask_raise_qol: i32,
    /// Price of cards that cost time rather than money
    pub token: Dollars,
    pub overtime_pay: Dollars,
    pub overtime_qol: i32,
    pub farmers_market: Dollars,
    /// Gained on signing up and again every summer round while active
    pub market_habit_qol: i32,
    /// The side hustle is offered once the round passes this
    pub side_hustle_after_round: u32,
    pub side_hustle_setup: Dollars,
    pub side_hustle_setup_qol: i32,
    pub side_hustle_shift_pay: Dollars,
    pub side_hustle_shift_qol: i32,
    pub negotiate_rent: Dollars,
    /// Share of the rent hike a negotiation gives back
    pub negotiate_rent_share: f64,
}

impl Default for OpportunityCosts {
    fn default() -> Self {
        Self {
            dental_checkup: 80,
            dental_cycle: 3,
            health_enrollment: 150,
            bootcamp: 300,
            bootcamp_raise: 0.10,
            bootcamp_qol: 3,
            raise_cycle: 6,
            raise_small: 0.05,
            raise_large: 0.10,
            ask_raise_qol: 1,
            token: 1,
            overtime_pay: 200,
            overtime_qol: 2,
            farmers_market: 30,
            market_habit_qol: 1,
            side_hustle_after_round: 2,
            side_hustle_setup: 200,
            side_hustle_setup_qol: 2,
            side_hustle_shift_pay: 150,
            side_hustle_shift_qol: 2,
            negotiate_rent: 75,
            negotiate_rent_share: 0.5,
        }
    }
}

/// Bills and QoL hits of forced and random events. QoL values are magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCosts {
    pub speeding_ticket: Dollars,
    pub dental_bomb: Dollars,
    pub dental_bomb_qol: i32,
    /// Skipped checkups in a row that arm the dental time bomb
    pub dental_miss_limit: u32,
    pub slip_copay: Dollars,
    pub slip_copay_qol: i32,
    pub slip_uninsured: Dollars,
    pub slip_uninsured_qol: i32,
    /// Rounds of -1 QoL after a slip
    pub slip_recovery_rounds: u32,
    pub heating_spike: Dollars,
    pub heating_spike_qol: i32,
    pub burnout_break_qol: i32,
    pub burnout_push_qol: i32,
    /// Times pushing through burnout is tolerated before a forced layoff
    pub burnout_push_limit: u32,
    pub burnout_layoff_rounds: u32,
    pub burnout_layoff_qol: i32,
    pub review_raise_qol: i32,
    pub review_poor_qol: i32,
    /// Layoffs last `layoff_min_rounds` plus up to `layoff_extra_rounds - 1`
    pub layoff_min_rounds: u32,
    pub layoff_extra_rounds: u32,
    /// Liquidity covering this many months of fixed bills softens a layoff
    pub layoff_buffer_months: Dollars,
    pub layoff_buffered_qol: i32,
    pub layoff_unbuffered_qol: i32,
    pub layoff_bridge_debt: Dollars,
    pub bonus_debt_share: f64,
    pub bonus_savings_share: f64,
    pub rent_hike_pct: f64,
    pub rent_hike_min: Dollars,
    pub car_breakdown: Dollars,
    pub car_breakdown_qol: i32,
}

impl Default for EventCosts {
    fn default() -> Self {
        Self {
            speeding_ticket: 150,
            dental_bomb: 800,
            dental_bomb_qol: 3,
            dental_miss_limit: 2,
            slip_copay: 100,
            slip_copay_qol: 3,
            slip_uninsured: 3000,
            slip_uninsured_qol: 5,
            slip_recovery_rounds: 1,
            heating_spike: 80,
            heating_spike_qol: 1,
            burnout_break_qol: 10,
            burnout_push_qol: 3,
            burnout_push_limit: 2,
            burnout_layoff_rounds: 2,
            burnout_layoff_qol: 5,
            review_raise_qol: 2,
            review_poor_qol: 3,
            layoff_min_rounds: 2,
            layoff_extra_rounds: 3,
            layoff_buffer_months: 3,
            layoff_buffered_qol: 2,
            layoff_unbuffered_qol: 6,
            layoff_bridge_debt: 200,
            bonus_debt_share: 0.5,
            bonus_savings_share: 0.3,
            rent_hike_pct: 0.07,
            rent_hike_min: 10,
            car_breakdown: 400,
            car_breakdown_qol: 4,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulties: Vec<JobOption>,
    pub housing: Vec<HousingOption>,
    pub starting_cash: Dollars,
    pub starting_qol: i32,
    pub rounds_per_year: u32,
    /// How far the round counter moves per turn
    pub round_step: u32,
    /// Delay before HYSA and vacation withdrawals land
    pub withdrawal_delay_rounds: u32,
    pub calendar: Calendar,
    pub savings: SavingsConfig,
    pub employer_match: EmployerMatch,
    pub bills: BillSchedule,
    pub variable: VariableRules,
    pub goals: GoalTargets,
    pub unlocks: Unlocks,
    pub opportunities: OpportunityCosts,
    pub events: EventOdds,
    pub event_costs: EventCosts,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulties: vec![
                JobOption {
                    id: "hard".into(),
                    label: "Entry Level".into(),
                    pay: 1100,
                },
                JobOption {
                    id: "med".into(),
                    label: "Mid-Career".into(),
                    pay: 1900,
                },
                JobOption {
                    id: "easy".into(),
                    label: "Senior".into(),
                    pay: 3800,
                },
            ],
            housing: vec![
                HousingOption {
                    id: "shared".into(),
                    label: "Shared Room".into(),
                    cost: 1000,
                },
                HousingOption {
                    id: "apt".into(),
                    label: "1BR Apartment".into(),
                    cost: 1600,
                },
                HousingOption {
                    id: "lux".into(),
                    label: "Luxury Loft".into(),
                    cost: 2000,
                },
            ],
            starting_cash: 500,
            starting_qol: 50,
            rounds_per_year: 26,
            round_step: 2,
            withdrawal_delay_rounds: 2,
            calendar: Calendar::default(),
            savings: SavingsConfig::default(),
            employer_match: EmployerMatch::default(),
            bills: BillSchedule::default(),
            variable: VariableRules::default(),
            goals: GoalTargets::default(),
            unlocks: Unlocks::default(),
            opportunities: OpportunityCosts::default(),
            events: EventOdds::default(),
            event_costs: EventCosts::default(),
        }
    }
}

fn check_probability(field: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "probability must be within [0, 1]",
        })
    }
}

impl GameConfig {
    pub fn job(&self, id: &str) -> Result<&JobOption, ConfigError> {
        self.difficulties
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| ConfigError::UnknownDifficulty(id.to_string()))
    }

    pub fn home(&self, id: &str) -> Result<&HousingOption, ConfigError> {
        self.housing
            .iter()
            .find(|h| h.id == id)
            .ok_or_else(|| ConfigError::UnknownHousing(id.to_string()))
    }

    /// Position of `round` inside its yearly cycle, 1-indexed
    pub fn cycle_round(&self, round: u32) -> u32 {
        (round.max(1) - 1) % self.rounds_per_year.max(1) + 1
    }

    pub fn is_winter(&self, round: u32) -> bool {
        self.calendar.winter.contains(&self.cycle_round(round))
    }

    pub fn is_summer(&self, round: u32) -> bool {
        self.calendar.summer.contains(&self.cycle_round(round))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulties.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "difficulties",
                reason: "at least one job is required",
            });
        }
        if self.housing.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "housing",
                reason: "at least one housing option is required",
            });
        }
        let cycles = [
            self.rounds_per_year,
            self.round_step,
            self.bills.cycle,
            self.opportunities.dental_cycle,
            self.opportunities.raise_cycle,
            self.event_costs.layoff_extra_rounds,
        ];
        if cycles.contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "rounds_per_year/round_step/cycles",
                reason: "must be positive",
            });
        }
        if self.savings.market_factor_min > self.savings.market_factor_max {
            return Err(ConfigError::InvalidValue {
                field: "savings.market_factor_min",
                reason: "must not exceed market_factor_max",
            });
        }
        for rule in [&self.variable.food, &self.variable.entertainment] {
            if rule.max <= 0 || rule.base > rule.max {
                return Err(ConfigError::InvalidValue {
                    field: "variable",
                    reason: "category max must be positive and at least base",
                });
            }
        }
        check_probability("employer_match.percent", self.employer_match.percent)?;
        check_probability("events.speeding_ticket", self.events.speeding_ticket)?;
        check_probability("events.winter_slip", self.events.winter_slip)?;
        check_probability("events.heating_spike", self.events.heating_spike)?;
        check_probability("events.burnout", self.events.burnout)?;
        check_probability("events.layoff_base", self.events.layoff_base)?;
        check_probability("events.bonus", self.events.bonus)?;
        check_probability("events.car_breakdown", self.events.car_breakdown)?;
        check_probability(
            "opportunities.negotiate_rent_share",
            self.opportunities.negotiate_rent_share,
        )?;
        let bonus = &self.event_costs;
        if !(0.0..=1.0).contains(&(bonus.bonus_debt_share + bonus.bonus_savings_share))
            || bonus.bonus_debt_share < 0.0
            || bonus.bonus_savings_share < 0.0
        {
            return Err(ConfigError::InvalidValue {
                field: "event_costs.bonus_debt_share",
                reason: "bonus shares must be non-negative and sum to at most 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.job("med").unwrap().pay, 1900);
        assert_eq!(config.home("apt").unwrap().cost, 1600);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let config = GameConfig::default();
        assert_eq!(
            config.job("ceo").unwrap_err(),
            ConfigError::UnknownDifficulty("ceo".into())
        );
        assert!(config.home("castle").is_err());
    }

    #[test]
    fn test_seasons_wrap_every_cycle() {
        let config = GameConfig::default();
        assert!(config.is_winter(1));
        assert!(config.is_winter(25));
        assert!(config.is_winter(27));
        assert!(!config.is_winter(13));
        assert!(config.is_summer(11));
        assert!(config.is_summer(37));
        assert!(!config.is_summer(17));
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut config = GameConfig::default();
        config.events.bonus = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "events.bonus",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "starting_cash": 900, "events": { "bonus": 0.5 } }"#)
                .unwrap();
        assert_eq!(config.starting_cash, 900);
        assert_eq!(config.events.bonus, 0.5);
        assert_eq!(config.events.car_breakdown, 0.08);
        assert_eq!(config.difficulties.len(), 3);
    }

    #[test]
    fn test_costs_are_overridable() {
        let config: GameConfig = serde_json::from_str(
            r#"{ "opportunities": { "bootcamp": 450 }, "event_costs": { "car_breakdown": 600 } }"#,
        )
        .unwrap();
        assert_eq!(config.opportunities.bootcamp, 450);
        assert_eq!(config.opportunities.dental_checkup, 80);
        assert_eq!(config.event_costs.car_breakdown, 600);
        assert_eq!(config.event_costs.dental_miss_limit, 2);
    }

    #[test]
    fn test_validate_rejects_oversized_bonus_split() {
        let mut config = GameConfig::default();
        config.event_costs.bonus_savings_share = 0.6;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.opportunities.raise_cycle = 0;
        assert!(config.validate().is_err());
    }
}
