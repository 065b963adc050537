//! Game Builder
//!
//! Fluent setup for a new game: pick a config, a job, a housing tier and a
//! seed, then build. Unset choices fall back to the first job and housing
//! entries of the config and a seed of zero.
//!
//! ```ignore
//! use payday_core::config::GameBuilder;
//!
//! let mut game = GameBuilder::new()
//!     .difficulty("hard")
//!     .housing("shared")
//!     .seed(7)
//!     .build()?;
//! ```

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::GameConfig;
use crate::error::{ConfigError, Result};
use crate::game::Game;
use crate::random::RandomSource;

/// Builder for [`Game`] with name-based job and housing lookups
#[derive(Debug, Clone, Default)]
pub struct GameBuilder {
    config: GameConfig,
    difficulty: Option<String>,
    housing: Option<String>,
    seed: u64,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Job id, e.g. `"hard"`, `"med"` or `"easy"`
    #[must_use]
    pub fn difficulty(mut self, id: impl Into<String>) -> Self {
        self.difficulty = Some(id.into());
        self
    }

    /// Housing id, e.g. `"shared"`, `"apt"` or `"lux"`
    #[must_use]
    pub fn housing(mut self, id: impl Into<String>) -> Self {
        self.housing = Some(id.into());
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build a game driven by a seeded `SmallRng`.
    pub fn build(self) -> Result<Game<SmallRng>> {
        let rng = SmallRng::seed_from_u64(self.seed);
        self.build_with(rng)
    }

    /// Build a game driven by an injected random source.
    pub fn build_with<R: RandomSource>(self, rng: R) -> Result<Game<R>> {
        let difficulty = match self.difficulty {
            Some(id) => id,
            None => first_id(self.config.difficulties.first().map(|d| &d.id), "difficulties")?,
        };
        let housing = match self.housing {
            Some(id) => id,
            None => first_id(self.config.housing.first().map(|h| &h.id), "housing")?,
        };
        Game::with_random(self.config, &difficulty, &housing, rng)
    }
}

fn first_id(id: Option<&String>, field: &'static str) -> std::result::Result<String, ConfigError> {
    id.cloned().ok_or(ConfigError::InvalidValue {
        field,
        reason: "no option to default to",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_matches_direct_construction() {
        let built = GameBuilder::new()
            .difficulty("med")
            .housing("apt")
            .seed(11)
            .build()
            .unwrap();
        let direct = Game::new(GameConfig::default(), "med", "apt", 11).unwrap();
        assert_eq!(built.snapshot(), direct.snapshot());
    }

    #[test]
    fn test_builder_defaults_to_first_options() {
        let game = GameBuilder::new().build().unwrap();
        assert_eq!(game.state().job.id, "hard");
        assert_eq!(game.state().home.id, "shared");
    }

    #[test]
    fn test_builder_rejects_unknown_ids() {
        assert!(GameBuilder::new().difficulty("ceo").build().is_err());
        assert!(GameBuilder::new().housing("castle").build().is_err());
    }
}
