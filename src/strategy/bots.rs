use crate::equity;
use crate::evaluator::HoldemRanker;
use crate::state::{PrivateView, PublicView};
use crate::validator::Action;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{HandSummary, Strategy, StrategyError};

/// Calls every bet and never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallingStation;

impl Strategy for CallingStation {
    fn decide(
        &mut self,
        _public: &PublicView,
        _private: &PrivateView,
    ) -> Result<Action, StrategyError> {
        Ok(Action::Call)
    }
}

/// Play style of a [`BotStrategy`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct BotProfile {
    /// Higher folds more marginal hands.
    pub tightness: f64,
    /// Chance of raising a strong hand instead of calling.
    pub aggression: f64,
    /// Chance of betting a weak hand when nobody has bet.
    pub bluff: f64,
    /// Chance of calling anyway with a hand below the fold threshold.
    pub curiosity: f64,
    /// Monte Carlo runs per decision.
    pub iterations: u32,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    pub fn tight() -> Self {
        Self { tightness: 0.7, aggression: 0.6, bluff: 0.04, curiosity: 0.1, ..Self::default() }
    }

    pub fn loose() -> Self {
        Self { tightness: 0.3, aggression: 0.25, bluff: 0.12, curiosity: 0.4, ..Self::default() }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            tightness: 0.5,
            aggression: 0.35,
            bluff: 0.05,
            curiosity: 0.2,
            iterations: 300,
            rng_seed: None,
        }
    }
}

/// Equity-driven bot: estimates its win probability against the players still in the
/// hand and compares it with the price of calling.
#[derive(Debug)]
pub struct BotStrategy {
    profile: BotProfile,
    rng: ChaCha8Rng,
    hands_seen: u32,
}

impl BotStrategy {
    pub fn new(profile: BotProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
        };
        Self { profile, rng, hands_seen: 0 }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    /// Hands this bot has been told the result of.
    pub fn hands_seen(&self) -> u32 {
        self.hands_seen
    }

    fn raise_size(&self, public: &PublicView, private: &PrivateView, strength: f64) -> u64 {
        let min = public.min_raise_chips();
        let base = if strength > 0.85 {
            1.0
        } else if strength > 0.65 {
            0.7
        } else {
            0.5
        };
        let scale = 0.9 + self.profile.aggression * 0.3;
        let sized = (public.pot as f64 * base * scale).round() as u64 + private.to_call;
        sized.max(min).min(private.stack)
    }
}

impl Default for BotStrategy {
    fn default() -> Self {
        Self::new(BotProfile::default())
    }
}

impl Strategy for BotStrategy {
    fn decide(
        &mut self,
        public: &PublicView,
        private: &PrivateView,
    ) -> Result<Action, StrategyError> {
        let strength = equity::estimate(
            &private.hole,
            &public.board,
            public.opponents_in_hand(),
            self.profile.iterations,
            &mut self.rng,
            &HoldemRanker,
        );
        let pot_odds = if private.to_call == 0 {
            0.0
        } else {
            private.to_call as f64 / (public.pot + private.to_call) as f64
        };
        let fair_share = 1.0 / (public.opponents_in_hand() + 1) as f64;
        let fold_threshold =
            (pot_odds + self.profile.tightness * fair_share * 0.5).clamp(0.02, 0.9);
        let raise_threshold = (fair_share * (1.6 - self.profile.aggression)).clamp(0.15, 0.95);

        if private.to_call > 0 {
            let curious = self.rng.random::<f64>() <= self.profile.curiosity * 0.3;
            if strength < fold_threshold && !curious {
                return Ok(Action::Fold);
            }
            if strength > raise_threshold && self.rng.random::<f64>() < self.profile.aggression {
                return Ok(Action::Raise(self.raise_size(public, private, strength)));
            }
            return Ok(Action::Call);
        }

        let value =
            strength > raise_threshold && self.rng.random::<f64>() < self.profile.aggression;
        let bluff = strength < fold_threshold && self.rng.random::<f64>() < self.profile.bluff;
        if value || bluff {
            return Ok(Action::Raise(self.raise_size(public, private, strength)));
        }
        Ok(Action::Check)
    }

    fn observe(&mut self, _summary: &HandSummary) {
        self.hands_seen += 1;
    }
}
