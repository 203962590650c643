//! Immutable configuration for a table and a match.
//!
//! Built once by the driver and handed to [`crate::engine::RoundEngine`] and
//! [`crate::arena::Match`]; nothing in the engine reads global settings.

use crate::hand::MAX_BOARD;
use std::time::Duration;

/// Cards each player is dealt.
pub const HOLE_CARDS: usize = 2;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("starting stack must be positive")]
    EmptyStack,
    #[error("big blind {big} is smaller than small blind {small}")]
    BlindOrder { small: u64, big: u64 },
    #[error("board schedule needs at least one betting round")]
    NoRounds,
    #[error("board schedule reveals {0} cards, expected 3..=5")]
    BoardSize(usize),
    #[error("board schedule has {0} betting rounds, at most 255 are supported")]
    TooManyRounds(usize),
    #[error("decision timeout must be non-zero")]
    ZeroTimeout,
    #[error("a match needs at least one hand")]
    NoHands,
    #[error("fault limit must be at least one")]
    ZeroFaultLimit,
}

/// Betting structure and pacing of a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Dead money every seated player posts before the deal.
    pub ante: u64,
    /// Smallest raise increment; the size of the last full raise takes over when larger.
    pub min_raise: u64,
    /// Community cards revealed at the start of each betting round; its length is the
    /// number of betting rounds.
    pub board_schedule: Vec<usize>,
    /// Longest a strategy may take to decide. `None` runs decisions inline.
    pub decision_timeout: Option<Duration>,
}

impl TableConfig {
    /// No-limit hold'em: preflop, flop, turn and river.
    pub fn holdem(small_blind: u64, big_blind: u64) -> Self {
        Self {
            starting_stack: big_blind.max(1) * 100,
            small_blind,
            big_blind,
            ante: 0,
            min_raise: big_blind.max(1),
            board_schedule: vec![0, 3, 1, 1],
            decision_timeout: Some(Duration::from_secs(1)),
        }
    }

    /// Three betting rounds on flop, turn and river with a flat buy-in per hand and no
    /// blinds.
    pub fn three_street() -> Self {
        Self {
            starting_stack: 10_000,
            small_blind: 0,
            big_blind: 0,
            ante: 100,
            min_raise: 100,
            board_schedule: vec![3, 1, 1],
            decision_timeout: Some(Duration::from_secs(1)),
        }
    }

    pub fn with_starting_stack(mut self, stack: u64) -> Self {
        self.starting_stack = stack;
        self
    }

    pub fn with_blinds(mut self, small: u64, big: u64) -> Self {
        self.small_blind = small;
        self.big_blind = big;
        self
    }

    pub fn with_ante(mut self, ante: u64) -> Self {
        self.ante = ante;
        self
    }

    pub fn with_min_raise(mut self, min_raise: u64) -> Self {
        self.min_raise = min_raise;
        self
    }

    pub fn with_board_schedule(mut self, schedule: Vec<usize>) -> Self {
        self.board_schedule = schedule;
        self
    }

    pub fn with_decision_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.decision_timeout = timeout;
        self
    }

    /// Number of betting rounds per hand.
    pub fn rounds(&self) -> usize {
        self.board_schedule.len()
    }

    /// Raise increment in effect at the start of a round; never zero.
    pub fn opening_min_raise(&self) -> u64 {
        self.min_raise.max(self.big_blind).max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_stack == 0 {
            return Err(ConfigError::EmptyStack);
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::BlindOrder { small: self.small_blind, big: self.big_blind });
        }
        if self.board_schedule.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        if self.board_schedule.len() > usize::from(u8::MAX) {
            return Err(ConfigError::TooManyRounds(self.board_schedule.len()));
        }
        let board: usize = self.board_schedule.iter().sum();
        if board + HOLE_CARDS < 5 || board > MAX_BOARD {
            return Err(ConfigError::BoardSize(board));
        }
        if self.decision_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::holdem(5, 10).with_starting_stack(1000)
    }
}

/// A series of hands at one table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct MatchConfig {
    pub table: TableConfig,
    pub hands: u32,
    /// Seed for shuffles; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Forfeit a player once their strategy has faulted this many times.
    pub fault_limit: Option<u32>,
}

impl MatchConfig {
    pub fn new(table: TableConfig, hands: u32) -> Self {
        Self { table, hands, seed: None, fault_limit: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fault_limit(mut self, limit: u32) -> Self {
        self.fault_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hands == 0 {
            return Err(ConfigError::NoHands);
        }
        if self.fault_limit == Some(0) {
            return Err(ConfigError::ZeroFaultLimit);
        }
        self.table.validate()
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(TableConfig::three_street(), 50)
    }
}
