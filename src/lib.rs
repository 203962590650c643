//! poker-arena: a poker betting engine that runs untrusted strategies under enforced rules.
//!
//! Goals:
//! - Chips are conserved and stacks never go negative, whatever a strategy returns
//! - Side pots split correctly when players are all-in for different amounts
//! - Strategy failures (errors, panics, timeouts) are contained and recorded, never fatal
//!
//! ## Quick start: play one hand
//! ```
//! use poker_arena::config::TableConfig;
//! use poker_arena::engine::RoundEngine;
//! use poker_arena::player::{Player, PlayerId};
//! use poker_arena::strategy::{CallingStation, StrategyHandle};
//!
//! let config = TableConfig::holdem(5, 10).with_decision_timeout(None);
//! let mut engine = RoundEngine::new(config).unwrap().with_seed(7);
//! let players = vec![
//!     Player::new(PlayerId(0), "alice", 1000),
//!     Player::new(PlayerId(1), "bob", 1000),
//! ];
//! let strategies = [
//!     StrategyHandle::new("alice", CallingStation),
//!     StrategyHandle::new("bob", CallingStation),
//! ];
//!
//! let mut state = engine.new_hand(players, 0).unwrap();
//! let result = engine.run_hand(&mut state, &strategies).unwrap();
//! let total: u64 = state.players().iter().map(|p| p.stack()).sum();
//! assert_eq!(total, 2000);
//! assert_eq!(result.board.len(), 5);
//! ```
//!
//! ## Matches
//! Run a series of hands between the built-in bots with:
//! ```sh
//! cargo run --bin poker-arena -- --hands 100 --seed 1
//! ```

pub mod arena;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod evaluator;
pub mod hand;
pub mod player;
pub mod pot;
pub mod scheduler;
pub mod showdown;
pub mod state;
pub mod strategy;
pub mod validator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
