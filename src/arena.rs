//! Match driver: seats strategies at one table and plays a series of hands.
//!
//! Between hands the driver moves the button to the next surviving seat, removes
//! players who busted or were forfeited for repeated faults, and hands every strategy
//! a [`HandSummary`](crate::strategy::HandSummary) of the hand it just played.

use crate::config::MatchConfig;
use crate::engine::{EngineError, HandResult, RoundEngine};
use crate::evaluator::{HoldemRanker, Ranker};
use crate::player::{Player, PlayerId};
use crate::strategy::StrategyHandle;
use std::fmt;

#[derive(Debug)]
struct Entrant {
    player: Player,
    handle: StrategyHandle,
    wins: f64,
    faults: u32,
    eliminated_in: Option<u32>,
    forfeited: bool,
}

/// Final line for one player.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub stack: u64,
    /// Hands won, weighted by the share of each pot taken.
    pub wins: f64,
    pub faults: u32,
    /// Hand in which the player's stack reached zero.
    pub eliminated_in: Option<u32>,
    /// Removed for reaching the fault limit.
    pub forfeited: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct MatchReport {
    pub hands_played: u32,
    /// Best first: players still seated by stack, then forfeited players by stack.
    pub standings: Vec<Standing>,
}

impl MatchReport {
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} hands played", self.hands_played)?;
        writeln!(
            f,
            "{:>3}  {:<16} {:>10} {:>8} {:>6}  note",
            "#", "player", "stack", "wins", "faults"
        )?;
        for (place, s) in self.standings.iter().enumerate() {
            let note = match (s.forfeited, s.eliminated_in) {
                (true, _) => "forfeited".to_string(),
                (false, Some(hand)) => format!("out in hand {hand}"),
                (false, None) => String::new(),
            };
            writeln!(
                f,
                "{:>3}  {:<16} {:>10} {:>8.2} {:>6}  {note}",
                place + 1,
                s.name,
                s.stack,
                s.wins,
                s.faults
            )?;
        }
        Ok(())
    }
}

/// A series of hands at one table.
#[derive(Debug)]
pub struct Match<R = HoldemRanker> {
    config: MatchConfig,
    engine: RoundEngine<R>,
    entrants: Vec<Entrant>,
    // Indices into `entrants` of players still playing, in seating order.
    seated: Vec<usize>,
    button: usize,
    hands_played: u32,
}

impl Match<HoldemRanker> {
    pub fn new(config: MatchConfig) -> Result<Self, EngineError> {
        Self::with_ranker(config, HoldemRanker)
    }
}

impl<R: Ranker> Match<R> {
    pub fn with_ranker(config: MatchConfig, ranker: R) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = RoundEngine::with_ranker(config.table.clone(), ranker)?;
        if let Some(seed) = config.seed {
            engine = engine.with_seed(seed);
        }
        Ok(Self {
            config,
            engine,
            entrants: Vec::new(),
            seated: Vec::new(),
            button: 0,
            hands_played: 0,
        })
    }

    /// Seat a strategy with the configured starting stack. Players sit in join order.
    pub fn join(&mut self, handle: StrategyHandle) -> PlayerId {
        let id = PlayerId(self.entrants.len() as u32);
        let player = Player::new(id, handle.name(), self.config.table.starting_stack);
        self.seated.push(self.entrants.len());
        self.entrants.push(Entrant {
            player,
            handle,
            wins: 0.0,
            faults: 0,
            eliminated_in: None,
            forfeited: false,
        });
        id
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    /// Play until the configured number of hands is reached or one player is left.
    pub fn run(mut self) -> Result<MatchReport, EngineError> {
        while self.hands_played < self.config.hands && self.seated.len() >= 2 {
            self.play_hand()?;
        }
        log::info!("match over after {} hands", self.hands_played);
        Ok(self.report())
    }

    /// Play a single hand and apply its outcome to the table.
    pub fn play_hand(&mut self) -> Result<HandResult, EngineError> {
        if self.seated.len() < 2 {
            return Err(EngineError::NotEnoughPlayers(self.seated.len()));
        }
        let players = self.seated.iter().map(|&e| self.entrants[e].player.clone()).collect();
        let handles: Vec<StrategyHandle> =
            self.seated.iter().map(|&e| self.entrants[e].handle.clone()).collect();
        let dealer = self.button % self.seated.len();

        let mut state = self.engine.new_hand(players, dealer)?;
        let result = self.engine.run_hand(&mut state, &handles)?;
        self.hands_played += 1;

        let seated = self.seated.clone();
        for (&e, player) in seated.iter().zip(state.into_players()) {
            self.entrants[e].player = player;
        }
        self.credit_wins(&seated, &result);
        for fault in &result.faults {
            self.entrants[seated[fault.seat]].faults += 1;
        }

        let summary = result.summary();
        for handle in &handles {
            self.engine.invoker().notify(handle, &summary);
        }

        self.retire(result.hand_number);
        self.advance_button(seated[dealer]);
        Ok(result)
    }

    /// One win per hand, shared in proportion to the chips each winner took.
    fn credit_wins(&mut self, seated: &[usize], result: &HandResult) {
        let pot: u64 = result.payouts.iter().map(|p| p.amount).sum();
        if pot == 0 {
            return;
        }
        for payout in &result.payouts {
            self.entrants[seated[payout.seat]].wins += payout.amount as f64 / pot as f64;
        }
    }

    /// Drop busted players and players over the fault limit from the seating.
    fn retire(&mut self, hand: u32) {
        let limit = self.config.fault_limit;
        let entrants = &mut self.entrants;
        self.seated.retain(|&e| {
            let entrant = &mut entrants[e];
            if entrant.player.stack == 0 {
                entrant.eliminated_in = Some(hand);
                log::info!("{} eliminated in hand {hand}", entrant.player.name);
                return false;
            }
            if limit.is_some_and(|limit| entrant.faults >= limit) {
                entrant.forfeited = true;
                log::warn!("{} forfeits after {} faults", entrant.player.name, entrant.faults);
                return false;
            }
            true
        });
    }

    /// Move the button to the first surviving seat after the last dealer.
    fn advance_button(&mut self, last_dealer: usize) {
        self.button = self.seated.iter().position(|&e| e > last_dealer).unwrap_or(0);
    }

    fn report(&self) -> MatchReport {
        let mut standings: Vec<Standing> = self
            .entrants
            .iter()
            .map(|e| Standing {
                player: e.player.id,
                name: e.player.name.clone(),
                stack: e.player.stack,
                wins: e.wins,
                faults: e.faults,
                eliminated_in: e.eliminated_in,
                forfeited: e.forfeited,
            })
            .collect();
        standings.sort_by(|a, b| {
            a.forfeited
                .cmp(&b.forfeited)
                .then(b.stack.cmp(&a.stack))
                .then(b.eliminated_in.cmp(&a.eliminated_in))
        });
        MatchReport { hands_played: self.hands_played, standings }
    }
}
