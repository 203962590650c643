//! The per-hand lifecycle: forced bets, deal, betting rounds, showdown, payout.
//!
//! [`RoundEngine`] owns the rules and the randomness; a [`GameState`] is created per
//! hand with [`RoundEngine::new_hand`] and driven to completion by
//! [`RoundEngine::run_hand`]. Strategies are consulted through the
//! [`StrategyHookInvoker`]; nothing they return can break the accounting.

use crate::cards::Card;
use crate::config::{ConfigError, TableConfig, HOLE_CARDS};
use crate::deck::Deck;
use crate::evaluator::{HoldemRanker, Ranker};
use crate::hand::HoleCards;
use crate::player::{Player, PlayerId, PlayerStatus};
use crate::pot::PotManager;
use crate::scheduler::{Turn, TurnScheduler};
use crate::showdown::{Payout, ShowdownResolver, ShownHand};
use crate::state::{GameState, HistoryEntry, HistoryVerb, Round};
use crate::strategy::{
    FaultKind, HandSummary, StrategyFault, StrategyHandle, StrategyHookInvoker,
};
use crate::validator::{ActionValidator, NormalizedAction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// The accounting broke. `dump` is the pretty-printed state at the time.
    #[error("invariant violated: {detail}")]
    InvariantViolation { detail: String, dump: String },
    #[error("need at least 2 players with chips, found {0}")]
    NotEnoughPlayers(usize),
    #[error("{players} players need {needed} cards but the deck holds {available}")]
    TooManyPlayers { players: usize, needed: usize, available: usize },
    #[error("hand is already in {0}")]
    InvalidRound(Round),
    #[error("dealer seat {dealer} is out of range for {seats} seats")]
    InvalidDealer { dealer: usize, seats: usize },
    #[error("{strategies} strategies for {seats} seats")]
    StrategyCount { seats: usize, strategies: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn violation(state: &GameState, detail: impl Into<String>) -> EngineError {
    let detail = detail.into();
    let dump = format!("{state:#?}");
    log::error!("hand {}: invariant violated: {detail}\n{dump}", state.hand_number);
    EngineError::InvariantViolation { detail, dump }
}

fn audit(state: &GameState) -> Result<(), EngineError> {
    state.audit().map_err(|detail| violation(state, detail))
}

/// Everything that happened in one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandResult {
    pub hand_number: u32,
    pub seats: Vec<PlayerId>,
    pub payouts: Vec<Payout>,
    pub faults: Vec<StrategyFault>,
    pub board: Vec<Card>,
    pub history: Vec<HistoryEntry>,
    /// Hands compared at showdown; empty if the pot was uncontested.
    pub showdown: Vec<ShownHand>,
}

impl HandResult {
    /// Chips paid out to `seat`.
    pub fn won_by(&self, seat: usize) -> u64 {
        self.payouts.iter().filter(|p| p.seat == seat).map(|p| p.amount).sum()
    }

    /// The public part of the result, as shown to strategies.
    pub fn summary(&self) -> HandSummary {
        HandSummary {
            hand_number: self.hand_number,
            seats: self.seats.clone(),
            board: self.board.clone(),
            payouts: self.payouts.clone(),
            history: self.history.clone(),
            showdown: self.showdown.clone(),
        }
    }
}

#[derive(Debug)]
pub struct RoundEngine<R = HoldemRanker> {
    config: TableConfig,
    ranker: R,
    rng: ChaCha8Rng,
    invoker: StrategyHookInvoker,
    hands_dealt: u32,
}

impl RoundEngine<HoldemRanker> {
    pub fn new(config: TableConfig) -> Result<Self, EngineError> {
        Self::with_ranker(config, HoldemRanker)
    }
}

impl<R: Ranker> RoundEngine<R> {
    /// Use a custom showdown ranking.
    pub fn with_ranker(config: TableConfig, ranker: R) -> Result<Self, EngineError> {
        config.validate()?;
        let invoker = StrategyHookInvoker::new(config.decision_timeout);
        let rng = ChaCha8Rng::seed_from_u64(rand::rng().random());
        Ok(Self { config, ranker, rng, invoker, hands_dealt: 0 })
    }

    /// Make shuffles reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn invoker(&self) -> &StrategyHookInvoker {
        &self.invoker
    }

    /// Set up a hand with a freshly shuffled deck.
    pub fn new_hand(
        &mut self,
        players: Vec<Player>,
        dealer: usize,
    ) -> Result<GameState, EngineError> {
        let deck = Deck::shuffled(&mut self.rng);
        self.new_hand_with_deck(players, dealer, deck)
    }

    /// Set up a hand dealt from `deck`.
    ///
    /// Cards come off the deck in this order: two hole cards to each player in turn,
    /// starting left of the dealer, then the board cards of each round.
    pub fn new_hand_with_deck(
        &mut self,
        players: Vec<Player>,
        dealer: usize,
        deck: Deck,
    ) -> Result<GameState, EngineError> {
        if dealer >= players.len() {
            return Err(EngineError::InvalidDealer { dealer, seats: players.len() });
        }
        let funded = players.iter().filter(|p| p.stack > 0).count();
        if funded < 2 {
            return Err(EngineError::NotEnoughPlayers(funded));
        }
        let board: usize = self.config.board_schedule.iter().sum();
        let needed = funded * HOLE_CARDS + board;
        if needed > deck.len() {
            return Err(EngineError::TooManyPlayers {
                players: funded,
                needed,
                available: deck.len(),
            });
        }
        self.hands_dealt += 1;
        Ok(GameState::new(self.hands_dealt, players, dealer, deck))
    }

    /// Play a hand to completion. `strategies[i]` decides for seat `i`.
    pub fn run_hand(
        &mut self,
        state: &mut GameState,
        strategies: &[StrategyHandle],
    ) -> Result<HandResult, EngineError> {
        if state.round != Round::PreDeal {
            return Err(EngineError::InvalidRound(state.round));
        }
        if strategies.len() != state.players.len() {
            return Err(EngineError::StrategyCount {
                seats: state.players.len(),
                strategies: strategies.len(),
            });
        }
        log::debug!(
            "hand {}: {} players, dealer seat {}",
            state.hand_number,
            state.contenders().len(),
            state.dealer
        );

        let opener = self.post_forced_bets(state)?;
        self.deal_hole_cards(state)?;
        audit(state)?;

        let mut faults = Vec::new();
        let mut uncontested = None;
        for (index, &reveal) in self.config.board_schedule.iter().enumerate() {
            state.round = Round::Betting(index as u8 + 1);
            if index > 0 {
                PotManager::reset_round(&mut state.players);
                state.bet_to_call = 0;
            }
            state.min_raise = self.config.opening_min_raise();
            self.reveal(state, reveal)?;
            let start = if index == 0 { opener } else { state.dealer };
            if let Some(seat) = self.betting_round(state, strategies, start, &mut faults)? {
                uncontested = Some(seat);
                break;
            }
        }

        let (payouts, showdown) = match uncontested {
            Some(seat) => (ShowdownResolver::uncontested(state, seat), Vec::new()),
            None => {
                state.round = Round::Showdown;
                let shown = ShowdownResolver::reveal(state, &self.ranker)
                    .map_err(|e| violation(state, e.to_string()))?;
                let payouts = ShowdownResolver::resolve(state, &self.ranker)
                    .map_err(|e| violation(state, e.to_string()))?;
                (payouts, shown)
            }
        };
        self.pay_out(state, &payouts)?;

        log::info!(
            "hand {} complete: {}",
            state.hand_number,
            payouts
                .iter()
                .map(|p| format!("{} wins {}", state.players[p.seat].name, p.amount))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(HandResult {
            hand_number: state.hand_number,
            seats: state.players.iter().map(|p| p.id).collect(),
            payouts,
            faults,
            board: state.board.as_slice().to_vec(),
            history: state.history.clone(),
            showdown,
        })
    }

    /// Next seat after `from` that was dealt into the hand.
    fn next_in_hand(state: &GameState, from: usize) -> usize {
        let n = state.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| state.players[i].status.in_hand())
            .unwrap_or(from)
    }

    /// Antes, then blinds. Returns the seat the first betting round starts after.
    fn post_forced_bets(&self, state: &mut GameState) -> Result<usize, EngineError> {
        if self.config.ante > 0 {
            for seat in 0..state.players.len() {
                if state.players[seat].status != PlayerStatus::Active {
                    continue;
                }
                let paid = PotManager::post_ante(&mut state.players[seat], self.config.ante);
                state.record(seat, HistoryVerb::Ante, Some(paid), false);
            }
        }
        if self.config.small_blind == 0 && self.config.big_blind == 0 {
            return Ok(state.dealer);
        }

        let heads_up = state.contenders().len() == 2;
        let small = if heads_up && state.players[state.dealer].status.in_hand() {
            state.dealer
        } else {
            Self::next_in_hand(state, state.dealer)
        };
        let big = Self::next_in_hand(state, small);
        for (seat, blind, verb) in [
            (small, self.config.small_blind, HistoryVerb::SmallBlind),
            (big, self.config.big_blind, HistoryVerb::BigBlind),
        ] {
            let amount = blind.min(state.players[seat].stack);
            if amount == 0 {
                continue;
            }
            PotManager::record_contribution(&mut state.players[seat], amount)
                .map_err(|e| violation(state, e.to_string()))?;
            state.record(seat, verb, Some(amount), false);
        }
        state.bet_to_call = PotManager::highest_round_contribution(&state.players);
        Ok(big)
    }

    fn deal_hole_cards(&self, state: &mut GameState) -> Result<(), EngineError> {
        let n = state.players.len();
        for step in 1..=n {
            let seat = (state.dealer + step) % n;
            if !state.players[seat].status.in_hand() {
                continue;
            }
            let cards = state
                .deck
                .draw_n(HOLE_CARDS)
                .ok_or_else(|| violation(state, "deck exhausted while dealing"))?;
            let hole = HoleCards::try_new(cards[0], cards[1])
                .map_err(|e| violation(state, e.to_string()))?;
            state.players[seat].hole = Some(hole);
        }
        Ok(())
    }

    fn reveal(&self, state: &mut GameState, count: usize) -> Result<(), EngineError> {
        if count == 0 {
            return Ok(());
        }
        let cards = state
            .deck
            .draw_n(count)
            .ok_or_else(|| violation(state, "deck exhausted while revealing the board"))?;
        state.board.extend(cards);
        log::debug!(
            "hand {}: {} board {}",
            state.hand_number,
            state.round,
            state.board.as_slice().iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
        );
        Ok(())
    }

    /// Run one betting round. Returns the last seat standing if everyone else folded.
    fn betting_round(
        &self,
        state: &mut GameState,
        strategies: &[StrategyHandle],
        start_after: usize,
        faults: &mut Vec<StrategyFault>,
    ) -> Result<Option<usize>, EngineError> {
        let mut scheduler = TurnScheduler::starting_after(start_after);
        loop {
            match scheduler.advance(state) {
                Turn::RoundComplete => return Ok(None),
                Turn::Uncontested(seat) => return Ok(Some(seat)),
                Turn::Act(seat) => {
                    let (action, forced) = self.decide(state, &strategies[seat], seat, faults)?;
                    Self::apply(state, seat, action, forced)?;
                    audit(state)?;
                }
            }
        }
    }

    /// Ask the strategy; on any failure substitute check-or-fold and record the fault.
    fn decide(
        &self,
        state: &GameState,
        handle: &StrategyHandle,
        seat: usize,
        faults: &mut Vec<StrategyFault>,
    ) -> Result<(NormalizedAction, bool), EngineError> {
        let private = state
            .private_view(seat)
            .ok_or_else(|| violation(state, format!("seat {seat} on turn without hole cards")))?;
        let kind = match self.invoker.invoke(handle, state.public_view(seat), private) {
            Ok(action) => match ActionValidator::validate(state, seat, action) {
                Ok(normalized) => return Ok((normalized, false)),
                Err(e) => FaultKind::Rejected(e),
            },
            Err(kind) => kind,
        };
        let substituted = ActionValidator::fallback(state, seat);
        let player = &state.players[seat];
        log::warn!(
            "hand {}: {} ({}) faulted in {}: {kind}; playing {substituted:?}",
            state.hand_number,
            player.name,
            handle.name(),
            state.round
        );
        faults.push(StrategyFault {
            seat,
            player: player.id,
            round: state.round,
            kind,
            substituted,
        });
        Ok((substituted, true))
    }

    fn apply(
        state: &mut GameState,
        seat: usize,
        action: NormalizedAction,
        forced: bool,
    ) -> Result<(), EngineError> {
        state.on_turn = None;
        let verb = match action {
            NormalizedAction::Fold => {
                state.players[seat].status = PlayerStatus::Folded;
                HistoryVerb::Fold
            }
            NormalizedAction::Check => HistoryVerb::Check,
            NormalizedAction::Call(_) => HistoryVerb::Call,
            NormalizedAction::Raise(_) => HistoryVerb::Raise,
            NormalizedAction::AllIn(_) => HistoryVerb::AllIn,
        };
        let chips = action.chips();
        if chips > 0 {
            PotManager::record_contribution(&mut state.players[seat], chips)
                .map_err(|e| violation(state, e.to_string()))?;
        }

        let contribution = state.players[seat].round_contribution;
        if contribution > state.bet_to_call {
            let raise = contribution - state.bet_to_call;
            // Only a full raise reopens the action for players who already acted.
            if raise >= state.min_raise {
                state.min_raise = raise;
                for (i, p) in state.players.iter_mut().enumerate() {
                    if i != seat {
                        p.acted = false;
                    }
                }
            }
            state.bet_to_call = contribution;
        }
        state.players[seat].acted = true;
        state.record(seat, verb, (chips > 0).then_some(chips), forced);
        Ok(())
    }

    fn pay_out(&self, state: &mut GameState, payouts: &[Payout]) -> Result<(), EngineError> {
        let paid: u64 = payouts.iter().map(|p| p.amount).sum();
        if paid != state.pot() {
            return Err(violation(state, format!("paid {paid} out of a pot of {}", state.pot())));
        }
        for payout in payouts {
            state.players[payout.seat].stack += payout.amount;
            let verb = if payout.split { HistoryVerb::Split } else { HistoryVerb::Win };
            state.record(payout.seat, verb, Some(payout.amount), false);
        }
        PotManager::sweep(&mut state.players);
        state.bet_to_call = 0;
        state.on_turn = None;
        state.round = Round::Complete;
        for p in &mut state.players {
            if p.stack == 0 {
                p.status = PlayerStatus::Eliminated;
            }
        }
        audit(state)
    }
}
