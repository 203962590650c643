//! The per-hand aggregate and the read-only projections handed to strategies.

use crate::cards::Card;
use crate::deck::Deck;
use crate::hand::{Board, HoleCards};
use crate::player::{Player, PlayerId, PlayerStatus};
use crate::pot::{Pot, PotManager};
use std::fmt;

/// Where a hand is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Round {
    PreDeal,
    /// Betting round, numbered from 1.
    Betting(u8),
    Showdown,
    Complete,
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::PreDeal => f.write_str("Pre-deal"),
            Round::Betting(n) => write!(f, "Round {n}"),
            Round::Showdown => f.write_str("Showdown"),
            Round::Complete => f.write_str("Complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Ante,
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Ante => "Ante",
            HistoryVerb::SmallBlind => "SB",
            HistoryVerb::BigBlind => "BB",
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Check => "Check",
            HistoryVerb::Call => "Call",
            HistoryVerb::Raise => "Raise",
            HistoryVerb::AllIn => "All-in",
            HistoryVerb::Win => "Win",
            HistoryVerb::Split => "Split",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub seat: usize,
    pub player: PlayerId,
    pub round: Round,
    pub verb: HistoryVerb,
    /// Chips moved by this entry, if any.
    pub amount: Option<u64>,
    /// The engine substituted this action after a strategy fault.
    pub forced: bool,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] seat {} {}", self.round, self.seat, self.verb.label())?;
        if let Some(amount) = self.amount {
            write!(f, " {amount}")?;
        }
        if self.forced {
            f.write_str(" (forced)")?;
        }
        Ok(())
    }
}

/// Everything about one hand in progress. Owned by the engine for the hand's duration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GameState {
    pub(crate) hand_number: u32,
    pub(crate) players: Vec<Player>,
    pub(crate) board: Board,
    pub(crate) deck: Deck,
    pub(crate) round: Round,
    pub(crate) bet_to_call: u64,
    pub(crate) min_raise: u64,
    pub(crate) dealer: usize,
    pub(crate) on_turn: Option<usize>,
    pub(crate) history: Vec<HistoryEntry>,
    /// Sum of stacks when the hand was created; conserved until the hand ends.
    pub(crate) chips_in_play: u64,
}

impl GameState {
    pub(crate) fn new(
        hand_number: u32,
        mut players: Vec<Player>,
        dealer: usize,
        deck: Deck,
    ) -> Self {
        for p in &mut players {
            p.reset_for_hand();
        }
        let chips_in_play = players.iter().map(|p| p.stack).sum();
        Self {
            hand_number,
            players,
            board: Board::default(),
            deck,
            round: Round::PreDeal,
            bet_to_call: 0,
            min_raise: 0,
            dealer,
            on_turn: None,
            history: Vec::new(),
            chips_in_play,
        }
    }

    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Hand the players back to the driver once the hand is over.
    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn bet_to_call(&self) -> u64 {
        self.bet_to_call
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    /// Seat whose decision is pending, if a betting round is in progress.
    pub fn on_turn(&self) -> Option<usize> {
        self.on_turn
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn pot(&self) -> u64 {
        PotManager::pot_total(&self.players)
    }

    pub fn pots(&self) -> Vec<Pot> {
        PotManager::compute_pots(&self.players)
    }

    pub fn chips_in_play(&self) -> u64 {
        self.chips_in_play
    }

    /// Chips the seat still owes to stay in the current round.
    pub fn to_call(&self, seat: usize) -> u64 {
        self.players.get(seat).map_or(0, |p| self.bet_to_call.saturating_sub(p.round_contribution))
    }

    pub(crate) fn count_status(&self, status: PlayerStatus) -> usize {
        self.players.iter().filter(|p| p.status == status).count()
    }

    pub(crate) fn contenders(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status.in_hand())
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn record(
        &mut self,
        seat: usize,
        verb: HistoryVerb,
        amount: Option<u64>,
        forced: bool,
    ) {
        let player = self.players[seat].id;
        let entry = HistoryEntry { seat, player, round: self.round, verb, amount, forced };
        log::debug!("hand {}: {} ({})", self.hand_number, entry, self.players[seat].name);
        self.history.push(entry);
    }

    /// Check the accounting invariants; `Err` carries a description of the first breach.
    pub(crate) fn audit(&self) -> Result<(), String> {
        let held: u64 = self.players.iter().map(|p| p.stack + p.total_contribution).sum();
        if held != self.chips_in_play {
            return Err(format!("chips not conserved: {held} held, {} in play", self.chips_in_play));
        }
        let highest = PotManager::highest_round_contribution(&self.players);
        if highest != self.bet_to_call {
            return Err(format!(
                "bet to call {} but highest contribution {highest}",
                self.bet_to_call
            ));
        }
        let broke = self.players.iter().find(|p| p.status == PlayerStatus::Active && p.stack == 0);
        if let Some(p) = broke {
            return Err(format!("player {} is active with an empty stack", p.id));
        }
        if let Some(seat) = self.on_turn {
            if self.players.get(seat).map(|p| p.status) != Some(PlayerStatus::Active) {
                return Err(format!("seat {seat} is on turn but cannot act"));
            }
        }
        Ok(())
    }

    /// Snapshot of what every player at the table may know.
    pub fn public_view(&self, seat: usize) -> PublicView {
        let seats = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| SeatView {
                seat: i,
                id: p.id,
                name: p.name.clone(),
                stack: p.stack,
                status: p.status,
                round_contribution: p.round_contribution,
                total_contribution: p.total_contribution,
            })
            .collect();
        let round_history =
            self.history.iter().filter(|e| e.round == self.round).cloned().collect();
        PublicView {
            hand_number: self.hand_number,
            round: self.round,
            board: self.board.as_slice().to_vec(),
            pot: self.pot(),
            bet_to_call: self.bet_to_call,
            min_raise: self.min_raise,
            dealer: self.dealer,
            seat,
            seats,
            round_history,
        }
    }

    /// Snapshot of what only `seat` may know; `None` if the seat holds no cards.
    pub fn private_view(&self, seat: usize) -> Option<PrivateView> {
        let p = self.players.get(seat)?;
        Some(PrivateView {
            seat,
            id: p.id,
            hole: p.hole?,
            stack: p.stack,
            round_contribution: p.round_contribution,
            to_call: self.to_call(seat),
        })
    }
}

/// Public information about one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SeatView {
    pub seat: usize,
    pub id: PlayerId,
    pub name: String,
    pub stack: u64,
    pub status: PlayerStatus,
    pub round_contribution: u64,
    pub total_contribution: u64,
}

/// Table state every remaining player could legally know. Contains no hole cards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct PublicView {
    pub hand_number: u32,
    pub round: Round,
    pub board: Vec<Card>,
    pub pot: u64,
    pub bet_to_call: u64,
    pub min_raise: u64,
    pub dealer: usize,
    /// The seat being asked to act.
    pub seat: usize,
    pub seats: Vec<SeatView>,
    pub round_history: Vec<HistoryEntry>,
}

impl PublicView {
    /// The acting seat's public entry.
    pub fn me(&self) -> Option<&SeatView> {
        self.seats.get(self.seat)
    }

    /// Chips the acting seat must add for the smallest legal raise.
    pub fn min_raise_chips(&self) -> u64 {
        let mine = self.me().map_or(0, |s| s.round_contribution);
        self.bet_to_call.saturating_add(self.min_raise).saturating_sub(mine)
    }

    /// Players other than the actor still holding cards.
    pub fn opponents_in_hand(&self) -> usize {
        self.seats.iter().filter(|s| s.seat != self.seat && s.status.in_hand()).count()
    }
}

/// The acting player's own cards and chip position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct PrivateView {
    pub seat: usize,
    pub id: PlayerId,
    pub hole: HoleCards,
    pub stack: u64,
    pub round_contribution: u64,
    pub to_call: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let players =
            (0..3).map(|i| Player::new(PlayerId(i), format!("P{}", i + 1), 100)).collect();
        let mut s = GameState::new(1, players, 0, Deck::seeded(1));
        s.players[1].hole = Some("As Kd".parse().unwrap());
        s.round = Round::Betting(1);
        s
    }

    #[test]
    fn public_view_hides_hole_cards() {
        let s = state();
        let public = s.public_view(1);
        assert_eq!(public.seats.len(), 3);
        assert!(!format!("{public:?}").contains("Spades"));
        let private = s.private_view(1).unwrap();
        assert_eq!(private.hole, "As Kd".parse().unwrap());
        assert!(s.private_view(0).is_none());
    }

    #[test]
    fn audit_flags_created_chips() {
        let mut s = state();
        s.audit().unwrap();
        s.players[0].stack += 1;
        assert!(s.audit().unwrap_err().contains("not conserved"));
    }

    #[test]
    fn audit_flags_stale_bet_to_call() {
        let mut s = state();
        PotManager::record_contribution(&mut s.players[0], 20).unwrap();
        assert!(s.audit().is_err());
        s.bet_to_call = 20;
        s.audit().unwrap();
    }
}
