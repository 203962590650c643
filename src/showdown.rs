//! Ranking the contesting hands and awarding each pot layer.

use crate::evaluator::{Ranker, Score};
use crate::hand::HoleCards;
use crate::player::PlayerId;
use crate::state::GameState;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShowdownError {
    #[error("seat {0} contests the pot without hole cards")]
    MissingHole(usize),
}

/// Chips awarded to one seat for the hand, all layers combined.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Payout {
    pub seat: usize,
    pub player: PlayerId,
    pub amount: u64,
    /// At least one layer was shared with another winner.
    pub split: bool,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ShownHand {
    pub seat: usize,
    pub player: PlayerId,
    pub hole: HoleCards,
    pub score: Score,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShowdownResolver;

impl ShowdownResolver {
    /// Score every hand still in the pot, in seat order.
    pub fn reveal<R: Ranker + ?Sized>(
        state: &GameState,
        ranker: &R,
    ) -> Result<Vec<ShownHand>, ShowdownError> {
        state
            .contenders()
            .into_iter()
            .map(|seat| {
                let p = &state.players[seat];
                let hole = p.hole.ok_or(ShowdownError::MissingHole(seat))?;
                let score = ranker.rank(&hole, state.board.as_slice());
                Ok(ShownHand { seat, player: p.id, hole, score })
            })
            .collect()
    }

    /// Award every pot layer to its best eligible hand(s).
    ///
    /// Ties split evenly; leftover chips go one at a time to the tied winners closest to
    /// the dealer's left. A layer nobody may win (its funders all folded) goes to the
    /// winners of the layer below it.
    pub fn resolve<R: Ranker + ?Sized>(
        state: &GameState,
        ranker: &R,
    ) -> Result<Vec<Payout>, ShowdownError> {
        let shown = Self::reveal(state, ranker)?;
        let n = state.players.len();
        let mut scores: Vec<Option<Score>> = vec![None; n];
        for hand in &shown {
            scores[hand.seat] = Some(hand.score);
        }

        let start = (state.dealer + 1) % n;
        let mut winnings = vec![0u64; n];
        let mut split = vec![false; n];
        let mut previous: Vec<usize> = shown.iter().map(|h| h.seat).collect();
        for pot in state.pots() {
            let pool = if pot.eligible.is_empty() { previous.clone() } else { pot.eligible };
            let best = pool.iter().filter_map(|&i| scores[i]).max();
            let mut winners: Vec<usize> =
                pool.into_iter().filter(|&i| best.is_some() && scores[i] == best).collect();
            if winners.is_empty() {
                continue;
            }
            winners.sort_by_key(|&i| (i + n - start) % n);
            let share = pot.value / winners.len() as u64;
            let mut odd = pot.value % winners.len() as u64;
            for &i in &winners {
                let extra = u64::from(odd > 0);
                odd -= extra;
                winnings[i] += share + extra;
                split[i] |= winners.len() > 1;
            }
            previous = winners;
        }

        Ok(winnings
            .into_iter()
            .enumerate()
            .filter(|&(_, amount)| amount > 0)
            .map(|(seat, amount)| Payout {
                seat,
                player: state.players[seat].id,
                amount,
                split: split[seat],
            })
            .collect())
    }

    /// The whole pot to the last seat holding cards.
    pub fn uncontested(state: &GameState, seat: usize) -> Vec<Payout> {
        let amount = state.pot();
        if amount == 0 {
            return Vec::new();
        }
        vec![Payout { seat, player: state.players[seat].id, amount, split: false }]
    }
}
