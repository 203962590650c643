//! Monte Carlo win probability against random opponent hands.

use crate::cards::Card;
use crate::deck::Deck;
use crate::evaluator::Ranker;
use crate::hand::{HoleCards, MAX_BOARD};
use rand::seq::SliceRandom;
use rand::Rng;

/// Estimate how often `hole` wins against `opponents` random hands once the board is
/// completed to five cards. A tie with the best opponent counts as half a win.
///
/// Returns a value in `0.0..=1.0`; `0.0` when there are no iterations or not enough
/// unseen cards to deal the opponents.
pub fn estimate<G, K>(
    hole: &HoleCards,
    board: &[Card],
    opponents: usize,
    iterations: u32,
    rng: &mut G,
    ranker: &K,
) -> f64
where
    G: Rng + ?Sized,
    K: Ranker + ?Sized,
{
    let known: Vec<Card> = hole.cards().iter().chain(board).copied().collect();
    let mut unseen: Vec<Card> =
        Deck::standard().remaining().iter().filter(|c| !known.contains(c)).copied().collect();

    let missing = MAX_BOARD.saturating_sub(board.len());
    if iterations == 0 || missing + 2 * opponents > unseen.len() {
        return 0.0;
    }

    let mut wins = 0.0;
    let mut full_board = Vec::with_capacity(MAX_BOARD);
    for _ in 0..iterations {
        unseen.shuffle(rng);
        full_board.clear();
        full_board.extend_from_slice(board);
        full_board.extend_from_slice(&unseen[..missing]);

        let hero = ranker.rank(hole, &full_board);
        let best_opponent = unseen[missing..missing + 2 * opponents]
            .chunks_exact(2)
            .filter_map(|pair| HoleCards::try_new(pair[0], pair[1]).ok())
            .map(|opp| ranker.rank(&opp, &full_board))
            .max();
        wins += match best_opponent {
            Some(best) if best > hero => 0.0,
            Some(best) if best == hero => 0.5,
            _ => 1.0,
        };
    }
    wins / f64::from(iterations)
}
