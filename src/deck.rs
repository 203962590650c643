use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The deck source for one hand: unique cards drawn without replacement.
#[derive(Debug, Clone)]
pub struct Deck {
    // Top of the deck is the end of the vector.
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use poker_arena::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// A standard deck shuffled with `rng` (Fisher-Yates, uniform).
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    /// A standard deck shuffled from a seed, for reproducible hands.
    pub fn seeded(seed: u64) -> Self {
        Self::shuffled(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// A deck that deals `cards` in the given order. Intended for tests and replays.
    pub fn stacked(mut cards: Vec<Card>) -> Self {
        cards.reverse();
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards still in the deck, bottom first.
    pub fn remaining(&self) -> &[Card] {
        &self.cards
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards, or `None` (leaving the deck untouched) if fewer remain.
    pub fn draw_n(&mut self, n: usize) -> Option<Vec<Card>> {
        if n > self.cards.len() {
            return None;
        }
        let split = self.cards.len() - n;
        let mut drawn = self.cards.split_off(split);
        drawn.reverse();
        Some(drawn)
    }
}
