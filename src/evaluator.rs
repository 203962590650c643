//! Hand ranking used at showdown.
//!
//! The engine only relies on [`Ranker`]: a deterministic function from hole cards
//! plus board to a totally ordered [`Score`] where higher is better. [`HoldemRanker`]
//! is the default implementation (best five cards out of everything available).

use crate::cards::{Card, Rank};
use crate::hand::HoleCards;
use std::fmt;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    const ALL: [Category; 9] = [
        Category::HighCard,
        Category::Pair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparable hand strength. Higher is better.
///
/// Layout: `[ category (4 bits) | r0 | r1 | r2 | r3 | r4 ]`, 4 bits per rank with the
/// primary tiebreaker most significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    const CATEGORY_SHIFT: u32 = 20;

    /// Wrap an arbitrary ordered value; custom rankers use this directly.
    pub const fn new(raw: u32) -> Self {
        Score(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    fn pack(category: Category, tiebreak: &[u8]) -> Self {
        let mut v = (category as u32) << Self::CATEGORY_SHIFT;
        for (i, r) in tiebreak.iter().take(5).enumerate() {
            v |= (*r as u32) << (16 - 4 * i as u32);
        }
        Score(v)
    }

    /// Category of a score produced by [`HoldemRanker`].
    pub fn category(self) -> Option<Category> {
        Category::ALL.get((self.0 >> Self::CATEGORY_SHIFT) as usize).copied()
    }
}

/// The showdown ranking function.
pub trait Ranker {
    fn rank(&self, hole: &HoleCards, board: &[Card]) -> Score;
}

impl<F> Ranker for F
where
    F: Fn(&HoleCards, &[Card]) -> Score,
{
    fn rank(&self, hole: &HoleCards, board: &[Card]) -> Score {
        self(hole, board)
    }
}

/// Standard high-hand ranking over hole + board cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldemRanker;

impl Ranker for HoldemRanker {
    fn rank(&self, hole: &HoleCards, board: &[Card]) -> Score {
        let mut all = hole.cards().to_vec();
        all.extend_from_slice(board);
        best_five(&all).unwrap_or_else(|| {
            let mut ranks: Vec<u8> = all.iter().map(|c| c.rank().value()).collect();
            ranks.sort_unstable_by(|a, b| b.cmp(a));
            Score::pack(Category::HighCard, &ranks)
        })
    }
}

/// Highest card of a five-card straight in `mask` (bit `v` set for rank value `v`).
fn straight_top(mask: u16) -> Option<u8> {
    // The ace also plays low, as bit 1.
    let mask = if mask & (1 << Rank::Ace.value()) != 0 { mask | 0b10 } else { mask };
    (5..=Rank::Ace.value()).rev().find(|&top| {
        let run = 0b1_1111u16 << (top - 4);
        mask & run == run
    })
}

/// Score exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Score {
    let mut counts = [0u8; 15];
    let mut mask = 0u16;
    for c in cards {
        counts[c.rank().value() as usize] += 1;
        mask |= 1 << c.rank().value();
    }
    let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight = straight_top(mask);

    // (count, rank) pairs, biggest groups first, then by rank.
    let mut groups: Vec<(u8, u8)> =
        (2..=14u8).filter(|&v| counts[v as usize] > 0).map(|v| (counts[v as usize], v)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let first = groups[0].0;
    let second = groups.get(1).map(|g| g.0).unwrap_or(0);

    let category = match (flush, straight, first, second) {
        (true, Some(_), _, _) => Category::StraightFlush,
        (_, _, 4, _) => Category::FourOfAKind,
        (_, _, 3, 2) => Category::FullHouse,
        (true, None, _, _) => Category::Flush,
        (false, Some(_), _, _) => Category::Straight,
        (_, _, 3, _) => Category::ThreeOfAKind,
        (_, _, 2, 2) => Category::TwoPair,
        (_, _, 2, _) => Category::Pair,
        _ => Category::HighCard,
    };
    match straight {
        Some(top) if matches!(category, Category::Straight | Category::StraightFlush) => {
            Score::pack(category, &[top])
        }
        _ => {
            let tiebreak: Vec<u8> = groups.iter().map(|g| g.1).collect();
            Score::pack(category, &tiebreak)
        }
    }
}

/// Best five-card score out of `cards`, or `None` with fewer than five.
pub fn best_five(cards: &[Card]) -> Option<Score> {
    let n = cards.len();
    if n < 5 {
        return None;
    }
    let mut idx = [0, 1, 2, 3, 4];
    let mut best = None;
    loop {
        best = best.max(Some(evaluate_five(&idx.map(|i| cards[i]))));
        let mut i = 5;
        loop {
            if i == 0 {
                return best;
            }
            i -= 1;
            if idx[i] < n - 5 + i {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}
