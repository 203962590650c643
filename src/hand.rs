use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Most community cards a board can hold.
pub const MAX_BOARD: usize = 5;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private hole cards.
///
/// ```
/// use poker_arena::hand::HoleCards;
///
/// let hole: HoleCards = "As Kd".parse().unwrap();
/// assert_eq!(hole.to_string(), "As Kd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleCards([Card; 2]);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self([a, b]))
    }

    pub fn cards(&self) -> [Card; 2] {
        self.0
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0[0], self.0[1])
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        match cards.as_slice() {
            [a, b] => Self::try_new(*a, *b),
            other => Err(HandError::HoleCount(other.len())),
        }
    }
}

/// Community cards in reveal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > MAX_BOARD {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateBoardCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn extend<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}
