use std::fmt;
use std::str::FromStr;

/// Card ranks from Two (low) to Ace (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Rank::value`]; `None` outside `2..=14`.
    pub fn from_value(v: u8) -> Option<Rank> {
        v.checked_sub(2).and_then(|i| Rank::ALL.get(i as usize)).copied()
    }

    const SYMBOLS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

    pub fn to_char(self) -> char {
        Self::SYMBOLS[(self.value() - 2) as usize]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Rank {
    type Error = CardParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let up = c.to_ascii_uppercase();
        Rank::SYMBOLS
            .iter()
            .position(|&s| s == up)
            .map(|i| Rank::ALL[i])
            .ok_or_else(|| CardParseError::Rank(c.to_string()))
    }
}

/// Four suits; the order carries no hand strength but keeps sorting stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub const fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Suit {
    type Error = CardParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        Suit::ALL
            .iter()
            .copied()
            .find(|s| s.to_char() == c.to_ascii_lowercase())
            .ok_or_else(|| CardParseError::Suit(c.to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error("invalid rank: '{0}'")]
    Rank(String),
    #[error("invalid suit: '{0}'")]
    Suit(String),
}

/// A playing card: rank + suit.
///
/// ```
/// use poker_arena::cards::{Card, Rank, Suit};
///
/// let card: Card = "Td".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Ten, Suit::Diamonds));
/// assert_eq!(card.to_string(), "Td");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        let suit_ch = chars.next_back().ok_or_else(|| CardParseError::Invalid(s.to_string()))?;
        let rank = match chars.as_str() {
            "10" => Rank::Ten,
            r if r.chars().count() == 1 => Rank::try_from(r.chars().next().unwrap_or(' '))?,
            _ => return Err(CardParseError::Invalid(s.to_string())),
        };
        Ok(Card::new(rank, Suit::try_from(suit_ch)?))
    }
}

/// Parse cards separated by whitespace or commas.
///
/// ```
/// use poker_arena::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("As, Kd 10c").unwrap();
/// assert_eq!(cards.len(), 3);
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Clubs));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}
