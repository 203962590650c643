use crate::hand::HoleCards;
use std::fmt;

/// Stable identity of a player across hands; seat indices change as players bust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
    Eliminated,
}

impl PlayerStatus {
    /// Still holding cards that can win a pot.
    pub fn in_hand(self) -> bool {
        matches!(self, PlayerStatus::Active | PlayerStatus::AllIn)
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) name: String,
    pub(crate) stack: u64,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) status: PlayerStatus,
    pub(crate) round_contribution: u64,
    pub(crate) total_contribution: u64,
    pub(crate) acted: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, stack: u64) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            hole: None,
            status: if stack == 0 { PlayerStatus::Eliminated } else { PlayerStatus::Active },
            round_contribution: 0,
            total_contribution: 0,
            acted: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chips behind, not yet committed this hand.
    pub fn stack(&self) -> u64 {
        self.stack
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    /// Chips committed in the current betting round.
    pub fn round_contribution(&self) -> u64 {
        self.round_contribution
    }

    /// Chips committed over the whole hand, antes included.
    pub fn total_contribution(&self) -> u64 {
        self.total_contribution
    }

    /// Whether the player has voluntarily acted since the round (or last full raise) began.
    pub fn has_acted(&self) -> bool {
        self.acted
    }

    /// Clear everything but identity and stack for a fresh hand.
    pub(crate) fn reset_for_hand(&mut self) {
        self.hole = None;
        self.round_contribution = 0;
        self.total_contribution = 0;
        self.acted = false;
        self.status =
            if self.stack == 0 { PlayerStatus::Eliminated } else { PlayerStatus::Active };
    }
}
