//! Legality of a proposed action and the exact chips it would move.

use crate::player::PlayerStatus;
use crate::state::GameState;

/// What a strategy asks to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    Call,
    /// Move this many chips from the stack into the pot.
    Raise(u64),
    AllIn,
}

/// A validated action with the chips it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedAction {
    Fold,
    Check,
    Call(u64),
    Raise(u64),
    AllIn(u64),
}

impl NormalizedAction {
    pub fn chips(self) -> u64 {
        match self {
            NormalizedAction::Fold | NormalizedAction::Check => 0,
            NormalizedAction::Call(c)
            | NormalizedAction::Raise(c)
            | NormalizedAction::AllIn(c) => c,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("seat is not on turn")]
    NotYourTurn,
    #[error("cannot check with {to_call} to call")]
    CheckNotAllowed { to_call: u64 },
    #[error("raise too small: min {min}, got {got}")]
    RaiseTooSmall { min: u64, got: u64 },
    #[error("insufficient chips: stack {stack}, got {got}")]
    InsufficientChips { stack: u64, got: u64 },
}

/// Pure rules check; never touches the state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionValidator;

impl ActionValidator {
    pub fn validate(
        state: &GameState,
        seat: usize,
        action: Action,
    ) -> Result<NormalizedAction, ActionError> {
        let player = match state.players.get(seat) {
            Some(p) if state.on_turn == Some(seat) && p.status == PlayerStatus::Active => p,
            _ => return Err(ActionError::NotYourTurn),
        };
        let stack = player.stack;
        let contribution = player.round_contribution;
        let owed = state.bet_to_call.saturating_sub(contribution);

        match action {
            Action::Fold => Ok(NormalizedAction::Fold),
            Action::Check if owed == 0 => Ok(NormalizedAction::Check),
            Action::Check => Err(ActionError::CheckNotAllowed { to_call: owed }),
            Action::Call if owed == 0 => Ok(NormalizedAction::Check),
            Action::Call if stack <= owed => Ok(NormalizedAction::AllIn(stack)),
            Action::Call => Ok(NormalizedAction::Call(owed)),
            Action::Raise(amount) => {
                if amount > stack {
                    return Err(ActionError::InsufficientChips { stack, got: amount });
                }
                let target = state.bet_to_call.saturating_add(state.min_raise);
                if contribution + amount >= target {
                    Ok(if amount == stack {
                        NormalizedAction::AllIn(stack)
                    } else {
                        NormalizedAction::Raise(amount)
                    })
                } else if amount == stack {
                    Ok(NormalizedAction::AllIn(stack))
                } else {
                    Err(ActionError::RaiseTooSmall { min: target - contribution, got: amount })
                }
            }
            Action::AllIn if stack > 0 => Ok(NormalizedAction::AllIn(stack)),
            Action::AllIn => Err(ActionError::InsufficientChips { stack, got: 0 }),
        }
    }

    /// The action the engine substitutes after a fault: check if legal, else fold.
    pub fn fallback(state: &GameState, seat: usize) -> NormalizedAction {
        match Self::validate(state, seat, Action::Check) {
            Ok(action) => action,
            Err(_) => NormalizedAction::Fold,
        }
    }
}
