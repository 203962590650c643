//! Whose turn it is, and when a betting round is over.

use crate::player::PlayerStatus;
use crate::state::GameState;

/// Result of asking the scheduler for the next decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// This seat must act next.
    Act(usize),
    /// Every active player has matched the bet and had a chance to respond.
    RoundComplete,
    /// Only this seat still holds cards; it wins without a showdown.
    Uncontested(usize),
}

/// Circular walk over the seats. The seating order is fixed for the hand; the scheduler
/// only remembers where the last decision was made.
#[derive(Debug, Clone, Copy)]
pub struct TurnScheduler {
    last: usize,
}

impl TurnScheduler {
    /// Start a round whose first candidate is the seat after `seat`.
    pub fn starting_after(seat: usize) -> Self {
        Self { last: seat }
    }

    /// Find the next seat to act, updating `state.on_turn` to match.
    pub fn advance(&mut self, state: &mut GameState) -> Turn {
        let contenders = state.contenders();
        if contenders.len() <= 1 {
            state.on_turn = None;
            return match contenders.first() {
                Some(&seat) => Turn::Uncontested(seat),
                None => Turn::RoundComplete,
            };
        }

        let n = state.players.len();
        let active = state.count_status(PlayerStatus::Active);
        let next = (1..=n).map(|step| (self.last + step) % n).find(|&seat| {
            let p = &state.players[seat];
            p.status == PlayerStatus::Active
                && (p.round_contribution < state.bet_to_call || (!p.acted && active > 1))
        });
        state.on_turn = next;
        match next {
            Some(seat) => {
                self.last = seat;
                Turn::Act(seat)
            }
            None => Turn::RoundComplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::player::{Player, PlayerId};
    use crate::pot::PotManager;
    use crate::state::Round;

    fn table(n: u32) -> GameState {
        let players =
            (0..n).map(|i| Player::new(PlayerId(i), format!("P{}", i + 1), 100)).collect();
        let mut s = GameState::new(1, players, 0, Deck::standard());
        s.round = Round::Betting(1);
        s
    }

    #[test]
    fn everyone_gets_one_chance_to_check() {
        let mut s = table(3);
        let mut sched = TurnScheduler::starting_after(0);
        for expected in [1, 2, 0] {
            assert_eq!(sched.advance(&mut s), Turn::Act(expected));
            assert_eq!(s.on_turn(), Some(expected));
            s.players[expected].acted = true;
        }
        assert_eq!(sched.advance(&mut s), Turn::RoundComplete);
        assert_eq!(s.on_turn(), None);
    }

    #[test]
    fn skips_folded_and_all_in_seats() {
        let mut s = table(4);
        s.players[1].status = PlayerStatus::Folded;
        s.players[2].status = PlayerStatus::AllIn;
        let mut sched = TurnScheduler::starting_after(0);
        assert_eq!(sched.advance(&mut s), Turn::Act(3));
    }

    #[test]
    fn seat_facing_a_bet_acts_again() {
        let mut s = table(3);
        for p in &mut s.players {
            p.acted = true;
        }
        PotManager::record_contribution(&mut s.players[2], 30).unwrap();
        s.bet_to_call = 30;
        let mut sched = TurnScheduler::starting_after(2);
        assert_eq!(sched.advance(&mut s), Turn::Act(0));
    }

    #[test]
    fn lone_active_player_with_nothing_owed_does_not_act() {
        let mut s = table(3);
        s.players[0].status = PlayerStatus::AllIn;
        s.players[1].status = PlayerStatus::AllIn;
        let mut sched = TurnScheduler::starting_after(0);
        assert_eq!(sched.advance(&mut s), Turn::RoundComplete);
    }

    #[test]
    fn last_player_standing_is_uncontested() {
        let mut s = table(3);
        s.players[0].status = PlayerStatus::Folded;
        s.players[2].status = PlayerStatus::Folded;
        let mut sched = TurnScheduler::starting_after(0);
        assert_eq!(sched.advance(&mut s), Turn::Uncontested(1));
        assert_eq!(s.on_turn(), None);
    }
}
