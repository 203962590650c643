//! Chip accounting: contributions per round and per hand, and the layered pots they
//! form once players are all-in for different amounts.

use crate::player::{Player, PlayerStatus};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PotError {
    #[error("insufficient chips: needed {needed}, stack {stack}")]
    InsufficientChips { needed: u64, stack: u64 },
}

/// One pot layer. The first layer returned by [`PotManager::compute_pots`] is the main pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub value: u64,
    /// Seats that contributed up to this layer and have not folded.
    pub eligible: Vec<usize>,
}

/// Stateless accountant over the players' contribution fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotManager;

impl PotManager {
    /// Move `amount` from the player's stack into the pot for the current round.
    /// An emptied stack flips an active player to all-in.
    pub fn record_contribution(player: &mut Player, amount: u64) -> Result<(), PotError> {
        let stack = player
            .stack
            .checked_sub(amount)
            .ok_or(PotError::InsufficientChips { needed: amount, stack: player.stack })?;
        player.stack = stack;
        player.round_contribution += amount;
        player.total_contribution += amount;
        if stack == 0 && player.status == PlayerStatus::Active {
            player.status = PlayerStatus::AllIn;
        }
        Ok(())
    }

    /// Post up to `amount` as dead money: it counts toward the hand, not toward the
    /// current round's bet. Returns the chips actually posted.
    pub fn post_ante(player: &mut Player, amount: u64) -> u64 {
        let paid = amount.min(player.stack);
        player.stack -= paid;
        player.total_contribution += paid;
        if player.stack == 0 && player.status == PlayerStatus::Active {
            player.status = PlayerStatus::AllIn;
        }
        paid
    }

    /// Sum of every total contribution.
    pub fn pot_total(players: &[Player]) -> u64 {
        players.iter().map(|p| p.total_contribution).sum()
    }

    /// Highest round contribution, i.e. the bet everyone else has to match.
    pub fn highest_round_contribution(players: &[Player]) -> u64 {
        players.iter().map(|p| p.round_contribution).max().unwrap_or(0)
    }

    /// Start a new betting round: per-round contributions and acted flags go back to zero.
    pub fn reset_round(players: &mut [Player]) {
        for p in players {
            p.round_contribution = 0;
            p.acted = false;
        }
    }

    /// Empty the pot after payout; contributions no longer back any layer.
    pub fn sweep(players: &mut [Player]) {
        for p in players {
            p.round_contribution = 0;
            p.total_contribution = 0;
        }
    }

    /// Split total contributions into pot layers.
    ///
    /// Each distinct contribution level closes a layer worth
    /// `(level - previous_level) * contributors_at_or_above_level`; the layer can be won
    /// by those contributors who have not folded. The result depends only on the final
    /// contribution vector, never on the order chips came in.
    pub fn compute_pots(players: &[Player]) -> Vec<Pot> {
        let mut levels: Vec<u64> =
            players.iter().map(|p| p.total_contribution).filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::with_capacity(levels.len());
        let mut prev = 0u64;
        for level in levels {
            let contributors: Vec<usize> = players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.total_contribution >= level)
                .map(|(i, _)| i)
                .collect();
            let value = (level - prev) * contributors.len() as u64;
            let eligible = contributors
                .into_iter()
                .filter(|&i| players[i].status != PlayerStatus::Folded)
                .collect();
            pots.push(Pot { value, eligible });
            prev = level;
        }
        pots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerId;

    fn players(contributions: &[u64]) -> Vec<Player> {
        contributions
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut p = Player::new(PlayerId(i as u32), format!("P{}", i + 1), 1000);
                PotManager::record_contribution(&mut p, c).unwrap();
                p
            })
            .collect()
    }

    #[test]
    fn contribution_moves_chips_from_stack() {
        let mut p = Player::new(PlayerId(0), "P1", 100);
        PotManager::record_contribution(&mut p, 40).unwrap();
        assert_eq!((p.stack, p.round_contribution, p.total_contribution), (60, 40, 40));
        let err = PotManager::record_contribution(&mut p, 61).unwrap_err();
        assert_eq!(err, PotError::InsufficientChips { needed: 61, stack: 60 });
        assert_eq!(p.stack, 60, "failed contribution leaves the stack untouched");
        PotManager::record_contribution(&mut p, 60).unwrap();
        assert_eq!(p.status, PlayerStatus::AllIn);
    }

    #[test]
    fn ante_is_dead_money_and_capped_at_stack() {
        let mut p = Player::new(PlayerId(0), "P1", 30);
        assert_eq!(PotManager::post_ante(&mut p, 50), 30);
        assert_eq!((p.stack, p.round_contribution, p.total_contribution), (0, 0, 30));
        assert_eq!(p.status, PlayerStatus::AllIn);
    }

    #[test]
    fn equal_contributions_form_a_single_pot() {
        let ps = players(&[50, 50, 50]);
        assert_eq!(
            PotManager::compute_pots(&ps),
            vec![Pot { value: 150, eligible: vec![0, 1, 2] }]
        );
    }

    #[test]
    fn layers_follow_each_all_in_level() {
        let ps = players(&[100, 50, 200]);
        let pots = PotManager::compute_pots(&ps);
        assert_eq!(
            pots,
            vec![
                Pot { value: 150, eligible: vec![0, 1, 2] },
                Pot { value: 100, eligible: vec![0, 2] },
                Pot { value: 100, eligible: vec![2] },
            ]
        );
        let total: u64 = pots.iter().map(|p| p.value).sum();
        assert_eq!(total, PotManager::pot_total(&ps));
    }

    #[test]
    fn folded_players_fund_layers_but_cannot_win_them() {
        let mut ps = players(&[30, 50, 50]);
        ps[1].status = PlayerStatus::Folded;
        let pots = PotManager::compute_pots(&ps);
        assert_eq!(pots[0], Pot { value: 90, eligible: vec![0, 2] });
        assert_eq!(pots[1], Pot { value: 40, eligible: vec![2] });
    }

    #[test]
    fn reset_round_keeps_hand_totals() {
        let mut ps = players(&[20, 20]);
        ps[0].acted = true;
        PotManager::reset_round(&mut ps);
        assert_eq!(PotManager::highest_round_contribution(&ps), 0);
        assert_eq!(PotManager::pot_total(&ps), 40);
        assert!(!ps[0].acted);
    }
}
