//! Illegal actions never move chips: the engine rejects them and plays check-or-fold.

use std::collections::VecDeque;

use poker_arena::config::TableConfig;
use poker_arena::engine::{HandResult, RoundEngine};
use poker_arena::player::{Player, PlayerId};
use poker_arena::state::{HistoryVerb, PrivateView, PublicView, Round};
use poker_arena::strategy::{FaultKind, StrategyError, StrategyHandle};
use poker_arena::validator::{Action, ActionError, NormalizedAction};

fn scripted(actions: &[Action]) -> StrategyHandle {
    let mut queue: VecDeque<Action> = actions.iter().copied().collect();
    StrategyHandle::new(
        "scripted",
        move |_: &PublicView, _: &PrivateView| -> Result<Action, StrategyError> {
            Ok(queue.pop_front().unwrap_or(Action::Check))
        },
    )
}

/// Three players, no forced bets, dealer on seat 2 so seat 0 opens.
fn play(stacks: [u64; 3], scripts: [&[Action]; 3]) -> HandResult {
    let config =
        TableConfig::three_street().with_ante(0).with_min_raise(20).with_decision_timeout(None);
    let mut engine = RoundEngine::new(config).unwrap().with_seed(17);
    let players = stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(PlayerId(i as u32), format!("P{}", i + 1), s))
        .collect();
    let mut state = engine.new_hand(players, 2).unwrap();
    let strategies = scripts.map(scripted);
    let result = engine.run_hand(&mut state, &strategies).unwrap();
    let total: u64 = state.players().iter().map(|p| p.stack()).sum();
    assert_eq!(total, stacks.iter().sum::<u64>());
    result
}

fn first_round(result: &HandResult) -> Vec<(usize, HistoryVerb, Option<u64>)> {
    result
        .history
        .iter()
        .filter(|e| e.round == Round::Betting(1))
        .map(|e| (e.seat, e.verb, e.amount))
        .collect()
}

#[test]
fn check_facing_a_bet_folds() {
    let result = play([100, 100, 100], [&[Action::Raise(30)], &[Action::Check], &[Action::Fold]]);
    assert_eq!(result.faults.len(), 1);
    assert_eq!(
        result.faults[0].kind,
        FaultKind::Rejected(ActionError::CheckNotAllowed { to_call: 30 })
    );
    assert_eq!(result.faults[0].substituted, NormalizedAction::Fold);
    assert_eq!(result.won_by(0), 30);
}

#[test]
fn raise_below_the_minimum_is_rejected() {
    let result = play(
        [100, 100, 100],
        [&[Action::Raise(20)], &[Action::Raise(25)], &[Action::Fold]],
    );
    assert_eq!(
        result.faults[0].kind,
        FaultKind::Rejected(ActionError::RaiseTooSmall { min: 40, got: 25 })
    );
    assert_eq!(
        first_round(&result),
        vec![
            (0, HistoryVerb::Raise, Some(20)),
            (1, HistoryVerb::Fold, None),
            (2, HistoryVerb::Fold, None),
            (0, HistoryVerb::Win, Some(20)),
        ]
    );
}

#[test]
fn short_stack_raise_is_an_all_in() {
    let result = play(
        [100, 100, 15],
        [&[Action::Check, Action::Call], &[Action::Check, Action::Call], &[Action::Raise(15)]],
    );
    assert!(result.faults.is_empty());
    assert!(first_round(&result).contains(&(2, HistoryVerb::AllIn, Some(15))));
}

#[test]
fn call_for_more_than_the_stack_is_an_all_in() {
    let result = play([100, 100, 30], [&[Action::Raise(60)], &[Action::Fold], &[Action::Call]]);
    assert!(result.faults.is_empty());
    assert_eq!(first_round(&result)[2], (2, HistoryVerb::AllIn, Some(30)));
    let paid: u64 = result.payouts.iter().map(|p| p.amount).sum();
    assert_eq!(paid, 90);
}

#[test]
fn call_with_nothing_owed_is_a_check() {
    let result = play([100, 100, 100], [&[Action::Call], &[Action::Check], &[Action::Check]]);
    assert!(result.faults.is_empty());
    assert_eq!(first_round(&result)[0], (0, HistoryVerb::Check, None));
}

#[test]
fn raise_against_an_unreachable_minimum_is_rejected() {
    let config = TableConfig::three_street()
        .with_ante(0)
        .with_min_raise(u64::MAX)
        .with_decision_timeout(None);
    let mut engine = RoundEngine::new(config).unwrap().with_seed(17);
    let players =
        (0..3).map(|i| Player::new(PlayerId(i), format!("P{}", i + 1), 100)).collect();
    let mut state = engine.new_hand(players, 2).unwrap();
    let strategies = [scripted(&[Action::Raise(20)]), scripted(&[]), scripted(&[])];

    let result = engine.run_hand(&mut state, &strategies).unwrap();

    assert_eq!(result.faults.len(), 1);
    assert_eq!(
        result.faults[0].kind,
        FaultKind::Rejected(ActionError::RaiseTooSmall { min: u64::MAX, got: 20 })
    );
    assert_eq!(result.faults[0].substituted, NormalizedAction::Check);
    let total: u64 = state.players().iter().map(|p| p.stack()).sum();
    assert_eq!(total, 300);
}
