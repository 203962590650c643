use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use poker_arena::config::TableConfig;
use poker_arena::engine::RoundEngine;
use poker_arena::player::{Player, PlayerId};
use poker_arena::state::{HistoryEntry, HistoryVerb, PrivateView, PublicView, Round};
use poker_arena::strategy::{CallingStation, StrategyError, StrategyHandle};
use poker_arena::validator::Action;

fn players(stacks: &[u64]) -> Vec<Player> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(PlayerId(i as u32), format!("P{}", i + 1), s))
        .collect()
}

fn stations(n: usize) -> Vec<StrategyHandle> {
    (0..n).map(|i| StrategyHandle::new(format!("station-{i}"), CallingStation)).collect()
}

/// Voluntary actions of one round as (seat, verb).
fn actions_in(history: &[HistoryEntry], round: u8) -> Vec<(usize, HistoryVerb)> {
    history
        .iter()
        .filter(|e| e.round == Round::Betting(round))
        .filter(|e| {
            matches!(
                e.verb,
                HistoryVerb::Fold
                    | HistoryVerb::Check
                    | HistoryVerb::Call
                    | HistoryVerb::Raise
                    | HistoryVerb::AllIn
            )
        })
        .map(|e| (e.seat, e.verb))
        .collect()
}

#[test]
fn first_round_starts_left_of_the_big_blind() {
    let config = TableConfig::holdem(5, 10).with_decision_timeout(None);
    let mut engine = RoundEngine::new(config).unwrap().with_seed(3);
    let mut state = engine.new_hand(players(&[1000; 4]), 0).unwrap();
    let result = engine.run_hand(&mut state, &stations(4)).unwrap();

    let blinds: Vec<_> = result.history[..2].iter().map(|e| (e.seat, e.verb, e.amount)).collect();
    assert_eq!(
        blinds,
        vec![(1, HistoryVerb::SmallBlind, Some(5)), (2, HistoryVerb::BigBlind, Some(10))]
    );
    assert_eq!(
        actions_in(&result.history, 1),
        vec![
            (3, HistoryVerb::Call),
            (0, HistoryVerb::Call),
            (1, HistoryVerb::Call),
            (2, HistoryVerb::Check)
        ]
    );
    let second: Vec<usize> = actions_in(&result.history, 2).iter().map(|&(s, _)| s).collect();
    assert_eq!(second, vec![1, 2, 3, 0]);
}

#[test]
fn heads_up_dealer_acts_first_preflop_and_last_after() {
    let config = TableConfig::holdem(5, 10).with_decision_timeout(None);
    let mut engine = RoundEngine::new(config).unwrap().with_seed(9);
    let mut state = engine.new_hand(players(&[500, 500]), 1).unwrap();
    let result = engine.run_hand(&mut state, &stations(2)).unwrap();

    assert_eq!(result.history[0].seat, 1);
    assert_eq!(result.history[0].verb, HistoryVerb::SmallBlind);
    let first: Vec<usize> = actions_in(&result.history, 1).iter().map(|&(s, _)| s).collect();
    assert_eq!(first, vec![1, 0]);
    for round in 2..=4 {
        let seats: Vec<usize> =
            actions_in(&result.history, round).iter().map(|&(s, _)| s).collect();
        assert_eq!(seats, vec![0, 1], "round {round}");
    }
}

#[test]
fn exactly_one_seat_is_asked_at_a_time() {
    let asked = Arc::new(Mutex::new(Vec::new()));
    let handles: Vec<StrategyHandle> = (0..3)
        .map(|seat| {
            let asked = Arc::clone(&asked);
            StrategyHandle::new(
                format!("probe-{seat}"),
                move |public: &PublicView, private: &PrivateView| -> Result<Action, StrategyError> {
                    assert_eq!(public.seat, seat);
                    assert_eq!(private.seat, seat);
                    asked.lock().unwrap().push(seat);
                    Ok(Action::Call)
                },
            )
        })
        .collect();

    let config = TableConfig::holdem(5, 10).with_decision_timeout(Some(Duration::from_secs(5)));
    let mut engine = RoundEngine::new(config).unwrap().with_seed(11);
    let mut state = engine.new_hand(players(&[300; 3]), 2).unwrap();
    let result = engine.run_hand(&mut state, &handles).unwrap();

    assert!(result.faults.is_empty());
    let voluntary: Vec<usize> = (1..=4)
        .flat_map(|round| actions_in(&result.history, round))
        .map(|(seat, _)| seat)
        .collect();
    assert_eq!(*asked.lock().unwrap(), voluntary);
}

/// Plays `actions` in order, then calls, recording what each decision saw.
fn recording(
    actions: &[Action],
    seen: Arc<Mutex<Vec<(Round, u64, u64)>>>,
) -> StrategyHandle {
    let mut queue: VecDeque<Action> = actions.iter().copied().collect();
    StrategyHandle::new(
        "recording",
        move |public: &PublicView, _: &PrivateView| -> Result<Action, StrategyError> {
            seen.lock().unwrap().push((public.round, public.bet_to_call, public.min_raise));
            Ok(queue.pop_front().unwrap_or(Action::Call))
        },
    )
}

fn open_table() -> TableConfig {
    TableConfig::three_street().with_ante(0).with_min_raise(20).with_decision_timeout(None)
}

#[test]
fn full_raise_reopens_the_action() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = RoundEngine::new(open_table()).unwrap().with_seed(5);
    let mut state = engine.new_hand(players(&[500, 500, 500]), 2).unwrap();
    let strategies = [
        recording(&[Action::Raise(20)], Arc::clone(&seen)),
        StrategyHandle::new("raiser", {
            let mut queue = VecDeque::from([Action::Raise(60)]);
            move |_: &PublicView, _: &PrivateView| -> Result<Action, StrategyError> {
                Ok(queue.pop_front().unwrap_or(Action::Call))
            }
        }),
        StrategyHandle::new("caller", CallingStation),
    ];
    let result = engine.run_hand(&mut state, &strategies).unwrap();

    assert!(result.faults.is_empty());
    let seen = seen.lock().unwrap();
    let first_round: Vec<_> = seen.iter().filter(|s| s.0 == Round::Betting(1)).collect();
    assert_eq!(first_round.len(), 2, "the opener acts again after the re-raise");
    assert_eq!(*first_round[1], (Round::Betting(1), 60, 40));
}

#[test]
fn short_all_in_does_not_raise_the_minimum() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = RoundEngine::new(open_table()).unwrap().with_seed(5);
    let mut state = engine.new_hand(players(&[200, 200, 25]), 2).unwrap();
    let strategies = [
        recording(&[Action::Raise(20)], Arc::clone(&seen)),
        StrategyHandle::new("caller", CallingStation),
        StrategyHandle::new(
            "shover",
            |_: &PublicView, _: &PrivateView| -> Result<Action, StrategyError> {
                Ok(Action::AllIn)
            },
        ),
    ];
    let result = engine.run_hand(&mut state, &strategies).unwrap();

    assert!(result.faults.is_empty());
    let seen = seen.lock().unwrap();
    // Faces the extra 5 chips, but the last full raise is still 20.
    assert_eq!(seen[1], (Round::Betting(1), 25, 20));
    let total: u64 = state.players().iter().map(|p| p.stack()).sum();
    assert_eq!(total, 425);
}
