use poker_arena::cards::{Card, Rank, Suit};
use poker_arena::deck::Deck;
use poker_arena::evaluator::{best_five, evaluate_five, Category, HoldemRanker, Ranker};
use poker_arena::hand::HoleCards;
use proptest::prelude::*;

/// `n` distinct cards in random order.
fn distinct_cards(n: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(Deck::standard().remaining().to_vec(), n).prop_shuffle()
}

fn straight_to(top: u8) -> [Card; 5] {
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades, Suit::Clubs];
    let rank = |v: u8| Rank::from_value(if v == 1 { 14 } else { v }).unwrap();
    std::array::from_fn(|i| Card::new(rank(top - 4 + i as u8), suits[i]))
}

proptest! {
    #[test]
    fn best_of_seven_beats_every_five_card_subset(cards in distinct_cards(7)) {
        let best = best_five(&cards).unwrap();
        for skip_a in 0..7 {
            for skip_b in skip_a + 1..7 {
                let five: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != skip_a && i != skip_b)
                    .map(|(_, &c)| c)
                    .collect();
                let five: [Card; 5] = five.try_into().unwrap();
                prop_assert!(best >= evaluate_five(&five));
            }
        }
    }

    #[test]
    fn ranking_ignores_card_order(cards in distinct_cards(7)) {
        let hole = HoleCards::try_new(cards[0], cards[1]).unwrap();
        let swapped = HoleCards::try_new(cards[1], cards[0]).unwrap();
        let mut board = cards[2..].to_vec();
        let forward = HoldemRanker.rank(&hole, &board);
        board.reverse();
        prop_assert_eq!(forward, HoldemRanker.rank(&swapped, &board));
        prop_assert_eq!(Some(forward), best_five(&cards));
    }

    #[test]
    fn higher_straight_wins(hi in 6u8..=14, lo in 5u8..=13) {
        prop_assume!(hi > lo);
        let (a, b) = (evaluate_five(&straight_to(hi)), evaluate_five(&straight_to(lo)));
        prop_assert_eq!(a.category(), Some(Category::Straight));
        prop_assert_eq!(b.category(), Some(Category::Straight));
        prop_assert!(a > b);
    }
}
