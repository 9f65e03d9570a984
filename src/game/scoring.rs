//! Niuniu hand scoring.
//!
//! A hand reduces to a point value in `0..=11`: `0` is "no bull", `1..=9` are
//! "bull-N", `10` is Niuniu and `11` is Five-Flowers (all J/Q/K). Equal point
//! values are broken by the single heaviest card (`suit_weight * 10 + face`).

use std::cmp::Ordering;
use thiserror::Error;

use crate::game::cards::{Card, Hand, HAND_SIZE};

pub const NO_BULL: u8 = 0;
pub const NIUNIU: u8 = 10;
pub const FIVE_FLOWERS: u8 = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Reduction received {0} values, at most 5 are allowed")]
    TooManyValues(usize),
    #[error("Cannot score a joker: {0}")]
    Joker(Card),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScoreResult {
    pub point_value: u8,
    pub tie_break_weight: u8,
    pub high_card: Card,
    pub multiplier: u8,
    pub label: String,
}

impl ScoreResult {
    /// Higher point value wins; equal point values fall back to the heaviest card.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.point_value
            .cmp(&other.point_value)
            .then(self.tie_break_weight.cmp(&other.tie_break_weight))
    }
}

/// Payout multiplier for a point value.
pub fn multiplier(point_value: u8) -> u8 {
    match point_value {
        7..=9 => 2,
        NIUNIU => 3,
        FIVE_FLOWERS => 5,
        _ => 1,
    }
}

pub fn label(point_value: u8) -> String {
    match point_value {
        NO_BULL => "no bull".to_string(),
        // 12 is never produced but shares the Niuniu label.
        NIUNIU | FIVE_FLOWERS | 12 => "Niuniu".to_string(),
        n => format!("bull-{}", n),
    }
}

pub fn score(hand: &Hand) -> Result<ScoreResult, ScoringError> {
    let mut high_card = hand.cards()[0];
    let mut flower_count = 0;
    let mut reducing = Vec::with_capacity(HAND_SIZE);

    for card in hand.cards() {
        let rank = card.rank().ok_or(ScoringError::Joker(*card))?;
        if card.weight() > high_card.weight() {
            high_card = *card;
        }
        if rank.is_flower() {
            flower_count += 1;
        }
        // Tens and flowers are worth a multiple of ten and never change the point.
        if rank.face_value() < 10 {
            reducing.push(rank.face_value());
        }
    }

    let point_value = if flower_count == HAND_SIZE {
        FIVE_FLOWERS
    } else {
        reduce(&reducing)?
    };

    Ok(ScoreResult {
        point_value,
        tie_break_weight: high_card.weight(),
        high_card,
        multiplier: multiplier(point_value),
        label: label(point_value),
    })
}

/// Reduces the face values left after dropping ten-valued cards to a point value.
pub fn reduce(values: &[u8]) -> Result<u8, ScoringError> {
    match values {
        [] => Ok(NIUNIU),
        [single] => Ok(*single),
        [a, b] => match (a + b) % 10 {
            0 => Ok(NIUNIU),
            n => Ok(n),
        },
        _ if values.len() <= HAND_SIZE => {
            if let Some(rest) = remove_triple(values) {
                return reduce(&rest);
            }
            let rest = remove_pairs(values);
            if rest.len() > 2 {
                Ok(NO_BULL)
            } else {
                reduce(&rest)
            }
        }
        _ => Err(ScoringError::TooManyValues(values.len())),
    }
}

/// Drops the first triple (by ascending indices) summing to 10 or 20.
pub fn remove_triple(values: &[u8]) -> Option<Vec<u8>> {
    let n = values.len();
    let (i, j, k) = (0..n)
        .flat_map(|i| (i + 1..n).flat_map(move |j| (j + 1..n).map(move |k| (i, j, k))))
        .find(|&(i, j, k)| matches!(values[i] + values[j] + values[k], 10 | 20))?;

    Some(without(values, &[i, j, k]))
}

/// Repeatedly drops the first pair (by ascending indices) summing to 10.
pub fn remove_pairs(values: &[u8]) -> Vec<u8> {
    let mut rest = values.to_vec();
    loop {
        let n = rest.len();
        let pair = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .find(|&(i, j)| rest[i] + rest[j] == 10);

        match pair {
            Some((i, j)) => rest = without(&rest, &[i, j]),
            None => return rest,
        }
    }
}

fn without(values: &[u8], indices: &[usize]) -> Vec<u8> {
    values
        .iter()
        .enumerate()
        .filter(|(idx, _)| !indices.contains(idx))
        .map(|(_, value)| *value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{Rank, Suit};
    use rstest::rstest;

    fn hand(labels: [&str; 5]) -> Hand {
        Hand::from_labels(&labels).unwrap()
    }

    #[rstest]
    #[case(&[], 10)]
    #[case(&[7], 7)]
    #[case(&[9, 9], 8)]
    #[case(&[4, 6], 10)]
    #[case(&[3, 3, 4], 10)]
    #[case(&[9, 9, 2], 10)]
    #[case(&[1, 9, 2, 8, 5], 5)]
    #[case(&[1, 2, 3, 4, 5], 5)]
    #[case(&[1, 1, 2, 2, 3], 0)]
    #[case(&[2, 3, 5, 6, 7], 3)]
    #[case(&[5, 5, 5, 5], 10)]
    #[case(&[1, 1, 1], 0)]
    fn test_reduce(#[case] values: &[u8], #[case] expected: u8) {
        assert_eq!(reduce(values).unwrap(), expected);
    }

    #[test]
    fn test_reduce_rejects_oversized_input() {
        assert_eq!(
            reduce(&[1, 2, 3, 4, 5, 6]),
            Err(ScoringError::TooManyValues(6))
        );
    }

    #[test]
    fn test_remove_triple_picks_lowest_indices_first() {
        // (0,1,2) = 2+3+5 and (0,3,4) = 2+4+4 both qualify.
        assert_eq!(remove_triple(&[2, 3, 5, 4, 4]), Some(vec![4, 4]));
        assert_eq!(remove_triple(&[8, 9, 3, 9]), Some(vec![9]));
        assert_eq!(remove_triple(&[1, 2, 3, 4, 5]), Some(vec![2, 3]));
        assert_eq!(remove_triple(&[1, 1, 2, 2, 3]), None);
    }

    #[test]
    fn test_remove_pairs_restarts_after_each_removal() {
        assert_eq!(remove_pairs(&[1, 9, 2, 8, 5]), vec![5]);
        assert_eq!(remove_pairs(&[3, 7, 7, 3]), Vec::<u8>::new());
        assert_eq!(remove_pairs(&[1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_reduce_is_order_independent() {
        let values = [1u8, 9, 2, 8, 5];
        let expected = reduce(&values).unwrap();
        for rotation in 0..values.len() {
            let mut rotated = values;
            rotated.rotate_left(rotation);
            assert_eq!(reduce(&rotated).unwrap(), expected);
            rotated.reverse();
            assert_eq!(reduce(&rotated).unwrap(), expected);
        }
    }

    #[test]
    fn test_five_flowers() {
        let result = score(&hand(["黑桃J", "红桃Q", "梅花K", "方块J", "黑桃K"])).unwrap();
        assert_eq!(result.point_value, FIVE_FLOWERS);
        assert_eq!(result.multiplier, 5);
        assert_eq!(result.label, "Niuniu");
        assert_eq!(result.high_card, Card::new(Rank::King, Suit::Spades));
        assert_eq!(result.tie_break_weight, 53);
    }

    #[test]
    fn test_triple_with_two_flowers_is_niuniu() {
        let result = score(&hand(["黑桃3", "红桃3", "梅花4", "方块J", "梅花Q"])).unwrap();
        assert_eq!(result.point_value, NIUNIU);
        assert_eq!(result.multiplier, 3);
        assert_eq!(result.label, "Niuniu");
    }

    #[test]
    fn test_two_nines_with_three_flowers() {
        let result = score(&hand(["黑桃9", "红桃9", "梅花J", "方块Q", "梅花K"])).unwrap();
        assert_eq!(result.point_value, 8);
        assert_eq!(result.multiplier, 2);
        assert_eq!(result.label, "bull-8");
        assert_eq!(result.high_card, Card::new(Rank::Nine, Suit::Spades));
    }

    #[test]
    fn test_pairing_pass_leaves_single_card() {
        let result = score(&hand(["黑桃A", "红桃9", "梅花2", "方块8", "梅花5"])).unwrap();
        assert_eq!(result.point_value, 5);
        assert_eq!(result.multiplier, 1);
        assert_eq!(result.label, "bull-5");
    }

    #[test]
    fn test_no_bull() {
        let result = score(&hand(["黑桃A", "红桃A", "梅花A", "方块2", "梅花2"])).unwrap();
        assert_eq!(result.point_value, NO_BULL);
        assert_eq!(result.multiplier, 1);
        assert_eq!(result.label, "no bull");
    }

    #[test]
    fn test_tens_cancel_like_flowers() {
        let result = score(&hand(["黑桃10", "红桃10", "梅花10", "方块10", "梅花7"])).unwrap();
        assert_eq!(result.point_value, 7);
        assert_eq!(result.multiplier, 2);
    }

    #[test]
    fn test_flowers_and_tens_is_not_five_flowers() {
        let result = score(&hand(["黑桃10", "红桃J", "梅花Q", "方块K", "梅花J"])).unwrap();
        assert_eq!(result.point_value, NIUNIU);
        assert_eq!(result.multiplier, 3);
    }

    #[rstest]
    #[case(0, 1, "no bull")]
    #[case(1, 1, "bull-1")]
    #[case(6, 1, "bull-6")]
    #[case(7, 2, "bull-7")]
    #[case(9, 2, "bull-9")]
    #[case(10, 3, "Niuniu")]
    #[case(11, 5, "Niuniu")]
    fn test_multiplier_and_label(#[case] point: u8, #[case] mult: u8, #[case] text: &str) {
        assert_eq!(multiplier(point), mult);
        assert_eq!(label(point), text);
    }

    #[test]
    fn test_reserved_point_twelve_displays_niuniu() {
        assert_eq!(label(12), "Niuniu");
        assert_eq!(multiplier(12), 1);
    }

    #[test]
    fn test_compare_point_value_beats_weight() {
        let seven_low = score(&hand(["方块9", "方块8", "方块J", "方块Q", "方块K"])).unwrap();
        let seven_high = score(&hand(["黑桃9", "黑桃8", "黑桃J", "黑桃Q", "黑桃K"])).unwrap();
        assert_eq!(seven_low.point_value, 7);
        assert_eq!(seven_high.point_value, 7);
        assert_eq!(seven_high.compare(&seven_low), Ordering::Greater);

        let eight = score(&hand(["方块9", "梅花9", "方块J", "方块Q", "方块K"])).unwrap();
        assert_eq!(eight.point_value, 8);
        assert!(eight.tie_break_weight < seven_high.tie_break_weight);
        assert_eq!(eight.compare(&seven_high), Ordering::Greater);
    }
}
