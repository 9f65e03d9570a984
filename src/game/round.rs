use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::game::cards::Hand;
use crate::game::deck::{Deck, DeckError};
use crate::game::scoring::{self, ScoreResult, ScoringError};
use crate::room::models::ConnectionId;

pub const ROUND_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("{0} is already enrolled in this round")]
    DuplicateEnrollment(String),
    #[error("the round already has two participants")]
    RoundFull,
    #[error("no dealt round to settle")]
    NothingToSettle,
    #[error("only enrolled participants can settle the round")]
    NotEnrolled,
    #[error("deck invariant violated: {0}")]
    Deck(#[from] DeckError),
    #[error("scoring invariant violated: {0}")]
    Scoring(#[from] ScoringError),
}

impl RoundError {
    /// Invariant violations abort the round; everything else is a rejected command.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, RoundError::Deck(_) | RoundError::Scoring(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RoundPhase {
    Idle,
    Enrolling,
    Dealt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum EnrollmentStatus {
    Unenrolled,
    Enrolled,
    Dealt,
}

/// An enrolled participant's place in the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub identity: String,
    pub connection_id: ConnectionId,
}

impl Seat {
    pub fn new(identity: impl Into<String>, connection_id: ConnectionId) -> Self {
        Self {
            identity: identity.into(),
            connection_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DealtHand {
    pub seat: Seat,
    pub hand: Hand,
    pub score: ScoreResult,
}

#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    /// Enrolled, waiting for an opponent.
    Waiting { participants: usize },
    /// The second enrollment dealt both hands, in enrollment order.
    Dealt(Vec<DealtHand>),
}

#[derive(Debug, Clone)]
pub struct Settlement {
    pub hands: Vec<DealtHand>,
    pub winner: Seat,
    pub multiplier: u8,
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    pub fn is_winner(&self, identity: &str) -> bool {
        self.winner.identity == identity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    NotEnrolled,
    /// Left before dealing; the slot is free again.
    SlotReleased { remaining: usize },
    /// Left after dealing; the round was discarded.
    RoundVoided { departed: Seat, remaining: Vec<Seat> },
}

/// One enroll -> deal -> settle cycle between two participants.
///
/// The deck and the dealt hands live exactly as long as the round that
/// produced them and are dropped on settlement or reset.
pub struct Round {
    seats: Vec<Seat>,
    deck: Option<Deck>,
    hands: HashMap<String, Hand>,
    dealt_at: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

impl Round {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            seats: Vec::with_capacity(ROUND_CAPACITY),
            deck: None,
            hands: HashMap::new(),
            dealt_at: None,
            rng,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        match self.seats.len() {
            0 => RoundPhase::Idle,
            n if n < ROUND_CAPACITY => RoundPhase::Enrolling,
            _ => RoundPhase::Dealt,
        }
    }

    pub fn status_of(&self, identity: &str) -> EnrollmentStatus {
        if self.hands.contains_key(identity) {
            EnrollmentStatus::Dealt
        } else if self.is_enrolled(identity) {
            EnrollmentStatus::Enrolled
        } else {
            EnrollmentStatus::Unenrolled
        }
    }

    pub fn is_enrolled(&self, identity: &str) -> bool {
        self.seats.iter().any(|seat| seat.identity == identity)
    }

    pub fn seat_of(&self, connection_id: &ConnectionId) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|seat| seat.connection_id == *connection_id)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[cfg(test)]
    pub(crate) fn dealt_at(&self) -> Option<DateTime<Utc>> {
        self.dealt_at
    }

    /// Cards left in the current round's deck, if one has been dealt.
    #[cfg(test)]
    pub(crate) fn cards_remaining(&self) -> Option<usize> {
        self.deck.as_ref().map(Deck::len)
    }

    pub fn hand_of(&self, identity: &str) -> Option<&Hand> {
        self.hands.get(identity)
    }

    pub fn enroll(&mut self, seat: Seat) -> Result<EnrollOutcome, RoundError> {
        if self.is_enrolled(&seat.identity) {
            return Err(RoundError::DuplicateEnrollment(seat.identity));
        }
        if self.seats.len() >= ROUND_CAPACITY {
            return Err(RoundError::RoundFull);
        }

        debug!(player = %seat.identity, "Enrolling player in round");
        self.seats.push(seat);

        if self.seats.len() < ROUND_CAPACITY {
            return Ok(EnrollOutcome::Waiting {
                participants: self.seats.len(),
            });
        }

        match self.deal() {
            Ok(dealt) => Ok(EnrollOutcome::Dealt(dealt)),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn deal(&mut self) -> Result<Vec<DealtHand>, RoundError> {
        let mut deck = Deck::new(true);
        let mut dealt = Vec::with_capacity(self.seats.len());

        for seat in &self.seats {
            let hand = deck.deal(&mut self.rng)?;
            let score = scoring::score(&hand)?;
            dealt.push(DealtHand {
                seat: seat.clone(),
                hand,
                score,
            });
        }

        for dealt_hand in &dealt {
            self.hands
                .insert(dealt_hand.seat.identity.clone(), dealt_hand.hand.clone());
        }
        self.dealt_at = Some(Utc::now());

        info!(
            players = ?self.seats.iter().map(|s| s.identity.as_str()).collect::<Vec<_>>(),
            cards_remaining = deck.len(),
            hands_remaining = deck.hands_remaining(),
            "Round dealt"
        );
        self.deck = Some(deck);
        Ok(dealt)
    }

    /// Scores every cached hand, picks the winner and resets the round.
    /// Only a seated connection may settle.
    pub fn settle(&mut self, issuer: &ConnectionId) -> Result<Settlement, RoundError> {
        if self.phase() != RoundPhase::Dealt || self.hands.len() != self.seats.len() {
            return Err(RoundError::NothingToSettle);
        }
        if self.seat_of(issuer).is_none() {
            return Err(RoundError::NotEnrolled);
        }

        let dealt_at = self.dealt_at;
        let scored = self.score_hands();
        self.reset();
        let hands = scored?;

        let (winner, multiplier) = best_hand(&hands)
            .map(|best| (best.seat.clone(), best.score.multiplier))
            .ok_or(RoundError::NothingToSettle)?;
        let settlement = Settlement {
            hands,
            winner,
            multiplier,
            settled_at: Utc::now(),
        };

        info!(
            winner = %settlement.winner.identity,
            multiplier = settlement.multiplier,
            dealt_for_ms = dealt_at
                .map(|at| (settlement.settled_at - at).num_milliseconds())
                .unwrap_or_default(),
            "Round settled"
        );
        Ok(settlement)
    }

    fn score_hands(&self) -> Result<Vec<DealtHand>, RoundError> {
        self.seats
            .iter()
            .map(|seat| {
                let hand = self
                    .hands
                    .get(&seat.identity)
                    .cloned()
                    .ok_or(RoundError::NothingToSettle)?;
                let score = scoring::score(&hand)?;
                Ok(DealtHand {
                    seat: seat.clone(),
                    hand,
                    score,
                })
            })
            .collect()
    }

    /// Removes the seat held by a connection that went away. A later
    /// connection reusing the same display name keeps its own seat.
    pub fn release(&mut self, connection_id: &ConnectionId) -> ReleaseOutcome {
        let Some(departed) = self.seat_of(connection_id).cloned() else {
            return ReleaseOutcome::NotEnrolled;
        };

        if self.phase() == RoundPhase::Dealt {
            let remaining = self
                .seats
                .iter()
                .filter(|seat| seat.connection_id != *connection_id)
                .cloned()
                .collect();
            self.reset();
            return ReleaseOutcome::RoundVoided {
                departed,
                remaining,
            };
        }

        self.seats.retain(|seat| seat.connection_id != *connection_id);
        ReleaseOutcome::SlotReleased {
            remaining: self.seats.len(),
        }
    }

    pub fn reset(&mut self) {
        self.seats.clear();
        self.hands.clear();
        self.deck = None;
        self.dealt_at = None;
    }

    #[cfg(test)]
    pub(crate) fn with_dealt_hands(hands: Vec<(Seat, Hand)>) -> Self {
        let mut round = Self::with_seed(0);
        for (seat, hand) in hands {
            round.hands.insert(seat.identity.clone(), hand);
            round.seats.push(seat);
        }
        round.dealt_at = Some(Utc::now());
        round
    }
}

/// Highest point value wins, then the heaviest single card; earlier seats keep exact ties.
pub fn best_hand(hands: &[DealtHand]) -> Option<&DealtHand> {
    hands.iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.score.compare(&current.score).is_le() => Some(current),
        _ => Some(candidate),
    })
}
