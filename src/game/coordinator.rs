use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::game::round::{
    DealtHand, EnrollOutcome, EnrollmentStatus, ReleaseOutcome, Round, RoundError, RoundPhase,
    Seat, Settlement,
};
use crate::room::models::ConnectionId;
use crate::websockets::connection_manager::{ConnectionManager, MessageBroadcaster};
use crate::websockets::messages::WebSocketMessage;

pub const DEALER: &str = "dealer";

/// Serialises every round mutation behind one lock and publishes the
/// resulting notifications.
///
/// Notifications are queued while the lock is still held so that two
/// participants never observe round events in different orders.
pub struct RoundCoordinator {
    round: Mutex<Round>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl RoundCoordinator {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self::with_round(Round::new(), connection_manager)
    }

    pub fn with_round(round: Round, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            round: Mutex::new(round),
            connection_manager,
        }
    }

    pub async fn phase(&self) -> RoundPhase {
        self.round.lock().await.phase()
    }

    pub async fn status_of(&self, identity: &str) -> EnrollmentStatus {
        self.round.lock().await.status_of(identity)
    }

    /// Enrolls a participant; the second enrollment deals both hands.
    #[instrument(skip(self, seat), fields(player = %seat.identity))]
    pub async fn join(&self, seat: Seat) -> Result<RoundPhase, RoundError> {
        let mut round = self.round.lock().await;
        let identity = seat.identity.clone();

        match round.enroll(seat) {
            Ok(EnrollOutcome::Waiting { participants }) => {
                info!(participants, "Player enrolled, waiting for an opponent");
                let status = WebSocketMessage::send(
                    identity,
                    format!("current participants: {}", participants),
                );
                MessageBroadcaster::broadcast_all(&self.connection_manager, &status).await;
                Ok(round.phase())
            }
            Ok(EnrollOutcome::Dealt(dealt)) => {
                for dealt_hand in &dealt {
                    self.send_deal_notice(dealt_hand).await;
                }
                Ok(round.phase())
            }
            Err(e) if e.is_invariant_violation() => {
                error!(error = %e, "Round aborted while dealing");
                self.broadcast_abort(&e).await;
                Err(e)
            }
            Err(e) => {
                warn!(error = %e, "Enrollment rejected");
                Err(e)
            }
        }
    }

    /// Reveals every hand, tells each participant whether they won, and
    /// returns the round to idle. The issuer must hold a seat.
    #[instrument(skip(self))]
    pub async fn settle(&self, issuer: &ConnectionId) -> Result<Settlement, RoundError> {
        let mut round = self.round.lock().await;

        let settlement = match round.settle(issuer) {
            Ok(settlement) => settlement,
            Err(e) if e.is_invariant_violation() => {
                error!(error = %e, "Round aborted while settling");
                self.broadcast_abort(&e).await;
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Settlement rejected");
                return Err(e);
            }
        };

        let summary = WebSocketMessage::send(DEALER, settlement_summary(&settlement.hands));
        for dealt_hand in &settlement.hands {
            let seat = &dealt_hand.seat;
            MessageBroadcaster::send_to(&self.connection_manager, &seat.connection_id, &summary)
                .await;

            let verdict = if settlement.is_winner(&seat.identity) {
                format!("you won x{}", settlement.multiplier)
            } else {
                format!("you lost x{}", settlement.multiplier)
            };
            let verdict = WebSocketMessage::send(DEALER, verdict);
            MessageBroadcaster::send_to(&self.connection_manager, &seat.connection_id, &verdict)
                .await;
        }

        Ok(settlement)
    }

    /// Drops the seat held by a departed connection.
    #[instrument(skip(self))]
    pub async fn release(&self, connection_id: &ConnectionId) -> ReleaseOutcome {
        let mut round = self.round.lock().await;
        let outcome = round.release(connection_id);

        match &outcome {
            ReleaseOutcome::NotEnrolled => {}
            ReleaseOutcome::SlotReleased { remaining } => {
                info!(remaining, "Enrollment slot released");
            }
            ReleaseOutcome::RoundVoided {
                departed,
                remaining,
            } => {
                info!(player = %departed.identity, "Dealt round voided after a participant left");
                let notice = WebSocketMessage::send(
                    DEALER,
                    format!("round cancelled: {} left", departed.identity),
                );
                for seat in remaining {
                    MessageBroadcaster::send_to(
                        &self.connection_manager,
                        &seat.connection_id,
                        &notice,
                    )
                    .await;
                }
            }
        }

        outcome
    }

    async fn send_deal_notice(&self, dealt_hand: &DealtHand) {
        let notice = WebSocketMessage::send(
            DEALER,
            format!("{} {}", dealt_hand.hand, dealt_hand.score.label),
        );
        MessageBroadcaster::send_to(
            &self.connection_manager,
            &dealt_hand.seat.connection_id,
            &notice,
        )
        .await;
    }

    async fn broadcast_abort(&self, reason: &RoundError) {
        let notice = WebSocketMessage::send(DEALER, format!("round aborted: {}", reason));
        MessageBroadcaster::broadcast_all(&self.connection_manager, &notice).await;
    }
}

fn settlement_summary(hands: &[DealtHand]) -> String {
    hands
        .iter()
        .map(|d| format!("{}: {} -- {}", d.seat.identity, d.hand, d.score.label))
        .collect::<Vec<_>>()
        .join("\n")
}
