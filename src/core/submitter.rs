use crate::domain::model::{
    BookingOutcome, BookingSelection, RejectionReason, ReservationRequest,
    GENERIC_REJECTION_MESSAGE,
};
use crate::domain::ports::SchedulingService;
use crate::utils::error::ServiceError;
use std::sync::Arc;

/// A frozen, complete selection handed out by the state machine for sending.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub request: ReservationRequest,
    pub selection: BookingSelection,
}

/// Sends one create-reservation call per submission and relays the server's verdict.
///
/// Never retries on its own; a retry is a new submission started by the client.
pub struct BookingSubmitter<S: SchedulingService + ?Sized> {
    service: Arc<S>,
}

impl<S: SchedulingService + ?Sized> BookingSubmitter<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    pub async fn submit(&self, submission: Submission) -> BookingOutcome {
        let request = &submission.request;
        tracing::info!(
            "Submitting reservation for provider {} service {} on {} at {}",
            request.provider_id,
            request.service_id,
            request.date,
            request.time
        );

        match self.service.create_reservation(request).await {
            Ok(receipt) => BookingOutcome::Confirmed {
                selection: submission.selection,
                reservation_id: receipt.reservation_id,
            },
            Err(err) => {
                let reason = rejection_reason(err);
                tracing::warn!("Reservation not created: {}", reason);
                BookingOutcome::Rejected { reason }
            }
        }
    }
}

fn rejection_reason(err: ServiceError) -> RejectionReason {
    match err {
        ServiceError::Transport { .. } => RejectionReason::Connectivity,
        ServiceError::Status {
            reason: Some(reason),
            ..
        } if !reason.trim().is_empty() => RejectionReason::Server(reason),
        ServiceError::Status { .. } | ServiceError::Decode { .. } => {
            RejectionReason::Server(GENERIC_REJECTION_MESSAGE.to_string())
        }
    }
}
