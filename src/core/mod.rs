pub mod directory;
pub mod gate;
pub mod machine;
pub mod resolver;
pub mod session;
pub mod submitter;

pub use crate::domain::model::{
    BookingOutcome, BookingSelection, ContactInfo, DateCandidate, DateHorizon, Field, Provider,
    ProviderId, RejectionReason, ReservationRequest, Service, ServiceId, TimeSlot,
};
pub use crate::domain::ports::{ConfigProvider, SchedulingService};
pub use crate::utils::error::Result;
