use crate::domain::model::{
    DateCandidate, Provider, ProviderId, ReservationReceipt, ReservationRequest, ServiceId,
    TimeSlot,
};
use crate::utils::error::ServiceError;
use async_trait::async_trait;
use std::time::Duration;

/// The external scheduling service the booking workflow talks to.
#[async_trait]
pub trait SchedulingService: Send + Sync {
    async fn provider_directory(&self) -> Result<Vec<Provider>, ServiceError>;

    async fn availability(
        &self,
        provider_id: ProviderId,
        service_id: ServiceId,
        date: DateCandidate,
    ) -> Result<Vec<TimeSlot>, ServiceError>;

    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationReceipt, ServiceError>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn horizon_days(&self) -> u32;
}
