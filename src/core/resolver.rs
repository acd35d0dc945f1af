//! Availability resolution with last-request-wins ordering.
//!
//! Every lookup is tagged with a [`RequestToken`] drawn from a [`RequestGeneration`].
//! Only a response whose token is still the newest one issued may be applied; anything
//! older arrived for a superseded (service, date) and is dropped.

use crate::domain::model::{DateCandidate, DateHorizon, Provider, ProviderId, ServiceId, TimeSlot};
use crate::domain::ports::SchedulingService;
use crate::utils::error::{AvailabilityError, BookingError, Result};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of request tokens. Issuing a new token invalidates all earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Invalidates any outstanding token without starting a new lookup.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub token: RequestToken,
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub date: DateCandidate,
}

#[derive(Debug)]
pub struct AvailabilityResponse {
    pub token: RequestToken,
    pub result: Result<Vec<TimeSlot>>,
}

pub struct AvailabilityResolver<S: SchedulingService + ?Sized> {
    service: Arc<S>,
    provider: Arc<Provider>,
    horizon: DateHorizon,
}

impl<S: SchedulingService + ?Sized> AvailabilityResolver<S> {
    pub fn new(service: Arc<S>, provider: Arc<Provider>, horizon: DateHorizon) -> Self {
        Self {
            service,
            provider,
            horizon,
        }
    }

    pub async fn resolve(&self, query: &AvailabilityQuery) -> AvailabilityResponse {
        AvailabilityResponse {
            token: query.token,
            result: self.lookup(query).await,
        }
    }

    async fn lookup(&self, query: &AvailabilityQuery) -> Result<Vec<TimeSlot>> {
        self.check(query)?;

        tracing::debug!(
            "Requesting availability {} for provider {} service {} on {}",
            query.token,
            query.provider_id,
            query.service_id,
            query.date
        );

        let slots = self
            .service
            .availability(query.provider_id, query.service_id, query.date)
            .await
            .map_err(AvailabilityError::from)?;

        tracing::debug!("Availability {} returned {} slots", query.token, slots.len());
        Ok(slots)
    }

    fn check(&self, query: &AvailabilityQuery) -> Result<()> {
        if query.provider_id != self.provider.id {
            return Err(BookingError::invalid_selection(format!(
                "provider {} is not the provider being booked ({})",
                query.provider_id, self.provider.id
            )));
        }
        if !self.provider.offers(query.service_id) {
            return Err(BookingError::invalid_selection(format!(
                "service {} is not offered by provider {}",
                query.service_id, self.provider.id
            )));
        }
        if !self.horizon.contains(query.date) {
            return Err(BookingError::invalid_selection(format!(
                "date {} is outside the booking window {} to {}",
                query.date,
                self.horizon.first_day(),
                self.horizon.last_day()
            )));
        }
        Ok(())
    }
}
