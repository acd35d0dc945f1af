use crate::core::machine::{BookingStage, SelectionMachine, Transition};
use crate::core::resolver::{AvailabilityQuery, AvailabilityResolver, AvailabilityResponse};
use crate::core::submitter::BookingSubmitter;
use crate::domain::model::{
    BookingOutcome, ContactInfo, DateCandidate, DateHorizon, Field, Provider, ProviderId,
    ServiceId, TimeSlot,
};
use crate::domain::ports::SchedulingService;
use crate::utils::error::{BookingError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One client's booking with one provider, from service choice to outcome.
pub struct BookingSession<S: SchedulingService + ?Sized> {
    machine: SelectionMachine,
    resolver: AvailabilityResolver<S>,
    submitter: BookingSubmitter<S>,
}

impl<S: SchedulingService + ?Sized> BookingSession<S> {
    /// Loads the provider from the directory. Any failure to find it is an invalid selection.
    pub async fn open(
        service: Arc<S>,
        provider_id: ProviderId,
        horizon: DateHorizon,
    ) -> Result<Self> {
        tracing::debug!("Loading provider {} from directory", provider_id);

        let directory = service.provider_directory().await.map_err(|e| {
            tracing::error!("Provider directory unavailable: {}", e);
            BookingError::invalid_selection(format!("provider directory unavailable: {}", e))
        })?;

        let provider = directory
            .into_iter()
            .find(|p| p.id == provider_id)
            .ok_or_else(|| {
                tracing::error!("Provider {} not found in directory", provider_id);
                BookingError::invalid_selection(format!("provider {} not found", provider_id))
            })?;

        Ok(Self::with_provider(service, provider, horizon))
    }

    pub fn with_provider(service: Arc<S>, provider: Provider, horizon: DateHorizon) -> Self {
        let provider = Arc::new(provider.with_active_services());
        tracing::info!(
            "Booking session for {} ({} services)",
            provider.name,
            provider.services.len()
        );

        Self {
            machine: SelectionMachine::new(provider.clone(), horizon),
            resolver: AvailabilityResolver::new(service.clone(), provider, horizon),
            submitter: BookingSubmitter::new(service),
        }
    }

    pub fn machine(&self) -> &SelectionMachine {
        &self.machine
    }

    pub fn provider(&self) -> &Provider {
        self.machine.provider()
    }

    pub fn stage(&self) -> &BookingStage {
        self.machine.stage()
    }

    pub fn date_candidates(&self) -> Vec<DateCandidate> {
        self.machine.horizon().candidates()
    }

    pub fn available_slots(&self) -> &[TimeSlot] {
        self.machine.slots()
    }

    pub fn unmet_fields(&self) -> BTreeSet<Field> {
        self.machine.unmet_fields()
    }

    pub fn is_submittable(&self) -> bool {
        self.machine.is_submittable()
    }

    pub fn select_service(&mut self, service_id: ServiceId) -> Result<Transition> {
        self.machine.select_service(service_id)
    }

    /// Sets the date and, with a service chosen, loads its slots before returning.
    pub async fn select_date(&mut self, date: DateCandidate) -> Result<Transition> {
        match self.machine.select_date(date)? {
            Some(query) => {
                let response = self.resolve(&query).await;
                Ok(self.machine.apply_availability(response))
            }
            None => Ok(Transition::Applied),
        }
    }

    /// Sets the date and hands back the lookup to run, without running it.
    pub fn request_availability(&mut self, date: DateCandidate) -> Result<Option<AvailabilityQuery>> {
        self.machine.select_date(date)
    }

    /// Runs a lookup without touching the machine. Feed the result to [`apply_availability`](Self::apply_availability).
    pub async fn resolve(&self, query: &AvailabilityQuery) -> AvailabilityResponse {
        self.resolver.resolve(query).await
    }

    pub fn apply_availability(&mut self, response: AvailabilityResponse) -> Transition {
        self.machine.apply_availability(response)
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> Result<Transition> {
        self.machine.select_time(slot)
    }

    pub fn edit_contact(&mut self, field: Field, value: impl Into<String>) -> Result<Transition> {
        self.machine.edit_contact(field, value)
    }

    pub fn set_contact(&mut self, contact: ContactInfo) -> Result<Transition> {
        self.machine.set_contact(contact)
    }

    /// Sends the selection once. The outcome is also recorded in the machine's stage.
    pub async fn submit(&mut self) -> Result<BookingOutcome> {
        let submission = self.machine.begin_submit()?;
        let outcome = self.submitter.submit(submission).await;
        self.machine.finish_submit(&outcome);
        Ok(outcome)
    }

    pub fn retry(&mut self) -> Transition {
        self.machine.retry()
    }
}
