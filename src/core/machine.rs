//! Selection state machine for a single booking session.
//!
//! The machine owns the [`BookingSelection`] and is the only thing allowed to change it.
//! Stages only move forward once their prerequisite holds, and changing an upstream
//! choice always clears everything that depended on it.

use crate::core::gate;
use crate::core::resolver::{AvailabilityQuery, AvailabilityResponse, RequestGeneration, RequestToken};
use crate::core::submitter::Submission;
use crate::domain::model::{
    BookingOutcome, BookingSelection, ContactInfo, DateCandidate, DateHorizon, Field, Provider,
    RejectionReason, ReservationRequest, ServiceId, TimeSlot,
};
use crate::utils::error::{BookingError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStage {
    Idle,
    ServiceChosen,
    /// A date is set but no slots are loaded (availability failed).
    DateChosen,
    SlotsLoading {
        token: RequestToken,
    },
    SlotsReady,
    TimeChosen,
    InfoEditing,
    Submitting,
    Confirmed {
        reservation_id: Option<i64>,
    },
    Failed {
        reason: RejectionReason,
    },
}

impl BookingStage {
    pub fn name(&self) -> &'static str {
        match self {
            BookingStage::Idle => "idle",
            BookingStage::ServiceChosen => "service_chosen",
            BookingStage::DateChosen => "date_chosen",
            BookingStage::SlotsLoading { .. } => "slots_loading",
            BookingStage::SlotsReady => "slots_ready",
            BookingStage::TimeChosen => "time_chosen",
            BookingStage::InfoEditing => "info_editing",
            BookingStage::Submitting => "submitting",
            BookingStage::Confirmed { .. } => "confirmed",
            BookingStage::Failed { .. } => "failed",
        }
    }
}

/// Whether an input changed the machine. `Ignored` inputs leave it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMachine {
    provider: Arc<Provider>,
    horizon: DateHorizon,
    stage: BookingStage,
    selection: BookingSelection,
    slots: Vec<TimeSlot>,
    generation: RequestGeneration,
}

impl SelectionMachine {
    pub fn new(provider: Arc<Provider>, horizon: DateHorizon) -> Self {
        Self {
            provider,
            horizon,
            stage: BookingStage::Idle,
            selection: BookingSelection::default(),
            slots: Vec::new(),
            generation: RequestGeneration::default(),
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn horizon(&self) -> DateHorizon {
        self.horizon
    }

    pub fn stage(&self) -> &BookingStage {
        &self.stage
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    /// Times the client may pick right now. Empty unless slots have loaded.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn unmet_fields(&self) -> BTreeSet<Field> {
        gate::unmet_fields(self.selection.service.as_ref(), &self.selection.contact)
    }

    pub fn is_submittable(&self) -> bool {
        gate::is_submittable(&self.selection)
    }

    fn ensure_mutable(&self) -> Result<()> {
        match self.stage {
            BookingStage::Submitting => Err(BookingError::AlreadyInProgress),
            BookingStage::Confirmed { .. } => Err(BookingError::SelectionFrozen),
            _ => Ok(()),
        }
    }

    fn move_to(&mut self, stage: BookingStage) {
        tracing::debug!("Booking stage {} -> {}", self.stage.name(), stage.name());
        self.stage = stage;
    }

    pub fn select_service(&mut self, service_id: ServiceId) -> Result<Transition> {
        self.ensure_mutable()?;

        let service = self.provider.service(service_id).cloned().ok_or_else(|| {
            tracing::error!(
                "Service {} is not offered by provider {}",
                service_id,
                self.provider.id
            );
            BookingError::invalid_selection(format!(
                "service {} is not offered by provider {}",
                service_id, self.provider.id
            ))
        })?;

        self.selection.service = Some(service);
        self.selection.date = None;
        self.selection.time = None;
        self.slots.clear();
        self.generation.invalidate();
        self.move_to(BookingStage::ServiceChosen);
        Ok(Transition::Applied)
    }

    /// Stores the date and, when a service is chosen, returns the availability lookup
    /// that must be resolved and fed back through [`apply_availability`](Self::apply_availability).
    pub fn select_date(&mut self, date: DateCandidate) -> Result<Option<AvailabilityQuery>> {
        self.ensure_mutable()?;

        if !self.horizon.contains(date) {
            tracing::error!(
                "Date {} is outside the booking window {} to {}",
                date,
                self.horizon.first_day(),
                self.horizon.last_day()
            );
            return Err(BookingError::invalid_selection(format!(
                "date {} is outside the booking window {} to {}",
                date,
                self.horizon.first_day(),
                self.horizon.last_day()
            )));
        }

        self.selection.date = Some(date);
        self.selection.time = None;
        self.slots.clear();

        let Some(service) = &self.selection.service else {
            self.generation.invalidate();
            tracing::debug!("Date {} stored without a service; availability not queried", date);
            return Ok(None);
        };

        let query = AvailabilityQuery {
            token: self.generation.issue(),
            provider_id: self.provider.id,
            service_id: service.id,
            date,
        };
        self.move_to(BookingStage::SlotsLoading { token: query.token });
        Ok(Some(query))
    }

    /// Applies a resolver response if it answers the newest lookup; stale ones are dropped.
    pub fn apply_availability(&mut self, response: AvailabilityResponse) -> Transition {
        let awaiting = matches!(
            self.stage,
            BookingStage::SlotsLoading { token } if token == response.token
        );
        if !awaiting || !self.generation.is_current(response.token) {
            tracing::debug!("Dropping stale availability response {}", response.token);
            return Transition::Ignored;
        }

        match response.result {
            Ok(slots) => {
                tracing::debug!("{} slots available", slots.len());
                self.slots = slots;
                self.move_to(BookingStage::SlotsReady);
            }
            Err(err) => {
                match &err {
                    BookingError::InvalidSelection { .. } => {
                        tracing::error!("Availability lookup rejected: {}", err)
                    }
                    _ => tracing::warn!("Availability lookup failed, no slots offered: {}", err),
                }
                self.slots.clear();
                self.move_to(BookingStage::DateChosen);
            }
        }
        Transition::Applied
    }

    /// Picks a start time. Times outside the currently loaded set are ignored.
    pub fn select_time(&mut self, slot: TimeSlot) -> Result<Transition> {
        self.ensure_mutable()?;

        if !self.slots.contains(&slot) {
            tracing::debug!("Ignoring time {} not in the loaded slot set", slot);
            return Ok(Transition::Ignored);
        }

        self.selection.time = Some(slot);
        let next = match self.stage {
            BookingStage::InfoEditing | BookingStage::Failed { .. } => BookingStage::InfoEditing,
            _ => BookingStage::TimeChosen,
        };
        self.move_to(next);
        Ok(Transition::Applied)
    }

    pub fn edit_contact(&mut self, field: Field, value: impl Into<String>) -> Result<Transition> {
        self.ensure_mutable()?;
        if !field.is_contact() {
            return Err(BookingError::invalid_selection(format!(
                "{} is not a contact field",
                field
            )));
        }
        if self.stage == BookingStage::Idle {
            tracing::debug!("Ignoring {} edit before a service is chosen", field);
            return Ok(Transition::Ignored);
        }

        self.selection.contact.set(field, value);
        self.after_contact_edit();
        Ok(Transition::Applied)
    }

    pub fn set_contact(&mut self, contact: ContactInfo) -> Result<Transition> {
        self.ensure_mutable()?;
        if self.stage == BookingStage::Idle {
            tracing::debug!("Ignoring contact details before a service is chosen");
            return Ok(Transition::Ignored);
        }

        self.selection.contact = contact;
        self.after_contact_edit();
        Ok(Transition::Applied)
    }

    fn after_contact_edit(&mut self) {
        if matches!(
            self.stage,
            BookingStage::TimeChosen | BookingStage::Failed { .. }
        ) {
            self.move_to(BookingStage::InfoEditing);
        }
    }

    /// Freezes the selection for sending. Only one submission may be in flight.
    pub fn begin_submit(&mut self) -> Result<Submission> {
        match self.stage {
            BookingStage::Submitting => {
                tracing::debug!("Submit ignored, a submission is already in progress");
                return Err(BookingError::AlreadyInProgress);
            }
            BookingStage::Confirmed { .. } => return Err(BookingError::SelectionFrozen),
            _ => {}
        }

        let missing = gate::missing_fields(&self.selection);
        let (Some(service), Some(date), Some(time)) = (
            &self.selection.service,
            self.selection.date,
            &self.selection.time,
        ) else {
            return Err(BookingError::NotSubmittable { missing });
        };
        if !missing.is_empty() {
            return Err(BookingError::NotSubmittable { missing });
        }

        let request = ReservationRequest {
            provider_id: self.provider.id,
            service_id: service.id,
            date,
            time: time.clone(),
            contact: self.selection.contact.trimmed(),
        };
        let submission = Submission {
            request,
            selection: self.selection.clone(),
        };
        self.move_to(BookingStage::Submitting);
        Ok(submission)
    }

    pub fn finish_submit(&mut self, outcome: &BookingOutcome) -> Transition {
        if self.stage != BookingStage::Submitting {
            tracing::debug!("Ignoring submission outcome outside of submitting stage");
            return Transition::Ignored;
        }

        match outcome {
            BookingOutcome::Confirmed { reservation_id, .. } => {
                tracing::info!("Booking confirmed (reservation {:?})", reservation_id);
                self.move_to(BookingStage::Confirmed {
                    reservation_id: *reservation_id,
                });
            }
            BookingOutcome::Rejected { reason } => {
                tracing::warn!("Booking rejected: {}", reason);
                self.move_to(BookingStage::Failed {
                    reason: reason.clone(),
                });
            }
        }
        Transition::Applied
    }

    /// Returns from a failed submission to editing, keeping everything entered so far.
    pub fn retry(&mut self) -> Transition {
        if !matches!(self.stage, BookingStage::Failed { .. }) {
            return Transition::Ignored;
        }
        self.move_to(BookingStage::InfoEditing);
        Transition::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProviderId, Service};
    use chrono::NaiveDate;

    fn service(id: i64, requires_address: bool) -> Service {
        Service {
            id: ServiceId(id),
            name: format!("Service {}", id),
            description: None,
            duration_minutes: 30,
            price: None,
            requires_address,
            is_active: true,
        }
    }

    fn machine() -> SelectionMachine {
        let provider = Provider {
            id: ProviderId(3),
            name: "Ana Cortes".to_string(),
            description: None,
            phone: None,
            email: None,
            address: None,
            services: vec![service(1, false), service(2, true)],
        };
        SelectionMachine::new(
            Arc::new(provider),
            DateHorizon::starting(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        )
    }

    fn date(s: &str) -> DateCandidate {
        s.parse().unwrap()
    }

    fn slots(times: &[&str]) -> Vec<TimeSlot> {
        times.iter().map(|t| TimeSlot::from(*t)).collect()
    }

    fn loaded(query: &AvailabilityQuery, times: &[&str]) -> AvailabilityResponse {
        AvailabilityResponse {
            token: query.token,
            result: Ok(slots(times)),
        }
    }

    /// Machine with service 1, 2025-03-10, slots 09:00/09:30 loaded and 09:00 chosen.
    fn with_time_chosen() -> SelectionMachine {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();
        m.apply_availability(loaded(&query, &["09:00", "09:30"]));
        m.select_time("09:00".into()).unwrap();
        m
    }

    #[test]
    fn test_select_service_moves_to_service_chosen() {
        let mut m = machine();
        assert_eq!(m.stage(), &BookingStage::Idle);

        assert_eq!(m.select_service(ServiceId(1)).unwrap(), Transition::Applied);
        assert_eq!(m.stage(), &BookingStage::ServiceChosen);
        assert_eq!(m.selection().service.as_ref().unwrap().id, ServiceId(1));
    }

    #[test]
    fn test_unknown_service_is_invalid_selection() {
        let mut m = machine();
        let before = m.clone();

        let err = m.select_service(ServiceId(42)).unwrap_err();
        assert!(matches!(err, BookingError::InvalidSelection { .. }));
        assert_eq!(m, before);
    }

    #[test]
    fn test_date_without_service_is_stored_but_not_queried() {
        let mut m = machine();
        let query = m.select_date(date("2025-03-10")).unwrap();

        assert!(query.is_none());
        assert_eq!(m.selection().date, Some(date("2025-03-10")));
        assert_eq!(m.stage(), &BookingStage::Idle);
    }

    #[test]
    fn test_date_outside_horizon_is_rejected() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();

        assert!(m.select_date(date("2025-02-28")).is_err());
        assert!(m.select_date(date("2025-03-31")).is_err());
        assert_eq!(m.selection().date, None);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_date_outside_horizon_is_logged_as_error() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let result = tracing::subscriber::with_default(subscriber, || {
            m.select_date(date("2026-01-01"))
        });

        assert!(matches!(result, Err(BookingError::InvalidSelection { .. })));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("ERROR"));
        assert!(output.contains("2026-01-01 is outside the booking window"));
    }

    #[test]
    fn test_date_with_service_starts_loading() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();

        assert_eq!(query.provider_id, ProviderId(3));
        assert_eq!(query.service_id, ServiceId(1));
        assert_eq!(query.date, date("2025-03-10"));
        assert_eq!(m.stage(), &BookingStage::SlotsLoading { token: query.token });

        m.apply_availability(loaded(&query, &["09:00", "09:30"]));
        assert_eq!(m.stage(), &BookingStage::SlotsReady);
        assert_eq!(m.slots(), slots(&["09:00", "09:30"]).as_slice());
    }

    #[test]
    fn test_empty_day_is_slots_ready() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();

        m.apply_availability(loaded(&query, &[]));
        assert_eq!(m.stage(), &BookingStage::SlotsReady);
        assert!(m.slots().is_empty());
    }

    #[test]
    fn test_availability_failure_degrades_to_date_chosen() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();

        let transition = m.apply_availability(AvailabilityResponse {
            token: query.token,
            result: Err(crate::utils::error::AvailabilityError {
                transient: true,
                message: "timeout".to_string(),
            }
            .into()),
        });

        assert_eq!(transition, Transition::Applied);
        assert_eq!(m.stage(), &BookingStage::DateChosen);
        assert!(m.slots().is_empty());
        assert_eq!(m.selection().date, Some(date("2025-03-10")));
    }

    #[test]
    fn test_stale_response_never_overwrites_newer_date() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let first = m.select_date(date("2025-03-10")).unwrap().unwrap();
        let second = m.select_date(date("2025-03-11")).unwrap().unwrap();

        // Second answer arrives first, then the late answer for the first date.
        assert_eq!(m.apply_availability(loaded(&second, &["14:00"])), Transition::Applied);
        assert_eq!(m.apply_availability(loaded(&first, &["09:00"])), Transition::Ignored);

        assert_eq!(m.selection().date, Some(date("2025-03-11")));
        assert_eq!(m.slots(), slots(&["14:00"]).as_slice());
        assert_eq!(m.stage(), &BookingStage::SlotsReady);
    }

    #[test]
    fn test_stale_response_dropped_while_newer_still_loading() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let first = m.select_date(date("2025-03-10")).unwrap().unwrap();
        let second = m.select_date(date("2025-03-11")).unwrap().unwrap();

        assert_eq!(m.apply_availability(loaded(&first, &["09:00"])), Transition::Ignored);
        assert_eq!(m.stage(), &BookingStage::SlotsLoading { token: second.token });
        assert!(m.slots().is_empty());
    }

    #[test]
    fn test_response_after_service_change_is_dropped() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();
        m.select_service(ServiceId(2)).unwrap();

        assert_eq!(m.apply_availability(loaded(&query, &["09:00"])), Transition::Ignored);
        assert_eq!(m.stage(), &BookingStage::ServiceChosen);
        assert!(m.slots().is_empty());
    }

    #[test]
    fn test_changing_service_always_clears_time() {
        let mut time_chosen = with_time_chosen();
        time_chosen.select_service(ServiceId(2)).unwrap();
        assert_eq!(time_chosen.selection().time, None);
        assert_eq!(time_chosen.selection().date, None);
        assert_eq!(time_chosen.stage(), &BookingStage::ServiceChosen);

        let mut editing = with_time_chosen();
        editing.edit_contact(Field::Name, "Ana").unwrap();
        editing.select_service(ServiceId(1)).unwrap();
        assert_eq!(editing.selection().time, None);
        assert!(editing.slots().is_empty());
        assert_eq!(editing.selection().contact.name, "Ana");

        let mut failed = with_time_chosen();
        failed
            .set_contact(ContactInfo::new("Ana", "11999999999"))
            .unwrap();
        failed.begin_submit().unwrap();
        failed.finish_submit(&BookingOutcome::Rejected {
            reason: RejectionReason::Server("slot_taken".to_string()),
        });
        failed.select_service(ServiceId(2)).unwrap();
        assert_eq!(failed.selection().time, None);
        assert_eq!(failed.selection().date, None);
        assert!(failed.slots().is_empty());
        assert_eq!(failed.stage(), &BookingStage::ServiceChosen);
    }

    #[test]
    fn test_changing_date_after_time_reloads() {
        let mut m = with_time_chosen();
        let query = m.select_date(date("2025-03-12")).unwrap().unwrap();

        assert_eq!(m.selection().time, None);
        assert!(m.slots().is_empty());
        assert_eq!(m.stage(), &BookingStage::SlotsLoading { token: query.token });
    }

    #[test]
    fn test_unknown_time_is_a_no_op() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();
        m.apply_availability(loaded(&query, &["09:00", "09:30"]));

        let before = m.clone();
        assert_eq!(m.select_time("10:00".into()).unwrap(), Transition::Ignored);
        assert_eq!(m, before);
    }

    #[test]
    fn test_time_while_loading_is_a_no_op() {
        let mut m = with_time_chosen();
        m.select_date(date("2025-03-12")).unwrap();

        let before = m.clone();
        assert_eq!(m.select_time("09:00".into()).unwrap(), Transition::Ignored);
        assert_eq!(m, before);
    }

    #[test]
    fn test_contact_edit_ignored_before_service() {
        let mut m = machine();
        assert_eq!(m.edit_contact(Field::Name, "Ana").unwrap(), Transition::Ignored);
        assert_eq!(m.selection().contact.name, "");
    }

    #[test]
    fn test_contact_edit_keeps_schedule_stage() {
        let mut m = machine();
        m.select_service(ServiceId(1)).unwrap();
        m.edit_contact(Field::Phone, "11999999999").unwrap();
        assert_eq!(m.stage(), &BookingStage::ServiceChosen);

        let mut m = with_time_chosen();
        m.edit_contact(Field::Name, "Ana").unwrap();
        assert_eq!(m.stage(), &BookingStage::InfoEditing);
        assert_eq!(m.selection().time, Some(TimeSlot::from("09:00")));
    }

    #[test]
    fn test_scheduling_field_is_not_a_contact_field() {
        let mut m = with_time_chosen();
        assert!(m.edit_contact(Field::Time, "10:00").is_err());
    }

    #[test]
    fn test_submit_requires_submittable_selection() {
        let mut m = with_time_chosen();
        match m.begin_submit() {
            Err(BookingError::NotSubmittable { missing }) => {
                assert_eq!(missing, vec![Field::Name, Field::Phone])
            }
            other => panic!("expected NotSubmittable, got {:?}", other),
        }
        assert_eq!(m.stage(), &BookingStage::TimeChosen);
    }

    #[test]
    fn test_address_required_service_blocks_submit() {
        let mut m = machine();
        m.select_service(ServiceId(2)).unwrap();
        let query = m.select_date(date("2025-03-10")).unwrap().unwrap();
        m.apply_availability(loaded(&query, &["09:00"]));
        m.select_time("09:00".into()).unwrap();
        m.set_contact(ContactInfo::new("Ana", "11999999999")).unwrap();

        assert!(!m.is_submittable());
        assert_eq!(m.unmet_fields(), BTreeSet::from([Field::Address]));
        assert!(matches!(m.begin_submit(), Err(BookingError::NotSubmittable { .. })));
    }

    #[test]
    fn test_submission_sends_trimmed_contact() {
        let mut m = with_time_chosen();
        m.set_contact(ContactInfo::new(" Ana ", " 11999999999"))
            .unwrap();

        let submission = m.begin_submit().unwrap();

        assert_eq!(
            submission.request.contact,
            ContactInfo::new("Ana", "11999999999")
        );
        assert_eq!(submission.selection.contact.name, " Ana ");
    }

    #[test]
    fn test_second_submit_while_submitting_is_rejected() {
        let mut m = with_time_chosen();
        m.set_contact(ContactInfo::new("Ana", "11999999999")).unwrap();

        let submission = m.begin_submit().unwrap();
        assert_eq!(submission.request.time, TimeSlot::from("09:00"));
        assert_eq!(m.stage(), &BookingStage::Submitting);

        assert!(matches!(m.begin_submit(), Err(BookingError::AlreadyInProgress)));
        assert!(matches!(
            m.select_service(ServiceId(2)),
            Err(BookingError::AlreadyInProgress)
        ));
        assert_eq!(m.stage(), &BookingStage::Submitting);
    }

    #[test]
    fn test_confirmed_selection_is_frozen() {
        let mut m = with_time_chosen();
        m.set_contact(ContactInfo::new("Ana", "11999999999")).unwrap();
        let submission = m.begin_submit().unwrap();

        m.finish_submit(&BookingOutcome::Confirmed {
            selection: submission.selection,
            reservation_id: Some(12),
        });
        assert_eq!(m.stage(), &BookingStage::Confirmed { reservation_id: Some(12) });

        let before = m.clone();
        assert!(matches!(m.select_date(date("2025-03-12")), Err(BookingError::SelectionFrozen)));
        assert!(matches!(m.edit_contact(Field::Name, "Bia"), Err(BookingError::SelectionFrozen)));
        assert!(matches!(m.begin_submit(), Err(BookingError::SelectionFrozen)));
        assert_eq!(m, before);
    }

    #[test]
    fn test_failed_submission_allows_retry_with_data_kept() {
        let mut m = with_time_chosen();
        m.set_contact(ContactInfo::new("Ana", "11999999999")).unwrap();
        m.begin_submit().unwrap();

        m.finish_submit(&BookingOutcome::Rejected {
            reason: RejectionReason::Server("slot_taken".to_string()),
        });
        assert_eq!(
            m.stage(),
            &BookingStage::Failed {
                reason: RejectionReason::Server("slot_taken".to_string())
            }
        );

        // Submitting straight from Failed is accepted again.
        assert!(m.begin_submit().is_ok());
        m.finish_submit(&BookingOutcome::Rejected {
            reason: RejectionReason::Connectivity,
        });

        assert_eq!(m.retry(), Transition::Applied);
        assert_eq!(m.stage(), &BookingStage::InfoEditing);
        assert_eq!(m.selection().contact.name, "Ana");
        assert_eq!(m.selection().time, Some(TimeSlot::from("09:00")));
    }

    #[test]
    fn test_finish_outside_submitting_is_ignored() {
        let mut m = with_time_chosen();
        let before = m.clone();
        let outcome = BookingOutcome::Rejected {
            reason: RejectionReason::Connectivity,
        };
        assert_eq!(m.finish_submit(&outcome), Transition::Ignored);
        assert_eq!(m.retry(), Transition::Ignored);
        assert_eq!(m, before);
    }
}
