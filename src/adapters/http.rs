use crate::domain::model::{
    DateCandidate, Provider, ProviderId, ReservationReceipt, ReservationRequest, ServiceId,
    TimeSlot,
};
use crate::domain::ports::{ConfigProvider, SchedulingService};
use crate::utils::error::{BookingError, Result, ServiceError};
use crate::utils::validation::validate_url;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct DirectoryBody {
    professionals: Vec<Provider>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityBody {
    available_times: Vec<TimeSlot>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CreatedBody {
    appointment: Option<CreatedAppointment>,
    id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreatedAppointment {
    id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AppointmentBody<'a> {
    professional_id: ProviderId,
    service_id: ServiceId,
    appointment_date: DateCandidate,
    appointment_time: &'a str,
    client_name: &'a str,
    client_phone: &'a str,
    client_email: Option<&'a str>,
    client_address: Option<&'a str>,
    notes: Option<&'a str>,
}

fn optional(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl<'a> From<&'a ReservationRequest> for AppointmentBody<'a> {
    fn from(request: &'a ReservationRequest) -> Self {
        let contact = &request.contact;
        Self {
            professional_id: request.provider_id,
            service_id: request.service_id,
            appointment_date: request.date,
            appointment_time: request.time.as_str(),
            client_name: &contact.name,
            client_phone: &contact.phone,
            client_email: optional(&contact.email),
            client_address: optional(&contact.address),
            notes: optional(&contact.notes),
        }
    }
}

/// Scheduling service reached over its JSON REST API.
#[derive(Debug, Clone)]
pub struct HttpSchedulingService {
    client: Client,
    base_url: String,
}

impl HttpSchedulingService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        validate_url("service.base_url", base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BookingError::ConfigError {
                message: format!("HTTP client could not be built: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn status_error(response: Response) -> ServiceError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.error);

        tracing::debug!("Scheduling service answered {}: {}", status, text);
        ServiceError::Status { status, reason }
    }
}

#[async_trait::async_trait]
impl SchedulingService for HttpSchedulingService {
    async fn provider_directory(&self) -> std::result::Result<Vec<Provider>, ServiceError> {
        let url = self.url("/api/professionals/directory");
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: DirectoryBody = response.json().await?;
        Ok(body.professionals)
    }

    async fn availability(
        &self,
        provider_id: ProviderId,
        service_id: ServiceId,
        date: DateCandidate,
    ) -> std::result::Result<Vec<TimeSlot>, ServiceError> {
        let url = self.url(&format!("/api/professionals/{}/availability", provider_id));
        tracing::debug!("GET {} date={} service_id={}", url, date, service_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("date", date.to_string()),
                ("service_id", service_id.to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: AvailabilityBody = response.json().await?;
        Ok(body.available_times)
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> std::result::Result<ReservationReceipt, ServiceError> {
        let url = self.url("/api/appointments");
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&AppointmentBody::from(request))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        // The reservation exists once the server says 2xx; the body only adds the id.
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<CreatedBody>(&text).unwrap_or_default();
        let reservation_id = body.appointment.and_then(|a| a.id).or(body.id);

        Ok(ReservationReceipt { reservation_id })
    }
}
