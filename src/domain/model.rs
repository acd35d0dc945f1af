use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HORIZON_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub i64);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub requires_address: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Provider {
    /// Drops services the provider has switched off; they can never be booked.
    pub fn with_active_services(mut self) -> Self {
        self.services.retain(|s| s.is_active);
        self
    }

    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn offers(&self, id: ServiceId) -> bool {
        self.service(id).is_some()
    }

    /// Case-insensitive match on the name, the description or any service name.
    /// A blank term matches every provider.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&term);

        hit(&self.name)
            || self.description.as_deref().is_some_and(hit)
            || self.services.iter().any(|s| hit(&s.name))
    }
}

/// A bookable calendar day. Serialized as `YYYY-MM-DD`, never carries a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateCandidate(pub NaiveDate);

impl DateCandidate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateCandidate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// The window of days a client may book: `first_day` and the following `days - 1` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateHorizon {
    first_day: NaiveDate,
    days: u32,
}

impl DateHorizon {
    pub fn new(first_day: NaiveDate, days: u32) -> Self {
        Self {
            first_day,
            days: days.max(1),
        }
    }

    pub fn starting(first_day: NaiveDate) -> Self {
        Self::new(first_day, DEFAULT_HORIZON_DAYS)
    }

    pub fn first_day(&self) -> DateCandidate {
        DateCandidate(self.first_day)
    }

    pub fn last_day(&self) -> DateCandidate {
        DateCandidate(self.first_day + Duration::days(i64::from(self.days) - 1))
    }

    pub fn contains(&self, date: DateCandidate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    pub fn candidates(&self) -> Vec<DateCandidate> {
        self.first_day
            .iter_days()
            .take(self.days as usize)
            .map(DateCandidate)
            .collect()
    }
}

/// A start time as published by the provider's schedule, e.g. `"09:30"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlot(pub String);

impl TimeSlot {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TimeSlot {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifiers for every piece of a selection the client has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Service,
    Date,
    Time,
    Name,
    Phone,
    Email,
    Address,
    Notes,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Service => "service",
            Field::Date => "date",
            Field::Time => "time",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Address => "address",
            Field::Notes => "notes",
        }
    }

    pub fn is_contact(&self) -> bool {
        !matches!(self, Field::Service | Field::Date | Field::Time)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
}

impl ContactInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Returns the value of a contact field; scheduling fields have none.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Phone => Some(&self.phone),
            Field::Email => Some(&self.email),
            Field::Address => Some(&self.address),
            Field::Notes => Some(&self.notes),
            Field::Service | Field::Date | Field::Time => None,
        }
    }

    /// Stores `value` in a contact field. Returns false for non-contact fields.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Address => &mut self.address,
            Field::Notes => &mut self.notes,
            Field::Service | Field::Date | Field::Time => return false,
        };
        *slot = value.into();
        true
    }

    /// Copy with surrounding whitespace removed from every field, as it is sent.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            notes: self.notes.trim().to_string(),
        }
    }

    /// Whitespace-only input counts as not filled in.
    pub fn is_filled(&self, field: Field) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }
}

/// Everything the client has chosen so far. Owned by the selection machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingSelection {
    pub service: Option<Service>,
    pub date: Option<DateCandidate>,
    pub time: Option<TimeSlot>,
    pub contact: ContactInfo,
}

/// Snapshot of a complete selection, ready to be sent as one create-reservation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRequest {
    pub provider_id: ProviderId,
    pub service_id: ServiceId,
    pub date: DateCandidate,
    pub time: TimeSlot,
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationReceipt {
    pub reservation_id: Option<i64>,
}

pub const CONNECTIVITY_MESSAGE: &str = "Connection error. Please try again.";
pub const GENERIC_REJECTION_MESSAGE: &str = "The booking could not be completed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Reason supplied by the scheduling service, kept verbatim.
    Server(String),
    Connectivity,
}

impl RejectionReason {
    pub fn message(&self) -> &str {
        match self {
            RejectionReason::Server(reason) => reason,
            RejectionReason::Connectivity => CONNECTIVITY_MESSAGE,
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Confirmed {
        selection: BookingSelection,
        reservation_id: Option<i64>,
    },
    Rejected {
        reason: RejectionReason,
    },
}

impl BookingOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_horizon_generates_thirty_days_inclusive() {
        let horizon = DateHorizon::starting(day(2025, 3, 1));
        let dates = horizon.candidates();

        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0].to_string(), "2025-03-01");
        assert_eq!(dates[29].to_string(), "2025-03-30");
        assert_eq!(horizon.last_day(), dates[29]);
    }

    #[test]
    fn test_horizon_crosses_month_and_year_boundaries() {
        let horizon = DateHorizon::new(day(2024, 12, 20), 15);
        let dates = horizon.candidates();

        assert_eq!(dates.last().unwrap().to_string(), "2025-01-03");
        assert!(horizon.contains(DateCandidate(day(2025, 1, 1))));
        assert!(!horizon.contains(DateCandidate(day(2024, 12, 19))));
        assert!(!horizon.contains(DateCandidate(day(2025, 1, 4))));
    }

    #[test]
    fn test_date_candidate_parse_and_serialize() {
        let date: DateCandidate = "2025-03-10".parse().unwrap();
        assert_eq!(date, DateCandidate::from_ymd(2025, 3, 10).unwrap());
        assert_eq!(serde_json::to_value(date).unwrap(), serde_json::json!("2025-03-10"));
        assert!("10/03/2025".parse::<DateCandidate>().is_err());
    }

    #[test]
    fn test_provider_deserializes_directory_entry() {
        let provider: Provider = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Ana Cortes",
            "description": "Hair and nails",
            "phone": "11988887777",
            "services": [
                {"id": 1, "name": "Haircut", "duration_minutes": 30, "price": 45.0},
                {"id": 2, "name": "Home visit", "duration_minutes": 60, "requires_address": true},
                {"id": 3, "name": "Retired", "duration_minutes": 15, "is_active": false}
            ]
        }))
        .unwrap();

        let provider = provider.with_active_services();
        assert_eq!(provider.id, ProviderId(7));
        assert_eq!(provider.services.len(), 2);
        assert!(provider.service(ServiceId(2)).unwrap().requires_address);
        assert_eq!(provider.service(ServiceId(1)).unwrap().price, Some(45.0));
        assert!(!provider.offers(ServiceId(3)));
    }

    #[test]
    fn test_provider_search_term() {
        let provider = Provider {
            id: ProviderId(7),
            name: "Ana Cortes".to_string(),
            description: Some("Hair and nails".to_string()),
            phone: None,
            email: None,
            address: None,
            services: vec![Service {
                id: ServiceId(1),
                name: "Manicure".to_string(),
                description: None,
                duration_minutes: 45,
                price: None,
                requires_address: false,
                is_active: true,
            }],
        };

        assert!(provider.matches("ana"));
        assert!(provider.matches("NAILS"));
        assert!(provider.matches(" manicure "));
        assert!(provider.matches("  "));
        assert!(!provider.matches("massage"));
    }

    #[test]
    fn test_contact_fields_treat_whitespace_as_empty() {
        let mut contact = ContactInfo::new("Ana", "   ");
        assert!(contact.is_filled(Field::Name));
        assert!(!contact.is_filled(Field::Phone));

        assert!(contact.set(Field::Phone, "11999999999"));
        assert!(contact.is_filled(Field::Phone));
        assert!(!contact.set(Field::Time, "09:00"));
        assert_eq!(contact.get(Field::Time), None);
    }

    #[test]
    fn test_trimmed_contact_drops_surrounding_whitespace() {
        let mut contact = ContactInfo::new(" Ana ", "11999999999\n");
        contact.set(Field::Notes, "   ");

        let trimmed = contact.trimmed();
        assert_eq!(trimmed.name, "Ana");
        assert_eq!(trimmed.phone, "11999999999");
        assert_eq!(trimmed.notes, "");
        assert_eq!(contact.name, " Ana ");
    }
}
