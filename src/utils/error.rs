use crate::domain::model::{Field, RejectionReason, CONNECTIVITY_MESSAGE};
use thiserror::Error;

/// Failure reported by the external Scheduling Service collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Transport failure: {message}")]
    Transport { message: String, timeout: bool },

    #[error("Scheduling service returned {status}: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Status { status: u16, reason: Option<String> },

    #[error("Unexpected response body: {message}")]
    Decode { message: String },
}

impl ServiceError {
    /// Transport failures and 5xx responses may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Transport { .. } => true,
            ServiceError::Status { status, .. } => *status >= 500,
            ServiceError::Decode { .. } => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode {
                message: err.to_string(),
            }
        } else {
            ServiceError::Transport {
                message: err.to_string(),
                timeout: err.is_timeout(),
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Availability lookup failed (transient: {transient}): {message}")]
pub struct AvailabilityError {
    pub transient: bool,
    pub message: String,
}

impl From<ServiceError> for AvailabilityError {
    fn from(err: ServiceError) -> Self {
        Self {
            transient: err.is_transient(),
            message: err.to_string(),
        }
    }
}

const RETRY_HINT: &str = "Nothing needs to change, try the same request again in a moment";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid selection: {message}")]
    InvalidSelection { message: String },

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error("Reservation rejected: {reason}")]
    SubmissionRejected { reason: String },

    #[error("Connectivity error: {message}")]
    ConnectivityError { message: String },

    #[error("A submission is already in progress")]
    AlreadyInProgress,

    #[error("Selection is not submittable, missing: {}", format_fields(.missing))]
    NotSubmittable { missing: Vec<Field> },

    #[error("Booking is confirmed and can no longer be changed")]
    SelectionFrozen,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<RejectionReason> for BookingError {
    fn from(reason: RejectionReason) -> Self {
        match reason {
            RejectionReason::Server(reason) => BookingError::SubmissionRejected { reason },
            RejectionReason::Connectivity => BookingError::ConnectivityError {
                message: CONNECTIVITY_MESSAGE.to_string(),
            },
        }
    }
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Selection,
    Scheduling,
    Submission,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn invalid_selection(message: impl Into<String>) -> Self {
        BookingError::InvalidSelection {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::InvalidSelection { .. }
            | BookingError::NotSubmittable { .. }
            | BookingError::SelectionFrozen => ErrorCategory::Selection,
            BookingError::Availability(_) => ErrorCategory::Scheduling,
            BookingError::SubmissionRejected { .. } | BookingError::AlreadyInProgress => {
                ErrorCategory::Submission
            }
            BookingError::ConnectivityError { .. } | BookingError::Service(_) => {
                ErrorCategory::Network
            }
            BookingError::ConfigError { .. } | BookingError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            BookingError::IoError(_) | BookingError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BookingError::AlreadyInProgress | BookingError::SelectionFrozen => ErrorSeverity::Low,
            BookingError::Availability(_)
            | BookingError::ConnectivityError { .. }
            | BookingError::Service(_)
            | BookingError::SubmissionRejected { .. } => ErrorSeverity::Medium,
            BookingError::InvalidSelection { .. }
            | BookingError::NotSubmittable { .. }
            | BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            BookingError::IoError(_) | BookingError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Errors the user can clear by trying again without changing anything.
    /// A server rejection needs a different selection, so it is not one of them.
    pub fn is_retryable(&self) -> bool {
        match self {
            BookingError::Availability(e) => e.transient,
            BookingError::Service(e) => e.is_transient(),
            BookingError::ConnectivityError { .. } => true,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::InvalidSelection { message } => {
                format!("The selected provider or service is not available: {}", message)
            }
            BookingError::Availability(_) => {
                "No times could be loaded for this date right now".to_string()
            }
            BookingError::SubmissionRejected { reason } => reason.clone(),
            BookingError::ConnectivityError { .. } | BookingError::Service(_) => {
                CONNECTIVITY_MESSAGE.to_string()
            }
            BookingError::AlreadyInProgress => "Your booking is being sent".to_string(),
            BookingError::NotSubmittable { missing } => {
                format!("Please fill in: {}", format_fields(missing))
            }
            BookingError::SelectionFrozen => "This booking is already confirmed".to_string(),
            BookingError::ConfigError { message } => format!("Configuration problem: {}", message),
            BookingError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            BookingError::IoError(e) => format!("File access failed: {}", e),
            BookingError::SerializationError(e) => format!("Data could not be read: {}", e),
        }
    }

    /// The hint shown after a failure: try again for transient errors, otherwise what to change.
    pub fn next_step(&self) -> &'static str {
        if self.is_retryable() {
            RETRY_HINT
        } else {
            self.recovery_suggestion()
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Selection => "Pick a service, date and time from the offered options",
            ErrorCategory::Scheduling => "Choose another date or try again in a moment",
            ErrorCategory::Submission => "Review your details and submit again",
            ErrorCategory::Network => "Check the scheduling service address and your connection",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file permissions and disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
