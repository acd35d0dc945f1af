pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::ClientSettings;

pub use adapters::HttpSchedulingService;
pub use core::{
    machine::{BookingStage, SelectionMachine, Transition},
    session::BookingSession,
};
pub use utils::error::{BookingError, Result};
