use crate::config::toml_config::TomlConfig;
use crate::config::ClientSettings;
use crate::domain::model::{ContactInfo, DateCandidate, ProviderId, ServiceId, TimeSlot};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "booking")]
#[command(about = "Reserve a time slot with a service provider, no account needed")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Scheduling service address, overrides the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Number of days, starting today, that can be booked
    #[arg(long, global = true)]
    pub horizon_days: Option<u32>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List providers, optionally searching by name, description or service
    Providers {
        #[arg(long)]
        search: Option<String>,
    },
    /// List the services a provider offers
    Services {
        #[arg(long)]
        provider: i64,
    },
    /// List the dates that can be booked
    Dates,
    /// List the free start times for a service on a date
    Slots {
        #[arg(long)]
        provider: i64,
        #[arg(long)]
        service: i64,
        #[arg(long)]
        date: DateCandidate,
    },
    /// Book a time slot
    Book(BookArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(long)]
    pub provider: i64,
    #[arg(long)]
    pub service: i64,
    #[arg(long)]
    pub date: DateCandidate,
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl BookArgs {
    pub fn provider_id(&self) -> ProviderId {
        ProviderId(self.provider)
    }

    pub fn service_id(&self) -> ServiceId {
        ServiceId(self.service)
    }

    pub fn time_slot(&self) -> TimeSlot {
        TimeSlot::new(self.time.trim())
    }

    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

impl CliConfig {
    /// 合併設定檔與命令列參數
    pub fn settings(&self) -> Result<ClientSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                ClientSettings::from_toml(&file_config)
            }
            None => ClientSettings::default(),
        };

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(days) = self.horizon_days {
            settings.horizon_days = days;
        }

        settings.validate()?;
        Ok(settings)
    }
}
