use clap::Parser;
use slot_booking::config::cli::{BookArgs, Command};
use slot_booking::core::directory::search_providers;
use slot_booking::domain::model::{BookingOutcome, DateCandidate, DateHorizon, ProviderId, ServiceId};
use slot_booking::domain::ports::ConfigProvider;
use slot_booking::utils::error::ErrorSeverity;
use slot_booking::utils::logger;
use slot_booking::{BookingError, BookingSession, CliConfig, HttpSchedulingService, Transition};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.next_step());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Settings: {:?}", settings);

    let service = Arc::new(HttpSchedulingService::from_config(&settings)?);
    let horizon = DateHorizon::new(chrono::Local::now().date_naive(), settings.horizon_days());

    let result = match &cli.command {
        Command::Providers { search } => list_providers(service.as_ref(), search.as_deref()).await,
        Command::Dates => {
            for date in horizon.candidates() {
                println!("{}  {}", date, date.date().format("%A"));
            }
            Ok(())
        }
        Command::Services { provider } => {
            list_services(service, ProviderId(*provider), horizon).await
        }
        Command::Slots {
            provider,
            service: service_id,
            date,
        } => {
            list_slots(service, ProviderId(*provider), ServiceId(*service_id), *date, horizon)
                .await
        }
        Command::Book(args) => book(service, args, horizon).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Booking failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.next_step());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn list_providers(
    service: &HttpSchedulingService,
    search: Option<&str>,
) -> slot_booking::Result<()> {
    let providers = search_providers(service, search).await?;

    if providers.is_empty() {
        match search {
            Some(term) => println!("No providers found for \"{}\"", term),
            None => println!("No providers registered"),
        }
    }
    for p in &providers {
        println!("[{}] {}", p.id, p.name);
        if let Some(description) = &p.description {
            println!("    {}", description);
        }
        let services: Vec<&str> = p.services.iter().map(|s| s.name.as_str()).collect();
        if !services.is_empty() {
            println!("    Services: {}", services.join(", "));
        }
    }
    Ok(())
}

async fn list_services(
    service: Arc<HttpSchedulingService>,
    provider_id: ProviderId,
    horizon: DateHorizon,
) -> slot_booking::Result<()> {
    let session = BookingSession::open(service, provider_id, horizon).await?;
    let provider = session.provider();

    println!("{}", provider.name);
    if let Some(description) = &provider.description {
        println!("{}", description);
    }
    for s in &provider.services {
        let price = s.price.map(|p| format!(" - R$ {:.2}", p)).unwrap_or_default();
        let address = if s.requires_address { " (address required)" } else { "" };
        println!("  [{}] {} - {}min{}{}", s.id, s.name, s.duration_minutes, price, address);
    }
    Ok(())
}

async fn list_slots(
    service: Arc<HttpSchedulingService>,
    provider_id: ProviderId,
    service_id: ServiceId,
    date: DateCandidate,
    horizon: DateHorizon,
) -> slot_booking::Result<()> {
    let mut session = BookingSession::open(service, provider_id, horizon).await?;
    session.select_service(service_id)?;
    session.select_date(date).await?;

    if session.available_slots().is_empty() {
        println!("No times available on {}", date);
    }
    for slot in session.available_slots() {
        println!("{}", slot);
    }
    Ok(())
}

async fn book(
    service: Arc<HttpSchedulingService>,
    args: &BookArgs,
    horizon: DateHorizon,
) -> slot_booking::Result<()> {
    let mut session = BookingSession::open(service, args.provider_id(), horizon).await?;
    session.select_service(args.service_id())?;
    session.select_date(args.date).await?;
    if session.select_time(args.time_slot())? == Transition::Ignored {
        return Err(BookingError::invalid_selection(format!(
            "{} is not a free time on {}",
            args.time, args.date
        )));
    }
    session.set_contact(args.contact())?;

    match session.submit().await? {
        BookingOutcome::Confirmed {
            selection,
            reservation_id,
        } => {
            tracing::info!("✅ Booking confirmed");
            println!("✅ Booking confirmed!");
            if let Some(id) = reservation_id {
                println!("Reservation: #{}", id);
            }
            println!("Provider: {}", session.provider().name);
            if let Some(s) = &selection.service {
                println!("Service:  {}", s.name);
            }
            if let (Some(date), Some(time)) = (selection.date, &selection.time) {
                println!("When:     {} {}", date.date().format("%d/%m/%Y"), time);
            }
            Ok(())
        }
        BookingOutcome::Rejected { reason } => Err(BookingError::from(reason)),
    }
}
