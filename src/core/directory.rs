use crate::domain::model::Provider;
use crate::domain::ports::SchedulingService;
use crate::utils::error::Result;

/// Lists providers from the directory, optionally narrowed by a search term.
/// Inactive services are dropped before matching so they are neither shown nor searched.
pub async fn search_providers<S: SchedulingService + ?Sized>(
    service: &S,
    term: Option<&str>,
) -> Result<Vec<Provider>> {
    let directory = service.provider_directory().await.map_err(|e| {
        tracing::error!("Provider directory unavailable: {}", e);
        e
    })?;
    let total = directory.len();

    let providers: Vec<Provider> = directory
        .into_iter()
        .map(Provider::with_active_services)
        .filter(|p| term.map_or(true, |t| p.matches(t)))
        .collect();

    tracing::debug!(
        "{} of {} providers match {:?}",
        providers.len(),
        total,
        term.unwrap_or("")
    );
    Ok(providers)
}
