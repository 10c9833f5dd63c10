mod briefing;
mod config;
mod data;
mod monitoring;
mod odds;

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use briefing::totals::TotalsBriefing;
use config::{Config, Credentials};
use data::cache::ResponseCache;
use data::odds_api::OddsApiClient;
use monitoring::outbox::{write_summary, Outbox};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Odds briefing starting...");

    // Load configuration
    let config_path = std::env::var("ODDS_BRIEFING_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    let credentials = Credentials::load()?;
    let tz = config.display_timezone()?;

    tracing::info!("Sports: {:?}", config.odds_api.sports);
    tracing::info!("Display timezone: {}", tz.name());
    tracing::info!("Pricing mode: {:?}", config.pricing.mode);
    if !credentials.has_messaging() {
        tracing::info!("No messaging credentials, messages go to the outbox only");
    }

    let client = OddsApiClient::new(
        config.odds_api.base_url.clone(),
        Duration::from_secs(config.odds_api.request_timeout_secs),
    )?;
    let cache = ResponseCache::new(Duration::from_secs(config.odds_api.active_sports_ttl_secs));

    let briefing = TotalsBriefing::new(
        client,
        cache,
        credentials.odds_api_key.clone(),
        config.odds_api.region.clone(),
        tz,
        config.pricing.mode,
    );
    let outbox = Outbox::from_path(config.output.outbox_path.as_deref());

    if config.system.run_once {
        return run_cycle(&briefing, &config, &outbox).await;
    }

    let period = Duration::from_secs(config.system.poll_interval_secs);
    let (briefing, config, outbox) = (&briefing, &config, &outbox);
    poll_until(period, tokio::signal::ctrl_c(), || async move {
        if let Err(e) = run_cycle(briefing, config, outbox).await {
            tracing::error!("Cycle failed: {:?}", e);
        }
    })
    .await;

    tracing::info!("Shutting down...");
    Ok(())
}

/// Run `cycle` every `period` until `shutdown` resolves. Returns the number
/// of cycles started; an in-flight cycle is abandoned on shutdown.
async fn poll_until<S, C, Fut>(period: Duration, shutdown: S, mut cycle: C) -> usize
where
    S: Future,
    C: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(period);
    let mut started = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => return started,
        }

        started += 1;
        tokio::select! {
            _ = cycle() => {}
            _ = &mut shutdown => return started,
        }
    }
}

async fn run_cycle(briefing: &TotalsBriefing, config: &Config, outbox: &Outbox) -> Result<()> {
    let start = std::time::Instant::now();
    let briefings = briefing.run_cycle(&config.odds_api.sports).await?;

    let mut delivered = 0;
    for sport in &briefings {
        for failure in &sport.failures {
            tracing::warn!(
                "{}: no message for {}({}): {}",
                sport.summary.sport,
                failure.teams,
                failure.game_id,
                failure.error
            );
        }
        if sport.rejected_points > 0 {
            tracing::warn!("{}: {} point values rejected", sport.summary.sport, sport.rejected_points);
        }
        for message in &sport.messages {
            outbox.deliver(&sport.summary.sport, message)?;
            delivered += 1;
        }
    }

    if let Some(path) = &config.output.summary_path {
        let summaries: Vec<_> = briefings.iter().map(|b| b.summary.clone()).collect();
        write_summary(path, &summaries)?;
    }

    tracing::info!(
        "Cycle completed: {} sports, {} messages in {:?}",
        briefings.len(),
        delivered,
        start.elapsed()
    );
    Ok(())
}
