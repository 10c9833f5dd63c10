use anyhow::Result;
use chrono_tz::Tz;
use std::future::Future;
use tracing::{error, info, warn};

use crate::data::cache::ResponseCache;
use crate::data::decoder::{
    decode_active_sports, decode_totals, is_active, sorted_sport_keys, sport_title,
};
use crate::data::normalizer::normalize_points;
use crate::data::odds_api::{active_sports_endpoint, totals_endpoint, OddsApiClient};
use crate::data::types::ActiveSportsResponse;
use crate::odds::aggregator::format_game_list;
use crate::odds::message::render;
use crate::odds::types::{FormattedTotalsOdds, GameFailure, OddsError, PricingMode};

/// Everything one sport produced in a fetch cycle.
#[derive(Debug)]
pub struct SportBriefing {
    pub summary: FormattedTotalsOdds,
    pub messages: Vec<String>,
    pub failures: Vec<GameFailure>,
    pub rejected_points: usize,
}

pub struct TotalsBriefing {
    client: OddsApiClient,
    cache: ResponseCache,
    api_key: String,
    region: String,
    tz: Tz,
    pricing: PricingMode,
}

impl TotalsBriefing {
    pub fn new(
        client: OddsApiClient,
        cache: ResponseCache,
        api_key: String,
        region: String,
        tz: Tz,
        pricing: PricingMode,
    ) -> Self {
        Self {
            client,
            cache,
            api_key,
            region,
            tz,
            pricing,
        }
    }

    /// Active sports listing, served from cache while fresh.
    pub async fn active_sports(&self) -> Result<ActiveSportsResponse> {
        let endpoint = active_sports_endpoint(&self.api_key);

        if let Some(body) = self.cache.get(&endpoint) {
            return Ok(decode_active_sports(&body)?);
        }

        let body = self.client.fetch(&endpoint).await?;
        let sports = decode_active_sports(&body)?;
        self.cache.insert(endpoint, body);

        info!(
            "Fetched {} sports from The Odds API: {:?}",
            sports.data.len(),
            sorted_sport_keys(&sports)
        );
        Ok(sports)
    }

    /// Brief every requested sport. A sport that fails is logged and left
    /// out; the others are still briefed.
    pub async fn run_cycle(&self, sport_keys: &[String]) -> Result<Vec<SportBriefing>> {
        let sports = self.active_sports().await?;

        let briefings = brief_sports(&sports, sport_keys, self.tz, self.pricing, move |key| {
            let endpoint = totals_endpoint(&self.api_key, &key, &self.region);
            async move { self.client.fetch(&endpoint).await }
        })
        .await;

        Ok(briefings)
    }
}

/// Fetch and brief each active sport in `sport_keys`, in order.
///
/// `fetch` returns the raw totals body for a sport key. Inactive keys are
/// never fetched. A fetch or decode failure drops only that sport.
pub async fn brief_sports<F, Fut>(
    sports: &ActiveSportsResponse,
    sport_keys: &[String],
    tz: Tz,
    pricing: PricingMode,
    fetch: F,
) -> Vec<SportBriefing>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<u8>>>,
{
    let mut briefings = Vec::with_capacity(sport_keys.len());

    for key in sport_keys {
        if !is_active(sports, key) {
            warn!("Sport {} is not active, skipping", key);
            continue;
        }

        let body = match fetch(key.clone()).await {
            Ok(body) => body,
            Err(e) => {
                error!("Fetching totals for {} failed: {:?}", key, e);
                continue;
            }
        };

        match build_briefing(&sport_title(sports, key), &body, tz, pricing) {
            Ok(briefing) => briefings.push(briefing),
            Err(e) => error!("Briefing for {} failed: {}", key, e),
        }
    }

    briefings
}

/// Decode, normalize, aggregate and render one totals body.
///
/// Only a decode failure fails the whole sport. Bad points and games that
/// cannot be aggregated are reported in the result.
pub fn build_briefing(
    sport: &str,
    body: &[u8],
    tz: Tz,
    pricing: PricingMode,
) -> Result<SportBriefing, OddsError> {
    let totals = decode_totals(body)?;
    let normalized = normalize_points(&totals);
    let batch = format_game_list(&normalized, sport, tz, pricing);

    let messages = batch
        .odds
        .odds
        .iter()
        .map(|odds| render(odds, tz))
        .collect();

    info!(
        "{} {}: {} games formatted, {} skipped, {} points rejected",
        batch.odds.sport,
        batch.odds.odds_type,
        batch.odds.odds.len(),
        batch.failures.len(),
        normalized.rejections.len()
    );

    Ok(SportBriefing {
        summary: batch.odds,
        messages,
        failures: batch.failures,
        rejected_points: normalized.rejections.len(),
    })
}
