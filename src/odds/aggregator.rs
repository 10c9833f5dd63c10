use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::data::types::{NormalizedGame, NormalizedSite, NormalizedTotals};
use crate::odds::conversion::{american_from_decimal, decimal_to_american};
use crate::odds::types::{FormattedTotalsOdds, GameFailure, OddsError, PricingMode, TotalOdds};

/// Conventional price of a total bet with standard vig.
pub const PLACEHOLDER_ODDS: (i32, i32) = (-110, -110);

/// Output of [`format_game_list`]: every game that could be aggregated, in
/// input order, plus the ones that could not.
#[derive(Debug)]
pub struct FormattedBatch {
    pub odds: FormattedTotalsOdds,
    pub failures: Vec<GameFailure>,
}

/// Join team names, each followed by a single space. The trailing space is
/// part of the message layout.
pub fn teams_label(names: &[String]) -> String {
    names.iter().map(|name| format!("{} ", name)).collect()
}

/// Consensus total: mean of every site's first point value.
///
/// Returns the same number for over and under.
// TODO: derive separate over/under lines once sites report per-side points
pub fn adjusted_line(sites: &[NormalizedSite]) -> Result<(f64, f64), OddsError> {
    if sites.is_empty() {
        return Err(OddsError::NoSites);
    }

    let mut sum = 0.0;
    for site in sites {
        sum += site
            .points_float()
            .next()
            .ok_or_else(|| OddsError::MissingPoints(site.site_key.clone()))?;
    }

    let line = sum / sites.len() as f64;
    Ok((line, line))
}

/// Over/under prices for a game.
pub fn adjusted_odds(mode: PricingMode, sites: &[NormalizedSite]) -> Result<(i32, i32), OddsError> {
    match mode {
        PricingMode::Placeholder => Ok(PLACEHOLDER_ODDS),
        PricingMode::Consensus => consensus_odds(sites),
    }
}

/// Mean decimal price per side across sites, converted to American odds.
///
/// Every site's quote must itself be a valid decimal price; one bad quote
/// fails the game rather than skewing the mean.
fn consensus_odds(sites: &[NormalizedSite]) -> Result<(i32, i32), OddsError> {
    if sites.is_empty() {
        return Err(OddsError::NoSites);
    }

    let mut over_sum = 0.0;
    let mut under_sum = 0.0;
    for site in sites {
        let missing = || OddsError::MissingOdds(site.site_key.clone());
        let over = site.price_for("over").ok_or_else(missing)?;
        let under = site.price_for("under").ok_or_else(missing)?;

        let site_prices = (decimal_to_american(&over.text)?, decimal_to_american(&under.text)?);
        debug!("{} prices: {:?}", site.site_key, site_prices);

        over_sum += over.value;
        under_sum += under.value;
    }

    let count = sites.len() as f64;
    Ok((
        american_from_decimal(over_sum / count)?,
        american_from_decimal(under_sum / count)?,
    ))
}

/// Kickoff in the display timezone.
pub fn local_gametime(commence_time: i64, tz: Tz) -> Result<DateTime<FixedOffset>, OddsError> {
    let utc = Utc
        .timestamp_opt(commence_time, 0)
        .single()
        .ok_or(OddsError::InvalidTimestamp(commence_time))?;

    Ok(utc.with_timezone(&tz).fixed_offset())
}

fn format_game(game: &NormalizedGame, tz: Tz, pricing: PricingMode) -> Result<TotalOdds, OddsError> {
    let (over, under) = adjusted_line(&game.sites)?;
    let (over_odds, under_odds) = adjusted_odds(pricing, &game.sites)?;

    Ok(TotalOdds {
        teams: teams_label(&game.teams),
        gametime: local_gametime(game.commence_time, tz)?,
        over,
        under,
        over_odds,
        under_odds,
    })
}

/// Build one [`TotalOdds`] per game, keeping input order. A game that fails
/// aggregation is reported in `failures` and does not affect the others.
pub fn format_game_list(
    totals: &NormalizedTotals,
    sport: &str,
    tz: Tz,
    pricing: PricingMode,
) -> FormattedBatch {
    let mut odds = Vec::with_capacity(totals.games.len());
    let mut failures = Vec::new();

    for game in &totals.games {
        match format_game(game, tz, pricing) {
            Ok(total) => odds.push(total),
            Err(error) => {
                warn!("Skipping game {} ({:?}): {}", game.id, game.teams, error);
                failures.push(GameFailure {
                    game_id: game.id.clone(),
                    teams: teams_label(&game.teams),
                    error,
                });
            }
        }
    }

    FormattedBatch {
        odds: FormattedTotalsOdds {
            odds_type: "Totals".to_string(),
            sport: sport.to_string(),
            odds,
        },
        failures,
    }
}
