use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Aggregated totals for every game of one sport, ready to be serialized
/// or rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedTotalsOdds {
    pub odds_type: String,
    pub sport: String,
    pub odds: Vec<TotalOdds>,
}

/// Consensus over/under line for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalOdds {
    pub teams: String,
    pub gametime: DateTime<FixedOffset>,
    pub over: f64,
    pub under: f64,
    pub over_odds: i32,
    pub under_odds: i32,
}

/// How the over/under prices of a game are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Conventional -110/-110 vig price for every game.
    #[default]
    Placeholder,
    /// Mean decimal price across bookmakers, converted to American odds.
    Consensus,
}

/// A game that could not be aggregated. The rest of the batch is unaffected.
#[derive(Debug)]
pub struct GameFailure {
    pub game_id: String,
    pub teams: String,
    pub error: OddsError,
}

#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    #[error("Malformed odds API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Odds API reported failure: {0}")]
    Upstream(String),

    #[error("Not a number: {0:?}")]
    Parse(String),

    #[error("Decimal odds must be above 1.0, got {0}")]
    InvalidDecimalOdds(f64),

    #[error("No bookmaker sites reported a line")]
    NoSites,

    #[error("Site {0} has no point values")]
    MissingPoints(String),

    #[error("Site {0} has no over/under prices")]
    MissingOdds(String),

    #[error("Commence time {0} is out of range")]
    InvalidTimestamp(i64),
}
