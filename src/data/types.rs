use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::types::OddsError;

/// `GET /v3/sports` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveSportsResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Vec<Sport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub has_outrights: bool,
}

/// `GET /v3/odds?mkt=totals` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsOddsResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(rename = "data")]
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sport_key: String,
    #[serde(default)]
    pub sport_nice: String,
    pub teams: Vec<String>,
    pub commence_time: i64,
    #[serde(default)]
    pub home_team: String,
    pub sites: Vec<Site>,
    #[serde(default)]
    pub sites_count: usize,
}

/// One bookmaker's quote for a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub site_key: String,
    #[serde(default)]
    pub site_nice: String,
    #[serde(default)]
    pub last_update: i64,
    pub odds: SiteOdds,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteOdds {
    #[serde(default)]
    pub totals: Option<TotalsLine>,
}

/// Raw totals market as the API sends it. `odds` and `points` are parallel
/// to `position` ("over", "under").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotalsLine {
    #[serde(default)]
    pub position: Vec<String>,
    #[serde(default)]
    pub odds: Vec<RawNumber>,
    #[serde(default)]
    pub points: Vec<RawNumber>,
}

/// A numeric field that bookmakers report either as a JSON number or a
/// JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawNumber::Number(n) => write!(f, "{}", n),
            RawNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Totals response after point normalization. Owns its data; the decoded
/// response it came from is left untouched.
#[derive(Debug)]
pub struct NormalizedTotals {
    pub games: Vec<NormalizedGame>,
    pub rejections: Vec<PointRejection>,
}

#[derive(Debug, Clone)]
pub struct NormalizedGame {
    pub id: String,
    pub teams: Vec<String>,
    pub commence_time: i64,
    pub sites: Vec<NormalizedSite>,
}

#[derive(Debug, Clone)]
pub struct NormalizedSite {
    pub site_key: String,
    pub position: Vec<String>,
    pub points: Vec<NormalizedPoint>,
    pub odds: Vec<NormalizedPoint>,
}

impl NormalizedSite {
    pub fn points_float(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Price for the given side ("over"/"under"), located through `position`.
    /// Falls back to index 0 for over and 1 for under when `position` is absent.
    pub fn price_for(&self, side: &str) -> Option<&NormalizedPoint> {
        let fallback = if side.eq_ignore_ascii_case("over") { 0 } else { 1 };
        let index = self
            .position
            .iter()
            .position(|p| p.eq_ignore_ascii_case(side))
            .unwrap_or(fallback);

        self.odds.iter().find(|p| p.index == index)
    }
}

/// One quote value in both of its representations. `index` is the position
/// in the raw list it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub index: usize,
    pub text: String,
    pub value: f64,
}

/// A raw value dropped during normalization.
#[derive(Debug)]
pub struct PointRejection {
    pub game_id: String,
    pub site_key: String,
    pub field: &'static str,
    pub index: usize,
    pub error: OddsError,
}

pub(crate) fn default_success() -> bool {
    true
}
