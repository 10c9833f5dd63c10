use serde::Deserialize;

use crate::data::types::{default_success, ActiveSportsResponse, TotalsOddsResponse};
use crate::odds::types::OddsError;

/// Fields every odds API body carries, checked before the strict decode so
/// an API-side failure is reported with its message instead of as a
/// missing `data` field.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    msg: Option<String>,
}

fn check_envelope(bytes: &[u8]) -> Result<(), OddsError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if !envelope.success {
        return Err(OddsError::Upstream(
            envelope.msg.unwrap_or_else(|| "no message".to_string()),
        ));
    }
    Ok(())
}

pub fn decode_active_sports(bytes: &[u8]) -> Result<ActiveSportsResponse, OddsError> {
    check_envelope(bytes)?;
    Ok(serde_json::from_slice(bytes)?)
}

pub fn decode_totals(bytes: &[u8]) -> Result<TotalsOddsResponse, OddsError> {
    check_envelope(bytes)?;
    Ok(serde_json::from_slice(bytes)?)
}

/// Sport keys in the order the API listed them. The order has no meaning;
/// use [`sorted_sport_keys`] when a stable order is needed.
pub fn extract_sport_keys(resp: &ActiveSportsResponse) -> Vec<String> {
    resp.data.iter().map(|sport| sport.key.clone()).collect()
}

pub fn sorted_sport_keys(resp: &ActiveSportsResponse) -> Vec<String> {
    let mut keys = extract_sport_keys(resp);
    keys.sort();
    keys
}

/// Display title for a sport key, e.g. `americanfootball_nfl` -> `NFL`.
/// Falls back to the key itself when the sport is unknown or untitled.
pub fn sport_title(resp: &ActiveSportsResponse, key: &str) -> String {
    resp.data
        .iter()
        .find(|sport| sport.key == key)
        .map(|sport| sport.title.trim())
        .filter(|title| !title.is_empty())
        .unwrap_or(key)
        .to_string()
}

pub fn is_active(resp: &ActiveSportsResponse, key: &str) -> bool {
    resp.data.iter().any(|sport| sport.key == key && sport.active)
}
