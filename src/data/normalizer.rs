use tracing::warn;

use crate::data::types::{
    Game, NormalizedGame, NormalizedPoint, NormalizedSite, NormalizedTotals, PointRejection,
    RawNumber, Site, TotalsOddsResponse,
};
use crate::odds::types::OddsError;

/// Give every point and price of every site a string and a float form.
///
/// Values that do not parse are dropped from both forms and reported in
/// `rejections`, so the two views always line up. The decoded response is
/// not modified.
pub fn normalize_points(totals: &TotalsOddsResponse) -> NormalizedTotals {
    let mut rejections = Vec::new();

    let games = totals
        .games
        .iter()
        .map(|game| normalize_game(game, &mut rejections))
        .collect();

    for rejection in &rejections {
        warn!(
            "Skipping {} #{} from {} (game {}): {}",
            rejection.field, rejection.index, rejection.site_key, rejection.game_id, rejection.error
        );
    }

    NormalizedTotals { games, rejections }
}

fn normalize_game(game: &Game, rejections: &mut Vec<PointRejection>) -> NormalizedGame {
    NormalizedGame {
        id: game.id.clone(),
        teams: game.teams.clone(),
        commence_time: game.commence_time,
        sites: game
            .sites
            .iter()
            .map(|site| normalize_site(&game.id, site, rejections))
            .collect(),
    }
}

fn normalize_site(game_id: &str, site: &Site, rejections: &mut Vec<PointRejection>) -> NormalizedSite {
    let (position, raw_points, raw_odds) = match &site.odds.totals {
        Some(totals) => (totals.position.clone(), &totals.points[..], &totals.odds[..]),
        None => (Vec::new(), &[][..], &[][..]),
    };

    let mut normalize = |field: &'static str, values: &[RawNumber]| -> Vec<NormalizedPoint> {
        let mut out = Vec::with_capacity(values.len());
        for (index, raw) in values.iter().enumerate() {
            let text = raw.to_string();
            match parse_point(&text) {
                Ok(value) => out.push(NormalizedPoint { index, text, value }),
                Err(error) => rejections.push(PointRejection {
                    game_id: game_id.to_string(),
                    site_key: site.site_key.clone(),
                    field,
                    index,
                    error,
                }),
            }
        }
        out
    };

    let points = normalize("point", raw_points);
    let odds = normalize("price", raw_odds);

    NormalizedSite {
        site_key: site.site_key.clone(),
        position,
        points,
        odds,
    }
}

/// Parse with single precision, the precision the lines are quoted in.
fn parse_point(text: &str) -> Result<f64, OddsError> {
    match text.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(f64::from(value)),
        _ => Err(OddsError::Parse(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decoder::decode_totals;

    fn texts(points: &[NormalizedPoint]) -> Vec<&str> {
        points.iter().map(|p| p.text.as_str()).collect()
    }

    fn response(points: &str, odds: &str) -> TotalsOddsResponse {
        let body = format!(
            r#"{{"success": true, "data": [{{
                "id": "g1", "teams": ["Eagles", "Cowboys"], "commence_time": 1602460800,
                "sites": [
                    {{"site_key": "fanduel", "odds": {{"totals": {{
                        "position": ["over", "under"], "odds": {odds}, "points": {points}}}}}}},
                    {{"site_key": "bovada", "odds": {{}}}}
                ]
            }}]}}"#,
            points = points,
            odds = odds
        );
        decode_totals(body.as_bytes()).unwrap()
    }

    #[test]
    fn test_mixed_types_normalize_in_step() {
        let raw = response(r#"["47.5", 47.5, 48]"#, r#"[1.91, "1.95"]"#);
        let normalized = normalize_points(&raw);

        let site = &normalized.games[0].sites[0];
        assert_eq!(texts(&site.points), vec!["47.5", "47.5", "48"]);
        assert_eq!(site.points_float().collect::<Vec<_>>(), vec![47.5, 47.5, 48.0]);
        assert_eq!(site.points.len(), 3);
        assert_eq!(site.odds.len(), 2);
        assert!(normalized.rejections.is_empty());
    }

    #[test]
    fn test_lengths_match_raw_for_well_formed_input() {
        let raw = response(r#"[44, "44.0", 45.5, "-3.5"]"#, r#"[2.0, 1.8]"#);
        let normalized = normalize_points(&raw);

        for (game, raw_game) in normalized.games.iter().zip(&raw.games) {
            for (site, raw_site) in game.sites.iter().zip(&raw_game.sites) {
                let raw_len = raw_site
                    .odds
                    .totals
                    .as_ref()
                    .map(|t| t.points.len())
                    .unwrap_or(0);
                assert_eq!(texts(&site.points).len(), raw_len);
                assert_eq!(site.points_float().count(), raw_len);
            }
        }
    }

    #[test]
    fn test_bad_point_is_skipped_in_both_views() {
        let raw = response(r#"["47.5", "off", 49]"#, r#"["n/a", 1.91]"#);
        let normalized = normalize_points(&raw);

        let site = &normalized.games[0].sites[0];
        assert_eq!(texts(&site.points), vec!["47.5", "49"]);
        assert_eq!(site.points_float().collect::<Vec<_>>(), vec![47.5, 49.0]);
        assert_eq!(site.points[1].index, 2);

        assert_eq!(normalized.rejections.len(), 2);
        assert_eq!(normalized.rejections[0].field, "point");
        assert!(matches!(&normalized.rejections[0].error, OddsError::Parse(raw) if raw == "off"));
        assert_eq!(normalized.rejections[1].field, "price");
        assert_eq!(normalized.rejections[1].site_key, "fanduel");
    }

    #[test]
    fn test_non_finite_point_is_a_parse_error() {
        assert!(matches!(parse_point("inf"), Err(OddsError::Parse(_))));
        assert!(matches!(parse_point("1e39"), Err(OddsError::Parse(_))));
        assert_eq!(parse_point(" 47.5 ").unwrap(), 47.5);
    }

    #[test]
    fn test_site_without_totals_has_no_points() {
        let raw = response(r#"[47.5]"#, r#"[1.91, 1.91]"#);
        let normalized = normalize_points(&raw);

        let site = &normalized.games[0].sites[1];
        assert_eq!(site.site_key, "bovada");
        assert!(site.points.is_empty());
        assert!(site.odds.is_empty());
    }

    #[test]
    fn test_price_lookup_by_position() {
        let raw = response(r#"[47.5, 47.5]"#, r#"[1.87, 1.95]"#);
        let mut site = normalize_points(&raw).games[0].sites[0].clone();

        assert!((site.price_for("over").unwrap().value - 1.87).abs() < 1e-6);
        assert_eq!(site.price_for("under").unwrap().text, "1.95");

        site.position = vec!["under".to_string(), "over".to_string()];
        assert!((site.price_for("over").unwrap().value - 1.95).abs() < 1e-6);
    }

    #[test]
    fn test_source_response_is_untouched() {
        let raw = response(r#"["47.5"]"#, r#"[1.91, 1.91]"#);
        let before = serde_json::to_string(&raw).unwrap();
        let _ = normalize_points(&raw);
        assert_eq!(serde_json::to_string(&raw).unwrap(), before);
    }
}
