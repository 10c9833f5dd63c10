use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::odds::types::TotalOdds;

/// Render one game as the six-line text message.
pub fn render(odds: &TotalOdds, tz: Tz) -> String {
    render_at(odds, tz, Utc::now())
}

/// Render with an explicit clock.
///
/// The zone abbreviation comes from `now` in `tz`, not from the kickoff
/// time, so a game after a DST change is labelled with today's abbreviation.
pub fn render_at(odds: &TotalOdds, tz: Tz, now: DateTime<Utc>) -> String {
    let zone = now.with_timezone(&tz).format("%Z");

    format!(
        "{}\n{} {}\nAdjusted Over Under: {:.1}\nOver odds: {}\nUnder odds: {}\nBest of Luck!",
        odds.teams,
        odds.gametime.format("%m/%d at %k:%M"),
        zone,
        odds.over,
        odds.over_odds,
        odds.under_odds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decoder::decode_totals;
    use crate::data::normalizer::normalize_points;
    use crate::odds::aggregator::{format_game_list, local_gametime};
    use crate::odds::types::PricingMode;
    use chrono::TimeZone;

    fn sample(commence_time: i64, tz: Tz) -> TotalOdds {
        TotalOdds {
            teams: "Eagles Cowboys ".to_string(),
            gametime: local_gametime(commence_time, tz).unwrap(),
            over: 47.5,
            under: 47.5,
            over_odds: -110,
            under_odds: 105,
        }
    }

    #[test]
    fn test_render_layout() {
        let tz = chrono_tz::America::New_York;
        let now = Utc.with_ymd_and_hms(2020, 10, 10, 12, 0, 0).unwrap();
        // 2020-10-12 00:20 UTC
        let msg = render_at(&sample(1602462000, tz), tz, now);

        assert_eq!(
            msg,
            "Eagles Cowboys \n\
             10/11 at 20:20 EDT\n\
             Adjusted Over Under: 47.5\n\
             Over odds: -110\n\
             Under odds: 105\n\
             Best of Luck!"
        );
    }

    #[test]
    fn test_single_digit_hour_is_space_padded() {
        let tz = chrono_tz::UTC;
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        // 2020-09-13 07:05 UTC
        let msg = render_at(&sample(1599980700, tz), tz, now);

        assert_eq!(msg.lines().nth(1).unwrap(), "09/13 at  7:05 UTC");
    }

    #[test]
    fn test_zone_abbreviation_follows_render_time() {
        let tz = chrono_tz::America::New_York;
        // game in October (EDT), rendered in January (EST)
        let now = Utc.with_ymd_and_hms(2021, 1, 15, 12, 0, 0).unwrap();
        let msg = render_at(&sample(1602462000, tz), tz, now);

        assert_eq!(msg.lines().nth(1).unwrap(), "10/11 at 20:20 EST");
    }

    #[test]
    fn test_end_to_end_two_sites_same_total() {
        let body = r#"{"success": true, "data": [{
            "id": "g1", "teams": ["A", "B"], "commence_time": 1602460800,
            "sites": [
                {"site_key": "s1", "odds": {"totals": {"position": ["over", "under"],
                    "odds": [1.91, 1.91], "points": [44.0, 44.0]}}},
                {"site_key": "s2", "odds": {"totals": {"position": ["over", "under"],
                    "odds": ["1.91", "1.91"], "points": ["44.0", "44.0"]}}}
            ]
        }]}"#;

        let normalized = normalize_points(&decode_totals(body.as_bytes()).unwrap());
        let batch = format_game_list(&normalized, "NFL", chrono_tz::UTC, PricingMode::Placeholder);
        assert!(batch.failures.is_empty());

        let msg = render(&batch.odds.odds[0], chrono_tz::UTC);
        let lines: Vec<&str> = msg.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "A B ");
        assert_eq!(lines[1], "10/12 at  0:00 UTC");
        assert_eq!(lines[2], "Adjusted Over Under: 44.0");
        assert_eq!(lines[3], "Over odds: -110");
        assert_eq!(lines[4], "Under odds: -110");
        assert_eq!(lines[5], "Best of Luck!");
    }
}
