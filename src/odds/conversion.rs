use crate::odds::types::OddsError;

/// Round `x` to the nearest multiple of `unit`, halves away from zero.
pub fn round(x: f64, unit: f64) -> f64 {
    (x / unit).round() * unit
}

/// Convert a decimal odds quote such as `"2.50"` into American odds.
///
/// The quote is first rounded to cents to strip float noise from upstream.
/// Quotes of 2.0 and above become positive (underdog) prices, anything
/// below becomes a negative (favorite) price.
pub fn decimal_to_american(quote: &str) -> Result<i32, OddsError> {
    let value: f64 = quote
        .trim()
        .parse()
        .map_err(|_| OddsError::Parse(quote.to_string()))?;

    american_from_decimal(value)
}

/// Same as [`decimal_to_american`] for an already parsed quote.
pub fn american_from_decimal(value: f64) -> Result<i32, OddsError> {
    let value = round(value, 0.01);

    // 1.0 pays nothing and would divide by zero
    if !value.is_finite() || value <= 1.0 {
        return Err(OddsError::InvalidDecimalOdds(value));
    }

    let american = if value >= 2.0 {
        ((value - 1.0) * 100.0).round()
    } else {
        (-100.0 / (value - 1.0)).round()
    };

    if american.abs() > i32::MAX as f64 {
        return Err(OddsError::InvalidDecimalOdds(value));
    }

    Ok(american as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underdog_and_favorite() {
        assert_eq!(decimal_to_american("2.50").unwrap(), 150);
        assert_eq!(decimal_to_american("1.50").unwrap(), -200);
    }

    #[test]
    fn test_standard_vig_price() {
        // 1.91 is the usual -110 quote; truncation would give -109
        assert_eq!(decimal_to_american("1.91").unwrap(), -110);
        assert_eq!(decimal_to_american("2.0").unwrap(), 100);
    }

    #[test]
    fn test_float_noise_is_rounded_away() {
        assert_eq!(decimal_to_american("2.4999999").unwrap(), 150);
        assert_eq!(decimal_to_american(" 3.1 ").unwrap(), 210);
    }

    #[test]
    fn test_underdog_formula_holds() {
        for quote in ["2.00", "2.05", "2.37", "3.333", "5.5", "11.0", "101.01"] {
            let expected = ((round(quote.parse::<f64>().unwrap(), 0.01) - 1.0) * 100.0).round();
            assert_eq!(decimal_to_american(quote).unwrap(), expected as i32, "quote {}", quote);
        }
    }

    #[test]
    fn test_round_is_idempotent() {
        for x in [0.0, 1.005, 1.915, -2.345, 47.499, 123.456789, 1e-7] {
            let once = round(x, 0.01);
            assert_eq!(round(once, 0.01), once, "x = {}", x);
        }
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert!((round(2.5, 1.0) - 3.0).abs() < f64::EPSILON);
        assert!((round(-2.5, 1.0) + 3.0).abs() < f64::EPSILON);
        assert!((round(47.25, 0.5) - 47.5).abs() < 1e-9);
    }

    #[test]
    fn test_even_money_is_rejected() {
        assert!(matches!(
            decimal_to_american("1.0"),
            Err(OddsError::InvalidDecimalOdds(_))
        ));
        assert!(matches!(
            decimal_to_american("1.004"),
            Err(OddsError::InvalidDecimalOdds(_))
        ));
        assert!(matches!(
            decimal_to_american("0.5"),
            Err(OddsError::InvalidDecimalOdds(_))
        ));
    }

    #[test]
    fn test_out_of_range_quote_is_rejected() {
        assert!(matches!(
            decimal_to_american("1e12"),
            Err(OddsError::InvalidDecimalOdds(_))
        ));
        assert_eq!(decimal_to_american("1000.0").unwrap(), 99900);
    }

    #[test]
    fn test_non_numeric_quote() {
        assert!(matches!(decimal_to_american("EVEN"), Err(OddsError::Parse(_))));
        assert!(matches!(decimal_to_american(""), Err(OddsError::Parse(_))));
        assert!(matches!(
            decimal_to_american("NaN"),
            Err(OddsError::InvalidDecimalOdds(_))
        ));
    }
}
