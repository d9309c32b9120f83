use super::{OddsError, OddsResult};

/// Convert American odds to the equivalent decimal price.
///
/// The decimal price is the total return per unit staked, so `+150` maps to
/// `2.5` and `-110` maps to `~1.909`. Zero is not a valid American quote.
pub fn american_to_decimal(odds: i32) -> OddsResult<f64> {
    if odds == 0 {
        return Err(OddsError::InvalidAmerican(odds));
    }
    let decimal = if odds > 0 {
        odds as f64 / 100.0 + 1.0
    } else {
        100.0 / odds.unsigned_abs() as f64 + 1.0
    };
    Ok(decimal)
}

/// Convert a decimal price back to American odds.
///
/// Prices at or above 2.0 map to the positive form, so even money always
/// renders as `+100` rather than `-100`. Rounds to the nearest integer, ties
/// away from zero, matching conventional sportsbook display.
pub fn decimal_to_american(decimal: f64) -> OddsResult<i32> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(OddsError::InvalidDecimal(decimal));
    }
    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };
    Ok(american as i32)
}

/// Total return (stake included) for a stake at the given American odds.
/// Profit is `payout - stake`.
pub fn payout(stake: f64, odds: i32) -> OddsResult<f64> {
    Ok(stake * american_to_decimal(odds)?)
}
