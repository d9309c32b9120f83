use super::{math, OddsError, OddsResult};

/// Minimum number of legs for a parlay under conventional sportsbook rules.
pub const MIN_PARLAY_LEGS: usize = 2;

/// Combined price for a multi-leg parlay, in both notations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombinedOdds {
    pub american: i32,
    pub decimal: f64,
}

/// Combine a list of American odds into a single parlay price.
///
/// Legs are priced as independent events, so the combined decimal price is the
/// product of the leg prices; the American form is derived from that product.
/// The reduction is order-independent and associative.
pub fn combine(odds: &[i32], min_legs: usize) -> OddsResult<CombinedOdds> {
    if odds.len() < min_legs {
        return Err(OddsError::InsufficientLegs {
            min: min_legs,
            got: odds.len(),
        });
    }

    let mut decimal = 1.0;
    for &leg in odds {
        decimal *= math::american_to_decimal(leg)?;
    }

    Ok(CombinedOdds {
        american: math::decimal_to_american(decimal)?,
        decimal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_two_legs() {
        let combined = combine(&[-110, 120], MIN_PARLAY_LEGS).unwrap();
        assert!((combined.decimal - 4.2).abs() < 1e-9);
        assert_eq!(combined.american, 320);
    }

    #[test]
    fn rejects_single_leg() {
        assert_eq!(
            combine(&[-110], MIN_PARLAY_LEGS),
            Err(OddsError::InsufficientLegs { min: 2, got: 1 })
        );
        assert!(combine(&[], MIN_PARLAY_LEGS).is_err());
    }

    #[test]
    fn rejects_invalid_leg() {
        assert_eq!(
            combine(&[-110, 0], MIN_PARLAY_LEGS),
            Err(OddsError::InvalidAmerican(0))
        );
    }

    #[test]
    fn combination_is_order_independent() {
        let legs = [-110, 150, -200, 240];
        let forward = combine(&legs, MIN_PARLAY_LEGS).unwrap();
        let reversed: Vec<i32> = legs.iter().rev().copied().collect();
        let backward = combine(&reversed, MIN_PARLAY_LEGS).unwrap();
        assert!((forward.decimal - backward.decimal).abs() < 1e-9);
        assert_eq!(forward.american, backward.american);
    }

    #[test]
    fn combination_is_associative() {
        // Combining a prefix first and folding the rest in yields the same
        // price as one flat reduction.
        let legs = [-110, 150, -200];
        let flat = combine(&legs, MIN_PARLAY_LEGS).unwrap();
        let prefix = combine(&legs[..2], MIN_PARLAY_LEGS).unwrap();
        let folded = prefix.decimal * math::american_to_decimal(legs[2]).unwrap();
        assert!((flat.decimal - folded).abs() < 1e-9);
    }
}
