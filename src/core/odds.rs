//! American odds conversions
//!
//! American odds are signed integers: positive odds are the profit on a
//! 100-unit stake, negative odds are the stake needed to win 100 units.
//! Callers must reject zero odds before conversion.

/// Convert American odds to decimal odds (total return multiplier).
///
/// # Examples
/// ```
/// use sportsedge::core::odds::american_to_decimal;
/// assert!((american_to_decimal(150) - 2.5).abs() < 1e-12);
/// assert!((american_to_decimal(-110) - 1.9090909090909092).abs() < 1e-12);
/// ```
pub fn american_to_decimal(odds: i32) -> f64 {
    if odds > 0 {
        1.0 + odds as f64 / 100.0
    } else {
        1.0 + 100.0 / odds.abs() as f64
    }
}

/// Implied break-even probability embedded in an American price, in (0, 1).
///
/// Exact market convention, no rounding: -110 -> 110/210, +150 -> 100/250.
pub fn implied_probability(odds: i32) -> f64 {
    if odds > 0 {
        100.0 / (odds as f64 + 100.0)
    } else {
        let mag = odds.abs() as f64;
        mag / (mag + 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_american_to_decimal() {
        assert!((american_to_decimal(100) - 2.0).abs() < EPS);
        assert!((american_to_decimal(-100) - 2.0).abs() < EPS);
        assert!((american_to_decimal(150) - 2.5).abs() < EPS);
        assert!((american_to_decimal(-150) - (1.0 + 100.0 / 150.0)).abs() < EPS);
    }

    #[test]
    fn test_decimal_odds_always_above_one() {
        for odds in [-10_000, -500, -110, -100, 100, 110, 500, 10_000] {
            assert!(american_to_decimal(odds) > 1.0, "odds {}", odds);
        }
    }

    #[test]
    fn test_implied_probability_reference_values() {
        // -110 -> 110/210 ~= 52.38%
        assert!((implied_probability(-110) - 110.0 / 210.0).abs() < EPS);
        // +150 -> 100/250 = 40.0%
        assert!((implied_probability(150) - 0.40).abs() < EPS);
        // Even money
        assert!((implied_probability(100) - 0.50).abs() < EPS);
        assert!((implied_probability(-100) - 0.50).abs() < EPS);
    }

    #[test]
    fn test_implied_probability_monotonic() {
        // For negative odds, probability rises as the price gets steeper,
        // so it is strictly decreasing in the signed value.
        assert!(implied_probability(-120) > implied_probability(-110));
        assert!(implied_probability(-500) > implied_probability(-120));
        // For positive odds, longer prices imply lower probability.
        assert!(implied_probability(150) > implied_probability(200));
        assert!(implied_probability(200) > implied_probability(1000));
    }

    #[test]
    fn test_implied_probability_in_open_interval() {
        for odds in [-100_000, -110, -100, 100, 110, 100_000] {
            let p = implied_probability(odds);
            assert!(p > 0.0 && p < 1.0, "odds {} -> {}", odds, p);
        }
    }
}
