//! Expected value and Kelly criterion stake sizing
//!
//! EV is expressed as a percentage edge over a fair bet:
//!     ev_percent = (p * decimal_odds - 1) * 100
//!
//! The Kelly fraction maximizes long-run geometric bankroll growth:
//!     f* = (p * b - q) / b, with b = decimal_odds - 1 and q = 1 - p
//!
//! A negative edge floors the Kelly fraction at zero; half Kelly is the
//! conventional conservative stake.

/// EV and stake sizing for one wager
#[derive(Debug, Clone, Copy)]
pub struct EvResult {
    pub ev_percent: f64,
    pub kelly_full: f64,
    pub kelly_half: f64,
}

/// Compute EV percentage and Kelly fractions for a win probability and
/// decimal odds. Returns `None` for degenerate odds (<= 1), which carry no
/// payout and would divide by zero; such candidates are dropped upstream.
pub fn evaluate(probability: f64, decimal_odds: f64) -> Option<EvResult> {
    if decimal_odds <= 1.0 {
        return None;
    }

    let ev_percent = (probability * decimal_odds - 1.0) * 100.0;

    let b = decimal_odds - 1.0;
    let kelly_full = ((probability * b - (1.0 - probability)) / b).clamp(0.0, 1.0);

    Some(EvResult {
        ev_percent,
        kelly_full,
        kelly_half: kelly_full / 2.0,
    })
}
