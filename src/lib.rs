//! SportsEdge - Expected-value engine for sportsbook markets
//!
//! This library provides:
//! - Flattening of a sportsbook odds payload into candidate wagers
//! - True win-probability estimation from team and player statistics
//! - Conservative adjustment toward market-implied probabilities
//! - EV percentage and Kelly criterion stake sizing
//! - Ranked top-N value bets with per-player deduplication
//!
//! # Example
//!
//! ```no_run
//! use sportsedge::data::{load_game_context, load_odds_payload};
//! use sportsedge::engine::{EvEngine, DEFAULT_CONSERVATIVE_ADJUSTMENT};
//! use sportsedge::SportConfig;
//!
//! # fn main() -> Result<(), sportsedge::EngineError> {
//! let payload = load_odds_payload("odds.json")?;
//! let context = load_game_context("context.json")?;
//!
//! let engine = EvEngine::new(
//!     &payload,
//!     context,
//!     SportConfig::nfl(),
//!     DEFAULT_CONSERVATIVE_ADJUSTMENT,
//! )?;
//!
//! for bet in engine.get_top_n(10, 0.0, true) {
//!     println!("#{} {} EV {:+.2}%", bet.rank, bet.description, bet.ev_percent);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod handlers;

// Re-export commonly used types
pub use config::{MarketSpec, SportConfig};
pub use data::{load_game_context, load_odds_payload};
pub use engine::{EvEngine, DEFAULT_CONSERVATIVE_ADJUSTMENT};
pub use error::EngineError;
pub use models::{GameContext, OddsPayload, RankedBet};
