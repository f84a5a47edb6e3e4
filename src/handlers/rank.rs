use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SportConfig;
use crate::engine::{EvEngine, DEFAULT_CONSERVATIVE_ADJUSTMENT};
use crate::error::EngineError;
use crate::models::{GameContext, OddsPayload, RankedBet};

/// Tunable knobs for a ranking request; all optional
#[derive(Debug, Clone, Deserialize)]
pub struct RankOptions {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub min_ev: f64,
    #[serde(default = "default_adjustment")]
    pub conservative_adjustment: f64,
    #[serde(default = "default_dedup")]
    pub deduplicate_players: bool,
}

fn default_top_n() -> usize {
    10
}

fn default_adjustment() -> f64 {
    DEFAULT_CONSERVATIVE_ADJUSTMENT
}

fn default_dedup() -> bool {
    true
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_ev: 0.0,
            conservative_adjustment: default_adjustment(),
            deduplicate_players: default_dedup(),
        }
    }
}

/// Ranking request: one game's odds plus the statistical context
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub odds: OddsPayload,
    pub context: GameContext,
    #[serde(default)]
    pub options: Option<RankOptions>,
}

/// Ranking response
#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub generated_at: DateTime<Utc>,
    pub total_candidates: usize,
    pub skipped: usize,
    pub bets: Vec<RankedBet>,
}

/// Rank the value bets for one game
pub async fn rank_bets(req: web::Json<RankRequest>) -> Result<HttpResponse, EngineError> {
    let req = req.into_inner();
    let options = req.options.unwrap_or_default();

    let engine = EvEngine::new(
        &req.odds,
        req.context,
        SportConfig::nfl(),
        options.conservative_adjustment,
    )?;

    let bets = engine.get_top_n(options.top_n, options.min_ev, options.deduplicate_players);

    let response = RankResponse {
        generated_at: Utc::now(),
        total_candidates: engine.candidate_count(),
        skipped: engine.skipped_count(),
        bets,
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_from_empty_json() {
        let options: RankOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.top_n, 10);
        assert_eq!(options.min_ev, 0.0);
        assert!((options.conservative_adjustment - 0.85).abs() < 1e-12);
        assert!(options.deduplicate_players);
    }

    #[test]
    fn test_options_override() {
        let json = r#"{"top_n": 3, "min_ev": 2.5, "deduplicate_players": false}"#;
        let options: RankOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.top_n, 3);
        assert!((options.min_ev - 2.5).abs() < 1e-12);
        assert!(!options.deduplicate_players);
    }
}
