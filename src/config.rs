//! Sport-specific configuration: market-to-stat mappings and model tuning

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a prop market maps onto the statistics context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSpec {
    /// Stat key in the player averages map (e.g. "pass_yds")
    pub stat_key: String,
    /// Coefficient of variation used for the milestone probability curve
    pub variance: f64,
    /// Defensive ranking category that suppresses or boosts this market
    #[serde(default)]
    pub defense_category: Option<String>,
    /// Offensive ranking category for the player's own team
    #[serde(default)]
    pub offense_category: Option<String>,
    /// Display unit for reasoning strings (e.g. "pass yards")
    pub unit: String,
}

/// Sport-specific configuration for the EV engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportConfig {
    pub sport: String,
    /// Prop market name -> stat mapping
    pub markets: HashMap<String, MarketSpec>,
    /// Odds sanity window: candidates priced outside are excluded
    pub min_odds: i32,
    pub max_odds: i32,
    /// Standard deviation of game totals for the total-points curve
    pub total_std_dev: f64,
    /// Win-probability shift per point of expected differential
    pub prob_per_point: f64,
    /// Weight on recent form when blending with season averages
    pub recent_weight: f64,
    /// Recent-form averages are only trusted with at least this many games
    pub min_recent_games: u32,
    /// League size, for rank-based matchup adjustments
    pub league_size: u32,
    /// Production multiplier per rank away from the league median
    pub rank_adjustment: f64,
    /// Fallbacks when a team context lacks scoring data
    pub default_ppg: f64,
    pub default_points_allowed: f64,
    /// Receiving wagers allowed per team in a deduplicated list; same-team
    /// receivers share targets, so their overs are correlated
    pub max_receivers_per_team: usize,
    /// Positions counted as receivers for the correlation cap
    pub receiver_positions: Vec<String>,
    /// Prop markets counted as receiving regardless of position
    pub receiving_markets: Vec<String>,
}

impl SportConfig {
    /// NFL configuration with the standard prop markets
    pub fn nfl() -> Self {
        let mut markets = HashMap::new();

        markets.insert(
            "passing_yards".to_string(),
            MarketSpec {
                stat_key: "pass_yds".to_string(),
                variance: 0.30,
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "pass yards".to_string(),
            },
        );
        markets.insert(
            "pass_completions".to_string(),
            MarketSpec {
                stat_key: "pass_cmp".to_string(),
                variance: 0.22,
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "completions".to_string(),
            },
        );
        markets.insert(
            "pass_attempts".to_string(),
            MarketSpec {
                stat_key: "pass_att".to_string(),
                variance: 0.20,
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "attempts".to_string(),
            },
        );
        markets.insert(
            "passing_tds".to_string(),
            MarketSpec {
                stat_key: "pass_td".to_string(),
                variance: 0.80,
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "pass TDs".to_string(),
            },
        );
        markets.insert(
            "rushing_yards".to_string(),
            MarketSpec {
                stat_key: "rush_yds".to_string(),
                variance: 0.32,
                defense_category: Some("rushing".to_string()),
                offense_category: Some("rushing".to_string()),
                unit: "rush yards".to_string(),
            },
        );
        markets.insert(
            "rush_attempts".to_string(),
            MarketSpec {
                stat_key: "rush_att".to_string(),
                variance: 0.25,
                defense_category: Some("rushing".to_string()),
                offense_category: Some("rushing".to_string()),
                unit: "carries".to_string(),
            },
        );
        markets.insert(
            "receiving_yards".to_string(),
            MarketSpec {
                stat_key: "rec_yds".to_string(),
                variance: 0.30,
                // WR production is tied to the opponent's pass defense
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "rec yards".to_string(),
            },
        );
        markets.insert(
            "receptions".to_string(),
            MarketSpec {
                stat_key: "rec".to_string(),
                variance: 0.22,
                defense_category: Some("passing".to_string()),
                offense_category: Some("passing".to_string()),
                unit: "receptions".to_string(),
            },
        );
        markets.insert(
            "anytime_td".to_string(),
            MarketSpec {
                stat_key: "total_td".to_string(),
                variance: 0.80,
                defense_category: None,
                offense_category: None,
                unit: "TDs".to_string(),
            },
        );

        Self {
            sport: "nfl".to_string(),
            markets,
            min_odds: -150,
            max_odds: 400,
            total_std_dev: 12.0,
            prob_per_point: 0.033,
            recent_weight: 0.6,
            min_recent_games: 3,
            league_size: 32,
            rank_adjustment: 0.015,
            default_ppg: 20.0,
            default_points_allowed: 22.0,
            max_receivers_per_team: 1,
            receiver_positions: vec!["WR".to_string(), "TE".to_string()],
            receiving_markets: vec!["receiving_yards".to_string(), "receptions".to_string()],
        }
    }

    /// Whether a wager counts as a receiving exposure for the per-team cap
    pub fn is_receiver(&self, position: Option<&str>, market: &str) -> bool {
        position.is_some_and(|p| self.receiver_positions.iter().any(|rp| rp == p))
            || self.receiving_markets.iter().any(|m| m == market)
    }

    /// Look up the spec for a prop market
    pub fn market(&self, name: &str) -> Option<&MarketSpec> {
        self.markets.get(name)
    }

    /// Median rank used when a team has no ranking for a category
    pub fn median_rank(&self) -> u32 {
        self.league_size / 2
    }

    /// Check the odds sanity window
    pub fn odds_in_window(&self, odds: i32) -> bool {
        odds >= self.min_odds && odds <= self.max_odds
    }
}

impl Default for SportConfig {
    fn default() -> Self {
        Self::nfl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfl_markets_present() {
        let config = SportConfig::nfl();
        for market in [
            "passing_yards",
            "rushing_yards",
            "receiving_yards",
            "receptions",
            "anytime_td",
        ] {
            assert!(config.market(market).is_some(), "missing {}", market);
        }
        assert!(config.market("strikeouts").is_none());
    }

    #[test]
    fn test_market_stat_keys() {
        let config = SportConfig::nfl();
        assert_eq!(config.market("passing_yards").unwrap().stat_key, "pass_yds");
        assert_eq!(config.market("receptions").unwrap().stat_key, "rec");
    }

    #[test]
    fn test_odds_window() {
        let config = SportConfig::nfl();
        assert!(config.odds_in_window(-110));
        assert!(config.odds_in_window(400));
        assert!(config.odds_in_window(-150));
        assert!(!config.odds_in_window(-200));
        assert!(!config.odds_in_window(500));
    }

    #[test]
    fn test_median_rank() {
        assert_eq!(SportConfig::nfl().median_rank(), 16);
    }

    #[test]
    fn test_receiver_classification() {
        let config = SportConfig::nfl();
        assert_eq!(config.max_receivers_per_team, 1);
        // By position, regardless of market
        assert!(config.is_receiver(Some("WR"), "anytime_td"));
        assert!(config.is_receiver(Some("TE"), "receptions"));
        // By market, regardless of position
        assert!(config.is_receiver(Some("RB"), "receiving_yards"));
        assert!(config.is_receiver(None, "receptions"));
        // Neither
        assert!(!config.is_receiver(Some("RB"), "rushing_yards"));
        assert!(!config.is_receiver(None, "passing_yards"));
    }
}
