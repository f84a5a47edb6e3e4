//! Domain types: the normalized odds payload, statistical context, and
//! the ranked output consumed by presentation layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Team identity as it appears in the odds payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub abbr: String,
}

/// Away/home pair for a single game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teams {
    pub away: TeamInfo,
    pub home: TeamInfo,
}

/// Moneyline prices for each side (American odds)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoneylineOdds {
    #[serde(default)]
    pub away: Option<i32>,
    #[serde(default)]
    pub home: Option<i32>,
}

/// Point spread with per-side prices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadLine {
    #[serde(default)]
    pub away: Option<f64>,
    #[serde(default)]
    pub home: Option<f64>,
    #[serde(default)]
    pub away_odds: Option<i32>,
    #[serde(default)]
    pub home_odds: Option<i32>,
}

/// Game total (over/under) with per-side prices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotalLine {
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default)]
    pub over: Option<i32>,
    #[serde(default)]
    pub under: Option<i32>,
}

/// Game-level lines section of the payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLines {
    #[serde(default)]
    pub moneyline: Option<MoneylineOdds>,
    #[serde(default)]
    pub spread: Option<SpreadLine>,
    #[serde(default)]
    pub total: Option<TotalLine>,
}

/// One "Over N" rung of a milestone market.
///
/// Sportsbooks only post under prices for some rungs; an `under_odds`
/// entry produces a second, independent Under wager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub line: Option<f64>,
    #[serde(default)]
    pub odds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_odds: Option<i32>,
}

/// One market offered for a player: either a ladder of milestones or a
/// single-price market (e.g. anytime touchdown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropMarket {
    pub market: String,
    #[serde(default)]
    pub odds: Option<i32>,
    #[serde(default)]
    pub milestones: Option<Vec<Milestone>>,
}

/// All markets posted for a single player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProps {
    pub player: String,
    pub team: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub props: Vec<PropMarket>,
}

/// Normalized odds payload for one game, as emitted by the odds source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsPayload {
    pub teams: Teams,
    #[serde(default)]
    pub game_lines: Option<GameLines>,
    #[serde(default)]
    pub player_props: Vec<PlayerProps>,
}

impl OddsPayload {
    /// True when the payload carries neither game lines nor player props
    pub fn is_empty(&self) -> bool {
        self.game_lines.is_none() && self.player_props.is_empty()
    }
}

/// Per-player statistical context supplied by the statistics provider.
///
/// Averages are per-game values keyed by stat name (e.g. "pass_yds",
/// "rec", "rush_td"). Recent averages cover the player's last few games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerContext {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub season_averages: HashMap<String, f64>,
    #[serde(default)]
    pub recent_averages: HashMap<String, f64>,
    #[serde(default)]
    pub recent_games: u32,
}

/// Per-team statistical context for one side of the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamContext {
    pub name: String,
    pub abbr: String,
    pub season_ppg: f64,
    pub season_points_allowed: f64,
    #[serde(default)]
    pub recent_ppg: Option<f64>,
    #[serde(default)]
    pub recent_points_allowed: Option<f64>,
    /// Offensive rank per category (1 = best), keyed by category name
    #[serde(default)]
    pub offense_ranks: HashMap<String, u32>,
    /// Defensive rank per category (1 = stingiest)
    #[serde(default)]
    pub defense_ranks: HashMap<String, u32>,
    #[serde(default)]
    pub players: Vec<PlayerContext>,
}

impl TeamContext {
    /// Look up a player's context by name (exact match)
    pub fn player(&self, name: &str) -> Option<&PlayerContext> {
        self.players.iter().find(|p| p.name == name)
    }
}

/// Statistical context for both sides of a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub away: TeamContext,
    pub home: TeamContext,
}

impl GameContext {
    /// Team context for a side
    pub fn side(&self, side: TeamSide) -> &TeamContext {
        match side {
            TeamSide::Away => &self.away,
            TeamSide::Home => &self.home,
        }
    }

    /// Opposing team context for a side
    pub fn opponent(&self, side: TeamSide) -> &TeamContext {
        self.side(side.flip())
    }

    /// Find a player's context by name and team abbreviation, along with
    /// which side of the game the player is on
    pub fn find_player(&self, name: &str, team: &str) -> Option<(&PlayerContext, TeamSide)> {
        let team = team.to_uppercase();
        if team == "AWAY" || team.eq_ignore_ascii_case(&self.away.abbr) {
            return self.away.player(name).map(|p| (p, TeamSide::Away));
        }
        if team == "HOME" || team.eq_ignore_ascii_case(&self.home.abbr) {
            return self.home.player(name).map(|p| (p, TeamSide::Home));
        }
        None
    }
}

/// Which side of the game a team wager is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Away,
    Home,
}

impl TeamSide {
    pub fn flip(self) -> Self {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }
}

/// Over/under side of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OuSide {
    Over,
    Under,
}

/// One market kind per wager, matched exhaustively by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Market {
    Moneyline {
        team: String,
        abbr: String,
        side: TeamSide,
    },
    Spread {
        team: String,
        abbr: String,
        side: TeamSide,
        line: f64,
    },
    Total {
        side: OuSide,
        line: f64,
    },
    PlayerMilestone {
        player: String,
        team: String,
        market: String,
        side: OuSide,
        line: f64,
    },
    /// Single-price scoring market (e.g. anytime touchdown)
    PlayerScorer {
        player: String,
        team: String,
        market: String,
    },
}

impl Market {
    /// Short kind label ("moneyline", "spread", "total", "player_prop")
    pub fn kind(&self) -> &'static str {
        match self {
            Market::Moneyline { .. } => "moneyline",
            Market::Spread { .. } => "spread",
            Market::Total { .. } => "total",
            Market::PlayerMilestone { .. } | Market::PlayerScorer { .. } => "player_prop",
        }
    }

    /// Stat market name for player props, kind label otherwise
    pub fn market_name(&self) -> &str {
        match self {
            Market::PlayerMilestone { market, .. } | Market::PlayerScorer { market, .. } => market,
            other => other.kind(),
        }
    }

    /// `(player, team)` subject for player props
    pub fn subject(&self) -> Option<(&str, &str)> {
        match self {
            Market::PlayerMilestone { player, team, .. }
            | Market::PlayerScorer { player, team, .. } => Some((player, team)),
            _ => None,
        }
    }

    /// Line or milestone threshold, when the market has one
    pub fn line(&self) -> Option<f64> {
        match self {
            Market::Spread { line, .. }
            | Market::Total { line, .. }
            | Market::PlayerMilestone { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Team name or abbreviation attached to the wager, if any
    pub fn team(&self) -> Option<&str> {
        match self {
            Market::Moneyline { team, .. } | Market::Spread { team, .. } => Some(team),
            Market::PlayerMilestone { team, .. } | Market::PlayerScorer { team, .. } => Some(team),
            Market::Total { .. } => None,
        }
    }
}

/// A single flattened wager produced by the adapter.
///
/// American odds are always nonzero with magnitude >= 100, so the derived
/// decimal odds are always strictly greater than 1.
#[derive(Debug, Clone)]
pub struct CandidateWager {
    pub market: Market,
    pub description: String,
    pub odds: i32,
    pub decimal_odds: f64,
}

/// A fully evaluated, ranked wager. This is the shape persisted to
/// JSON/markdown by callers; the engine holds no reference after returning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedBet {
    pub rank: usize,
    pub description: String,
    /// Kind label: "moneyline", "spread", "total", or "player_prop"
    pub bet_type: String,
    /// Stat market for player props, kind label for game lines
    pub market: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<f64>,
    pub odds: i32,
    pub decimal_odds: f64,
    pub implied_prob: f64,
    pub true_prob: f64,
    pub adjusted_prob: f64,
    pub ev_percent: f64,
    pub kelly_full: f64,
    pub kelly_half: f64,
    pub reasoning: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_empty() {
        let payload = OddsPayload {
            teams: Teams {
                away: TeamInfo {
                    name: "New York Jets".to_string(),
                    abbr: "NYJ".to_string(),
                },
                home: TeamInfo {
                    name: "New England Patriots".to_string(),
                    abbr: "NE".to_string(),
                },
            },
            game_lines: None,
            player_props: vec![],
        };
        assert!(payload.is_empty());
    }

    #[test]
    fn test_payload_from_json() {
        let json = r#"{
            "teams": {
                "away": {"name": "New York Jets", "abbr": "NYJ"},
                "home": {"name": "New England Patriots", "abbr": "NE"}
            },
            "game_lines": {
                "moneyline": {"away": 130, "home": -150},
                "total": {"line": 42.5, "over": -110, "under": -110}
            },
            "player_props": [
                {
                    "player": "Drake Maye",
                    "team": "NE",
                    "position": "QB",
                    "props": [
                        {
                            "market": "passing_yards",
                            "milestones": [
                                {"line": 224.5, "odds": -145},
                                {"line": 250.5, "odds": -110}
                            ]
                        },
                        {"market": "anytime_td", "odds": 320}
                    ]
                }
            ]
        }"#;

        let payload: OddsPayload = serde_json::from_str(json).unwrap();
        assert!(!payload.is_empty());
        assert_eq!(payload.teams.away.abbr, "NYJ");
        let lines = payload.game_lines.as_ref().unwrap();
        assert_eq!(lines.moneyline.as_ref().unwrap().away, Some(130));
        assert!(lines.spread.is_none());
        assert_eq!(payload.player_props.len(), 1);
        let props = &payload.player_props[0].props;
        assert_eq!(props[0].milestones.as_ref().unwrap().len(), 2);
        assert_eq!(props[1].odds, Some(320));
    }

    #[test]
    fn test_find_player_by_side_and_abbr() {
        let ctx = GameContext {
            away: TeamContext {
                name: "New York Jets".to_string(),
                abbr: "NYJ".to_string(),
                season_ppg: 18.5,
                season_points_allowed: 24.0,
                recent_ppg: None,
                recent_points_allowed: None,
                offense_ranks: HashMap::new(),
                defense_ranks: HashMap::new(),
                players: vec![PlayerContext {
                    name: "Breece Hall".to_string(),
                    position: Some("RB".to_string()),
                    season_averages: HashMap::from([("rush_yds".to_string(), 62.0)]),
                    recent_averages: HashMap::new(),
                    recent_games: 0,
                }],
            },
            home: TeamContext {
                name: "New England Patriots".to_string(),
                abbr: "NE".to_string(),
                season_ppg: 23.0,
                season_points_allowed: 20.5,
                recent_ppg: None,
                recent_points_allowed: None,
                offense_ranks: HashMap::new(),
                defense_ranks: HashMap::new(),
                players: vec![],
            },
        };

        let (player, side) = ctx.find_player("Breece Hall", "NYJ").unwrap();
        assert_eq!(player.position.as_deref(), Some("RB"));
        assert_eq!(side, TeamSide::Away);

        let found = ctx.find_player("Breece Hall", "AWAY");
        assert!(found.is_some());

        assert!(ctx.find_player("Breece Hall", "NE").is_none());
        assert!(ctx.find_player("Nobody", "NYJ").is_none());
    }

    #[test]
    fn test_market_accessors() {
        let milestone = Market::PlayerMilestone {
            player: "Drake Maye".to_string(),
            team: "NE".to_string(),
            market: "passing_yards".to_string(),
            side: OuSide::Over,
            line: 250.5,
        };
        assert_eq!(milestone.kind(), "player_prop");
        assert_eq!(milestone.market_name(), "passing_yards");
        assert_eq!(milestone.subject(), Some(("Drake Maye", "NE")));
        assert_eq!(milestone.line(), Some(250.5));

        let ml = Market::Moneyline {
            team: "New York Jets".to_string(),
            abbr: "NYJ".to_string(),
            side: TeamSide::Away,
        };
        assert_eq!(ml.kind(), "moneyline");
        assert_eq!(ml.market_name(), "moneyline");
        assert_eq!(ml.subject(), None);
        assert_eq!(ml.line(), None);
    }

    #[test]
    fn test_ranked_bet_serialization_skips_empty_fields() {
        let bet = RankedBet {
            rank: 1,
            description: "Over 42.5 Total Points".to_string(),
            bet_type: "total".to_string(),
            market: "total".to_string(),
            player: None,
            team: None,
            position: None,
            line: Some(42.5),
            odds: -110,
            decimal_odds: 1.909,
            implied_prob: 0.5238,
            true_prob: 0.56,
            adjusted_prob: 0.5546,
            ev_percent: 5.87,
            kelly_full: 0.065,
            kelly_half: 0.0325,
            reasoning: "test".to_string(),
        };

        let json = serde_json::to_string(&bet).unwrap();
        assert!(!json.contains("\"player\""));
        assert!(!json.contains("\"team\""));
        assert!(!json.contains("\"position\""));
        assert!(json.contains("\"line\":42.5"));
    }

    #[test]
    fn test_opponent_is_flipped_side() {
        assert_eq!(TeamSide::Away.flip(), TeamSide::Home);
        assert_eq!(TeamSide::Home.flip(), TeamSide::Away);

        let ctx = GameContext {
            away: TeamContext {
                name: "New York Jets".to_string(),
                abbr: "NYJ".to_string(),
                season_ppg: 18.5,
                season_points_allowed: 24.0,
                recent_ppg: None,
                recent_points_allowed: None,
                offense_ranks: HashMap::new(),
                defense_ranks: HashMap::new(),
                players: vec![],
            },
            home: TeamContext {
                name: "New England Patriots".to_string(),
                abbr: "NE".to_string(),
                season_ppg: 23.0,
                season_points_allowed: 20.5,
                recent_ppg: None,
                recent_points_allowed: None,
                offense_ranks: HashMap::new(),
                defense_ranks: HashMap::new(),
                players: vec![],
            },
        };
        assert_eq!(ctx.opponent(TeamSide::Away).abbr, "NE");
        assert_eq!(ctx.opponent(TeamSide::Home).abbr, "NYJ");
    }
}
