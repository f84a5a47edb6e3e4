//! Odds schema adapter: flattens the nested odds payload into a uniform
//! list of candidate wagers.
//!
//! The odds source cannot guarantee completeness, so malformed entries
//! (zero or out-of-window odds, milestones without a line) are skipped
//! with a warning and a counted skip rather than failing the game.

use crate::config::SportConfig;
use crate::core::odds::american_to_decimal;
use crate::models::{CandidateWager, Market, OddsPayload, OuSide, TeamSide};
use tracing::warn;

/// Flattened candidates plus an audit count of skipped entries
#[derive(Debug, Default)]
pub struct FlattenedOdds {
    pub wagers: Vec<CandidateWager>,
    pub skipped: usize,
}

/// Flatten every game line and player prop into candidate wagers.
///
/// Milestone markets emit one independent Over wager per rung; Under
/// wagers are emitted only when the payload posts an under price.
pub fn flatten_payload(payload: &OddsPayload, config: &SportConfig) -> FlattenedOdds {
    let mut out = FlattenedOdds::default();

    flatten_game_lines(payload, config, &mut out);
    flatten_player_props(payload, config, &mut out);

    out
}

fn flatten_game_lines(payload: &OddsPayload, config: &SportConfig, out: &mut FlattenedOdds) {
    let lines = match &payload.game_lines {
        Some(lines) => lines,
        None => return,
    };

    let away = &payload.teams.away;
    let home = &payload.teams.home;

    if let Some(ml) = &lines.moneyline {
        for (side, team, odds) in [
            (TeamSide::Away, away, ml.away),
            (TeamSide::Home, home, ml.home),
        ] {
            if let Some(odds) = check_odds(odds, "moneyline", config, out) {
                out.wagers.push(CandidateWager {
                    market: Market::Moneyline {
                        team: team.name.clone(),
                        abbr: team.abbr.clone(),
                        side,
                    },
                    description: format!("{} Moneyline", team.name),
                    odds,
                    decimal_odds: american_to_decimal(odds),
                });
            }
        }
    }

    if let Some(spread) = &lines.spread {
        for (side, team, line, odds) in [
            (TeamSide::Away, away, spread.away, spread.away_odds),
            (TeamSide::Home, home, spread.home, spread.home_odds),
        ] {
            let line = match line {
                Some(l) if l.is_finite() => l,
                Some(_) => {
                    warn!("non-finite spread line for {}, skipping", team.name);
                    out.skipped += 1;
                    continue;
                }
                None => continue,
            };
            if let Some(odds) = check_odds(odds, "spread", config, out) {
                out.wagers.push(CandidateWager {
                    market: Market::Spread {
                        team: team.name.clone(),
                        abbr: team.abbr.clone(),
                        side,
                        line,
                    },
                    description: format!("{} {:+.1}", team.name, line),
                    odds,
                    decimal_odds: american_to_decimal(odds),
                });
            }
        }
    }

    if let Some(total) = &lines.total {
        if let Some(line) = total.line.filter(|l| l.is_finite()) {
            for (side, label, odds) in [
                (OuSide::Over, "Over", total.over),
                (OuSide::Under, "Under", total.under),
            ] {
                if let Some(odds) = check_odds(odds, "total", config, out) {
                    out.wagers.push(CandidateWager {
                        market: Market::Total { side, line },
                        description: format!("{} {} Total Points", label, line),
                        odds,
                        decimal_odds: american_to_decimal(odds),
                    });
                }
            }
        } else if total.over.is_some() || total.under.is_some() {
            warn!("total prices posted without a line, skipping");
            out.skipped += 1;
        }
    }
}

fn flatten_player_props(payload: &OddsPayload, config: &SportConfig, out: &mut FlattenedOdds) {
    for player_data in &payload.player_props {
        let player = &player_data.player;
        let team = player_data.team.to_uppercase();

        for prop in &player_data.props {
            let market = &prop.market;

            if let Some(milestones) = &prop.milestones {
                for milestone in milestones {
                    let line = match milestone.line {
                        Some(l) if l.is_finite() => l,
                        _ => {
                            warn!("{} {}: milestone without a valid line, skipping", player, market);
                            out.skipped += 1;
                            continue;
                        }
                    };

                    if milestone.odds.is_none() && milestone.under_odds.is_none() {
                        warn!("{} {} {}: milestone without odds, skipping", player, market, line);
                        out.skipped += 1;
                        continue;
                    }

                    if let Some(odds) = check_present_odds(milestone.odds, player, market, config, out) {
                        out.wagers.push(CandidateWager {
                            market: Market::PlayerMilestone {
                                player: player.clone(),
                                team: team.clone(),
                                market: market.clone(),
                                side: OuSide::Over,
                                line,
                            },
                            description: format!(
                                "{} Over {} {}",
                                player,
                                line,
                                market_title(market)
                            ),
                            odds,
                            decimal_odds: american_to_decimal(odds),
                        });
                    }

                    if let Some(odds) =
                        check_present_odds(milestone.under_odds, player, market, config, out)
                    {
                        out.wagers.push(CandidateWager {
                            market: Market::PlayerMilestone {
                                player: player.clone(),
                                team: team.clone(),
                                market: market.clone(),
                                side: OuSide::Under,
                                line,
                            },
                            description: format!(
                                "{} Under {} {}",
                                player,
                                line,
                                market_title(market)
                            ),
                            odds,
                            decimal_odds: american_to_decimal(odds),
                        });
                    }
                }
            } else if prop.odds.is_some() {
                if let Some(odds) = check_present_odds(prop.odds, player, market, config, out) {
                    out.wagers.push(CandidateWager {
                        market: Market::PlayerScorer {
                            player: player.clone(),
                            team: team.clone(),
                            market: market.clone(),
                        },
                        description: format!("{} {}", player, market_title(market)),
                        odds,
                        decimal_odds: american_to_decimal(odds),
                    });
                }
            } else {
                warn!("{} {}: prop without odds or milestones, skipping", player, market);
                out.skipped += 1;
            }
        }
    }
}

/// Validate odds that may legitimately be absent (missing side of a line)
fn check_odds(
    odds: Option<i32>,
    what: &str,
    config: &SportConfig,
    out: &mut FlattenedOdds,
) -> Option<i32> {
    let odds = odds?;
    validate(odds, what, config, out)
}

/// Validate odds on an entry that exists; `None` here means absent, which
/// for under prices is normal and not counted as a skip
fn check_present_odds(
    odds: Option<i32>,
    player: &str,
    market: &str,
    config: &SportConfig,
    out: &mut FlattenedOdds,
) -> Option<i32> {
    let odds = odds?;
    validate(odds, &format!("{} {}", player, market), config, out)
}

fn validate(odds: i32, what: &str, config: &SportConfig, out: &mut FlattenedOdds) -> Option<i32> {
    if odds == 0 || odds.abs() < 100 {
        warn!("{}: invalid American odds {}, skipping", what, odds);
        out.skipped += 1;
        return None;
    }
    if !config.odds_in_window(odds) {
        warn!(
            "{}: odds {} outside window [{}, {}], skipping",
            what, odds, config.min_odds, config.max_odds
        );
        out.skipped += 1;
        return None;
    }
    Some(odds)
}

/// "passing_yards" -> "Passing Yards", "anytime_td" -> "Anytime TD"
fn market_title(market: &str) -> String {
    market
        .split('_')
        .map(|word| match word {
            "td" => "TD".to_string(),
            "tds" => "TDs".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        GameLines, Milestone, MoneylineOdds, PlayerProps, PropMarket, SpreadLine, TeamInfo, Teams,
        TotalLine,
    };

    fn payload() -> OddsPayload {
        OddsPayload {
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
            game_lines: Some(GameLines {
                moneyline: Some(MoneylineOdds {
                    away: Some(130),
                    home: Some(-150),
                }),
                spread: Some(SpreadLine {
                    away: Some(3.5),
                    home: Some(-3.5),
                    away_odds: Some(-110),
                    home_odds: Some(-110),
                }),
                total: Some(TotalLine {
                    line: Some(42.5),
                    over: Some(-110),
                    under: Some(-110),
                }),
            }),
            player_props: vec![PlayerProps {
                player: "Drake Maye".to_string(),
                team: "NE".to_string(),
                position: Some("QB".to_string()),
                props: vec![
                    PropMarket {
                        market: "passing_yards".to_string(),
                        odds: None,
                        milestones: Some(vec![
                            Milestone {
                                line: Some(224.5),
                                odds: Some(-145),
                                under_odds: None,
                            },
                            Milestone {
                                line: Some(250.5),
                                odds: Some(-110),
                                under_odds: Some(-120),
                            },
                        ]),
                    },
                    PropMarket {
                        market: "anytime_td".to_string(),
                        odds: Some(320),
                        milestones: None,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_flatten_counts() {
        let out = flatten_payload(&payload(), &SportConfig::nfl());
        // 2 moneyline + 2 spread + 2 total + 2 over milestones + 1 under + 1 scorer
        assert_eq!(out.wagers.len(), 10);
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_one_wager_per_milestone_rung() {
        let out = flatten_payload(&payload(), &SportConfig::nfl());
        let overs: Vec<_> = out
            .wagers
            .iter()
            .filter(|w| {
                matches!(
                    &w.market,
                    Market::PlayerMilestone { side: OuSide::Over, .. }
                )
            })
            .collect();
        assert_eq!(overs.len(), 2);
        assert_eq!(overs[0].description, "Drake Maye Over 224.5 Passing Yards");
        assert_eq!(overs[0].odds, -145);
    }

    #[test]
    fn test_under_only_when_posted() {
        let out = flatten_payload(&payload(), &SportConfig::nfl());
        let unders: Vec<_> = out
            .wagers
            .iter()
            .filter(|w| {
                matches!(
                    &w.market,
                    Market::PlayerMilestone { side: OuSide::Under, .. }
                )
            })
            .collect();
        assert_eq!(unders.len(), 1);
        assert_eq!(unders[0].odds, -120);
        assert_eq!(unders[0].description, "Drake Maye Under 250.5 Passing Yards");
    }

    #[test]
    fn test_invalid_odds_skipped_not_fatal() {
        let mut p = payload();
        // Zero odds and sub-100 magnitude are candidate-level defects
        p.game_lines.as_mut().unwrap().moneyline = Some(MoneylineOdds {
            away: Some(0),
            home: Some(-150),
        });
        p.player_props[0].props[0]
            .milestones
            .as_mut()
            .unwrap()[0]
            .odds = Some(50);

        let out = flatten_payload(&p, &SportConfig::nfl());
        assert_eq!(out.skipped, 2);
        // The rest of the payload still flattens
        assert!(out.wagers.iter().any(|w| w.odds == -150));
    }

    #[test]
    fn test_odds_window_excludes_longshots() {
        let mut p = payload();
        p.player_props[0].props[1].odds = Some(750); // outside +400 window

        let out = flatten_payload(&p, &SportConfig::nfl());
        assert_eq!(out.skipped, 1);
        assert!(!out
            .wagers
            .iter()
            .any(|w| matches!(w.market, Market::PlayerScorer { .. })));
    }

    #[test]
    fn test_milestone_without_line_skipped() {
        let mut p = payload();
        p.player_props[0].props[0]
            .milestones
            .as_mut()
            .unwrap()
            .push(Milestone {
                line: None,
                odds: Some(-110),
                under_odds: None,
            });

        let out = flatten_payload(&p, &SportConfig::nfl());
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn test_missing_sections_flatten_empty() {
        let mut p = payload();
        p.game_lines = None;
        p.player_props.clear();

        let out = flatten_payload(&p, &SportConfig::nfl());
        assert!(out.wagers.is_empty());
        assert_eq!(out.skipped, 0);
    }

    #[test]
    fn test_decimal_odds_derived() {
        let out = flatten_payload(&payload(), &SportConfig::nfl());
        for wager in &out.wagers {
            assert!(wager.decimal_odds > 1.0, "{}", wager.description);
        }
    }

    #[test]
    fn test_market_title() {
        assert_eq!(market_title("passing_yards"), "Passing Yards");
        assert_eq!(market_title("anytime_td"), "Anytime TD");
        assert_eq!(market_title("passing_tds"), "Passing TDs");
        assert_eq!(market_title("rec"), "Rec");
    }

    #[test]
    fn test_scorer_description_uses_acronym() {
        let out = flatten_payload(&payload(), &SportConfig::nfl());
        let scorer = out
            .wagers
            .iter()
            .find(|w| matches!(w.market, Market::PlayerScorer { .. }))
            .unwrap();
        assert_eq!(scorer.description, "Drake Maye Anytime TD");
    }
}
