//! True-probability estimation for candidate wagers.
//!
//! The estimator blends season-long averages with recent form (recent form
//! weighted more heavily) and converts the blended expectation into a win
//! probability. Milestone markets use a normal CDF centered on the blended
//! per-game mean with a standard deviation proportional to the mean
//! (per-market coefficient of variation); this keeps the mapping monotone:
//! a higher average always yields a higher Over probability. Game markets
//! convert an expected point differential into probability at a fixed rate
//! per point; totals use a normal CDF with a league-typical sigma.

use crate::config::SportConfig;
use crate::models::{
    CandidateWager, GameContext, Market, OuSide, PlayerContext, TeamContext, TeamSide,
};
use tracing::warn;

/// Probability floor/ceiling: estimates never reach exactly 0 or 1
pub const PROB_FLOOR: f64 = 0.01;
pub const PROB_CEIL: f64 = 0.99;

/// Wider bounds for game-level win probabilities
const GAME_PROB_FLOOR: f64 = 0.05;
const GAME_PROB_CEIL: f64 = 0.95;

/// Bounds for anytime-scorer probabilities
const SCORER_PROB_FLOOR: f64 = 0.02;
const SCORER_PROB_CEIL: f64 = 0.80;

/// Minimum per-game production for a player to be priced in a market
const MIN_PRODUCTION: f64 = 0.1;

/// Probability estimates attached to an evaluated wager
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityEstimate {
    /// Break-even probability embedded in the market price
    pub implied_prob: f64,
    /// Model estimate before any conservatism
    pub true_prob: f64,
    /// Estimate after shrinking toward the market price
    pub adjusted_prob: f64,
}

/// Pluggable true-probability estimator.
///
/// Returns `None` when the statistical context cannot support an estimate
/// (unknown player, no production in the market, unknown market name); the
/// engine skips such candidates rather than guessing.
pub trait ProbabilityModel {
    fn estimate_true_probability(
        &self,
        candidate: &CandidateWager,
        context: &GameContext,
        config: &SportConfig,
    ) -> Option<f64>;
}

/// Default estimator blending season and recent-form statistics
#[derive(Debug, Clone, Default)]
pub struct BlendedModel;

impl BlendedModel {
    pub fn new() -> Self {
        Self
    }
}

impl ProbabilityModel for BlendedModel {
    fn estimate_true_probability(
        &self,
        candidate: &CandidateWager,
        context: &GameContext,
        config: &SportConfig,
    ) -> Option<f64> {
        let prob = match &candidate.market {
            Market::Moneyline { side, .. } => moneyline_probability(*side, context, config),
            Market::Spread { side, line, .. } => {
                spread_probability(*side, *line, context, config)
            }
            Market::Total { side, line } => total_probability(*side, *line, context, config),
            Market::PlayerMilestone {
                player,
                team,
                market,
                side,
                line,
            } => milestone_probability(player, team, market, *side, *line, context, config)?,
            Market::PlayerScorer { player, team, .. } => {
                scorer_probability(player, team, context, config)?
            }
        };

        Some(clamp_probability(prob))
    }
}

/// Clamp an estimate into (0, 1) with an epsilon margin
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return PROB_FLOOR;
    }
    p.clamp(PROB_FLOOR, PROB_CEIL)
}

/// Blend a season average with a recent-form average, weighting recent form
pub fn blend(season: f64, recent: Option<f64>, recent_weight: f64) -> f64 {
    match recent {
        Some(r) => recent_weight * r + (1.0 - recent_weight) * season,
        None => season,
    }
}

/// Standard normal CDF via the Abramowitz & Stegun erf approximation
/// (7.1.26, max absolute error 1.5e-7)
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// P(X > line) for a normal variable with the given mean and deviation
pub fn over_probability(line: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return if mean > line {
            PROB_CEIL
        } else if mean < line {
            PROB_FLOOR
        } else {
            0.5
        };
    }
    let z = (line - mean) / std_dev;
    clamp_probability(1.0 - normal_cdf(z))
}

/// Blended points per game for a team
fn blended_ppg(team: &TeamContext, config: &SportConfig) -> f64 {
    let season = if team.season_ppg > 0.0 {
        team.season_ppg
    } else {
        config.default_ppg
    };
    blend(season, team.recent_ppg, config.recent_weight)
}

/// Blended points allowed per game for a team
fn blended_points_allowed(team: &TeamContext, config: &SportConfig) -> f64 {
    let season = if team.season_points_allowed > 0.0 {
        team.season_points_allowed
    } else {
        config.default_points_allowed
    };
    blend(season, team.recent_points_allowed, config.recent_weight)
}

/// Expected points for each side: a team's expected score averages its own
/// scoring rate with what the opponent's defense gives up.
pub fn expected_scores(team: &TeamContext, opponent: &TeamContext, config: &SportConfig) -> (f64, f64) {
    let team_expected = (blended_ppg(team, config) + blended_points_allowed(opponent, config)) / 2.0;
    let opp_expected = (blended_ppg(opponent, config) + blended_points_allowed(team, config)) / 2.0;
    (team_expected, opp_expected)
}

fn moneyline_probability(side: TeamSide, context: &GameContext, config: &SportConfig) -> f64 {
    let team = context.side(side);
    let opponent = context.opponent(side);
    let (team_expected, opp_expected) = expected_scores(team, opponent, config);

    let diff = team_expected - opp_expected;
    (0.5 + diff * config.prob_per_point).clamp(GAME_PROB_FLOOR, GAME_PROB_CEIL)
}

fn spread_probability(side: TeamSide, line: f64, context: &GameContext, config: &SportConfig) -> f64 {
    let team = context.side(side);
    let opponent = context.opponent(side);
    let (team_expected, opp_expected) = expected_scores(team, opponent, config);

    // A -7.5 favorite covers when the expected margin exceeds 7.5, so the
    // cover margin is the expected differential plus the (signed) line.
    let cover_margin = (team_expected - opp_expected) + line;
    (0.5 + cover_margin * config.prob_per_point).clamp(GAME_PROB_FLOOR, GAME_PROB_CEIL)
}

fn total_probability(side: OuSide, line: f64, context: &GameContext, config: &SportConfig) -> f64 {
    let (away_expected, home_expected) = expected_scores(&context.away, &context.home, config);
    let expected_total = away_expected + home_expected;

    let over = over_probability(line, expected_total, config.total_std_dev);
    let prob = match side {
        OuSide::Over => over,
        OuSide::Under => 1.0 - over,
    };
    prob.clamp(GAME_PROB_FLOOR, GAME_PROB_CEIL)
}

fn milestone_probability(
    player: &str,
    team: &str,
    market: &str,
    side: OuSide,
    line: f64,
    context: &GameContext,
    config: &SportConfig,
) -> Option<f64> {
    let spec = match config.market(market) {
        Some(s) => s,
        None => {
            warn!("unknown prop market '{}', skipping {}", market, player);
            return None;
        }
    };

    let (player_ctx, player_side) = match context.find_player(player, team) {
        Some(found) => found,
        None => {
            warn!("no statistics for {} ({}), skipping", player, team);
            return None;
        }
    };

    let season = player_ctx
        .season_averages
        .get(&spec.stat_key)
        .copied()
        .unwrap_or(0.0);
    let recent = recent_average(player_ctx, &spec.stat_key, config);

    let baseline = blend(season, recent, config.recent_weight);
    if baseline < MIN_PRODUCTION {
        warn!("{} has no production in {}, skipping", player, market);
        return None;
    }

    let mean = baseline * matchup_multiplier(spec, player_side, context, config);
    let over = over_probability(line, mean, spec.variance * mean);

    Some(match side {
        OuSide::Over => over,
        OuSide::Under => 1.0 - over,
    })
}

fn scorer_probability(
    player: &str,
    team: &str,
    context: &GameContext,
    config: &SportConfig,
) -> Option<f64> {
    let (player_ctx, _) = match context.find_player(player, team) {
        Some(found) => found,
        None => {
            warn!("no statistics for {} ({}), skipping", player, team);
            return None;
        }
    };

    let mut rate = scoring_rate(player_ctx, config);
    if rate <= 0.0 {
        // No scoring history: players with real usage can still score
        let rec = blended_stat(player_ctx, "rec", config);
        let rush_yds = blended_stat(player_ctx, "rush_yds", config);
        if rec >= 3.0 || rush_yds >= 30.0 {
            rate = 0.1;
        } else {
            warn!("{} has no scoring history or usage, skipping", player);
            return None;
        }
    }

    // Poisson exceedance: P(at least one score) = 1 - e^(-rate)
    let prob = 1.0 - (-rate).exp();
    Some(prob.clamp(SCORER_PROB_FLOOR, SCORER_PROB_CEIL))
}

/// Per-game scoring rate across rushing and receiving touchdowns
fn scoring_rate(player: &PlayerContext, config: &SportConfig) -> f64 {
    blended_stat(player, "rush_td", config) + blended_stat(player, "rec_td", config)
}

/// Season/recent blend for one stat key
fn blended_stat(player: &PlayerContext, stat_key: &str, config: &SportConfig) -> f64 {
    let season = player.season_averages.get(stat_key).copied().unwrap_or(0.0);
    blend(season, recent_average(player, stat_key, config), config.recent_weight)
}

/// Recent-form average, trusted only with a sufficient sample
fn recent_average(player: &PlayerContext, stat_key: &str, config: &SportConfig) -> Option<f64> {
    if player.recent_games < config.min_recent_games {
        return None;
    }
    player.recent_averages.get(stat_key).copied()
}

/// Matchup multiplier from defensive and offensive ranks.
///
/// A weak opposing defense (rank near the bottom of the league) boosts the
/// expectation, a strong one suppresses it; the player's own offense works
/// the other way around. Missing ranks default to the league median.
fn matchup_multiplier(
    spec: &crate::config::MarketSpec,
    player_side: TeamSide,
    context: &GameContext,
    config: &SportConfig,
) -> f64 {
    let median = config.median_rank() as f64;
    let mut multiplier = 1.0;

    if let Some(category) = &spec.defense_category {
        let opponent = context.opponent(player_side);
        let rank = opponent
            .defense_ranks
            .get(category)
            .copied()
            .unwrap_or(config.median_rank()) as f64;
        multiplier *= 1.0 + (rank - median) * config.rank_adjustment;
    }

    if let Some(category) = &spec.offense_category {
        let own = context.side(player_side);
        let rank = own
            .offense_ranks
            .get(category)
            .copied()
            .unwrap_or(config.median_rank()) as f64;
        multiplier *= 1.0 + (median - rank) * config.rank_adjustment;
    }

    multiplier.max(0.1)
}
