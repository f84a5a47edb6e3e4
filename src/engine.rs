//! The EV engine: a pure pipeline from flattened candidates to a ranked
//! list of positive-expected-value wagers.
//!
//! Each invocation is self-contained: the engine owns nothing beyond the
//! current computation, performs no I/O, and may run concurrently with
//! other engines across games.

use crate::adapter::{flatten_payload, FlattenedOdds};
use crate::config::SportConfig;
use crate::core::ev;
use crate::core::odds::implied_probability;
use crate::core::probability::{
    expected_scores, BlendedModel, ProbabilityEstimate, ProbabilityModel,
};
use crate::error::{validate_adjustment, EngineError};
use crate::models::{CandidateWager, GameContext, Market, OddsPayload, RankedBet};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Default shrink factor: the model's edge over the market is trusted at 85%
pub const DEFAULT_CONSERVATIVE_ADJUSTMENT: f64 = 0.85;

/// Expected-value engine for one game's odds payload
pub struct EvEngine {
    candidates: Vec<CandidateWager>,
    skipped: usize,
    context: GameContext,
    config: SportConfig,
    conservative_adjustment: f64,
    model: Box<dyn ProbabilityModel>,
}

impl EvEngine {
    /// Build an engine from a normalized odds payload and the statistical
    /// context for both teams, using the default blended probability model.
    ///
    /// Fails when the payload carries no wagerable section at all, or when
    /// the conservative adjustment is outside [0, 1].
    pub fn new(
        payload: &OddsPayload,
        context: GameContext,
        config: SportConfig,
        conservative_adjustment: f64,
    ) -> Result<Self, EngineError> {
        Self::with_model(
            payload,
            context,
            config,
            conservative_adjustment,
            Box::new(BlendedModel::new()),
        )
    }

    /// Build an engine with an injected probability model
    pub fn with_model(
        payload: &OddsPayload,
        context: GameContext,
        config: SportConfig,
        conservative_adjustment: f64,
        model: Box<dyn ProbabilityModel>,
    ) -> Result<Self, EngineError> {
        if payload.is_empty() {
            return Err(EngineError::EmptyPayload);
        }
        validate_adjustment(conservative_adjustment)?;

        let FlattenedOdds { wagers, skipped } = flatten_payload(payload, &config);
        info!(
            "flattened {} candidate wagers ({} entries skipped)",
            wagers.len(),
            skipped
        );

        Ok(Self {
            candidates: wagers,
            skipped,
            context,
            config,
            conservative_adjustment,
            model,
        })
    }

    /// Number of candidates that survived the adapter
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Number of payload entries the adapter skipped as malformed
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Evaluate every candidate and return all wagers whose EV meets the
    /// threshold, ranked best-first. Used for summary statistics such as
    /// "total bets analyzed"; no cap and no deduplication.
    pub fn calculate_all_ev(&self, min_ev_threshold: f64) -> Vec<RankedBet> {
        let mut bets = self.evaluate_all();
        bets.retain(|bet| bet.ev_percent >= min_ev_threshold);
        assign_ranks(&mut bets);
        bets
    }

    /// Top N wagers by EV after the threshold and (optionally) the
    /// correlated-player filter. A shorter list than `n` is a normal
    /// outcome, not an error.
    pub fn get_top_n(
        &self,
        n: usize,
        min_ev_threshold: f64,
        deduplicate_players: bool,
    ) -> Vec<RankedBet> {
        let mut bets = self.evaluate_all();
        bets.retain(|bet| bet.ev_percent >= min_ev_threshold);

        if deduplicate_players {
            bets = dedupe_players(bets, &self.config);
        }

        bets.truncate(n);
        assign_ranks(&mut bets);
        bets
    }

    /// Evaluate every candidate, sorted by EV descending with a
    /// lexicographic tie-break on description for deterministic output
    fn evaluate_all(&self) -> Vec<RankedBet> {
        let mut bets: Vec<RankedBet> = self
            .candidates
            .iter()
            .filter_map(|candidate| self.evaluate(candidate))
            .collect();

        debug!(
            "{} of {} candidates evaluated",
            bets.len(),
            self.candidates.len()
        );

        bets.sort_by(|a, b| {
            b.ev_percent
                .total_cmp(&a.ev_percent)
                .then_with(|| a.description.cmp(&b.description))
        });
        bets
    }

    /// Evaluate one candidate; `None` when the model cannot support an
    /// estimate or the odds are degenerate
    fn evaluate(&self, candidate: &CandidateWager) -> Option<RankedBet> {
        let implied = implied_probability(candidate.odds);
        let true_prob =
            self.model
                .estimate_true_probability(candidate, &self.context, &self.config)?;
        let adjusted = self.apply_conservative(true_prob, implied);

        let estimate = ProbabilityEstimate {
            implied_prob: implied,
            true_prob,
            adjusted_prob: adjusted,
        };

        let result = ev::evaluate(adjusted, candidate.decimal_odds)?;

        let (player, team, position) = match candidate.market.subject() {
            Some((p, t)) => {
                let position = self
                    .context
                    .find_player(p, t)
                    .and_then(|(ctx, _)| ctx.position.clone());
                (Some(p.to_string()), Some(t.to_string()), position)
            }
            None => (None, candidate.market.team().map(str::to_string), None),
        };

        Some(RankedBet {
            rank: 0,
            description: candidate.description.clone(),
            bet_type: candidate.market.kind().to_string(),
            market: candidate.market.market_name().to_string(),
            player,
            team,
            position,
            line: candidate.market.line(),
            odds: candidate.odds,
            decimal_odds: candidate.decimal_odds,
            implied_prob: estimate.implied_prob,
            true_prob: estimate.true_prob,
            adjusted_prob: estimate.adjusted_prob,
            ev_percent: result.ev_percent,
            kelly_full: result.kelly_full,
            kelly_half: result.kelly_half,
            reasoning: self.reasoning(candidate, &estimate),
        })
    }

    /// Shrink the model estimate toward the market-implied probability.
    ///
    /// adjusted = implied + c * (true - implied); c = 1 trusts the model
    /// fully, c = 0 collapses to the market price. The adjusted value
    /// always lies on the segment between the two.
    fn apply_conservative(&self, true_prob: f64, implied_prob: f64) -> f64 {
        implied_prob + self.conservative_adjustment * (true_prob - implied_prob)
    }

    /// Templated justification naming the statistics that drove the
    /// estimate. String templating only, no generation.
    fn reasoning(&self, candidate: &CandidateWager, estimate: &ProbabilityEstimate) -> String {
        match &candidate.market {
            Market::PlayerMilestone {
                player,
                team,
                market,
                line,
                ..
            } => {
                let spec = self.config.market(market);
                let (unit, stat_key) = match spec {
                    Some(s) => (s.unit.as_str(), s.stat_key.as_str()),
                    None => ("units", ""),
                };

                if let Some((ctx, side)) = self.context.find_player(player, team) {
                    let season = ctx.season_averages.get(stat_key).copied().unwrap_or(0.0);
                    let form = if ctx.recent_games >= self.config.min_recent_games {
                        match ctx.recent_averages.get(stat_key) {
                            Some(recent) => {
                                format!(", {:.1} over the last {}", recent, ctx.recent_games)
                            }
                            None => String::new(),
                        }
                    } else {
                        String::new()
                    };

                    let defense = spec
                        .and_then(|s| s.defense_category.as_ref())
                        .map(|category| {
                            let rank = self
                                .context
                                .opponent(side)
                                .defense_ranks
                                .get(category)
                                .copied()
                                .unwrap_or(self.config.median_rank());
                            format!(" vs #{} {} defense", rank, category)
                        })
                        .unwrap_or_default();

                    format!(
                        "{} averages {:.1} {}/game{}{}. Line: {}",
                        player, season, unit, form, defense, line
                    )
                } else {
                    format!("{} has no stats in {}", player, market)
                }
            }
            Market::PlayerScorer { player, team, .. } => {
                if let Some((ctx, _)) = self.context.find_player(player, team) {
                    let rate = ctx.season_averages.get("rush_td").copied().unwrap_or(0.0)
                        + ctx.season_averages.get("rec_td").copied().unwrap_or(0.0);
                    format!(
                        "{} averages {:.2} TDs/game. True prob: {:.1}%, adjusted: {:.1}%",
                        player,
                        rate,
                        estimate.true_prob * 100.0,
                        estimate.adjusted_prob * 100.0
                    )
                } else {
                    format!("{} has no scoring stats", player)
                }
            }
            Market::Moneyline { side, .. } | Market::Spread { side, .. } => {
                let team_ctx = self.context.side(*side);
                let opp_ctx = self.context.opponent(*side);
                let (team_expected, opp_expected) =
                    expected_scores(team_ctx, opp_ctx, &self.config);
                format!(
                    "{}. Expected: {:.1} pts vs {:.1} pts. True prob: {:.1}%, adjusted: {:.1}%",
                    candidate.description,
                    team_expected,
                    opp_expected,
                    estimate.true_prob * 100.0,
                    estimate.adjusted_prob * 100.0
                )
            }
            Market::Total { .. } => {
                let (away_expected, home_expected) =
                    expected_scores(&self.context.away, &self.context.home, &self.config);
                format!(
                    "{}. Expected total: {:.1} pts. True prob: {:.1}%, adjusted: {:.1}%",
                    candidate.description,
                    away_expected + home_expected,
                    estimate.true_prob * 100.0,
                    estimate.adjusted_prob * 100.0
                )
            }
        }
    }
}

/// Keep only the highest-EV wager per `(player, team)` subject, and cap
/// receiving exposures per team: same-team receivers share targets, so
/// only the best `max_receivers_per_team` survive. The input is already
/// sorted by EV descending, so the first occurrence wins; the losers are
/// removed from the pool entirely (not merely hidden), so a removed wager
/// can never bump a later pick up the list. Team wagers pass through.
fn dedupe_players(bets: Vec<RankedBet>, config: &SportConfig) -> Vec<RankedBet> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut receivers_per_team: HashMap<String, usize> = HashMap::new();
    let mut kept = Vec::with_capacity(bets.len());

    for bet in bets {
        if bet.bet_type != "player_prop" {
            kept.push(bet);
            continue;
        }
        let (Some(player), Some(team)) = (bet.player.clone(), bet.team.clone()) else {
            kept.push(bet);
            continue;
        };

        if seen.contains(&(player.clone(), team.clone())) {
            continue;
        }

        if config.is_receiver(bet.position.as_deref(), &bet.market) {
            let count = receivers_per_team.entry(team.clone()).or_insert(0);
            if *count >= config.max_receivers_per_team {
                continue;
            }
            *count += 1;
        }

        seen.insert((player, team));
        kept.push(bet);
    }

    kept
}

/// Dense 1-based ranks over an already-sorted list
fn assign_ranks(bets: &mut [RankedBet]) {
    for (i, bet) in bets.iter_mut().enumerate() {
        bet.rank = i + 1;
    }
}
