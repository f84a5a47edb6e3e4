//! SportsEdge CLI - Command-line interface for EV bet ranking

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use sportsedge::data::{load_game_context, load_odds_payload};
use sportsedge::engine::{EvEngine, DEFAULT_CONSERVATIVE_ADJUSTMENT};
use sportsedge::models::RankedBet;
use sportsedge::SportConfig;

#[derive(Parser)]
#[command(name = "sportsedge")]
#[command(author, version, about = "EV bet ranking CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the top value bets for one game
    Rank {
        /// Path to the odds payload JSON
        #[arg(short, long)]
        odds: PathBuf,

        /// Path to the statistical context JSON
        #[arg(short, long)]
        context: PathBuf,

        /// Number of top bets to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Minimum EV percentage for a bet to be listed
        #[arg(long, default_value = "0.0")]
        min_ev: f64,

        /// Conservative adjustment factor (0 = market price, 1 = full model)
        #[arg(long, default_value = "0.85")]
        adjustment: f64,

        /// Keep every milestone rung instead of one bet per player
        #[arg(long)]
        no_dedup: bool,

        /// Write the ranked bets to a JSON file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write a markdown report instead of JSON
        #[arg(long)]
        markdown: bool,
    },

    /// Show every evaluated wager for one game, including negative EV
    Analyze {
        /// Path to the odds payload JSON
        #[arg(short, long)]
        odds: PathBuf,

        /// Path to the statistical context JSON
        #[arg(short, long)]
        context: PathBuf,

        /// Conservative adjustment factor
        #[arg(long, default_value = "0.85")]
        adjustment: f64,
    },

    /// Rank every game in a directory of paired odds/context files
    Batch {
        /// Directory containing `<game>_odds.json` and `<game>_context.json` pairs
        #[arg(short, long)]
        dir: PathBuf,

        /// Number of top bets per game
        #[arg(long, default_value = "10")]
        top: usize,

        /// Minimum EV percentage
        #[arg(long, default_value = "0.0")]
        min_ev: f64,

        /// Conservative adjustment factor
        #[arg(long, default_value = "0.85")]
        adjustment: f64,

        /// Output directory for per-game reports (defaults to the input dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Warnings about skipped payload entries go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();

    println!("{}", "SportsEdge CLI v0.2.0".cyan().bold());
    println!();

    if cli.interactive {
        run_interactive()?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Rank {
                odds,
                context,
                top,
                min_ev,
                adjustment,
                no_dedup,
                output,
                markdown,
            } => {
                rank_game(
                    &odds, &context, top, min_ev, adjustment, !no_dedup, output, markdown,
                )?;
            }
            Commands::Analyze {
                odds,
                context,
                adjustment,
            } => {
                analyze_game(&odds, &context, adjustment)?;
            }
            Commands::Batch {
                dir,
                top,
                min_ev,
                adjustment,
                output,
            } => {
                run_batch(&dir, top, min_ev, adjustment, output)?;
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn build_engine(odds_path: &Path, context_path: &Path, adjustment: f64) -> Result<EvEngine> {
    let payload = load_odds_payload(odds_path)
        .with_context(|| format!("Failed to load odds from {:?}", odds_path))?;
    let context = load_game_context(context_path)
        .with_context(|| format!("Failed to load context from {:?}", context_path))?;

    EvEngine::new(&payload, context, SportConfig::nfl(), adjustment)
        .context("Failed to build EV engine")
}

#[allow(clippy::too_many_arguments)]
fn rank_game(
    odds_path: &Path,
    context_path: &Path,
    top: usize,
    min_ev: f64,
    adjustment: f64,
    dedup: bool,
    output: Option<PathBuf>,
    markdown: bool,
) -> Result<()> {
    println!(
        "{}: {} (adjustment {:.2}, min EV {:+.1}%)",
        "Ranking".green(),
        odds_path.display(),
        adjustment,
        min_ev
    );
    println!();

    let engine = build_engine(odds_path, context_path, adjustment)?;
    let bets = engine.get_top_n(top, min_ev, dedup);

    if bets.is_empty() {
        println!("{}", "No bets met the EV threshold.".yellow());
        return Ok(());
    }

    print_bets_table(&bets);

    println!();
    println!(
        "{} candidates evaluated, {} skipped, {} listed",
        engine.candidate_count(),
        engine.skipped_count(),
        bets.len()
    );

    if let Some(path) = output {
        if markdown {
            write_markdown_report(&bets, &path)?;
        } else {
            write_json_report(&bets, engine.candidate_count(), engine.skipped_count(), &path)?;
        }
        println!("{}: {:?}", "Saved".green(), path);
    }

    Ok(())
}

fn analyze_game(odds_path: &Path, context_path: &Path, adjustment: f64) -> Result<()> {
    println!("{}: {}", "Analyzing".green(), odds_path.display());
    println!();

    let engine = build_engine(odds_path, context_path, adjustment)?;
    let bets = engine.calculate_all_ev(f64::MIN);

    println!(
        "{:>4} {:<40} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "#", "Bet", "Odds", "Implied", "True", "Adj", "EV"
    );
    println!("{}", "-".repeat(90));

    for bet in &bets {
        let ev_str = format!("{:+.2}%", bet.ev_percent);
        let ev_colored = if bet.ev_percent > 0.0 {
            ev_str.green()
        } else {
            ev_str.red()
        };

        println!(
            "{:>4} {:<40} {:>6} {:>7.1}% {:>7.1}% {:>7.1}% {:>8}",
            bet.rank,
            truncate(&bet.description, 40),
            format_odds(bet.odds),
            bet.implied_prob * 100.0,
            bet.true_prob * 100.0,
            bet.adjusted_prob * 100.0,
            ev_colored
        );
    }

    println!();
    println!(
        "{} candidates, {} evaluated, {} skipped",
        engine.candidate_count(),
        bets.len(),
        engine.skipped_count()
    );

    Ok(())
}

fn run_batch(
    dir: &Path,
    top: usize,
    min_ev: f64,
    adjustment: f64,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("{}: {}", "Batch ranking".green(), dir.display());
    println!();

    let output_dir = output.unwrap_or_else(|| dir.to_path_buf());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    // Collect `<game>_odds.json` files and pair with `<game>_context.json`
    let mut games: Vec<(String, PathBuf, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {:?}", dir))?
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(game) = name.strip_suffix("_odds.json") {
            let context_path = dir.join(format!("{}_context.json", game));
            if context_path.exists() {
                games.push((game.to_string(), path.clone(), context_path));
            } else {
                println!("{} {}: no matching context file", "Warning".yellow(), game);
            }
        }
    }
    games.sort();

    if games.is_empty() {
        println!("{}", "No odds/context pairs found.".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(games.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut success_count = 0;
    for (game, odds_path, context_path) in &games {
        pb.set_message(game.clone());

        let result = build_engine(odds_path, context_path, adjustment).map(|engine| {
            let bets = engine.get_top_n(top, min_ev, true);
            (engine.candidate_count(), engine.skipped_count(), bets)
        });

        match result {
            Ok((candidates, skipped, bets)) => {
                let report_path = output_dir.join(format!("{}_bets.json", game));
                write_json_report(&bets, candidates, skipped, &report_path)?;
                success_count += 1;
            }
            Err(e) => {
                pb.println(format!("{} {}: {:#}", "Warning".yellow(), game, e));
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    println!(
        "{}: {}/{} games ranked, reports in {:?}",
        "Complete".green(),
        success_count,
        games.len(),
        output_dir
    );

    Ok(())
}

fn run_interactive() -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!("Type 'quit' to exit.\n");

    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Rank a game", "Analyze a game", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let odds: String = Input::with_theme(&theme)
                    .with_prompt("Odds payload path")
                    .interact_text()?;
                let context: String = Input::with_theme(&theme)
                    .with_prompt("Context path")
                    .interact_text()?;
                let top: usize = Input::with_theme(&theme)
                    .with_prompt("Top N")
                    .default(10)
                    .interact_text()?;

                println!();
                rank_game(
                    Path::new(&odds),
                    Path::new(&context),
                    top,
                    0.0,
                    DEFAULT_CONSERVATIVE_ADJUSTMENT,
                    true,
                    None,
                    false,
                )?;
                println!();
            }
            1 => {
                let odds: String = Input::with_theme(&theme)
                    .with_prompt("Odds payload path")
                    .interact_text()?;
                let context: String = Input::with_theme(&theme)
                    .with_prompt("Context path")
                    .interact_text()?;

                println!();
                analyze_game(
                    Path::new(&odds),
                    Path::new(&context),
                    DEFAULT_CONSERVATIVE_ADJUSTMENT,
                )?;
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

fn print_bets_table(bets: &[RankedBet]) {
    println!(
        "{:>4} {:<40} {:>6} {:>8} {:>8} {:>8}",
        "#", "Bet", "Odds", "EV", "Kelly", "Half"
    );
    println!("{}", "-".repeat(80));

    for bet in bets {
        println!(
            "{:>4} {:<40} {:>6} {:>7} {:>7.1}% {:>7.1}%",
            bet.rank,
            truncate(&bet.description, 40),
            format_odds(bet.odds),
            format!("{:+.2}%", bet.ev_percent).green(),
            bet.kelly_full * 100.0,
            bet.kelly_half * 100.0
        );
        println!("     {}", bet.reasoning.dimmed());
    }
}

/// Write the ranked bets as a pretty-printed JSON report
fn write_json_report(
    bets: &[RankedBet],
    total_candidates: usize,
    skipped: usize,
    path: &Path,
) -> Result<()> {
    let report = serde_json::json!({
        "generated_at": Utc::now().to_rfc3339(),
        "total_candidates": total_candidates,
        "skipped": skipped,
        "bets": bets,
    });
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write report: {:?}", path))?;
    Ok(())
}

/// Write the ranked bets as a markdown table with reasoning
fn write_markdown_report(bets: &[RankedBet], path: &Path) -> Result<()> {
    use std::fmt::Write as _;

    let mut md = String::new();
    writeln!(md, "# Value Bets")?;
    writeln!(md)?;
    writeln!(md, "Generated: {}", Utc::now().to_rfc3339())?;
    writeln!(md)?;
    writeln!(md, "| # | Bet | Odds | EV | Half Kelly |")?;
    writeln!(md, "|---|-----|------|----|------------|")?;
    for bet in bets {
        writeln!(
            md,
            "| {} | {} | {} | {:+.2}% | {:.1}% |",
            bet.rank,
            bet.description,
            format_odds(bet.odds),
            bet.ev_percent,
            bet.kelly_half * 100.0
        )?;
    }
    writeln!(md)?;
    for bet in bets {
        writeln!(md, "{}. {}", bet.rank, bet.reasoning)?;
    }

    std::fs::write(path, md).with_context(|| format!("Failed to write report: {:?}", path))?;
    Ok(())
}

/// Format American odds with an explicit sign
fn format_odds(odds: i32) -> String {
    format!("{:+}", odds)
}

/// Truncate a description to fit the table column
fn truncate(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        text.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
