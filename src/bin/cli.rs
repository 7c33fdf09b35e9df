//! Keiba CLI - Stake allocation for published race portfolios

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use keiba::data::{find_race, load_races, RaceDocument, Strategy};
use keiba::{
    load_config, AllocationService, AllocatorConfig, Recommendation, SettlementOutcome,
};

/// Default race data file (relative to project root)
const DEFAULT_DATA_FILE: &str = "frontend/data/data.json";

#[derive(Parser)]
#[command(name = "keiba")]
#[command(author, version, about = "Race betting stake allocation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the published race data JSON
    #[arg(long, global = true, default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available races
    List,

    /// Allocate a budget for one race
    Allocate {
        /// Race index (from `list`) or race id
        #[arg(short, long)]
        race: String,

        /// Total budget in yen
        #[arg(short, long, default_value = "5000")]
        budget: i64,

        /// Strategy portfolio: a (balanced) or b (high risk)
        #[arg(short, long, default_value = "a")]
        strategy: Strategy,

        /// Allocator config TOML (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::List => list_races(&cli.data)?,
        Commands::Allocate {
            race,
            budget,
            strategy,
            config,
            json,
        } => {
            allocate_race(&cli.data, &race, budget, strategy, config.as_deref(), json)?;
        }
    }

    Ok(())
}

fn list_races(data: &Path) -> Result<()> {
    let races = load_races(data)?;

    if races.is_empty() {
        println!("{}", "No races available".yellow());
        return Ok(());
    }

    let mut current_date: Option<&str> = None;
    for (index, race) in races.iter().enumerate() {
        let date = race.race_info.date.as_str();
        if current_date != Some(date) {
            println!("\n{}", date.bold());
            current_date = Some(date);
        }

        let status = if race.is_finished() {
            " [finished]".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {:>3}  {}{}", index, race.title(), status);
    }

    Ok(())
}

fn allocate_race(
    data: &Path,
    selector: &str,
    budget: i64,
    strategy: Strategy,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => AllocatorConfig::default(),
    };
    let service = AllocationService::new(config)?;

    let races = load_races(data)?;
    let Some(race) = find_race(&races, selector) else {
        bail!("Race not found: {}", selector);
    };

    let ledger = race.payout_ledger();
    let backfill = race.backfill_pool();

    let recommendation = service.recommend(
        budget,
        race.strategy_pool(strategy),
        &backfill,
        ledger.as_ref(),
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
    } else {
        print_recommendation(race, strategy, &recommendation);
    }

    Ok(())
}

fn print_recommendation(race: &RaceDocument, strategy: Strategy, rec: &Recommendation) {
    let info = &race.race_info;
    println!("{}", format!("{} ({})", info.name, info.date).cyan().bold());
    println!("{} {} / {} / {}", info.track, info.distance, info.weather, info.condition);
    println!("{}", strategy.description().dimmed());
    println!("{}", "-".repeat(60));

    if rec.is_empty() {
        println!("{}", "No recommended bets for this strategy".yellow());
        return;
    }

    for alloc in &rec.allocations {
        let candidate = &alloc.candidate;
        println!(
            "{:<8} {:<10} odds {:>7.1}  stake {:>7}  return {:>9}",
            candidate.label(),
            candidate.numbers_label().bold(),
            candidate.odds,
            alloc.amount,
            alloc.potential_return
        );
    }

    println!("{}", "-".repeat(60));
    if let Some(summary) = &rec.summary {
        println!("Total stake:      {}", summary.total_staked);
        println!("Potential return: {} - {}", summary.min_return, summary.max_return);

        let net = format!("{} - {}", summary.min_net_profit(), summary.max_net_profit());
        if summary.stake_covered {
            println!("Net profit:       {}", net.green());
        } else {
            println!("Net profit:       {}", net.yellow());
            println!(
                "{}",
                "Some hits return less than the total stake; raise the budget or revise the portfolio"
                    .yellow()
            );
        }
    }

    if let Some(settlement) = &rec.settlement {
        print_settlement(race, settlement);
    }
}

fn print_settlement(race: &RaceDocument, settlement: &SettlementOutcome) {
    println!("\n{}", "Result".bold());

    if let Some(results) = &race.race_info.results {
        for runner in &results.top3 {
            println!(
                "  {:>2}  #{:<3} {} (popularity {})",
                runner.rank.to_string(),
                runner.number,
                runner.name,
                runner.popularity
            );
        }
    }

    let return_line = format!("Actual return:    {}", settlement.actual_return);
    let roi_line = match settlement.roi_percent() {
        Some(roi) => format!("ROI:              {:.1}%", roi),
        None => "ROI:              n/a".to_string(),
    };
    if settlement.is_profitable() {
        println!("{}\n{}", return_line.green(), roi_line.green());
    } else {
        println!("{}\n{}", return_line.red(), roi_line.red());
    }

    let hits: Vec<String> = settlement
        .hits()
        .map(|s| {
            format!(
                "{}: {} ({}, profit {:+})",
                s.allocation.candidate.label(),
                s.allocation.candidate.numbers_label(),
                s.actual_payout,
                s.profit()
            )
        })
        .collect();

    if hits.is_empty() {
        println!("Hits:             {}", "none".dimmed());
    } else {
        println!("Hits:             {}", hits.join(", "));
    }
}
