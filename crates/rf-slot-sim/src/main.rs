//! rf-slot-sim — RTP / hit-rate simulator for slot game definitions
//!
//! Usage:
//!   rf-slot-sim --definition game.yaml --spins 1000000 --seed 7
//!   rf-slot-sim --classic --json

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use rf_slot_reels::{GameDefinition, TimingConfig};
use rf_slot_sim::{SimulationConfig, SimulationReport, simulate};

#[derive(Parser)]
#[command(name = "rf-slot-sim", about = "Batch spin simulator for slot game definitions")]
struct Cli {
    /// Game definition file (.json, .yaml, .yml)
    #[arg(short, long, conflicts_with = "classic")]
    definition: Option<PathBuf>,

    /// Use the built-in classic definition
    #[arg(long)]
    classic: bool,

    /// Number of spins
    #[arg(short, long, default_value_t = 100_000)]
    spins: u64,

    /// Bet per line
    #[arg(short, long, default_value_t = 1.0)]
    bet: f64,

    /// Base seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Parallel chunks (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    chunks: usize,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut definition = match (&cli.definition, cli.classic) {
        (Some(path), _) => GameDefinition::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        (None, true) => GameDefinition::classic(),
        (None, false) => bail!("pass --definition <path> or --classic"),
    };
    if definition.paytable.is_none() {
        log::warn!("definition has no paytable; every spin will pay 0");
    }
    // Pacing is irrelevant for batch runs
    definition.machine.timing = TimingConfig::studio();

    let config = SimulationConfig::default()
        .with_spins(cli.spins)
        .with_bet(cli.bet)
        .with_seed(cli.seed)
        .with_chunks(cli.chunks);

    let report = simulate(&definition, &config);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    let stats = &report.stats;
    println!("Spins:     {}", stats.total_spins);
    println!("Total bet: {:.2}", stats.total_bet);
    println!("Total win: {:.2}", stats.total_win);
    println!("RTP:       {:.3}%", report.rtp);
    println!("Hit rate:  {:.3}%", report.hit_rate);
    println!("Max win:   {:.2}", stats.max_win);

    if report.breakdown.is_empty() {
        return;
    }
    println!();
    println!("{:<12} {:>5} {:>10} {:>14}", "symbol", "count", "hits", "win");
    for row in &report.breakdown {
        println!(
            "{:<12} {:>5} {:>10} {:>14.2}",
            row.symbol_name, row.count, row.hits, row.total_win
        );
    }
}
