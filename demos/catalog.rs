//! Runs the bound rule catalog and reports each verdict.
//!
//! Run with:
//! ```bash
//! cargo run --release --example catalog -- --filter div --tightness
//! cargo run --release --example catalog -- --list
//! ```
//!
//! Exits with a non-zero status when any rule disagrees with its expectation.

use bounds_rs::catalog::{self, Cost, Scenario};
use bounds_rs::solver::SolverConfig;
use clap::Parser;
use log::{error, warn};

#[derive(Debug, Parser)]
#[command(author, version, about = "Prove or refute interval bound rules")]
struct Cli {
    /// Only run rules whose `family::name` contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// List the matching rules without running them
    #[arg(long)]
    list: bool,

    /// Per-query solver time limit in milliseconds
    #[arg(long)]
    timeout_ms: Option<u32>,

    /// Also run rules known to keep the solver busy for a long time
    #[arg(long)]
    expensive: bool,

    /// Check whether proved bounds are attained
    #[arg(long)]
    tightness: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let scenarios: Vec<Scenario> = match &cli.filter {
        Some(pattern) => catalog::matching(pattern),
        None => catalog::all(),
    };

    if cli.list {
        for s in &scenarios {
            let cost = if s.cost == Cost::Expensive { " [expensive]" } else { "" };
            println!("{:<48} {}{}", s.id(), s.description, cost);
        }
        return Ok(());
    }

    let config = SolverConfig {
        timeout_ms: cli.timeout_ms,
        ..SolverConfig::default()
    };

    let time_total = std::time::Instant::now();
    let mut mismatches = Vec::new();
    let mut skipped = 0;
    for s in &scenarios {
        if s.cost == Cost::Expensive && !cli.expensive {
            skipped += 1;
            continue;
        }
        println!("----------------------------------");
        println!("{}: {}", s.id(), s.description);
        let time = std::time::Instant::now();
        let report = s.run(&config, cli.tightness)?;
        println!("{}", report.outcome);
        if let Some(tightness) = &report.tightness {
            println!("tightness: {}", tightness);
        }
        let ok = s.expect.admits(&report);
        println!(
            "expected {:?}: {} in {:.3}s",
            s.expect.verdict,
            if ok { "ok" } else { "MISMATCH" },
            time.elapsed().as_secs_f64()
        );
        if !ok {
            error!("{} does not match its expectation", s.id());
            mismatches.push(s.id());
        }
    }

    println!("==================================");
    println!(
        "{} run, {} skipped, {} mismatched in {:.3}s",
        scenarios.len() - skipped,
        skipped,
        mismatches.len(),
        time_total.elapsed().as_secs_f64()
    );
    if skipped > 0 {
        warn!("{} expensive rules skipped, pass --expensive to run them", skipped);
    }
    if !mismatches.is_empty() {
        for id in &mismatches {
            println!("- {}", id);
        }
        std::process::exit(1);
    }
    Ok(())
}
