//! Walks through refuting a division bound and checking its repair.
//!
//! Run with:
//! ```bash
//! cargo run --example walkthrough
//! ```

use bounds_rs::domain::Sort;
use bounds_rs::engine::{check, check_tightness, Claim};
use bounds_rs::interval::{Interval, IntervalType};
use bounds_rs::ops::Operation;
use bounds_rs::solver::{Session, SolverConfig};
use z3::Context;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let config = SolverConfig {
        timeout_ms: Some(60_000),
        ..SolverConfig::default()
    };
    let ctx = Context::new(&config.z3_config());
    let session = Session::new(&ctx, config);

    // The quotient of [a0, a1] by anything lies within [-max|a|, max|a|].
    // Using -a1 for the upper side misses large quotients of a negative a0.
    let a = Interval::bounded(&ctx, "a", Sort::Int).with_kind(IntervalType::NotPoint);
    let b = Interval::unbounded(&ctx, "b", Sort::Int);
    println!("a: {}", a);
    println!("b: {}", b);
    let buggy = Claim::between(a.hi().neg().min(a.lo()), a.hi().neg().max(a.lo()));
    let outcome = check(&session, Operation::Div, a.clone(), b.clone(), buggy)?;
    println!("a / b in [min(-a1, a0), max(-a1, a0)]: {}", outcome);

    let fixed = Claim::between(a.hi().neg().min(a.lo()), a.lo().neg().max(a.hi()));
    let outcome = check(&session, Operation::Div, a.clone(), b.clone(), fixed.clone())?;
    println!("a / b in [min(-a1, a0), max(-a0, a1)]: {}", outcome);

    if outcome.is_proved() {
        let report = check_tightness(&session, Operation::Div, a, b, fixed)?;
        println!("tightness: {}", report);
    }

    Ok(())
}
