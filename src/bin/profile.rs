use std::{path::Path, time::Instant};

use clap::Parser;
use mazeroute::{
    Pacing, SearchEngine, Solver, generators::get_rng, logging::init_logging,
};

/// Generate and solve mazes headlessly, without pacing, to time the search engine.
#[derive(Debug, Parser)]
struct Args {
    /// Number of generate + search cycles
    #[arg(default_value_t = 1)]
    iterations: usize,
    #[arg(long, default_value_t = 255)]
    rows: u16,
    #[arg(long, default_value_t = 255)]
    cols: u16,
    #[arg(long, value_enum, default_value_t = Solver::BreadthFirst)]
    solver: Solver,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(Path::new("profile.log"), tracing::Level::INFO)?;
    let mut rng = get_rng(args.seed);

    let started = Instant::now();
    let mut found = 0;
    for _ in 0..args.iterations {
        let outcome = SearchEngine::generated(args.rows, args.cols, &mut rng)
            .and_then(|engine| engine.with_random_endpoints(&mut rng))
            .and_then(|engine| engine.run(args.solver, &Pacing::none()))
            .map_err(std::io::Error::other)?;
        if outcome.route_found() {
            found += 1;
        }
    }
    let elapsed = started.elapsed();
    tracing::info!(iterations = args.iterations, found, ?elapsed, "profile finished");
    println!(
        "{} x {} on {}x{}: {} routes found in {:?}",
        args.iterations, args.solver, args.rows, args.cols, found, elapsed
    );
    Ok(())
}
