use std::sync::Arc;

use clap::Parser;
use crossterm::style::{Attribute, Color, Stylize};
use mazeroute::{Outcome, app::App, config::Config, logging::init_logging};

fn main() -> std::io::Result<()> {
    let config = Config::parse();
    let _log_guard = init_logging(&config.log_file, config.log_level)?;

    let engine = match config.build_engine() {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!(error = %e, "could not set up the search");
            eprintln!("{}", e);
            return Ok(());
        }
    };

    let app = App::new(&config);
    let outcome = app.run(engine, &mut std::io::stdout())?;

    let msg = match outcome {
        Outcome::RouteFound => "Route found!".with(Color::Green),
        Outcome::NoRoute => "No route exists.".with(Color::Red),
        Outcome::Cancelled => "Search cancelled.".with(Color::Yellow),
    };
    println!("{} {}", config.solver, msg.attribute(Attribute::Bold));
    Ok(())
}
