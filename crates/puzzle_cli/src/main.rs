mod cli;
mod config;
mod logging;
mod run;

use clap::{CommandFactory, Parser};

use cli::Args;

fn main() {
    // Bare invocation gets the short usage line and status 1.
    if std::env::args_os().len() <= 1 {
        eprintln!("{}", Args::command().render_usage());
        std::process::exit(1);
    }
    let args = Args::parse();

    logging::initialize(args.log_level(), args.log_destination());

    let stdout = std::io::stdout();
    if let Err(err) = run::run(&args, &mut stdout.lock()) {
        eprintln!("logpuzzle error: {:#}", err);
        std::process::exit(1);
    }
}
