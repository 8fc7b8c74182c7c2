mod cli;
mod engines;
mod error;
mod logging;
mod run;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbosity, cli.log_file.as_deref()) {
        eprintln!("Error: failed to set up logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run::execute(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
