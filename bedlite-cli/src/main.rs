mod overlap;

use anyhow::Result;
use clap::{ArgAction, Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "bedlite";
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Overlap queries over genomic intervals stored in BED files.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debugging information (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(overlap::cli::create_overlap_cli())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose {
        "debug"
    } else {
        consts::DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // OVERLAP
        //
        Some((overlap::cli::OVERLAP_CMD, matches)) => {
            overlap::handlers::run_overlap(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
