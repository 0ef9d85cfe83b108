use clap::{Command, ValueEnum, arg, value_parser};

pub use bedlite_overlaprs::consts::OVERLAP_CMD;

/// What to print for each query record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverlapMode {
    /// the query line itself, if it overlaps any target
    Any,
    /// every target overlapping the query
    Overlaps,
    /// every target enclosing the query
    Enclosing,
    /// every target enclosed by the query
    Enclosed,
}

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .about("Report target intervals that overlap each query interval")
        .arg_required_else_help(true)
        .arg(arg!(-t --targets <targets> "BED file of intervals to index (may be gzipped)"))
        .arg(arg!(-q --queries <queries> "BED file of query intervals, or '-' for stdin"))
        .arg(
            arg!(-m --mode <mode> "Which targets to report for each query")
                .value_parser(value_parser!(OverlapMode))
                .default_value("overlaps"),
        )
}
