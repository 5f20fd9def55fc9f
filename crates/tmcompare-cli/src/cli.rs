use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "tmcompare - all-pairs structural comparison: drives a rigid-body alignment tool over every structure pair in a dataset and writes SASA, RMSD, and TM-score tables.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the all-pairs comparison over a dataset and write the metric tables.
    Run(RunArgs),
    /// Parse a captured alignment-tool output file and print what was extracted.
    Parse(ParseArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Scores only; no transform or alignment block is requested.
    ScoreOnly,
    /// Full alignment with transform matrix and alignment block.
    Full,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root data directory containing one subdirectory per dataset.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub data_dir: PathBuf,

    /// Dataset name: the subdirectory of the data root holding the .pdb files.
    #[arg(short = 'n', long, required = true, value_name = "NAME")]
    pub dataset: String,

    /// Path to the alignment executable (e.g. TMalign).
    #[arg(short, long, value_name = "PATH")]
    pub exe: Option<PathBuf>,

    /// Path to a TOML configuration file; CLI flags override its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Alignment mode.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Extra argument passed through to the tool after the fixed argv.
    /// May be given multiple times.
    #[arg(long = "extra-arg", value_name = "ARG")]
    pub extra_args: Vec<String>,

    /// Kill a tool invocation after this many seconds and record the pair
    /// as failed.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Apply each parsed transform to its mobile structure and write the
    /// superposed coordinates under <dataset>/superposed/.
    #[arg(long)]
    pub write_superposed: bool,

    /// Keep TER chain-break records when serializing tool input. Some
    /// tools stop reading at the first TER, so the default strips them.
    #[arg(long)]
    pub keep_chain_breaks: bool,
}

/// Arguments for the `parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File holding captured alignment-tool output (stdout, optionally
    /// with the matrix file appended).
    #[arg(value_name = "PATH")]
    pub input: PathBuf,
}
