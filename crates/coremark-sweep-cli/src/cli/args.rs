use clap::{Parser, Subcommand, ValueEnum};
use coremark_sweep_core::Xlen;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coremark-sweep",
    version,
    about = "Run CoreMark across processor configurations and tabulate the performance counters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean, build and run every configuration, then write the result table
    Run(RunArgs),
    /// Extract the metrics record from a saved run log
    Extract(ExtractArgs),
    /// List the built-in configurations for an XLEN
    Configurations(ConfigurationsArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Sweep config file (YAML). Flags below override its values.
    #[arg(long, short = 'c', env = "COREMARK_SWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Register width passed to the build as XLEN (32 or 64)
    #[arg(long)]
    pub xlen: Option<Xlen>,

    /// Configuration to sweep, passed as ARCH; repeat to sweep several.
    /// Default: the built-in list for the XLEN
    #[arg(long = "arch", value_name = "CONFIGURATION")]
    pub configurations: Vec<String>,

    /// Result table path (default: coremark_results.csv)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Keep each configuration's raw run output as <dir>/<NN>-<configuration>.log
    #[arg(long)]
    pub raw_output_dir: Option<PathBuf>,

    /// Stop at the first failing configuration instead of continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Directory containing the benchmark Makefile
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// make program to invoke
    #[arg(long = "make", value_name = "PROGRAM", env = "COREMARK_SWEEP_MAKE")]
    pub make_program: Option<String>,

    /// Skip `make clean` before each build
    #[arg(long)]
    pub no_clean: bool,

    /// Write the sweep summary and failures as JSON
    #[arg(long)]
    pub summary_json: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum RecordFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Run log to read ("-" for stdin)
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: RecordFormat,

    /// Architecture column value for --format csv (default: the input file stem)
    #[arg(long = "arch", value_name = "CONFIGURATION")]
    pub configuration: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConfigurationsArgs {
    #[arg(long, default_value = "32")]
    pub xlen: Xlen,
}
