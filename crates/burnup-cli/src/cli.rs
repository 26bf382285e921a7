use burnup_report::RangeEnd;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "burnup",
    about = "Burnup: rebuild a backlog hierarchy from an issue export and write burn-up reports",
    version
)]
pub struct Cli {
    /// Omitted: `report` with every default, reading the export from stdin
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the leaf snapshot, no-points audit, and daily totals reports
    Report {
        /// Path to the CSV export (reads stdin when omitted)
        #[arg(long)]
        input: Option<String>,

        /// Output root for the report tree (default: `Burnup`)
        #[arg(long)]
        out_dir: Option<String>,

        /// Report date used in file names, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<String>,

        /// Whether the daily totals include the last activity day (default: exclusive)
        #[arg(long, value_enum)]
        range_end: Option<RangeEndArg>,

        /// Shorthand for `--range-end inclusive`
        #[arg(long, conflicts_with = "range_end")]
        inclusive_end: bool,

        /// Path to a TOML config overriding column names and output settings
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the backlog and print counts without writing reports
    Summary {
        /// Path to the CSV export (reads stdin when omitted)
        #[arg(long)]
        input: Option<String>,

        /// Path to a TOML config overriding column names
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RangeEndArg {
    #[value(name = "exclusive")]
    Exclusive,
    #[value(name = "inclusive")]
    Inclusive,
}

impl From<RangeEndArg> for RangeEnd {
    fn from(arg: RangeEndArg) -> Self {
        match arg {
            RangeEndArg::Exclusive => RangeEnd::Exclusive,
            RangeEndArg::Inclusive => RangeEnd::Inclusive,
        }
    }
}
