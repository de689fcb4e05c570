use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    ///
    /// If no level is provided, a progress bar is shown instead of log lines.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the ESG scores API, store every response in esg_database.companies, then print
    /// the leaderboard.
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Number of requests to make, spread evenly over one minute [env: ESG_MAX_REQUESTS].
        #[arg(short, long)]
        budget: Option<u32>,

        /// Skip companies without a string `name` and a numeric `esg_score`, rather than
        /// filling the gaps with empty values [env: ESG_STRICT].
        #[arg(long)]
        strict: bool,

        /// Scores API endpoint [env: ESG_API_URL].
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Print the leaderboard from what is already stored.
    Report {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Args, Debug)]
pub struct Overrides {
    /// PostgreSQL connection URL [env: ESG_DATABASE_URL].
    #[arg(long)]
    pub database_url: Option<String>,

    /// Number of companies in the leaderboard.
    #[arg(short, long, default_value_t = esg_spider::esg::report::TOP_N, value_parser = clap::value_parser!(i64).range(1..))]
    pub limit: i64,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}
