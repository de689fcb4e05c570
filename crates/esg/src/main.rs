mod cli;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use esg_spider::config::Config;
use esg_spider::esg::de::Strictness;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// install the subscriber for the chosen trace level; without one, only warnings and errors
// are shown, on stderr, so they stay out of the leaderboard on stdout
fn preprocess(trace: Option<TraceLevel>) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(max_level(trace))
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

fn max_level(trace: Option<TraceLevel>) -> Level {
    match trace {
        Some(TraceLevel::DEBUG) => Level::DEBUG,
        Some(TraceLevel::ERROR) => Level::ERROR,
        Some(TraceLevel::INFO) => Level::INFO,
        Some(TraceLevel::TRACE) => Level::TRACE,
        Some(TraceLevel::WARN) | None => Level::WARN,
    }
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // set the trace level
    preprocess(cli.trace)?;
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    match cli.command {
        // `esg run`: poll, store, report
        Commands::Run {
            overrides,
            budget,
            strict,
            url,
        } => {
            let mut config = config(overrides.database_url)?;
            if let Some(budget) = budget {
                config.budget = budget;
            }
            if strict {
                config.strictness = Strictness::Strict;
            }
            if let Some(url) = url {
                config.api_url = url;
            }
            spider::run(config, overrides.limit, tui).await?;
        }

        // `esg report`: leaderboard only
        Commands::Report { overrides } => {
            let config = config(overrides.database_url)?;
            spider::report(config, overrides.limit).await?;
        }
    }

    Ok(())
}

// environment first, then the command line on top
fn config(database_url: Option<String>) -> anyhow::Result<Config> {
    let config = match database_url {
        Some(url) => Config::from_lookup(|key| match key {
            "ESG_DATABASE_URL" => Some(url.clone()),
            _ => dotenv::var(key).ok(),
        })?,
        None => Config::from_env()?,
    };
    Ok(config)
}
