use esg_spider::config::Config;
use esg_spider::esg::fetch::HttpSource;
use esg_spider::esg::report;
use esg_spider::esg::store::PgStore;
use esg_spider::pipeline;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, error, info};

/// Poll the API for the whole request budget, then print the leaderboard.
pub(crate) async fn run(config: Config, limit: i64, tui: bool) -> anyhow::Result<()> {
    let pacer = config.pacer()?;
    let http_client = config.http_client()?;
    let store = PgStore::new(config.pg_pool()?);
    debug!("esg_database connection pool established");

    if config.api_url.is_empty() {
        error!("ESG_API_URL is empty; every request will fail");
    }
    let source = HttpSource::new(http_client, config.api_url.clone());

    let time = std::time::Instant::now();
    let pb = progress(tui, pacer.budget())?;
    let summary = pipeline::poll(&source, &store, pacer, config.strictness, &pb).await;
    info!(
        "{} company scores stored from {} requests, time elapsed: {:?}",
        summary.inserted,
        summary.iterations,
        time.elapsed()
    );

    print_report(&store, limit).await
}

/// Print the leaderboard from whatever is already stored.
pub(crate) async fn report(config: Config, limit: i64) -> anyhow::Result<()> {
    let store = PgStore::new(config.pg_pool()?);
    print_report(&store, limit).await
}

async fn print_report(store: &PgStore, limit: i64) -> anyhow::Result<()> {
    let scores = report::top(store, limit).await.map_err(|err| {
        error!("failed to read the leaderboard from esg_database.companies, error({err})");
        err
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render(&mut out, limit, &scores)?;
    out.flush()?;

    Ok(())
}

fn progress(tui: bool, budget: u32) -> anyhow::Result<ProgressBar> {
    if !tui {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(u64::from(budget)).with_style(
        ProgressStyle::default_bar()
            .template(
                "{msg} {spinner:.magenta}\n\
                [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {pos}/{len} requests \
                [ETA: {eta:.blue}]",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("polling ESG scores ...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
