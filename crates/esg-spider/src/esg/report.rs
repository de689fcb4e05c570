use super::store::Store;
use super::CompanyScore;
use crate::error::StoreError;
use std::io::{self, Write};
use tracing::debug;

/// Default size of the leaderboard.
pub const TOP_N: i64 = 20;

/// Read the `limit` highest scores back out of `store`.
pub async fn top<S: Store>(store: &S, limit: i64) -> Result<Vec<CompanyScore>, StoreError> {
    let time = std::time::Instant::now();
    let scores = store.top(limit).await?;
    debug!(
        "top {limit} ESG scores fetched ({} rows). {}",
        scores.len(),
        crate::time_elapsed(time)
    );
    Ok(scores)
}

/// Print the leaderboard:
///
/// ```text
/// Top 20 companies with the highest ESG scores:
/// Company: Acme | ESG Score: 88.2
/// ...
/// ```
pub fn render<W: Write>(out: &mut W, limit: i64, scores: &[CompanyScore]) -> io::Result<()> {
    writeln!(out, "Top {limit} companies with the highest ESG scores:")?;
    for score in scores {
        writeln!(out, "Company: {} | ESG Score: {}", score.name, score.esg_score)?;
    }
    Ok(())
}
