use super::{sql, CompanyScore};
use crate::error::StoreError;
use crate::http::*;
use futures::{stream, StreamExt};
use std::future::Future;
use tracing::{debug, error, trace};

/// Outcome of one batch of inserts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub inserted: u64,
    pub failed: u64,
}

/// Persistence for company scores.
///
/// Implementations acquire whatever connection they need per call and release it before the
/// returned future resolves, on both the success and the error path.
pub trait Store {
    /// Insert every score, in order, one statement execution each. Rows are independent: a
    /// failed row does not undo the rows before it, nor stop the rows after it.
    fn insert(
        &self,
        scores: &[CompanyScore],
    ) -> impl Future<Output = Result<WriteReport, StoreError>> + Send;

    /// Highest scores first, at most `limit` rows.
    fn top(&self, limit: i64) -> impl Future<Output = Result<Vec<CompanyScore>, StoreError>> + Send;
}

/// [Store] backed by a [deadpool_postgres::Pool]; a client is checked out per call and goes
/// back to the pool when it drops.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn insert(&self, scores: &[CompanyScore]) -> Result<WriteReport, StoreError> {
        if scores.is_empty() {
            trace!("no company scores to insert");
            return Ok(WriteReport::default());
        }

        let time = std::time::Instant::now();

        // one client and one prepared statement for the whole batch
        let pg_client = self.pool.get().await.map_err(|err| {
            error!("failed to get a client from the pool, error({err})");
            err
        })?;
        let query = pg_client.prepare(sql::INSERT_COMPANY).await.map_err(|err| {
            error!("failed to prepare INSERT INTO esg_database.companies, error({err})");
            err
        })?;

        // no transaction; every row commits on its own
        let mut report = WriteReport::default();
        let mut stream = stream::iter(scores);
        while let Some(score) = stream.next().await {
            match pg_client
                .execute(&query, &[&score.name, &score.esg_score])
                .await
            {
                Ok(_) => {
                    trace!("inserted [{}] {}", score.name, score.esg_score);
                    report.inserted += 1;
                }
                Err(err) => {
                    error!(
                        "failed to insert [{}] {}, error({err})",
                        score.name, score.esg_score
                    );
                    report.failed += 1;
                }
            }
        }

        debug!(
            "{} company scores inserted, {} failed. {}",
            report.inserted,
            report.failed,
            crate::time_elapsed(time)
        );

        Ok(report)
    }

    async fn top(&self, limit: i64) -> Result<Vec<CompanyScore>, StoreError> {
        let pg_client = self.pool.get().await?;
        let scores = pg_client
            .query(sql::SELECT_TOP, &[&limit])
            .await
            .map_err(|err| {
                error!("failed to fetch esg_database.companies, error({err})");
                err
            })?
            .into_iter()
            .map(|row| CompanyScore {
                name: row.get("name"),
                esg_score: row.get("esg_score"),
            })
            .collect();

        Ok(scores)
    }
}
