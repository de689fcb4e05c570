use crate::esg::de::{self, Strictness};
use crate::esg::fetch::Source;
use crate::esg::store::Store;
use crate::pace::Pacer;
use indicatif::ProgressBar;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Tally of a full polling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u32,
    pub fetch_failures: u32,
    pub write_failures: u32,
    pub inserted: u64,
    pub failed_rows: u64,
}

/// Fetch → decode → insert, `pacer.budget()` times, each iteration padded to the pacer's
/// interval.
///
/// Every failure inside an iteration is logged; fetch and store failures are also counted.
/// None of them stops the loop. A failed fetch hands an empty body to the parser, exactly as
/// a successful fetch of nothing would.
pub async fn poll<S, D>(
    source: &S,
    store: &D,
    pacer: Pacer,
    strictness: Strictness,
    pb: &ProgressBar,
) -> RunSummary
where
    S: Source,
    D: Store,
{
    let mut summary = RunSummary::default();
    info!(
        "polling {} times, one request every {:?}",
        pacer.budget(),
        pacer.interval()
    );

    for i in 0..pacer.budget() {
        let time = Instant::now();

        // 1. fetch
        let body = match source.fetch().await {
            Ok(body) => body,
            Err(err) => {
                error!("failed to fetch ESG scores, error({err})");
                summary.fetch_failures += 1;
                String::new()
            }
        };

        // 2. decode
        let scores = de::parse(&body, strictness);

        // 3. insert
        match store.insert(&scores).await {
            Ok(report) => {
                summary.inserted += report.inserted;
                summary.failed_rows += report.failed;
            }
            Err(err) => {
                error!("failed to store ESG scores, error({err})");
                summary.write_failures += 1;
            }
        }

        let elapsed = time.elapsed();
        let line = format!("API request time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
        if pb.is_hidden() {
            println!("{line}");
        } else {
            pb.println(&line);
        }
        debug!("iteration {} of {} complete", i + 1, pacer.budget());

        summary.iterations += 1;
        pb.inc(1);
        pacer.pad(elapsed).await;
    }

    pb.finish_and_clear();
    info!("polling finished: {summary:?}");

    summary
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, StoreError};
    use crate::esg::store::WriteReport;
    use crate::esg::CompanyScore;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays canned bodies; `None`, or running out, is a failed fetch.
    struct Replay(Mutex<VecDeque<Option<&'static str>>>);

    impl Replay {
        fn new(bodies: impl IntoIterator<Item = Option<&'static str>>) -> Self {
            Self(Mutex::new(bodies.into_iter().collect()))
        }
    }

    impl Source for Replay {
        async fn fetch(&self) -> Result<String, FetchError> {
            let next = self.0.lock().unwrap().pop_front().flatten();
            match next {
                Some(body) => Ok(body.to_string()),
                None => Err(FetchError::Status {
                    status: 503,
                    url: "http://scores.test/".to_string(),
                }),
            }
        }
    }

    /// Records every batch handed to it and answers `top` from the recorded rows.
    #[derive(Default)]
    struct Recorder {
        batches: Mutex<Vec<Vec<CompanyScore>>>,
        broken: bool,
    }

    impl Recorder {
        fn rows(&self) -> Vec<CompanyScore> {
            self.batches.lock().unwrap().concat()
        }
    }

    impl Store for Recorder {
        async fn insert(&self, scores: &[CompanyScore]) -> Result<WriteReport, StoreError> {
            if self.broken {
                return Err(StoreError::Pool(deadpool_postgres::PoolError::Closed));
            }
            self.batches.lock().unwrap().push(scores.to_vec());
            Ok(WriteReport {
                inserted: scores.len() as u64,
                failed: 0,
            })
        }

        async fn top(&self, limit: i64) -> Result<Vec<CompanyScore>, StoreError> {
            let mut rows = self.rows();
            rows.sort_by(|a, b| b.esg_score.total_cmp(&a.esg_score));
            rows.truncate(limit as usize);
            Ok(rows)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn acme_end_to_end() {
        let source = Replay::new([Some(r#"{"companies":[{"name":"Acme","esg_score":88.2}]}"#)]);
        let store = Recorder::default();

        let summary = poll(
            &source,
            &store,
            Pacer::new(1).unwrap(),
            Strictness::Lenient,
            &ProgressBar::hidden(),
        )
        .await;

        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.rows(), vec![CompanyScore::new("Acme", 88.2)]);

        let top = crate::esg::report::top(&store, 20).await.unwrap();
        let mut out = Vec::new();
        crate::esg::report::render(&mut out, 20, &top).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out
            .lines()
            .any(|line| line.contains("Acme") && line.contains("88.2")));
    }

    #[tokio::test(start_paused = true)]
    async fn every_batch_reaches_the_store() {
        let source = Replay::new([
            Some(r#"{"companies":[{"name":"A","esg_score":1.5},{"name":"B","esg_score":3.0}]}"#),
            Some(r#"{"companies":[{"name":"C","esg_score":2.0}]}"#),
            Some(r#"{"companies":[]}"#),
        ]);
        let store = Recorder::default();

        let summary = poll(
            &source,
            &store,
            Pacer::new(3).unwrap(),
            Strictness::Lenient,
            &ProgressBar::hidden(),
        )
        .await;

        assert_eq!(summary.inserted, 3);
        assert_eq!(
            *store.batches.lock().unwrap(),
            vec![
                vec![CompanyScore::new("A", 1.5), CompanyScore::new("B", 3.0)],
                vec![CompanyScore::new("C", 2.0)],
                vec![],
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failures_never_stop_the_loop() {
        let source = Replay::new([
            None,
            Some("<html>502 Bad Gateway</html>"),
            Some(r#"{"data": []}"#),
            Some(r#"{"companies":[{"name":"Acme","esg_score":88.2}]}"#),
        ]);
        let store = Recorder::default();

        let summary = poll(
            &source,
            &store,
            Pacer::new(5).unwrap(),
            Strictness::Lenient,
            &ProgressBar::hidden(),
        )
        .await;

        // iterations 1 and 5 fail to fetch; 1, 2, 3 and 5 decode to nothing
        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.fetch_failures, 2);
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.rows(), vec![CompanyScore::new("Acme", 88.2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn store_outage_is_contained() {
        let source = Replay::new([
            Some(r#"{"companies":[{"name":"Acme","esg_score":88.2}]}"#),
            Some(r#"{"companies":[{"name":"Globex","esg_score":71}]}"#),
        ]);
        let store = Recorder {
            broken: true,
            ..Default::default()
        };

        let summary = poll(
            &source,
            &store,
            Pacer::new(2).unwrap(),
            Strictness::Lenient,
            &ProgressBar::hidden(),
        )
        .await;

        assert_eq!(summary.iterations, 2);
        assert_eq!(summary.write_failures, 2);
        assert_eq!(summary.inserted, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn hundred_requests_fill_one_minute() {
        let source = Replay::new(std::iter::repeat(Some(r#"{"companies":[]}"#)).take(100));
        let store = Recorder::default();

        let start = Instant::now();
        let summary = poll(
            &source,
            &store,
            Pacer::default(),
            Strictness::Lenient,
            &ProgressBar::hidden(),
        )
        .await;
        let elapsed = start.elapsed();

        assert_eq!(summary.iterations, 100);
        assert_eq!(summary.fetch_failures, 0);
        assert!(elapsed >= Duration::from_millis(60_000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(60_500), "{elapsed:?}");
    }
}
