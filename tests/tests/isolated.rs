#[allow(unused)]
use utils::*;

mod tests {
    use super::*;
    use mock_service::prelude::*;
    use qstress::prelude::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};
    use std::num::NonZeroU32;
    use std::time::{Duration, Instant};

    fn config(template: &str, threads: usize, duration: Duration) -> TestConfig {
        TestConfig::new(Target::new("mock", "app"), template)
            .thread_count(threads)
            .duration(duration)
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn single_worker_walks_the_parameter_space() {
        init();

        let db = MockDatabase::with_delay(Duration::from_millis(1));
        let outcome = LoadTest::new(db.clone(), config("x%%y", 1, Duration::from_secs(1)))
            .await
            .unwrap();

        let mut records = outcome.records;
        records.sort_by_key(|r| r.timestamp);

        assert!(records.len() > 100, "only {} attempts", records.len());
        assert!(records.iter().all(|r| !r.is_error() && r.worker_id == 1));
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.parameter_value, idx as u64 % 100);
        }

        let log = db.query_log();
        assert_eq!(&log[..3], ["x00y", "x01y", "x02y"]);
        assert_eq!(log[100], "x00y");
    }

    /// Answers every query immediately without ever suspending.
    struct InstantDatabase;

    struct InstantConnection;

    impl Connector for InstantDatabase {
        type Connection = InstantConnection;

        async fn connect(&self) -> Result<InstantConnection, ConnectionError> {
            Ok(InstantConnection)
        }
    }

    impl Connection for InstantConnection {
        async fn execute(&mut self, _query: &str) -> Result<u64, ConnectionError> {
            Ok(0)
        }

        async fn close(self) -> Result<(), ConnectionError> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[ntest::timeout(10_000)]
    async fn instant_queries_still_stop_at_the_deadline() {
        init();

        let start = Instant::now();
        let outcome = LoadTest::new(InstantDatabase, config("x%%y", 1, Duration::from_secs(1)))
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1_500), "took {elapsed:?}");
        assert_eq!(outcome.state, RunState::Completed);

        let records = outcome.records;
        assert!(records.len() > 100, "only {} attempts", records.len());
        assert!(records.iter().all(|r| !r.is_error() && r.worker_id == 1));

        // Attempt n uses parameter n % 100, so the values split evenly across 00..99.
        let mut counts = [0usize; 100];
        for record in &records {
            counts[record.parameter_value as usize] += 1;
        }
        let (full, rest) = (records.len() / 100, records.len() % 100);
        for (value, count) in counts.iter().enumerate() {
            let expected = if value < rest { full + 1 } else { full };
            assert_eq!(*count, expected, "parameter {value:02}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    #[ntest::timeout(10_000)]
    async fn every_attempt_is_recorded_once() {
        init();

        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let threads = rng.gen_range(8..=32);
        let db = MockDatabase::new(Latency::SkewNormal {
            mean: Duration::from_millis(4),
            std_dev: Duration::from_millis(2),
            shape: 3.,
        });

        let outcome = LoadTest::new(db.clone(), config("%%%%%", threads, Duration::from_secs(1)))
            .await
            .unwrap();

        assert_eq!(outcome.records.len() as u64, db.queries_executed());
        assert_eq!(db.connections_opened(), threads as u64 + 1);
        assert_eq!(db.connections_open(), 0);

        let mut per_worker: HashMap<usize, HashSet<u64>> = HashMap::new();
        for record in &outcome.records {
            assert!(per_worker
                .entry(record.worker_id)
                .or_default()
                .insert(record.parameter_value));
        }
        assert_eq!(per_worker.len(), threads);
        for (worker_id, params) in per_worker {
            let n = params.len() as u64;
            assert_eq!(params, (0..n).collect(), "worker {worker_id} lost attempts");
        }
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn failing_queries_do_not_stop_the_run() {
        init();

        let db = MockDatabase::with_delay(Duration::from_millis(1)).fail_queries_containing("id=13");
        let outcome = LoadTest::new(db, config("select id=%%", 2, Duration::from_secs(1)))
            .await
            .unwrap();

        assert_eq!(outcome.state, RunState::Completed);
        for record in &outcome.records {
            assert_eq!(record.is_error(), record.parameter_value == 13);
        }
        assert!(outcome.summary().failed > 0);
        assert!(outcome.summary().successful > outcome.summary().failed);
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn rate_limited_target() {
        init();

        let db = MockDatabase::with_delay(Duration::from_millis(1))
            .limited(NonZeroU32::new(50).unwrap());
        let outcome = LoadTest::new(db, config("select 1", 4, Duration::from_secs(1)))
            .await
            .unwrap();

        let summary = outcome.summary();
        // Burst capacity plus one second of refill.
        assert!(summary.successful <= 110, "{summary}");
        assert!(summary.failed > 0);
        assert!(outcome
            .records
            .iter()
            .filter_map(|r| r.error_message())
            .all(|msg| msg == "too many requests"));
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn respects_the_deadline() {
        init();

        let start = Instant::now();
        let db = MockDatabase::with_delay(Duration::from_millis(20));
        let test = LoadTest::new(db, config("select 1", 10, Duration::from_secs(2)));
        let state_rx = test.state_rx();

        let outcome = test.await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_millis(2_500), "took {elapsed:?}");
        assert_eq!(*state_rx.borrow(), RunState::Completed);

        let first = outcome.records.iter().map(|r| r.timestamp).min().unwrap();
        let last = outcome.records.iter().map(|r| r.timestamp).max().unwrap();
        assert!(last - first <= time_span(Duration::from_millis(2_050)));
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn cancellation_returns_within_one_query() {
        init();

        let db = MockDatabase::with_delay(Duration::from_secs(20));
        let test = LoadTest::new(db.clone(), config("select 1", 5, Duration::from_secs(60)));
        let cancel = test.cancel_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            cancel.cancel();
        });

        let start = Instant::now();
        let outcome = test.await.unwrap();

        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.records.len(), 5);
        assert!(outcome
            .records
            .iter()
            .all(|r| r.error_message() == Some("Query was cancelled") && r.execution_time_ms > 0.));
        assert_eq!(db.connections_open(), 0);
    }

    #[tokio::test]
    async fn unreachable_target_is_fatal() {
        init();

        let db = MockDatabase::with_delay(Duration::ZERO).fail_connect();
        let err = LoadTest::new(db, config("select 1", 4, Duration::from_secs(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadTestError::Preflight(_)));
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn attempts_are_exported_as_metrics() {
        let handle = init();

        let db = MockDatabase::with_delay(Duration::from_millis(5));
        LoadTest::new(db, config("select 1", 2, Duration::from_secs(1)))
            .await
            .unwrap();

        let rendered = handle.render();
        assert!(rendered.contains("qstress_query_success"), "{rendered}");
        assert!(rendered.contains("qstress_query_latency"), "{rendered}");
    }

    fn time_span(duration: Duration) -> time::Duration {
        time::Duration::try_from(duration).unwrap()
    }
}
