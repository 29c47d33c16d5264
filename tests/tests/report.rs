#[allow(unused)]
use utils::*;

mod tests {
    use super::*;
    use mock_service::prelude::*;
    use qstress_core::{Target, TestConfig};
    use qstress_runtime::{cli::load_config, QStressRuntime, RuntimeError};
    use std::time::Duration;

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn csv_matches_the_run() -> anyhow::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let output = dir.path().join("nested").join("results.csv");
        let config = TestConfig::new(Target::new("mock", "app"), "select * from t where id = %%%")
            .thread_count(3)
            .duration(Duration::from_secs(1))
            .output(&output);

        let db = MockDatabase::with_delay(Duration::from_millis(10)).fail_queries_containing("= 005");
        let report = QStressRuntime::new(config)
            .ctrl_c(false)
            .show_progress(false)
            .run(db)
            .await?;

        let mut reader = csv::Reader::from_path(&output)?;
        assert_eq!(
            reader.headers()?,
            vec!["ExecutionTimeMs", "ID", "ThreadId", "Timestamp", "IsError", "ErrorMessage"]
        );

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(rows.len(), report.summary.total);

        let mut last_timestamp = String::new();
        for row in &rows {
            let (ms, id, thread, timestamp, is_error, message) =
                (&row[0], &row[1], &row[2], &row[3], &row[4], &row[5]);

            assert_eq!(ms.split_once('.').map(|(_, frac)| frac.len()), Some(3));
            assert!((1..=3).contains(&thread.parse::<usize>()?));
            assert_eq!(timestamp.len(), "2024-01-01T00:00:00.000".len());
            assert!(timestamp >= last_timestamp.as_str());
            last_timestamp = timestamp.to_string();

            if id == "5" {
                assert_eq!(is_error, "True");
                assert_eq!(message, "relation \"= 005\" does not exist");
            } else {
                assert_eq!(is_error, "False");
                assert!(message.is_empty());
            }
        }
        Ok(())
    }

    #[tokio::test]
    #[ntest::timeout(10_000)]
    async fn json_config_drives_a_run() -> anyhow::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let output = dir.path().join("results.csv");
        let config_path = dir.path().join("qstress.json");
        std::fs::write(
            &config_path,
            serde_json::json!({
                "target": { "server": "mock", "database": "app" },
                "query_template": "select 1",
                "thread_count": 2,
                "duration": 1,
                "query_timeout": 5,
                "output": output,
            })
            .to_string(),
        )?;

        let config = load_config(&config_path)?;
        assert_eq!(config.query_timeout, Duration::from_secs(5));

        let report = QStressRuntime::new(config)
            .ctrl_c(false)
            .run(MockDatabase::with_delay(Duration::from_millis(50)))
            .await?;

        assert_eq!(report.output.as_deref(), Some(output.as_path()));
        let csv = std::fs::read_to_string(&output)?;
        assert!(csv.starts_with("ExecutionTimeMs,ThreadId,Timestamp,IsError,ErrorMessage\n"));
        Ok(())
    }

    #[tokio::test]
    async fn validation_lists_every_problem() {
        init();

        let config = TestConfig::new(Target::new("", ""), "select 1").thread_count(500);
        let err = QStressRuntime::new(config)
            .ctrl_c(false)
            .run(MockDatabase::with_delay(Duration::ZERO))
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid configuration:\n\
             - Server is required\n\
             - Database is required\n\
             - Thread count must be between 1 and 100, got 500"
        );
    }
}
