//! Command line runtime
//!
//! Wires a [`LoadTest`] to everything around it: validation, Ctrl-C handling, the countdown
//! ticker, the optional Prometheus exporter and the CSV report.
use crate::{
    cli::QStressCli,
    error::RuntimeError,
    progress::{countdown_ticker, TICK_INTERVAL},
    report::save_results,
    validate::validate,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use qstress::{Connector, LoadTest, RunOutcome};
use qstress_core::{QueryTemplate, RunSummary, TestConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
#[allow(unused)]
use tracing::{debug, error, info, instrument, warn, Instrument};

/// What a finished run produced and where it went.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub summary: RunSummary,
    /// `None` when there was nothing to save.
    pub output: Option<PathBuf>,
}

/// Runs a single load test from the command line.
///
/// # Example
///
/// ```ignore
/// let cli = QStressCli::parse();
/// let runtime = QStressRuntime::from_cli(&cli)?;
/// let connector = PgConnector::new(&runtime.config().target);
/// let report = runtime.run(connector).await?;
/// println!("{}", report.summary);
/// ```
pub struct QStressRuntime {
    config: TestConfig,
    metrics_addr: Option<SocketAddr>,
    show_progress: bool,
    ctrl_c: bool,
    cancel: CancellationToken,
}

impl QStressRuntime {
    pub fn new(config: TestConfig) -> Self {
        Self {
            config,
            metrics_addr: None,
            show_progress: true,
            ctrl_c: true,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_cli(cli: &QStressCli) -> Result<Self, RuntimeError> {
        Ok(Self::new(cli.test_config()?).metrics_addr(cli.metrics_addr))
    }

    pub fn metrics_addr(mut self, addr: Option<SocketAddr>) -> Self {
        self.metrics_addr = addr;
        self
    }

    /// Log the remaining time once a second.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Stop the run on Ctrl-C.
    pub fn ctrl_c(mut self, enabled: bool) -> Self {
        self.ctrl_c = enabled;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    #[instrument(name = "qstress", skip_all, fields(target = %self.config.target))]
    pub async fn run<C>(self, connector: C) -> Result<RunReport, RuntimeError>
    where
        C: Connector + Send + Sync + 'static,
    {
        validate(&self.config)?;

        if let Some(addr) = self.metrics_addr {
            PrometheusBuilder::new().with_http_listener(addr).install()?;
            info!("Serving metrics on {addr}");
        }

        let test = LoadTest::new(connector, self.config.clone()).cancel_on(self.cancel.clone());

        let done = CancellationToken::new();
        let _done_guard = done.clone().drop_guard();
        if self.ctrl_c {
            tokio::spawn(stop_on_ctrl_c(self.cancel.clone(), done.clone()).in_current_span());
        }

        let ticker = self.show_progress.then(|| {
            tokio::spawn(
                countdown_ticker(test.state_rx(), TICK_INTERVAL, |countdown| {
                    info!("Time remaining: {countdown}s")
                })
                .in_current_span(),
            )
        });

        let outcome = test.await;
        if let Some(ticker) = ticker {
            if let Err(err) = ticker.await {
                warn!("Countdown ticker failed: {err}");
            }
        }
        let outcome = outcome?;

        if outcome.is_cancelled() {
            warn!("Test stopped by user.");
        }

        let summary = outcome.summary();
        let output = if outcome.records.is_empty() {
            info!("No results to save.");
            None
        } else {
            let template = QueryTemplate::parse(self.config.query_template.as_str());
            save_results(&outcome.records, &template, &self.config.output)?;
            Some(self.config.output.clone())
        };

        info!("Test complete. {summary}");
        Ok(RunReport {
            outcome,
            summary,
            output,
        })
    }
}

async fn stop_on_ctrl_c(cancel: CancellationToken, done: CancellationToken) {
    tokio::select! {
        res = tokio::signal::ctrl_c() => match res {
            Ok(()) => {
                info!("Ctrl-C received, stopping.");
                cancel.cancel();
            }
            Err(err) => error!("Unable to listen for Ctrl-C: {err}"),
        },
        _ = done.cancelled() => {}
    }
}
