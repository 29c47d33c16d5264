use clap::Parser;
use qstress_runtime::{logging::init_logging, PgConnector, QStressCli, QStressRuntime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = QStressCli::parse();
    init_logging(cli.log.as_deref())?;

    let runtime = QStressRuntime::from_cli(&cli)?;
    let connector = PgConnector::new(&runtime.config().target);
    let report = runtime.run(connector).await?;

    println!("{}", report.summary);
    if let Some(path) = &report.output {
        println!("Results saved to {}", path.display());
    }
    Ok(())
}
