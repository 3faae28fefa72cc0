use localstack_ready::{before_all, ReadinessPoller};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let poller = ReadinessPoller::from_env()?;
    let report = before_all(&poller).await?;

    for (service, status) in &report.services {
        println!("{service}: {status}");
    }

    Ok(())
}
