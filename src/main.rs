use anyhow::Result;
use change_simulator::config::{system_environment, LoggingSettings};
use change_simulator::domain::config_types::LogFormat;
use change_simulator::{Application, Settings};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    let app = Application::from_settings(settings, system_environment)?;
    app.run().await?;

    Ok(())
}

// RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Full => subscriber.init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}
