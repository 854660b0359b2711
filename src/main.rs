use anyhow::Result;
use receipts::Config;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const CONFIG_FILE: &str = "receipts.yaml";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let config = Config::load_or_default(CONFIG_FILE)?;
    receipts::run(&config)
}
