use crate::libs::{config::Config, daemon};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    let config = Config::read()?;
    daemon::run_with_signal_handling(&config).await
}
