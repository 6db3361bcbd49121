use crate::{
    db::sweep_runs::SweepRuns,
    libs::{messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of runs to show
    #[arg(short, long, default_value_t = 20)]
    limit: usize,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let runs = SweepRuns::new()?.recent(args.limit)?;
    if runs.is_empty() {
        msg_info!(Message::NoSweepHistory);
        return Ok(());
    }

    msg_print!(Message::SweepHistoryHeader, true);
    View::sweep_history(&runs)?;
    Ok(())
}
