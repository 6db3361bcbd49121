use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, queries, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let config = Config::read()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let stats = queries::user_stats(&store, &owner)?;
    msg_print!(Message::StatsHeader(owner), true);
    View::stats(&stats)?;
    Ok(())
}
