use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, queries, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct ExpiringArgs {
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ExpiringArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let tasks = queries::get_tasks_expiring_soon(&store, &engine, &owner, Utc::now())?;
    if tasks.is_empty() {
        msg_info!(Message::NoTasksExpiring);
        return Ok(());
    }

    msg_print!(Message::ExpiringTasksHeader, true);
    View::expiring(&tasks)?;
    Ok(())
}
