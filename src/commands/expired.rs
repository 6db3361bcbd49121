use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, queries, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct ExpiredArgs {
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ExpiredArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;
    let now = Utc::now();

    let tasks = queries::get_expired_tasks(&store, &engine, &owner, now)?;
    if tasks.is_empty() {
        msg_info!(Message::NoExpiredTasks);
        return Ok(());
    }

    msg_print!(Message::ExpiredTasksHeader, true);
    View::tasks(&tasks, &engine, now)?;
    Ok(())
}
