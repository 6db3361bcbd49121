use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, operations, task::TaskId},
    msg_success,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct ToggleArgs {
    id: TaskId,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ToggleArgs) -> Result<()> {
    let config = Config::read()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let task = operations::toggle_task(&store, args.id, &owner, Utc::now())?;
    if task.completed {
        msg_success!(Message::TaskCompleted(args.id));
    } else {
        msg_success!(Message::TaskReopened(args.id));
    }
    Ok(())
}
