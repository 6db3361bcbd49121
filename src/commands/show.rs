use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, queries, task::TaskId, view::View},
    msg_print, msg_warning,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: TaskId,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ShowArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;
    let now = Utc::now();

    let task = queries::get_task_for_owner(&store, args.id, &owner)?;

    msg_print!(Message::TaskDetailHeader(args.id), true);
    View::task_detail(&task, &engine, now)?;

    if queries::is_task_expiring_soon(&engine, &task, now) {
        if let Some(hours) = engine.hours_until_deletion(&task, now) {
            msg_warning!(Message::TaskExpiresIn(hours));
        }
    }
    Ok(())
}
