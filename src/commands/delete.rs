use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, operations, task::TaskId},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: TaskId,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: DeleteArgs) -> Result<()> {
    let config = Config::read()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    operations::delete_task(&store, args.id, &owner)?;
    msg_success!(Message::TaskDeleted(args.id));
    Ok(())
}
