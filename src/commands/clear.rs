use crate::{
    db::tasks::Tasks,
    libs::{config::Config, messages::Message, operations, store::TaskStore},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ClearArgs) -> Result<()> {
    let config = Config::read()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let count = store.list_tasks_for_user(&owner)?.len();
    if count == 0 {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    let confirmed = args.yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmClearAll(count).to_string())
            .default(false)
            .interact()?;

    if confirmed {
        let deleted = operations::clear_all_tasks(&store, &owner)?;
        msg_success!(Message::TasksDeletedCount(deleted));
    } else {
        msg_info!(Message::OperationCancelled);
    }
    Ok(())
}
