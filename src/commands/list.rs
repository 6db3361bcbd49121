use super::args::{parse_category, parse_priority};
use crate::{
    db::tasks::Tasks,
    libs::{
        config::Config,
        messages::Message,
        queries,
        task::{Category, Priority},
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tasks of this category, sorted by priority
    #[arg(short, long, value_parser = parse_category, conflicts_with_all = ["others", "priority"])]
    category: Option<Category>,
    /// Only uncategorized tasks, sorted by priority
    #[arg(long, conflicts_with = "priority")]
    others: bool,
    /// Only tasks with this priority
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: ListArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let (tasks, title) = match (args.category, args.others, args.priority) {
        (Some(category), _, _) => (queries::tasks_by_category(&store, &owner, Some(category))?, category.to_string()),
        (None, true, _) => (queries::tasks_by_category(&store, &owner, None)?, "others".to_string()),
        (None, false, Some(priority)) => (queries::tasks_by_priority(&store, &owner, priority)?, format!("{} priority", priority)),
        (None, false, None) => (queries::list_tasks(&store, &owner)?, "all".to_string()),
    };

    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    msg_print!(Message::TasksHeader(title), true);
    View::tasks(&tasks, &engine, Utc::now())?;
    Ok(())
}
