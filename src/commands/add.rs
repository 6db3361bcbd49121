use super::args::{check_due_time, parse_category, parse_priority, ScheduleArgs};
use crate::{
    db::tasks::Tasks,
    libs::{
        config::Config,
        messages::Message,
        operations,
        task::{Category, NewTask, Priority},
    },
    msg_success,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title
    #[arg(required = true)]
    title: String,
    #[arg(short, long)]
    description: Option<String>,
    /// high, medium or low
    #[arg(short, long, value_parser = parse_priority, default_value = "medium")]
    priority: Priority,
    #[command(flatten)]
    schedule: ScheduleArgs,
    /// Wall-clock due time, e.g. "2:30 PM" or "14:30"
    #[arg(long)]
    due_time: Option<String>,
    /// Reset the task on its next occurrence instead of letting it expire
    #[arg(short, long)]
    recurring: bool,
    /// Recurrence pattern; must match the category
    #[arg(long, value_parser = parse_category, requires = "recurring")]
    pattern: Option<Category>,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: AddArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;

    let mut new_task = NewTask::new(&owner, &args.title, args.priority);
    new_task.description = args.description.filter(|d| !d.trim().is_empty());
    new_task.schedule = args.schedule.to_schedule(None, &engine)?;
    new_task.due_time = args.due_time.as_deref().map(check_due_time).transpose()?;
    new_task.is_recurring = args.recurring;
    new_task.recurring_pattern = args.pattern;

    let store = Tasks::new()?;
    let task = operations::add_task(&store, new_task, Utc::now())?;

    msg_success!(Message::TaskCreated(task.id.unwrap_or(0)));
    Ok(())
}
