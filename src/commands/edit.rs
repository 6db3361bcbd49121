use super::args::{check_due_time, parse_category, parse_priority, ScheduleArgs};
use crate::{
    db::tasks::Tasks,
    libs::{
        config::Config,
        messages::Message,
        operations, queries,
        task::{Category, Priority, Schedule, TaskId, TaskPatch},
    },
    msg_info, msg_success,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct EditArgs {
    id: TaskId,
    #[arg(short, long)]
    title: Option<String>,
    #[arg(short, long, conflicts_with = "clear_description")]
    description: Option<String>,
    #[arg(long)]
    clear_description: bool,
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<Priority>,
    #[command(flatten)]
    schedule: ScheduleArgs,
    /// Remove the due date, weekday or day of month
    #[arg(long, conflicts_with_all = ["due_date", "weekday", "day"])]
    clear_due: bool,
    #[arg(long, conflicts_with = "clear_due_time")]
    due_time: Option<String>,
    #[arg(long)]
    clear_due_time: bool,
    /// true or false
    #[arg(short, long)]
    recurring: Option<bool>,
    #[arg(long, value_parser = parse_category, conflicts_with = "clear_pattern")]
    pattern: Option<Category>,
    #[arg(long)]
    clear_pattern: bool,
    #[arg(short, long)]
    owner: Option<String>,
}

pub fn cmd(args: EditArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let owner = config.owner_or_default(args.owner)?;
    let store = Tasks::new()?;

    let current = queries::get_task_for_owner(&store, args.id, &owner)?;

    let schedule = if args.clear_due {
        let category = if args.schedule.others { None } else { args.schedule.category.or(current.category()) };
        Some(Schedule::empty(category))
    } else if !args.schedule.is_empty() {
        Some(args.schedule.to_schedule(current.category(), &engine)?)
    } else {
        None
    };

    let schedule = schedule.filter(|s| *s != current.schedule);
    // A pattern left over from the old category would no longer match.
    let category_changed = schedule.is_some_and(|s| s.category() != current.category());
    let recurring_pattern = if args.clear_pattern || (category_changed && args.pattern.is_none() && current.recurring_pattern.is_some()) {
        Some(None)
    } else {
        args.pattern.map(Some)
    };

    let patch = TaskPatch {
        title: args.title,
        description: if args.clear_description { Some(None) } else { args.description.map(Some) },
        priority: args.priority,
        schedule,
        due_time: if args.clear_due_time {
            Some(None)
        } else {
            args.due_time.as_deref().map(check_due_time).transpose()?.map(Some)
        },
        is_recurring: args.recurring,
        recurring_pattern,
        ..Default::default()
    };

    if patch.is_empty() {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    operations::update_task(&store, args.id, &owner, patch, Utc::now())?;
    msg_success!(Message::TaskUpdated(args.id));
    Ok(())
}
