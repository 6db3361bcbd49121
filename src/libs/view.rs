//! Table rendering for the CLI.

use super::expiration::{ExpirationEngine, ExpiryStatus};
use super::messages::Message;
use super::queries::{ExpiringTask, UserStats};
use super::task::{Schedule, Task};
use crate::db::sweep_runs::SweepRun;
use anyhow::Result;
use chrono::{DateTime, Utc};
use prettytable::{row, Table};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task], engine: &ExpirationEngine, now: DateTime<Utc>) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DONE", "TITLE", "PRIORITY", "SCHEDULE", "DUE TIME", "EXPIRY"]);
        for task in tasks {
            let done = if task.completed { "x" } else { "" };
            table.add_row(row![
                task.id.unwrap_or(0),
                done,
                task.title,
                task.priority,
                schedule_label(&task.schedule, task.is_recurring),
                task.due_time.as_deref().unwrap_or(""),
                expiry_label(engine.status(task, now)),
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn task_detail(task: &Task, engine: &ExpirationEngine, now: DateTime<Utc>) -> Result<()> {
        let expiration = engine.compute(task);
        let mut table = Table::new();

        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", task.description.as_deref().unwrap_or("")]);
        table.add_row(row!["OWNER", task.owner]);
        table.add_row(row!["PRIORITY", task.priority]);
        table.add_row(row!["SCHEDULE", schedule_label(&task.schedule, task.is_recurring)]);
        table.add_row(row!["DUE TIME", task.due_time.as_deref().unwrap_or("")]);
        table.add_row(row!["COMPLETED", optional_instant(task.completed_at)]);
        table.add_row(row!["CREATED", format_instant(task.created_at)]);
        table.add_row(row!["WARNING FROM", optional_instant(expiration.warning_starts_at)]);
        table.add_row(row!["EXPIRES", optional_instant(expiration.expires_at)]);
        table.add_row(row!["STATUS", expiry_label(engine.status(task, now))]);
        table.printstd();

        Ok(())
    }

    pub fn expiring(tasks: &[ExpiringTask]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "PRIORITY", "SCHEDULE", "DELETED IN"]);
        for expiring in tasks {
            let task = &expiring.task;
            table.add_row(row![
                task.id.unwrap_or(0),
                task.title,
                task.priority,
                schedule_label(&task.schedule, task.is_recurring),
                format!("{}h", expiring.hours_until_deletion),
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &UserStats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["", "TOTAL", "COMPLETED", "RATE"]);
        table.add_row(row!["all", stats.total, stats.completed, format!("{}%", stats.completion_rate)]);
        for category in &stats.by_category {
            let name = category.category.map(|c| c.as_str()).unwrap_or("others");
            table.add_row(row![name, category.total, category.completed, format!("{}%", category.completion_rate)]);
        }
        table.printstd();

        let mut priorities = Table::new();
        priorities.add_row(row!["PRIORITY", "TASKS"]);
        for (priority, count) in &stats.by_priority {
            priorities.add_row(row![priority, count]);
        }
        priorities.add_row(row!["active", stats.active]);
        priorities.printstd();

        Ok(())
    }

    pub fn sweep_history(runs: &[SweepRun]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "KIND", "RAN AT", "EXAMINED", "DELETED", "RESET", "FAILED"]);
        for run in runs {
            table.add_row(row![
                run.id,
                run.kind,
                format_instant(run.ran_at),
                run.examined,
                run.deleted,
                run.reset,
                run.failed
            ]);
        }
        table.printstd();

        Ok(())
    }
}

fn schedule_label(schedule: &Schedule, is_recurring: bool) -> String {
    let label = match schedule {
        Schedule::Uncategorized { due: None } => "others".to_string(),
        Schedule::Uncategorized { due: Some(due) } => format!("others, due {}", due.format(DATE_FORMAT)),
        Schedule::Daily { due: None } => "daily".to_string(),
        Schedule::Daily { due: Some(due) } => format!("daily, due {}", due.format(DATE_FORMAT)),
        Schedule::Weekly { weekday: None } => "weekly".to_string(),
        Schedule::Weekly { weekday: Some(weekday) } => format!("weekly ({})", weekday),
        Schedule::Monthly { day: None } => "monthly".to_string(),
        Schedule::Monthly { day: Some(day) } => format!("monthly (day {})", day),
    };
    if is_recurring {
        format!("{}, recurring", label)
    } else {
        label
    }
}

fn expiry_label(status: ExpiryStatus) -> String {
    match status {
        ExpiryStatus::NeverExpires => Message::TaskNeverExpires.to_string(),
        ExpiryStatus::Active => String::new(),
        ExpiryStatus::ExpiringSoon { hours_left } => Message::TaskExpiresIn(hours_left).to_string(),
        ExpiryStatus::Expired => Message::TaskExpired.to_string(),
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format(DATE_TIME_FORMAT).to_string()
}

fn optional_instant(instant: Option<DateTime<Utc>>) -> String {
    instant.map(format_instant).unwrap_or_default()
}
