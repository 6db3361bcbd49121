//! Argument parsing shared by `add` and `edit`.

use crate::libs::due_time::parse_due_time;
use crate::libs::expiration::ExpirationEngine;
use crate::libs::messages::Message;
use crate::libs::task::{weekday_from_ordinal, Category, Priority, Schedule};
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Args;
use std::ops::RangeInclusive;

pub fn parse_category(value: &str) -> Result<Category, String> {
    value.parse().map_err(|e: crate::libs::error::TaskError| e.to_string())
}

pub fn parse_priority(value: &str) -> Result<Priority, String> {
    value.parse().map_err(|e: crate::libs::error::TaskError| e.to_string())
}

/// Category and due-value flags.
#[derive(Debug, Args, Default, Clone)]
pub struct ScheduleArgs {
    /// daily, weekly or monthly
    #[arg(short, long, value_parser = parse_category, conflicts_with = "others")]
    pub category: Option<Category>,
    /// Make the task uncategorized
    #[arg(long)]
    pub others: bool,
    /// Due date (YYYY-MM-DD) for uncategorized and daily tasks
    #[arg(long)]
    pub due_date: Option<String>,
    /// Target weekday for weekly tasks, 0 (Sunday) to 6 (Saturday)
    #[arg(long)]
    pub weekday: Option<i64>,
    /// Target day of month for monthly tasks, 1 to 31
    #[arg(long)]
    pub day: Option<u32>,
}

impl ScheduleArgs {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && !self.others && self.due_date.is_none() && self.weekday.is_none() && self.day.is_none()
    }

    /// Builds the schedule. `fallback` is the category used when neither
    /// `--category` nor `--others` is given.
    pub fn to_schedule(&self, fallback: Option<Category>, engine: &ExpirationEngine) -> Result<Schedule> {
        let category = if self.others { None } else { self.category.or(fallback) };

        match category {
            None | Some(Category::Daily) => {
                self.reject_weekday(category)?;
                self.reject_day(category)?;
                let due = match &self.due_date {
                    Some(input) => match engine.start_of_day(parse_due_date(input)?) {
                        Some(due) => Some(due),
                        None => msg_bail_anyhow!(Message::InvalidDueDate(input.to_string())),
                    },
                    None => None,
                };
                Ok(match category {
                    None => Schedule::Uncategorized { due },
                    _ => Schedule::Daily { due },
                })
            }
            Some(Category::Weekly) => {
                self.reject_due_date(category)?;
                self.reject_day(category)?;
                let weekday = match self.weekday {
                    Some(ordinal) => match weekday_from_ordinal(ordinal) {
                        Some(weekday) => Some(weekday),
                        None => msg_bail_anyhow!(Message::InvalidWeekday(ordinal)),
                    },
                    None => None,
                };
                Ok(Schedule::Weekly { weekday })
            }
            Some(Category::Monthly) => {
                self.reject_due_date(category)?;
                self.reject_weekday(category)?;
                let schedule = Schedule::Monthly { day: self.day };
                schedule.validate()?;
                Ok(schedule)
            }
        }
    }

    fn reject_due_date(&self, category: Option<Category>) -> Result<()> {
        if self.due_date.is_some() {
            msg_bail_anyhow!(Message::DueArgsConflict(format!("--due-date cannot be used with {}", category_label(category))));
        }
        Ok(())
    }

    fn reject_weekday(&self, category: Option<Category>) -> Result<()> {
        if self.weekday.is_some() {
            msg_bail_anyhow!(Message::DueArgsConflict(format!("--weekday cannot be used with {}", category_label(category))));
        }
        Ok(())
    }

    fn reject_day(&self, category: Option<Category>) -> Result<()> {
        if self.day.is_some() {
            msg_bail_anyhow!(Message::DueArgsConflict(format!("--day cannot be used with {}", category_label(category))));
        }
        Ok(())
    }
}

fn category_label(category: Option<Category>) -> &'static str {
    category.map(|c| c.as_str()).unwrap_or("uncategorized tasks")
}

/// Years accepted for `--due-date`.
pub const DUE_DATE_YEARS: RangeInclusive<i32> = 1970..=9999;

pub fn parse_due_date(input: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        Ok(date) if DUE_DATE_YEARS.contains(&date.year()) => Ok(date),
        _ => msg_bail_anyhow!(Message::InvalidDueDate(input.to_string())),
    }
}

/// Checks a due time and returns it trimmed.
pub fn check_due_time(input: &str) -> Result<String> {
    if parse_due_time(input).is_none() {
        msg_bail_anyhow!(Message::InvalidDueTime(input.to_string()));
    }
    Ok(input.trim().to_string())
}
