//! Task data model.
//!
//! A task's due date means different things depending on its category: an
//! absolute instant for uncategorized and daily tasks, a weekday for weekly
//! tasks and a day of the month for monthly tasks. [`Schedule`] carries the
//! category and its due value together so the two can never disagree.

use super::error::{Result, TaskError};
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TaskId = i64;

pub const MIN_TITLE_LENGTH: usize = 1;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Daily,
    Weekly,
    Monthly,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Daily, Category::Weekly, Category::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Weekly => "weekly",
            Category::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Category::Daily),
            "weekly" => Ok(Category::Weekly),
            "monthly" => Ok(Category::Monthly),
            other => Err(TaskError::Validation(format!("unknown category '{}'", other))),
        }
    }
}

/// Task priority, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Sort rank used by category listings: high first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(TaskError::Validation(format!("unknown priority '{}'", other))),
        }
    }
}

/// Category together with the category-specific due value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Schedule {
    /// No category ("others"). `due` is an absolute due date.
    Uncategorized { due: Option<DateTime<Utc>> },
    /// `due` is informational only; expiration ignores it.
    Daily { due: Option<DateTime<Utc>> },
    Weekly { weekday: Option<Weekday> },
    /// Day of month, 1 to 31.
    Monthly { day: Option<u32> },
}

impl Schedule {
    pub fn category(&self) -> Option<Category> {
        match self {
            Schedule::Uncategorized { .. } => None,
            Schedule::Daily { .. } => Some(Category::Daily),
            Schedule::Weekly { .. } => Some(Category::Weekly),
            Schedule::Monthly { .. } => Some(Category::Monthly),
        }
    }

    /// A schedule of the given category with no due value.
    pub fn empty(category: Option<Category>) -> Self {
        match category {
            None => Schedule::Uncategorized { due: None },
            Some(Category::Daily) => Schedule::Daily { due: None },
            Some(Category::Weekly) => Schedule::Weekly { weekday: None },
            Some(Category::Monthly) => Schedule::Monthly { day: None },
        }
    }

    /// Absolute due instant, for the categories where one exists.
    pub fn due_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Schedule::Uncategorized { due } | Schedule::Daily { due } => *due,
            _ => None,
        }
    }

    pub fn target_weekday(&self) -> Option<Weekday> {
        match self {
            Schedule::Weekly { weekday } => *weekday,
            _ => None,
        }
    }

    pub fn target_day_of_month(&self) -> Option<u32> {
        match self {
            Schedule::Monthly { day } => *day,
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Schedule::Monthly { day: Some(day) } = self {
            if !(1..=31).contains(day) {
                return Err(TaskError::Validation(format!("day of month must be between 1 and 31, got {}", day)));
            }
        }
        Ok(())
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Uncategorized { due: None }
    }
}

/// Weekday from a 0-6 ordinal where 0 is Sunday.
pub fn weekday_from_ordinal(ordinal: i64) -> Option<Weekday> {
    match ordinal {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_ordinal(weekday: Weekday) -> i64 {
    weekday.num_days_from_sunday() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<TaskId>,
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub schedule: Schedule,
    /// Raw wall-clock time as entered, e.g. "2:30 PM".
    pub due_time: Option<String>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn category(&self) -> Option<Category> {
        self.schedule.category()
    }

    /// Pattern a recurring task follows: its explicit pattern, else its
    /// category, else daily.
    pub fn effective_pattern(&self) -> Category {
        self.recurring_pattern.or(self.category()).unwrap_or(Category::Daily)
    }

    /// Fails with `Unauthorized` when `owner` does not own this task.
    pub fn ensure_owner(&self, owner: &str) -> Result<()> {
        if self.owner != owner {
            return Err(TaskError::Unauthorized);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        self.schedule.validate()?;
        validate_recurring_pattern(self.recurring_pattern, self.category())
    }

    /// `completed_at` is set exactly when the task is completed.
    pub fn validate_completion(&self) -> Result<()> {
        if self.completed != self.completed_at.is_some() {
            return Err(TaskError::Validation(format!(
                "completed_at must be {} when completed is {}",
                if self.completed { "set" } else { "empty" },
                self.completed
            )));
        }
        Ok(())
    }
}

/// Fields supplied by the add flow. Storage assigns the id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub owner: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub schedule: Schedule,
    pub due_time: Option<String>,
    pub is_recurring: bool,
    pub recurring_pattern: Option<Category>,
}

impl NewTask {
    pub fn new(owner: &str, title: &str, priority: Priority) -> Self {
        NewTask {
            owner: owner.to_string(),
            title: title.to_string(),
            description: None,
            priority,
            schedule: Schedule::default(),
            due_time: None,
            is_recurring: false,
            recurring_pattern: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_description(self.description.as_deref())?;
        self.schedule.validate()?;
        validate_recurring_pattern(self.recurring_pattern, self.schedule.category())
    }

    /// Materializes the task as stored at `now`, before an id is assigned.
    pub fn into_task(self, now: DateTime<Utc>) -> Task {
        Task {
            id: None,
            owner: self.owner,
            title: self.title.trim().to_string(),
            description: self.description,
            completed: false,
            completed_at: None,
            priority: self.priority,
            schedule: self.schedule,
            due_time: self.due_time,
            is_recurring: self.is_recurring,
            recurring_pattern: self.recurring_pattern,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Outer `None` leaves a field untouched; for nullable
/// fields `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub schedule: Option<Schedule>,
    pub due_time: Option<Option<String>>,
    pub is_recurring: Option<bool>,
    pub recurring_pattern: Option<Option<Category>>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Patch that returns a task to the incomplete state.
    pub fn reset_completion(now: DateTime<Utc>) -> Self {
        TaskPatch {
            completed: Some(false),
            completed_at: Some(None),
            updated_at: Some(now),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Applies the patch to an in-memory copy of a task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(schedule) = self.schedule {
            task.schedule = schedule;
        }
        if let Some(due_time) = &self.due_time {
            task.due_time = due_time.clone();
        }
        if let Some(is_recurring) = self.is_recurring {
            task.is_recurring = is_recurring;
        }
        if let Some(pattern) = self.recurring_pattern {
            task.recurring_pattern = pattern;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(updated_at) = self.updated_at {
            task.updated_at = updated_at;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskFilter {
    All,
    Owner(String),
    ByIds(Vec<TaskId>),
}

pub fn validate_title(title: &str) -> Result<()> {
    let length = title.trim().chars().count();
    if length < MIN_TITLE_LENGTH {
        return Err(TaskError::Validation("title cannot be empty".to_string()));
    }
    if length > MAX_TITLE_LENGTH {
        return Err(TaskError::Validation(format!("title must be at most {} characters", MAX_TITLE_LENGTH)));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<()> {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(TaskError::Validation(format!(
                "description must be at most {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
    }
    Ok(())
}

pub fn validate_recurring_pattern(pattern: Option<Category>, category: Option<Category>) -> Result<()> {
    match pattern {
        Some(pattern) if Some(pattern) != category => Err(TaskError::Validation(format!(
            "recurring pattern '{}' must match the task category",
            pattern
        ))),
        _ => Ok(()),
    }
}
