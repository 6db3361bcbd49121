//! SQLite-backed task store.
//!
//! Instants are stored as epoch milliseconds. The `due_date` column holds
//! whatever the category says it holds (an instant, a weekday ordinal with
//! 0 = Sunday, or a day of month) and is always decoded through the
//! `category` column, never by the size of the number.

use super::db::Db;
use crate::libs::error::{Result, TaskError};
use crate::libs::store::{TaskScan, TaskStore};
use crate::libs::task::{weekday_from_ordinal, weekday_ordinal, Category, NewTask, Priority, Schedule, Task, TaskFilter, TaskId, TaskPatch};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::warn;

const INSERT_TASK: &str = "INSERT INTO tasks (owner, title, description, completed, completed_at, priority, category, due_date, due_time, is_recurring, recurring_pattern, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const SELECT_TASKS: &str = "SELECT id, owner, title, description, completed, completed_at, priority, category, due_date, due_time, is_recurring, recurring_pattern, created_at, updated_at FROM tasks";
const WHERE_OWNER: &str = "WHERE owner = ?";
const WHERE_ID: &str = "WHERE id IN";
const ORDER_NEWEST: &str = "ORDER BY created_at DESC, id DESC";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_FOR_OWNER: &str = "DELETE FROM tasks WHERE owner = ?1";

pub struct Tasks {
    conn: Connection,
}

impl Tasks {
    /// Opens the task store in the application data directory.
    pub fn new() -> anyhow::Result<Tasks> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn from_db(db: Db) -> Tasks {
        Tasks { conn: db.conn }
    }

    pub fn open_in_memory() -> Result<Tasks> {
        Ok(Self::from_db(Db::open_in_memory()?))
    }

    pub fn fetch(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let Some((sql, params)) = select_for(filter) else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let task_iter = stmt.query_map(params_from_iter(params.iter()), task_from_row)?;
        let mut tasks = Vec::new();
        for task_result in task_iter {
            tasks.push(task_result?);
        }
        Ok(tasks)
    }

    /// Like [`Tasks::fetch`], but a row that fails to decode is set aside
    /// instead of failing the whole listing.
    pub fn scan(&self, filter: TaskFilter) -> Result<TaskScan> {
        let Some((sql, params)) = select_for(filter) else {
            return Ok(TaskScan::default());
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let row_iter = stmt.query_map(params_from_iter(params.iter()), |row| Ok((row.get::<_, TaskId>(0)?, task_from_row(row))))?;
        let mut scan = TaskScan::default();
        for row_result in row_iter {
            match row_result? {
                (_, Ok(task)) => scan.tasks.push(task),
                (id, Err(e)) => {
                    warn!(task_id = id, error = %e, "skipping undecodable task row");
                    scan.undecodable.push((id, e.to_string()));
                }
            }
        }
        Ok(scan)
    }
}

/// SQL and parameters selecting `filter`, or `None` when nothing can match.
fn select_for(filter: TaskFilter) -> Option<(String, Vec<Value>)> {
    match filter {
        TaskFilter::All => Some((format!("{} {}", SELECT_TASKS, ORDER_NEWEST), vec![])),
        TaskFilter::Owner(owner) => Some((format!("{} {} {}", SELECT_TASKS, WHERE_OWNER, ORDER_NEWEST), vec![Value::Text(owner)])),
        TaskFilter::ByIds(ids) if ids.is_empty() => None,
        TaskFilter::ByIds(ids) => Some((
            format!("{} {} ({}) {}", SELECT_TASKS, WHERE_ID, vec!["?"; ids.len()].join(", "), ORDER_NEWEST),
            ids.into_iter().map(Value::Integer).collect(),
        )),
    }
}

impl TaskStore for Tasks {
    fn list_tasks_for_user(&self, owner: &str) -> Result<Vec<Task>> {
        self.fetch(TaskFilter::Owner(owner.to_string()))
    }

    fn list_all_tasks(&self) -> Result<Vec<Task>> {
        self.fetch(TaskFilter::All)
    }

    fn scan_all_tasks(&self) -> Result<TaskScan> {
        self.scan(TaskFilter::All)
    }

    fn scan_tasks_for_user(&self, owner: &str) -> Result<TaskScan> {
        self.scan(TaskFilter::Owner(owner.to_string()))
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.fetch(TaskFilter::ByIds(vec![id]))?.into_iter().next())
    }

    fn insert_task(&self, task: NewTask, now: DateTime<Utc>) -> Result<Task> {
        let mut task = task.into_task(now);
        let (category, due_date) = encode_schedule(&task.schedule);
        self.conn.execute(
            INSERT_TASK,
            params![
                task.owner,
                task.title,
                task.description,
                task.completed,
                task.completed_at.map(|t| t.timestamp_millis()),
                task.priority.as_str(),
                category,
                due_date,
                task.due_time,
                task.is_recurring,
                task.recurring_pattern.map(|p| p.as_str()),
                task.created_at.timestamp_millis(),
                task.updated_at.timestamp_millis(),
            ],
        )?;
        task.id = Some(self.conn.last_insert_rowid());
        Ok(task)
    }

    fn delete_task(&self, id: TaskId) -> Result<bool> {
        Ok(self.conn.execute(DELETE_TASK, params![id])? > 0)
    }

    fn patch_task(&self, id: TaskId, patch: &TaskPatch) -> Result<bool> {
        let (assignments, mut values) = patch_assignments(patch);
        if assignments.is_empty() {
            return Ok(self.get_task(id)?.is_some());
        }

        values.push(Value::Integer(id));
        let sql = format!("UPDATE tasks SET {} WHERE id = ?", assignments.join(", "));
        Ok(self.conn.execute(&sql, params_from_iter(values.iter()))? > 0)
    }

    fn delete_all_for_user(&self, owner: &str) -> Result<usize> {
        Ok(self.conn.execute(DELETE_FOR_OWNER, params![owner])?)
    }
}

fn patch_assignments(patch: &TaskPatch) -> (Vec<&'static str>, Vec<Value>) {
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    if let Some(title) = &patch.title {
        assignments.push("title = ?");
        values.push(Value::Text(title.trim().to_string()));
    }
    if let Some(description) = &patch.description {
        assignments.push("description = ?");
        values.push(optional_text(description.clone()));
    }
    if let Some(priority) = patch.priority {
        assignments.push("priority = ?");
        values.push(Value::Text(priority.as_str().to_string()));
    }
    if let Some(schedule) = &patch.schedule {
        let (category, due_date) = encode_schedule(schedule);
        assignments.push("category = ?");
        values.push(optional_text(category.map(str::to_string)));
        assignments.push("due_date = ?");
        values.push(due_date.map(Value::Integer).unwrap_or(Value::Null));
    }
    if let Some(due_time) = &patch.due_time {
        assignments.push("due_time = ?");
        values.push(optional_text(due_time.clone()));
    }
    if let Some(is_recurring) = patch.is_recurring {
        assignments.push("is_recurring = ?");
        values.push(Value::Integer(is_recurring as i64));
    }
    if let Some(pattern) = patch.recurring_pattern {
        assignments.push("recurring_pattern = ?");
        values.push(optional_text(pattern.map(|p| p.as_str().to_string())));
    }
    if let Some(completed) = patch.completed {
        assignments.push("completed = ?");
        values.push(Value::Integer(completed as i64));
    }
    if let Some(completed_at) = patch.completed_at {
        assignments.push("completed_at = ?");
        values.push(completed_at.map(|t| Value::Integer(t.timestamp_millis())).unwrap_or(Value::Null));
    }
    if let Some(updated_at) = patch.updated_at {
        assignments.push("updated_at = ?");
        values.push(Value::Integer(updated_at.timestamp_millis()));
    }

    (assignments, values)
}

fn optional_text(value: Option<String>) -> Value {
    value.map(Value::Text).unwrap_or(Value::Null)
}

/// Splits a schedule into its `category` and `due_date` column values.
fn encode_schedule(schedule: &Schedule) -> (Option<&'static str>, Option<i64>) {
    let category = schedule.category().map(|c| c.as_str());
    let due_date = match schedule {
        Schedule::Uncategorized { due } | Schedule::Daily { due } => due.map(|d| d.timestamp_millis()),
        Schedule::Weekly { weekday } => weekday.map(weekday_ordinal),
        Schedule::Monthly { day } => day.map(i64::from),
    };
    (category, due_date)
}

fn decode_schedule(id: TaskId, category: Option<Category>, due_date: Option<i64>) -> Option<Schedule> {
    let due = match (category, due_date) {
        (None | Some(Category::Daily), Some(ms)) => Some(millis_to_instant(ms)?),
        _ => None,
    };
    let schedule = match category {
        None => Schedule::Uncategorized { due },
        Some(Category::Daily) => Schedule::Daily { due },
        Some(Category::Weekly) => Schedule::Weekly {
            weekday: due_date.and_then(|ordinal| {
                let weekday = weekday_from_ordinal(ordinal);
                if weekday.is_none() {
                    warn!(task_id = id, ordinal, "ignoring out-of-range weekly due date");
                }
                weekday
            }),
        },
        Some(Category::Monthly) => Schedule::Monthly {
            day: due_date.and_then(|day| {
                if (1..=31).contains(&day) {
                    Some(day as u32)
                } else {
                    warn!(task_id = id, day, "ignoring out-of-range monthly due date");
                    None
                }
            }),
        },
    };
    Some(schedule)
}

fn millis_to_instant(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

fn conversion_error(column: usize, ty: Type, error: TaskError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(error))
}

fn instant_column(row: &Row, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(column)?;
    millis_to_instant(ms).ok_or_else(|| conversion_error(column, Type::Integer, TaskError::Backend(format!("timestamp {} out of range", ms))))
}

fn optional_instant_column(row: &Row, column: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match row.get::<_, Option<i64>>(column)? {
        Some(_) => instant_column(row, column).map(Some),
        None => Ok(None),
    }
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let id: TaskId = row.get(0)?;
    let priority: Priority = row.get::<_, String>(6)?.parse().map_err(|e| conversion_error(6, Type::Text, e))?;
    let category: Option<Category> = row
        .get::<_, Option<String>>(7)?
        .map(|c| c.parse())
        .transpose()
        .map_err(|e| conversion_error(7, Type::Text, e))?;
    let due_date: Option<i64> = row.get(8)?;
    let schedule = decode_schedule(id, category, due_date)
        .ok_or_else(|| conversion_error(8, Type::Integer, TaskError::Backend(format!("due date of task {} out of range", id))))?;
    let recurring_pattern: Option<Category> = row
        .get::<_, Option<String>>(11)?
        .map(|c| c.parse())
        .transpose()
        .map_err(|e| conversion_error(11, Type::Text, e))?;

    Ok(Task {
        id: Some(id),
        owner: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
        completed_at: optional_instant_column(row, 5)?,
        priority,
        schedule,
        due_time: row.get(9)?,
        is_recurring: row.get(10)?,
        recurring_pattern,
        created_at: instant_column(row, 12)?,
        updated_at: instant_column(row, 13)?,
    })
}
