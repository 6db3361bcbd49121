//! Text of every [`Message`].
//!
//! Keeping all wording in one `match` means commands, the daemon and error
//! paths never format user-facing strings inline.

use super::types::Message;
use crate::libs::config::INTERVAL_HOURS;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(id) => format!("Task #{} created.", id),
            Message::TaskUpdated(id) => format!("Task #{} updated.", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted.", id),
            Message::TaskCompleted(id) => format!("Task #{} marked as completed.", id),
            Message::TaskReopened(id) => format!("Task #{} marked as not completed.", id),
            Message::TasksDeletedCount(count) => format!("Deleted {} task(s).", count),
            Message::TasksHeader(title) => format!("Tasks: {}", title),
            Message::NoTasksFound => "No tasks found.".to_string(),
            Message::NoChangesDetected => "No changes detected.".to_string(),
            Message::ConfirmClearAll(count) => format!("Delete all {} task(s)? This cannot be undone.", count),
            Message::OperationCancelled => "Operation cancelled.".to_string(),
            Message::TaskDetailHeader(id) => format!("Task #{}", id),

            // === EXPIRATION MESSAGES ===
            Message::ExpiringTasksHeader => "Tasks expiring soon:".to_string(),
            Message::NoTasksExpiring => "No tasks are about to expire.".to_string(),
            Message::ExpiredTasksHeader => "Expired tasks awaiting deletion:".to_string(),
            Message::NoExpiredTasks => "No expired tasks.".to_string(),
            Message::TaskExpiresIn(hours) => format!("Deleted in {}h", hours),
            Message::TaskNeverExpires => "Recurring, never expires".to_string(),
            Message::TaskExpired => "Expired".to_string(),

            // === INPUT MESSAGES ===
            Message::InvalidDueDate(input) => format!("Invalid due date '{}', expected YYYY-MM-DD.", input),
            Message::InvalidDueTime(input) => format!("Invalid due time '{}', expected e.g. '2:30 PM' or '14:30'.", input),
            Message::InvalidWeekday(value) => format!("Invalid weekday {}, expected 0 (Sunday) to 6 (Saturday).", value),
            Message::DueArgsConflict(details) => format!("Conflicting due arguments: {}", details),
            Message::NoOwnerConfigured => "No owner given and no default owner configured.".to_string(),

            // === STATS MESSAGES ===
            Message::StatsHeader(owner) => format!("Statistics for {}", owner),

            // === SWEEP MESSAGES ===
            Message::SweepPurgeCompleted { examined, deleted, failed } => format!(
                "Expiration sweep: examined {}, deleted {}, failed {}.",
                examined, deleted, failed
            ),
            Message::SweepResetCompleted { examined, reset, failed } => format!(
                "Recurrence sweep: examined {}, reset {}, failed {}.",
                examined, reset, failed
            ),
            Message::SweepTaskFailed(id, error) => format!("Sweep could not process task #{}: {}", id, error),
            Message::SweepPassFailed(error) => format!("Sweep pass failed: {}", error),
            Message::SweepHistoryHeader => "Recent sweeps:".to_string(),
            Message::NoSweepHistory => "No sweeps recorded yet.".to_string(),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted {
                deletion_hours,
                recurrence_hours,
            } => format!(
                "Watcher started: expiration sweep every {}h, recurrence sweep every {}h.",
                deletion_hours, recurrence_hours
            ),
            Message::WatcherReceivedSigterm => "Received SIGTERM, shutting down...".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT, shutting down...".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl+C, shutting down...".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform.".to_string(),
            Message::WatcherShuttingDown => "Watcher stopped.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved.".to_string(),
            Message::ConfigModuleEngine => "Expiration engine".to_string(),
            Message::ConfigModuleSweep => "Sweep schedule".to_string(),
            Message::ConfigModuleOwner => "Default owner".to_string(),
            Message::ConfigInvalidUtcOffset(minutes) => {
                format!("UTC offset of {} minutes is out of range (-840 to 840).", minutes)
            }
            Message::ConfigInvalidInterval(hours) => format!(
                "Sweep interval of {}h is invalid, it must be between {}h and {}h.",
                hours,
                INTERVAL_HOURS.start(),
                INTERVAL_HOURS.end()
            ),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptUtcOffset => "Day boundary offset from UTC, in minutes".to_string(),
            Message::PromptDeletionInterval => "Hours between expiration sweeps".to_string(),
            Message::PromptRecurrenceInterval => "Hours between recurrence sweeps".to_string(),
            Message::PromptDefaultOwner => "Default task owner".to_string(),
        };
        write!(f, "{}", s)
    }
}
