use crate::libs::task::TaskId;

/// Every user-facing message. Text lives in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(TaskId),
    TaskUpdated(TaskId),
    TaskDeleted(TaskId),
    TaskCompleted(TaskId),
    TaskReopened(TaskId),
    TasksDeletedCount(usize),
    TasksHeader(String),
    NoTasksFound,
    NoChangesDetected,
    ConfirmClearAll(usize),
    OperationCancelled,
    TaskDetailHeader(TaskId),

    // === EXPIRATION MESSAGES ===
    ExpiringTasksHeader,
    NoTasksExpiring,
    ExpiredTasksHeader,
    NoExpiredTasks,
    TaskExpiresIn(i64),
    TaskNeverExpires,
    TaskExpired,

    // === INPUT MESSAGES ===
    InvalidDueDate(String),
    InvalidDueTime(String),
    InvalidWeekday(i64),
    DueArgsConflict(String),
    NoOwnerConfigured,

    // === STATS MESSAGES ===
    StatsHeader(String),

    // === SWEEP MESSAGES ===
    SweepPurgeCompleted { examined: usize, deleted: usize, failed: usize },
    SweepResetCompleted { examined: usize, reset: usize, failed: usize },
    SweepTaskFailed(TaskId, String),
    SweepPassFailed(String),
    SweepHistoryHeader,
    NoSweepHistory,

    // === WATCHER MESSAGES ===
    WatcherStarted { deletion_hours: u64, recurrence_hours: u64 },
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlerFailed(String),
    WatcherSignalHandlingNotSupported,
    WatcherShuttingDown,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleEngine,
    ConfigModuleSweep,
    ConfigModuleOwner,
    ConfigInvalidUtcOffset(i32),
    ConfigInvalidInterval(u64),
    PromptSelectModules,
    PromptUtcOffset,
    PromptDeletionInterval,
    PromptRecurrenceInterval,
    PromptDefaultOwner,
}
