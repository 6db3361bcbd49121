//! Foreground sweep watcher.
//!
//! Runs the purge pass and the recurrence pass on two independent
//! intervals until SIGINT or SIGTERM (Ctrl+C on Windows). Both intervals
//! fire once right at startup. The store sits behind a mutex that is held
//! only for the duration of one pass. Passes do blocking SQLite work, so on
//! a multi-thread runtime they run through `block_in_place` and the
//! worker's other tasks move to another thread meanwhile.
//!
//! ```text
//!  deletion interval ──tick──▶ purge_tick ──▶ Sweeper::purge_expired ──▶ sweep_runs
//!  recurrence interval ─tick─▶ reset_tick ──▶ Sweeper::reset_recurring ─▶ sweep_runs
//!  signal ───────────────────▶ shutdown
//! ```

use crate::db::sweep_runs::{SweepKind, SweepRuns};
use crate::db::tasks::Tasks;
use crate::libs::config::{Config, SweepConfig};
use crate::libs::expiration::ExpirationEngine;
use crate::libs::messages::Message;
use crate::libs::store::TaskStore;
use crate::libs::sweep::{SweepReport, Sweeper};
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::future::Future;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Runs the watcher against the default database until a shutdown signal.
pub async fn run_with_signal_handling(config: &Config) -> Result<()> {
    let engine = config.engine()?;
    let store = Mutex::new(Tasks::new()?);
    let history = SweepRuns::new()?;

    for kind in [SweepKind::Purge, SweepKind::Reset] {
        match history.last_run(kind)? {
            Some(ran_at) => info!(%kind, %ran_at, "previous sweep"),
            None => info!(%kind, "no previous sweep recorded"),
        }
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::WatcherSignalHandlerFailed(e.to_string()));
                    let _ = shutdown_tx.send(());
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
                Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
        // Keep the sender alive so the watcher runs until the process is killed.
        std::mem::forget(shutdown_tx);
    }

    run_loop(&store, Some(&history), engine, &config.sweep, async {
        let _ = shutdown_rx.await;
    })
    .await;
    Ok(())
}

/// Drives both passes until `shutdown` completes.
pub async fn run_loop<S, F>(store: &Mutex<S>, history: Option<&SweepRuns>, engine: ExpirationEngine, sweep: &SweepConfig, shutdown: F)
where
    S: TaskStore + ?Sized,
    F: Future<Output = ()>,
{
    let mut deletion = interval(sweep.deletion_interval());
    let mut recurrence = interval(sweep.recurrence_interval());
    deletion.set_missed_tick_behavior(MissedTickBehavior::Skip);
    recurrence.set_missed_tick_behavior(MissedTickBehavior::Skip);

    msg_info!(Message::WatcherStarted {
        deletion_hours: sweep.deletion_interval_hours,
        recurrence_hours: sweep.recurrence_interval_hours,
    });

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                msg_info!(Message::WatcherShuttingDown);
                break;
            }
            _ = deletion.tick() => {
                run_blocking(|| purge_tick(store, history, &engine, Utc::now()));
            }
            _ = recurrence.tick() => {
                run_blocking(|| reset_tick(store, history, &engine, Utc::now()));
            }
        }
    }
}

/// Runs `pass` off the async worker when the runtime allows it. A
/// current-thread runtime cannot hand its worker off, so there the pass runs
/// inline.
pub fn run_blocking<T>(pass: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => tokio::task::block_in_place(pass),
        _ => pass(),
    }
}

/// One purge pass. A pass that cannot list the tasks is reported and
/// yields `None`; the next tick tries again.
pub fn purge_tick<S: TaskStore + ?Sized>(
    store: &Mutex<S>,
    history: Option<&SweepRuns>,
    engine: &ExpirationEngine,
    now: DateTime<Utc>,
) -> Option<SweepReport> {
    let result = {
        let store = store.lock();
        Sweeper::new(&*store, *engine).purge_expired(now)
    };

    match result {
        Ok(report) => {
            report_failures(&report);
            record(history, SweepKind::Purge, &report, now);
            msg_info!(Message::SweepPurgeCompleted {
                examined: report.examined,
                deleted: report.deleted,
                failed: report.failed,
            });
            Some(report)
        }
        Err(e) => {
            msg_error!(Message::SweepPassFailed(e.to_string()));
            None
        }
    }
}

/// One recurrence pass.
pub fn reset_tick<S: TaskStore + ?Sized>(
    store: &Mutex<S>,
    history: Option<&SweepRuns>,
    engine: &ExpirationEngine,
    now: DateTime<Utc>,
) -> Option<SweepReport> {
    let result = {
        let store = store.lock();
        Sweeper::new(&*store, *engine).reset_recurring(now)
    };

    match result {
        Ok(report) => {
            report_failures(&report);
            record(history, SweepKind::Reset, &report, now);
            msg_info!(Message::SweepResetCompleted {
                examined: report.examined,
                reset: report.reset,
                failed: report.failed,
            });
            Some(report)
        }
        Err(e) => {
            msg_error!(Message::SweepPassFailed(e.to_string()));
            None
        }
    }
}

fn report_failures(report: &SweepReport) {
    for (id, error) in &report.errors {
        msg_warning!(Message::SweepTaskFailed(*id, error.clone()));
    }
}

fn record(history: Option<&SweepRuns>, kind: SweepKind, report: &SweepReport, now: DateTime<Utc>) {
    if let Some(history) = history {
        if let Err(e) = history.record(kind, report, now) {
            msg_warning!(Message::SweepPassFailed(e.to_string()));
        }
    }
}
