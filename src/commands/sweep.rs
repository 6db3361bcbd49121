use crate::{
    db::{
        sweep_runs::{SweepKind, SweepRuns},
        tasks::Tasks,
    },
    libs::{
        config::Config,
        messages::Message,
        operations,
        sweep::{SweepReport, Sweeper},
    },
    msg_success, msg_warning,
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Only delete expired tasks
    #[arg(long, conflicts_with = "reset")]
    purge: bool,
    /// Only reset completed recurring tasks
    #[arg(long)]
    reset: bool,
    /// Limit the purge to one owner's tasks
    #[arg(short, long, conflicts_with = "reset")]
    user: Option<String>,
}

pub fn cmd(args: SweepArgs) -> Result<()> {
    let config = Config::read()?;
    let engine = config.engine()?;
    let store = Tasks::new()?;
    let now = Utc::now();

    if let Some(owner) = args.user {
        let report = operations::purge_expired_for_user(&store, &engine, &owner, now)?;
        print_purge(&report);
        return Ok(());
    }

    let history = SweepRuns::new()?;
    let sweeper = Sweeper::new(&store, engine);

    if !args.reset {
        let report = sweeper.purge_expired(now)?;
        history.record(SweepKind::Purge, &report, now)?;
        print_purge(&report);
    }
    if !args.purge {
        let report = sweeper.reset_recurring(now)?;
        history.record(SweepKind::Reset, &report, now)?;
        print_failures(&report);
        msg_success!(Message::SweepResetCompleted {
            examined: report.examined,
            reset: report.reset,
            failed: report.failed,
        });
    }
    Ok(())
}

fn print_purge(report: &SweepReport) {
    print_failures(report);
    msg_success!(Message::SweepPurgeCompleted {
        examined: report.examined,
        deleted: report.deleted,
        failed: report.failed,
    });
}

fn print_failures(report: &SweepReport) {
    for (id, error) in &report.errors {
        msg_warning!(Message::SweepTaskFailed(*id, error.clone()));
    }
}
