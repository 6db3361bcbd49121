pub mod add;
pub mod args;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod expired;
pub mod expiring;
pub mod history;
pub mod init;
pub mod list;
pub mod show;
pub mod stats;
pub mod sweep;
pub mod toggle;
pub mod watch;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create a task")]
    Add(add::AddArgs),
    #[command(about = "List tasks")]
    List(list::ListArgs),
    #[command(about = "Show one task with its expiration")]
    Show(show::ShowArgs),
    #[command(about = "Mark a task completed or not completed")]
    Toggle(toggle::ToggleArgs),
    #[command(about = "Edit a task", arg_required_else_help = true)]
    Edit(edit::EditArgs),
    #[command(about = "Delete a task")]
    Delete(delete::DeleteArgs),
    #[command(about = "Delete all tasks of an owner")]
    Clear(clear::ClearArgs),
    #[command(about = "Tasks about to be deleted")]
    Expiring(expiring::ExpiringArgs),
    #[command(about = "Expired tasks awaiting the sweep")]
    Expired(expired::ExpiredArgs),
    #[command(about = "Task statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Run a sweep once")]
    Sweep(sweep::SweepArgs),
    #[command(about = "Run sweeps periodically until interrupted")]
    Watch,
    #[command(about = "Recent sweep runs")]
    History(history::HistoryArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> anyhow::Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Add(args) => add::cmd(args),
            Commands::List(args) => list::cmd(args),
            Commands::Show(args) => show::cmd(args),
            Commands::Toggle(args) => toggle::cmd(args),
            Commands::Edit(args) => edit::cmd(args),
            Commands::Delete(args) => delete::cmd(args),
            Commands::Clear(args) => clear::cmd(args),
            Commands::Expiring(args) => expiring::cmd(args),
            Commands::Expired(args) => expired::cmd(args),
            Commands::Stats(args) => stats::cmd(args),
            Commands::Sweep(args) => sweep::cmd(args),
            Commands::Watch => watch::cmd().await,
            Commands::History(args) => history::cmd(args),
        }
    }
}
