use crate::scripts;
use crate::server;
use clap::{Args, Parser, Subcommand};
use jobmatch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "JobMatch API",
    about = "Run the JobMatch job-board service and its maintenance scripts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Create the configured admin account if it does not exist
    SeedAdmin,
    /// Recompute the denormalized job and company counters
    SyncApplicationsCount,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::SeedAdmin => scripts::run_seed_admin(),
        Command::SyncApplicationsCount => scripts::run_sync_applications_count(),
    }
}
