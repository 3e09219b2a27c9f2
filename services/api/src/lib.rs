mod cli;
mod extract;
mod infra;
mod routes;
mod scripts;
mod server;

use jobmatch::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
