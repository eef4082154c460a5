mod cli;
mod infra;
mod query;
mod routes;
mod server;

use campus_schedule::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
