mod cli;
mod infra;
mod render;
mod routes;
mod server;

use diabetes_care::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
