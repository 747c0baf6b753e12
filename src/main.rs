mod db;

use dotenv::dotenv;
use log::{error, info};
use std::io;
use std::process::ExitCode;

use crate::db::init_database;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let connection = match init_database().await {
        Ok(connection) => connection,
        Err(err) => {
            error!("DB connection error: {}", err);
            return ExitCode::from(err.exit_status());
        }
    };

    if let Some(database) = connection.database() {
        info!("Using database {}", database.name());
    }

    let status = shutdown_status(tokio::signal::ctrl_c().await);

    let monitor = connection.monitor();
    info!(
        "Shutting down after {} connection errors and {} disconnects",
        monitor.errors_observed(),
        monitor.disconnects_observed()
    );
    connection.shutdown().await;
    ExitCode::from(status)
}

/// Exit status once the process stops waiting for Ctrl-C.
fn shutdown_status(signal: io::Result<()>) -> u8 {
    match signal {
        Ok(()) => 0,
        Err(err) => {
            error!("Failed to listen for shutdown signal: {}", err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_exits_cleanly() {
        assert_eq!(shutdown_status(Ok(())), 0);
    }

    #[test]
    fn broken_signal_listener_exits_non_zero() {
        let err = io::Error::new(io::ErrorKind::Other, "signal driver unavailable");
        assert_eq!(shutdown_status(Err(err)), 1);
    }
}
