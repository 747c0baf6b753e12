use log::info;
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::env;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::db::monitor::ConnectionMonitor;
use crate::db::options::CONNECTION_OPTIONS;

pub const MONGO_URI_VAR: &str = "MONGO_URI";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("configuration error: {0}")]
    Configuration(&'static str),
    #[error(transparent)]
    Connection(#[from] mongodb::error::Error),
}

impl DbError {
    /// Startup cannot continue without the database, whatever the cause.
    pub fn exit_status(&self) -> u8 {
        match self {
            DbError::Configuration(_) | DbError::Connection(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    uri: Option<String>,
}

impl DatabaseConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: Some(uri.into()) }
    }

    pub fn from_env() -> Self {
        Self { uri: env::var(MONGO_URI_VAR).ok() }
    }

    pub fn uri(&self) -> Result<&str, DbError> {
        match self.uri.as_deref() {
            Some(uri) if !uri.is_empty() => Ok(uri),
            _ => Err(DbError::Configuration("MONGO_URI not defined in environment")),
        }
    }
}

/// The part of the driver that opens connections.
pub trait Driver {
    fn connect(
        &self,
        options: ClientOptions,
    ) -> impl Future<Output = Result<Client, mongodb::error::Error>> + Send;
}

pub struct MongoDriver;

impl Driver for MongoDriver {
    async fn connect(&self, options: ClientOptions) -> Result<Client, mongodb::error::Error> {
        let client = Client::with_options(options)?;

        // Client construction is lazy; the ping waits for server selection.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;

        Ok(client)
    }
}

/// Owned handle to the process's database connection.
pub struct Connection {
    client: Client,
    monitor: Arc<ConnectionMonitor>,
}

impl Connection {
    /// The database named in the connection string, if it names one.
    pub fn database(&self) -> Option<mongodb::Database> {
        self.client.default_database()
    }

    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}

pub async fn init_database() -> Result<Connection, DbError> {
    connect(&MongoDriver, &DatabaseConfig::from_env()).await
}

pub async fn connect<D: Driver>(driver: &D, config: &DatabaseConfig) -> Result<Connection, DbError> {
    let uri = config.uri()?;

    let mut client_options = ClientOptions::parse(uri).await?;
    CONNECTION_OPTIONS.apply(&mut client_options);

    let monitor = Arc::new(ConnectionMonitor::new());
    client_options.sdam_event_handler = Some(monitor.clone());

    let client = driver.connect(client_options).await?;

    monitor.arm();
    info!("MongoDB connected successfully");

    Ok(Connection { client, monitor })
}
