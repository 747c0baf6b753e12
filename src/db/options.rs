use mongodb::options::ClientOptions;
use std::time::Duration;

/// Fixed driver tuning for Azure Cosmos DB's MongoDB API.
///
/// A buffer limit of 0 is implied as well: the Rust driver never queues
/// operations client-side, so there is nothing to disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub retry_writes: bool,
    pub max_pool_size: u32,
    pub server_selection_timeout: Duration,
    pub socket_idle_timeout: Duration,
}

pub const CONNECTION_OPTIONS: ConnectionOptions = ConnectionOptions {
    retry_writes: false, // Cosmos DB rejects retryable writes
    max_pool_size: 10,
    server_selection_timeout: Duration::from_millis(5000),
    socket_idle_timeout: Duration::from_millis(45000),
};

impl ConnectionOptions {
    /// Overrides whatever the URI asked for.
    pub fn apply(&self, options: &mut ClientOptions) {
        options.retry_writes = Some(self.retry_writes);
        options.max_pool_size = Some(self.max_pool_size);
        options.server_selection_timeout = Some(self.server_selection_timeout);
        options.max_idle_time = Some(self.socket_idle_timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_values_win_over_uri() {
        let mut options = ClientOptions::parse(
            "mongodb://localhost:27017/?retryWrites=true&maxPoolSize=50&serverSelectionTimeoutMS=100&maxIdleTimeMS=1",
        )
        .await
        .unwrap();

        CONNECTION_OPTIONS.apply(&mut options);

        assert_eq!(options.retry_writes, Some(false));
        assert_eq!(options.max_pool_size, Some(10));
        assert_eq!(options.server_selection_timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.max_idle_time, Some(Duration::from_secs(45)));
    }

    #[test]
    fn record_is_frozen() {
        assert_eq!(
            CONNECTION_OPTIONS,
            ConnectionOptions {
                retry_writes: false,
                max_pool_size: 10,
                server_selection_timeout: Duration::from_millis(5000),
                socket_idle_timeout: Duration::from_millis(45000),
            }
        );
    }
}
