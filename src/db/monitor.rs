use log::{error, info, warn};
use mongodb::event::sdam::{
    SdamEventHandler, ServerHeartbeatFailedEvent, TopologyDescription,
    TopologyDescriptionChangedEvent,
};
use mongodb::ServerType;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Logs transport errors and disconnects reported by the driver.
///
/// Registered with the client before the first connect, but stays silent
/// until [`ConnectionMonitor::arm`] is called after the initial handshake.
#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    armed: AtomicBool,
    reachable: AtomicBool,
    errors: AtomicUsize,
    disconnects: AtomicUsize,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self) {
        self.reachable.store(true, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    pub fn errors_observed(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    pub fn disconnects_observed(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn on_error(&self, server: impl Display, err: impl Display) {
        if !self.is_armed() {
            return;
        }
        self.errors.fetch_add(1, Ordering::SeqCst);
        error!("MongoDB connection error ({}): {}", server, err);
    }

    pub fn on_topology_change(&self, reachable: bool) {
        if !self.is_armed() {
            return;
        }
        let was_reachable = self.reachable.swap(reachable, Ordering::SeqCst);
        match (was_reachable, reachable) {
            (true, false) => {
                self.disconnects.fetch_add(1, Ordering::SeqCst);
                warn!("MongoDB disconnected");
            }
            (false, true) => info!("MongoDB reconnected"),
            _ => {}
        }
    }
}

fn has_reachable_server(description: &TopologyDescription) -> bool {
    description
        .servers()
        .values()
        .any(|server| !matches!(server.server_type(), ServerType::Unknown))
}

impl SdamEventHandler for ConnectionMonitor {
    fn handle_server_heartbeat_failed_event(&self, event: ServerHeartbeatFailedEvent) {
        self.on_error(&event.server_address, &event.failure);
    }

    fn handle_topology_description_changed_event(&self, event: TopologyDescriptionChangedEvent) {
        self.on_topology_change(has_reachable_server(&event.new_description));
    }
}
