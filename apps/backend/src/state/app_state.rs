use std::sync::Arc;

use crate::config::server::ServerConfig;
use crate::services::identity::IdentityRegistry;
use crate::services::rooms::registry::{RoomRegistry, RoomTimings};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Live rooms
    pub rooms: Arc<RoomRegistry>,
    /// Player identities by reconnect token
    pub identities: Arc<IdentityRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new AppState with empty registries
    pub fn new(config: ServerConfig) -> Self {
        Self {
            rooms: Arc::new(RoomRegistry::new(RoomTimings::from(&config))),
            identities: Arc::new(IdentityRegistry::new()),
            config: Arc::new(config),
        }
    }
}
