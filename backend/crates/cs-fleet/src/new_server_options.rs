use cs_core::Edition;

/// Caller choices for [`FleetManager::add_new`](crate::FleetManager::add_new).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewServerOptions {
    pub edition: Edition,
    /// First port to try; the edition default when absent
    pub port: Option<u16>,
    /// Java heap limit; the fleet default when absent
    pub max_memory_mb: Option<u32>,
}

impl NewServerOptions {
    pub fn new(edition: Edition) -> Self {
        Self {
            edition,
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_max_memory_mb(mut self, max_memory_mb: u32) -> Self {
        self.max_memory_mb = Some(max_memory_mb);
        self
    }
}
