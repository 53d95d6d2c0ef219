//! Service configuration.

use std::env;

/// Default workchain of the registry and its children.
pub const DEFAULT_WORKCHAIN: i8 = 0;

/// Default upper bound on an inbound body, in bag-of-cells bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;

/// Default number of undrained events kept before the oldest are dropped.
pub const DEFAULT_MAX_PENDING_EVENTS: usize = 1024;

/// Registry service configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Workchain the registry is deployed to.
    pub workchain: i8,
    /// Bodies larger than this are rejected as malformed before decoding.
    pub max_body_bytes: usize,
    /// Undrained events beyond this count evict the oldest.
    pub max_pending_events: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            workchain: DEFAULT_WORKCHAIN,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_pending_events: DEFAULT_MAX_PENDING_EVENTS,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SR_WORKCHAIN`: Workchain id (default: 0)
    /// - `SR_MAX_BODY_BYTES`: Maximum inbound body size (default: 16384)
    /// - `SR_MAX_PENDING_EVENTS`: Undrained event buffer size (default: 1024)
    ///
    /// Absent or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            workchain: lookup("SR_WORKCHAIN")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_WORKCHAIN),
            max_body_bytes: lookup("SR_MAX_BODY_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            max_pending_events: lookup("SR_MAX_PENDING_EVENTS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PENDING_EVENTS),
        }
    }

    /// Set the workchain.
    #[must_use]
    pub fn with_workchain(mut self, workchain: i8) -> Self {
        self.workchain = workchain;
        self
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Set the event buffer size.
    #[must_use]
    pub fn with_max_pending_events(mut self, max_pending_events: usize) -> Self {
        self.max_pending_events = max_pending_events;
        self
    }
}
