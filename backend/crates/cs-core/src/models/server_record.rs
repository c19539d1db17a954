//! Fleet manifest entry.

use crate::{CoreError, Edition, Result as CoreErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// One persisted fleet member. The manifest is the only durable record of
/// which servers exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: u32,
    #[serde(default)]
    pub edition: Edition,
    pub port: u16,
    /// Java heap limit; absent for Bedrock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory_mb: Option<u32>,
}

impl ServerRecord {
    pub fn new(id: u32, edition: Edition, port: u16, max_memory_mb: Option<u32>) -> Self {
        let max_memory_mb = match edition {
            Edition::Java => max_memory_mb,
            Edition::Bedrock => None,
        };

        Self {
            id,
            edition,
            port,
            max_memory_mb,
        }
    }

    /// Parse an untrusted id (e.g. a path segment) into a server id.
    #[track_caller]
    pub fn parse_id(value: &str) -> CoreErrorResult<u32> {
        match value.trim().parse::<u32>() {
            Ok(id) => Ok(id),
            Err(_) => Err(CoreError::InvalidId {
                value: value.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
