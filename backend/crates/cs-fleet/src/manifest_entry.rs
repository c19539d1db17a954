//! Decoding of individual manifest entries.
//!
//! Current entries are objects matching [`ServerRecord`]. Older manifests
//! stored `[id, {"config": {"port": n}}]` or `[id, {"port": n}]` pairs.

use cs_core::{Edition, ServerRecord};

use serde_json::Value;

/// A manifest entry before a port has been reserved for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: u32,
    pub edition: Edition,
    pub port: Option<u16>,
    pub max_memory_mb: Option<u32>,
}

impl ManifestEntry {
    /// Decode one entry. `None` when the entry has no usable numeric id.
    pub fn decode(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => Self::decode_object(value),
            Value::Array(pair) => Self::decode_legacy(pair),
            _ => None,
        }
    }

    /// Fields are read one by one. A badly typed field falls back to its
    /// default; only an unusable id drops the entry.
    fn decode_object(value: &Value) -> Option<Self> {
        let id = Self::decode_id(value.get("id")?)?;
        let edition = value
            .get("edition")
            .and_then(Value::as_str)
            .and_then(|e| e.parse().ok())
            .unwrap_or_default();

        Some(Self {
            id,
            edition,
            port: value.get("port").and_then(Self::decode_port),
            max_memory_mb: value
                .get("maxMemoryMb")
                .and_then(Value::as_u64)
                .and_then(|mb| u32::try_from(mb).ok()),
        })
    }

    fn decode_legacy(pair: &[Value]) -> Option<Self> {
        let id = Self::decode_id(pair.first()?)?;
        let port = pair.get(1).and_then(|details| {
            details
                .get("config")
                .and_then(|config| config.get("port"))
                .or_else(|| details.get("port"))
                .and_then(Self::decode_port)
        });

        Some(Self {
            id,
            edition: Edition::Bedrock,
            port,
            max_memory_mb: None,
        })
    }

    fn decode_port(value: &Value) -> Option<u16> {
        value.as_u64().and_then(|port| u16::try_from(port).ok())
    }

    /// Ids are numbers, or numeric strings in hand-edited manifests.
    fn decode_id(value: &Value) -> Option<u32> {
        match value {
            Value::Number(n) => n.as_u64().and_then(|id| u32::try_from(id).ok()),
            Value::String(s) => ServerRecord::parse_id(s).ok(),
            _ => None,
        }
    }
}
