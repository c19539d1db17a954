use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of one server instance.
///
/// Serialized as the numeric codes the management console expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServerStatus {
    /// No start has been attempted yet
    #[default]
    Unknown,
    Running,
    /// Clean exit, crash, explicit stop or failed start
    Stopped,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Running => 1,
            Self::Stopped => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Running),
            2 => Some(Self::Stopped),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        *self == Self::Running
    }
}

impl Serialize for ServerStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for ServerStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        ServerStatus::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown server status {code}")))
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
