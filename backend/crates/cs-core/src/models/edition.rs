use crate::{CoreError, Result as CoreErrorResult};

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Server product variant. Fixed when an instance is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Bedrock,
    Java,
}

impl Edition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bedrock => "bedrock",
            Self::Java => "java",
        }
    }

    /// Port the edition's clients try first.
    pub fn conventional_port(&self) -> u16 {
        match self {
            Self::Bedrock => 19132,
            Self::Java => 25565,
        }
    }
}

impl FromStr for Edition {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bedrock" => Ok(Self::Bedrock),
            "java" => Ok(Self::Java),
            _ => Err(CoreError::invalid_value("edition", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Edition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Edition::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Edition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
