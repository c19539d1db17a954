use crate::{BedrockConfigView, Edition, JavaConfigView};

use serde::{Deserialize, Serialize};

/// Edition specific view of an instance's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditionConfigView {
    Bedrock(BedrockConfigView),
    Java(JavaConfigView),
}

impl EditionConfigView {
    pub fn edition(&self) -> Edition {
        match self {
            Self::Bedrock(_) => Edition::Bedrock,
            Self::Java(_) => Edition::Java,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            Self::Bedrock(view) => view.port,
            Self::Java(view) => view.port,
        }
    }

    pub fn world(&self) -> Option<&str> {
        match self {
            Self::Bedrock(view) => view.world.as_deref(),
            Self::Java(view) => view.world.as_deref(),
        }
    }
}
