use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Enabled with an enabled agent mapping.
    Active,
    /// Disabled, or mapped through a disabled mapping.
    Idle,
    /// Enabled but not mapped to any agent.
    Unused,
}

impl IntentStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Idle, Self::Unused];

    /// `mapping_enabled` is `None` when the intent has no mapping.
    pub fn derive(intent_enabled: bool, mapping_enabled: Option<bool>) -> Self {
        match (intent_enabled, mapping_enabled) {
            (false, _) | (true, Some(false)) => Self::Idle,
            (true, None) => Self::Unused,
            (true, Some(true)) => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Unused => "unused",
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "idle" => Ok(Self::Idle),
            "unused" => Ok(Self::Unused),
            other => Err(Error::Validation(format!(
                "unknown intent status '{other}' (expected active, idle or unused)"
            ))),
        }
    }
}
