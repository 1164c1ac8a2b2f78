use serde::{Deserialize, Serialize};

use crate::layout::LayoutConstants;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub layout: LayoutConfig,
    pub session: SessionConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            with_target: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub intent: LayoutOverrides,
    pub routing: LayoutOverrides,
}

impl LayoutConfig {
    pub fn intent_constants(&self) -> LayoutConstants {
        self.intent.apply(LayoutConstants::intent_flow())
    }

    pub fn routing_constants(&self) -> LayoutConstants {
        self.routing.apply(LayoutConstants::routing_flow())
    }
}

/// Partial layout settings; unset fields keep the visualizer's own defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOverrides {
    pub column_spacing: Option<f64>,
    pub row_spacing: Option<f64>,
    pub start_x: Option<f64>,
    pub start_y: Option<f64>,
    pub group_gap: Option<f64>,
}

impl LayoutOverrides {
    pub fn apply(&self, base: LayoutConstants) -> LayoutConstants {
        LayoutConstants {
            column_spacing: self.column_spacing.unwrap_or(base.column_spacing),
            row_spacing: self.row_spacing.unwrap_or(base.row_spacing),
            start_x: self.start_x.unwrap_or(base.start_x),
            start_y: self.start_y.unwrap_or(base.start_y),
            group_gap: self.group_gap.unwrap_or(base.group_gap),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub request_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub export_version: String,
    pub paste_offset: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            export_version: "1.0".to_owned(),
            paste_offset: 50.0,
        }
    }
}
