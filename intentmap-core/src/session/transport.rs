use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One user turn sent to a test endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Simulated sender; bypass rules key off it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestReply {
    pub response: String,
    pub session_id: Option<String>,
    pub agent_used: Option<String>,
    pub domain: Option<String>,
    pub intent: Option<String>,
}

/// Delivers test messages to whatever backend answers them.
#[async_trait]
pub trait TestTransport: Send + Sync {
    async fn send(&self, request: TestRequest) -> Result<TestReply>;
}
