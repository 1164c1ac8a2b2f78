use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{timeout, Duration};

use crate::config::SessionConfig;
use crate::error::{Error, Result};

use super::transport::{TestReply, TestRequest, TestTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_used: Option<String>,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_owned(),
            timestamp: Utc::now(),
            agent_used: None,
        }
    }

    fn assistant(reply: &TestReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.response.clone(),
            timestamp: Utc::now(),
            agent_used: reply.agent_used.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    /// The optimistic user message was removed again.
    RolledBack { reason: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A single chat against a test endpoint.
///
/// Each send appends the user message before the request resolves and
/// removes it again when the request fails or times out.
#[derive(Debug, Clone)]
pub struct TestSession {
    messages: Vec<ChatMessage>,
    session_id: Option<String>,
    loading: bool,
    phone_number: Option<String>,
    target_agent: Option<String>,
    request_timeout: Duration,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl TestSession {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            messages: Vec::new(),
            session_id: None,
            loading: false,
            phone_number: None,
            target_agent: None,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    pub fn with_phone_number(mut self, phone_number: &str) -> Self {
        self.phone_number = Some(phone_number.to_owned());
        self
    }

    pub fn with_target_agent(mut self, agent_key: &str) -> Self {
        self.target_agent = Some(agent_key.to_owned());
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn send_message(
        &mut self,
        transport: &dyn TestTransport,
        content: &str,
    ) -> Result<ActionOutcome> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::Validation("message cannot be empty".to_owned()));
        }

        let request = TestRequest {
            content: content.to_owned(),
            session_id: self.session_id.clone(),
            phone_number: self.phone_number.clone(),
            target_agent: self.target_agent.clone(),
        };
        self.messages.push(ChatMessage::user(content));
        self.loading = true;

        let result = match timeout(self.request_timeout, transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Transport(format!(
                "test request timed out after {}s",
                self.request_timeout.as_secs_f64()
            ))),
        };
        self.loading = false;

        match result {
            Ok(reply) => {
                if let Some(session_id) = reply.session_id.as_deref() {
                    self.session_id = Some(session_id.to_owned());
                }
                tracing::debug!(
                    session = self.session_id.as_deref().unwrap_or("-"),
                    agent = reply.agent_used.as_deref().unwrap_or("-"),
                    "test message answered"
                );
                self.messages.push(ChatMessage::assistant(&reply));
                Ok(ActionOutcome::Success)
            }
            Err(err) => {
                self.messages.pop();
                tracing::warn!(%err, "test message rolled back");
                Ok(ActionOutcome::RolledBack {
                    reason: err.to_string(),
                })
            }
        }
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.session_id = None;
        self.loading = false;
    }
}
