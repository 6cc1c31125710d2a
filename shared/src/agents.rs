//! Bedrock agent client for the holiday agent.

use aws_sdk_bedrockagentruntime::types::ResponseStream;
use aws_sdk_bedrockagentruntime::Client as BedrockAgentClient;
use tracing::info;

use crate::{Error, Result};

/// Reply used when the agent runtime returns an empty completion.
const FALLBACK_REPLY: &str =
    "I am the Holiday Reminder Agent with memory. How can I help you with holiday information?";

/// Client for invoking the holiday agent.
///
/// The agent runtime owns conversational memory; the caller's thread ID is
/// passed through as the session ID so multi-turn context is preserved.
pub struct AgentClient {
    client: BedrockAgentClient,
    agent_id: String,
    agent_alias_id: String,
}

impl AgentClient {
    /// Create a new agent client.
    pub fn new(client: BedrockAgentClient, agent_id: String, agent_alias_id: String) -> Self {
        Self {
            client,
            agent_id,
            agent_alias_id,
        }
    }

    /// Generate a reply to `message` within the given memory session.
    pub async fn generate(&self, message: &str, session_id: &str) -> Result<String> {
        let output = self
            .client
            .invoke_agent()
            .agent_id(&self.agent_id)
            .agent_alias_id(&self.agent_alias_id)
            .session_id(session_id)
            .input_text(message)
            .send()
            .await
            .map_err(|e| Error::Agent(format!("Failed to invoke agent: {}", e)))?;

        let mut completion = output.completion;
        let mut reply = String::new();

        while let Some(event) = completion
            .recv()
            .await
            .map_err(|e| Error::Agent(format!("Agent stream error: {}", e)))?
        {
            if let ResponseStream::Chunk(chunk) = event {
                if let Some(bytes) = chunk.bytes() {
                    reply.push_str(&String::from_utf8_lossy(bytes.as_ref()));
                }
            }
        }

        info!(session_id = %session_id, reply_len = reply.len(), "Agent reply generated");

        if reply.is_empty() {
            return Ok(FALLBACK_REPLY.to_string());
        }
        Ok(reply)
    }
}
