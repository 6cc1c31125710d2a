//! Configuration management for Lambda functions.

use std::env;

/// Default base URL for the Nager.Date public holiday API.
pub const DEFAULT_NAGER_BASE_URL: &str = "https://date.nager.at/api/v3";

/// Agent-surface configuration loaded from environment variables.
///
/// The tool Lambda reads `NAGER_BASE_URL` on its own; it has no agent
/// identifiers in its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bedrock agent ID
    pub agent_id: String,
    /// Bedrock agent alias ID
    pub agent_alias_id: String,
    /// AWS region
    pub aws_region: String,
    /// Additional allowed CORS origin (frontend deployment URL)
    pub frontend_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            agent_id: env::var("AGENT_ID")?,
            agent_alias_id: env::var("AGENT_ALIAS_ID").unwrap_or_else(|_| "TSTALIASID".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            frontend_url: env::var("FRONTEND_URL").ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_agent_id_and_defaults_the_rest() {
        env::remove_var("AGENT_ID");
        env::remove_var("AGENT_ALIAS_ID");
        assert!(Config::from_env().is_err());

        env::set_var("AGENT_ID", "AGENT123");
        let config = Config::from_env().unwrap();
        assert_eq!(config.agent_id, "AGENT123");
        assert_eq!(config.agent_alias_id, "TSTALIASID");
        env::remove_var("AGENT_ID");
    }
}
