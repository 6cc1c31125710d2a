//! Agent API Lambda - A2A chat surface for the holiday agent.
//!
//! Endpoints:
//! - POST /a2a/agent/holidayAgent - Chat with the agent (memory-enabled)
//! - POST /a2a/agent/holidayAgent/test-memory - Memory smoke test
//! - GET /health - Health check
//! - GET /agent/info - Agent metadata
//! - GET / - Service banner

use chrono::Utc;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use shared::cors::CorsPolicy;
use shared::http::{error_response, json_response, ErrorBody};
use shared::{parse_body, A2aRequest, A2aResponse, AgentClient, ChatMessage, Config, MemoryInfo};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const SERVICE_NAME: &str = "Holiday Reminder Agent with Memory";
const SERVICE_VERSION: &str = "2.0.0";

/// Memory test request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestMemoryRequest {
    user_id: Option<String>,
    thread_id: Option<String>,
    message: Option<String>,
}

/// Memory test response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TestMemoryResponse {
    message: String,
    response: String,
    memory_context: MemoryInfo,
}

/// Application state
struct AppState {
    agent_client: AgentClient,
    cors: CorsPolicy,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let bedrock_client = aws_sdk_bedrockagentruntime::Client::new(&aws_config);

        let config = Config::from_env().map_err(|_| "AGENT_ID not set")?;

        Ok(Self {
            agent_client: AgentClient::new(
                bedrock_client,
                config.agent_id.clone(),
                config.agent_alias_id.clone(),
            ),
            cors: CorsPolicy::new(config.frontend_url),
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str().to_string();
    let raw_path = event.uri().path().to_string();
    // Strip /api stage prefix if present (API Gateway REST API includes stage in path)
    let path = raw_path
        .strip_prefix("/api")
        .unwrap_or(&raw_path)
        .to_string();

    let origin = event
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    info!("Agent request: {} {}", method, path);

    if method == "OPTIONS" {
        return Ok(state.cors.preflight(origin.as_deref()));
    }

    let response = route(&state, &method, &path, &event).await?;
    Ok(state.cors.apply(response, origin.as_deref()))
}

async fn route(
    state: &AppState,
    method: &str,
    path: &str,
    event: &Request,
) -> Result<Response<Body>, Error> {
    match (method, path) {
        ("POST", "/a2a/agent/holidayAgent") => {
            let request: A2aRequest = parse_body!(event.body());

            let Some(latest) = request.messages.last() else {
                return error_response(400, "Invalid messages format");
            };

            info!(content = %latest.content, "Processing A2A message");

            let resource_id = request
                .user_id
                .unwrap_or_else(|| format!("user-{}", Uuid::new_v4()));
            let thread_id = request
                .thread_id
                .unwrap_or_else(|| format!("thread-{}", Uuid::new_v4()));

            info!(resource_id = %resource_id, thread_id = %thread_id, "Using memory session");

            match state.agent_client.generate(&latest.content, &thread_id).await {
                Ok(reply) => json_response(
                    200,
                    &A2aResponse {
                        messages: vec![ChatMessage {
                            role: "assistant".to_string(),
                            content: reply,
                        }],
                        memory_info: MemoryInfo {
                            resource_id,
                            thread_id,
                        },
                    },
                ),
                Err(e) => {
                    error!(error = %e, "Agent invocation failed");
                    json_response(
                        500,
                        &ErrorBody::with_details("Internal server error", e.to_string()),
                    )
                }
            }
        }

        ("POST", "/a2a/agent/holidayAgent/test-memory") => {
            let request: TestMemoryRequest = parse_body!(event.body());

            let resource_id = request
                .user_id
                .unwrap_or_else(|| format!("test-user-{}", Uuid::new_v4()));
            let thread_id = request
                .thread_id
                .unwrap_or_else(|| format!("test-thread-{}", Uuid::new_v4()));
            let message = request
                .message
                .unwrap_or_else(|| "What holidays did we discuss earlier?".to_string());

            info!(resource_id = %resource_id, thread_id = %thread_id, "Testing memory session");

            match state.agent_client.generate(&message, &thread_id).await {
                Ok(reply) => json_response(
                    200,
                    &TestMemoryResponse {
                        message,
                        response: reply,
                        memory_context: MemoryInfo {
                            resource_id,
                            thread_id,
                        },
                    },
                ),
                Err(e) => {
                    error!(error = %e, "Memory test failed");
                    json_response(
                        500,
                        &ErrorBody::with_details("Memory test failed", e.to_string()),
                    )
                }
            }
        }

        ("GET", "/health") => json_response(
            200,
            &serde_json::json!({
                "status": "OK",
                "service": SERVICE_NAME,
                "version": SERVICE_VERSION,
                "features": [
                    "Memory enabled",
                    "Conversation history",
                    "Personalized responses",
                ],
                "cors": "Enabled for allowed origins",
            }),
        ),

        ("GET", "/agent/info") => json_response(
            200,
            &serde_json::json!({
                "name": "holiday_reminder_agent",
                "description": "Provides holiday information with memory using an external API and a hosted agent runtime",
                "version": SERVICE_VERSION,
                "endpoints": {
                    "a2a": "/a2a/agent/holidayAgent",
                    "memoryTest": "/a2a/agent/holidayAgent/test-memory",
                    "health": "/health",
                    "info": "/agent/info",
                },
                "features": [
                    "Conversation memory",
                    "Personalized responses",
                    "Multi-turn context",
                    "Reminder system",
                    "External holiday API",
                    "CORS enabled",
                ],
            }),
        ),

        ("GET", "/") => json_response(
            200,
            &serde_json::json!({
                "message": "Holiday Reminder Agent API",
                "status": "running",
                "timestamp": Utc::now().to_rfc3339(),
                "endpoints": {
                    "a2a": "/a2a/agent/holidayAgent",
                    "health": "/health",
                    "info": "/agent/info",
                    "memoryTest": "/a2a/agent/holidayAgent/test-memory",
                },
                "cors": "Enabled for allowed domains",
            }),
        ),

        _ => error_response(404, format!("No route for {} {}", method, path)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
