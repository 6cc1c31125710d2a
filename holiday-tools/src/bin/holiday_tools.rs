//! Holiday Tools Lambda - Action-group backend for the holiday agent.
//!
//! The agent runtime invokes this Lambda when the agent decides to use one of
//! its tools:
//! - get_upcoming_holidays: holidays for a country with reminder schedules
//! - get_available_countries: countries the holiday API supports
//! - setup_reminder_system: reminder totals for a country subscription
//!
//! Tool failures are reported inside the function response (REPROMPT state)
//! rather than as Lambda errors, so the agent can relay them to the user.

use chrono::{Datelike, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use shared::config::DEFAULT_NAGER_BASE_URL;
use shared::{
    total_reminders, upcoming_holidays, ComputationResult, NagerClient, ReminderSetup,
    DEFAULT_REMINDER_DAYS,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Tool invocation from the agent runtime.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolRequest {
    #[serde(default)]
    action_group: String,
    function: String,
    #[serde(default)]
    parameters: Vec<ToolParameter>,
    session_id: Option<String>,
}

/// One tool parameter (values always arrive as strings).
#[derive(Debug, Deserialize)]
struct ToolParameter {
    name: String,
    value: String,
}

/// Function-response envelope expected by the agent runtime.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolResponse {
    message_version: String,
    response: ToolResponseInner,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolResponseInner {
    action_group: String,
    function: String,
    function_response: FunctionResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_state: Option<String>,
    response_body: ResponseBody,
}

#[derive(Debug, Serialize)]
struct ResponseBody {
    #[serde(rename = "TEXT")]
    text: TextBody,
}

#[derive(Debug, Serialize)]
struct TextBody {
    body: String,
}

/// Validated country-code parameter.
#[derive(Debug, Validate)]
struct CountryQuery {
    #[validate(length(min = 2, max = 2, message = "countryCode must be a 2-letter code"))]
    country_code: String,
}

/// Application state
struct AppState {
    nager: NagerClient,
}

impl AppState {
    fn new() -> Self {
        let base_url = std::env::var("NAGER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_NAGER_BASE_URL.to_string());
        Self {
            nager: NagerClient::with_base_url(base_url),
        }
    }
}

fn param<'a>(request: &'a ToolRequest, name: &str) -> Option<&'a str> {
    request
        .parameters
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.value.as_str())
}

fn country_query(request: &ToolRequest) -> shared::Result<CountryQuery> {
    let query = CountryQuery {
        country_code: param(request, "countryCode")
            .ok_or_else(|| shared::Error::Validation("countryCode is required".to_string()))?
            .trim()
            .to_string(),
    };
    query.validate()?;
    Ok(query)
}

/// Parse a reminderDays parameter: a JSON array (`[30,10,3,2]`) or a
/// comma-separated list (`30,10,3,2`). Absent (or blank) means "use the
/// default schedule"; a present but unusable value is a validation error so
/// the agent can relay it instead of silently applying defaults.
fn parse_reminder_days(value: Option<&str>) -> shared::Result<Option<Vec<u32>>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(days) = serde_json::from_str::<Vec<u32>>(value) {
        return Ok(Some(days));
    }
    value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|s| s.trim().parse().ok())
        .collect::<Option<Vec<u32>>>()
        .map(Some)
        .ok_or_else(|| {
            shared::Error::Validation(format!(
                "reminderDays must be a list of non-negative day offsets, got '{}'",
                value
            ))
        })
}

async fn dispatch(state: &AppState, request: &ToolRequest) -> shared::Result<serde_json::Value> {
    match request.function.as_str() {
        "get_upcoming_holidays" => {
            let query = country_query(request)?;
            let now = Utc::now();
            let year = now.year();
            let today = now.date_naive();

            info!(country = %query.country_code, year, "Fetching holidays with reminder schedules");

            let records = state.nager.public_holidays(year, &query.country_code).await?;
            let holidays = upcoming_holidays(&records, today, &DEFAULT_REMINDER_DAYS);

            info!(
                country = %query.country_code,
                upcoming = holidays.len(),
                "Computed upcoming holidays"
            );

            Ok(serde_json::to_value(ComputationResult {
                holidays,
                country: query.country_code,
                year,
                reminder_schedule: DEFAULT_REMINDER_DAYS.to_vec(),
            })?)
        }

        "get_available_countries" => {
            let countries = state.nager.available_countries().await?;
            Ok(serde_json::json!({ "countries": countries }))
        }

        "setup_reminder_system" => {
            let query = country_query(request)?;
            let reminder_days = parse_reminder_days(param(request, "reminderDays"))?
                .unwrap_or_else(|| DEFAULT_REMINDER_DAYS.to_vec());
            let now = Utc::now();
            let today = now.date_naive();

            info!(country = %query.country_code, "Setting up reminder system");

            let records = state
                .nager
                .public_holidays(now.year(), &query.country_code)
                .await?;
            let upcoming = upcoming_holidays(&records, today, &[]);
            let total = total_reminders(upcoming.len(), reminder_days.len());

            info!(
                country = %query.country_code,
                holidays = upcoming.len(),
                reminders = total,
                "Reminder system setup complete"
            );

            Ok(serde_json::to_value(ReminderSetup {
                success: true,
                message: format!(
                    "✅ Reminder system activated for {}! You'll receive {} reminders for each of the {} upcoming holidays.",
                    query.country_code,
                    reminder_days.len(),
                    upcoming.len()
                ),
                country: query.country_code,
                total_holidays: upcoming.len(),
                total_reminders: total,
                reminder_schedule: reminder_days,
            })?)
        }

        other => Err(shared::Error::Validation(format!(
            "Unknown tool function '{}'",
            other
        ))),
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<ToolRequest>,
) -> Result<ToolResponse, Error> {
    let request = event.payload;

    info!(
        function = %request.function,
        session_id = request.session_id.as_deref().unwrap_or("-"),
        "Tool invocation received"
    );

    let (response_state, body) = match dispatch(&state, &request).await {
        Ok(result) => (None, serde_json::to_string(&result)?),
        Err(e) => {
            error!(function = %request.function, error = %e, "Tool execution failed");
            (
                Some("REPROMPT".to_string()),
                serde_json::to_string(&serde_json::json!({ "error": e.to_string() }))?,
            )
        }
    };

    Ok(ToolResponse {
        message_version: "1.0".to_string(),
        response: ToolResponseInner {
            action_group: request.action_group,
            function: request.function,
            function_response: FunctionResponse {
                response_state,
                response_body: ResponseBody {
                    text: TextBody { body },
                },
            },
        },
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new());
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reminder_days_json_array() {
        assert_eq!(
            parse_reminder_days(Some("[30, 10, 3, 2]")).unwrap(),
            Some(vec![30, 10, 3, 2])
        );
    }

    #[test]
    fn test_parse_reminder_days_comma_list() {
        assert_eq!(
            parse_reminder_days(Some("30,10,3,2")).unwrap(),
            Some(vec![30, 10, 3, 2])
        );
        assert_eq!(parse_reminder_days(Some(" 7 , 1 ")).unwrap(), Some(vec![7, 1]));
    }

    #[test]
    fn test_parse_reminder_days_absent_means_default() {
        assert_eq!(parse_reminder_days(None).unwrap(), None);
        assert_eq!(parse_reminder_days(Some("")).unwrap(), None);
        assert_eq!(parse_reminder_days(Some("  ")).unwrap(), None);
    }

    #[test]
    fn test_parse_reminder_days_unusable_value_is_rejected() {
        assert!(matches!(
            parse_reminder_days(Some("soon")),
            Err(shared::Error::Validation(_))
        ));
        assert!(matches!(
            parse_reminder_days(Some("30,-2")),
            Err(shared::Error::Validation(_))
        ));
    }

    #[test]
    fn test_country_query_validation() {
        let request = ToolRequest {
            action_group: "holiday-tools".to_string(),
            function: "get_upcoming_holidays".to_string(),
            parameters: vec![ToolParameter {
                name: "countryCode".to_string(),
                value: "USA".to_string(),
            }],
            session_id: None,
        };
        assert!(matches!(
            country_query(&request),
            Err(shared::Error::Validation(_))
        ));
    }
}
