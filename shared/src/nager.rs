//! Nager.Date public holiday API client.

use std::time::Duration;

use reqwest::header::{ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::DEFAULT_NAGER_BASE_URL;
use crate::models::{CountryInfo, HolidayRecord};
use crate::retry::RetryPolicy;
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const AGENT_USER_AGENT: &str = "HolidayReminderAgent/1.0";

/// Client for the Nager.Date API (`https://date.nager.at/api/v3`).
pub struct NagerClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl NagerClient {
    /// Create a client against the public API endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_NAGER_BASE_URL)
    }

    /// Create a client against a specific base URL (stage or test endpoint).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Fetch the public holidays for a country and year.
    pub async fn public_holidays(
        &self,
        year: i32,
        country_code: &str,
    ) -> Result<Vec<HolidayRecord>> {
        let code = country_code.to_uppercase();
        let url = format!("{}/PublicHolidays/{}/{}", self.base_url, year, code);

        info!(country = %code, year, "Fetching public holidays");

        let holidays: Vec<HolidayRecord> = self
            .retry
            .run(|| self.fetch_array(&url))
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::NotFound(format!(
                    "No holiday data found for country code '{}'. Please check if the country code is correct.",
                    code
                )),
                other => other,
            })?;

        info!(country = %code, count = holidays.len(), "Fetched public holidays");
        Ok(holidays)
    }

    /// Fetch the list of countries the API has data for.
    pub async fn available_countries(&self) -> Result<Vec<CountryInfo>> {
        let url = format!("{}/AvailableCountries", self.base_url);

        info!("Fetching available countries");
        let countries: Vec<CountryInfo> = self.retry.run(|| self.fetch_array(&url)).await?;
        info!(count = countries.len(), "Fetched available countries");
        Ok(countries)
    }

    /// GET a URL expected to return a JSON array, mapping upstream statuses
    /// onto the error taxonomy.
    async fn fetch_array<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self
            .http_client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, AGENT_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Err(e) = classify_response(status, retry_after.as_deref()) {
            if matches!(e, Error::Api(_)) {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Api(format!("{} returned {}: {}", url, status, body)));
            }
            return Err(e);
        }

        let value: serde_json::Value = response.json().await?;
        decode_array(value, url)
    }
}

/// Map an upstream response status (and Retry-After hint) onto the error
/// taxonomy. `Ok(())` means the body is worth reading.
fn classify_response(status: StatusCode, retry_after: Option<&str>) -> Result<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound("upstream returned 404".to_string()));
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = retry_after.and_then(|s| s.trim().parse().ok());
        return Err(Error::RateLimited { retry_after });
    }
    if !status.is_success() {
        return Err(Error::Api(format!("upstream returned {}", status)));
    }
    Ok(())
}

/// Decode a successful body that must be a JSON array.
fn decode_array<T: DeserializeOwned>(value: serde_json::Value, url: &str) -> Result<Vec<T>> {
    if !value.is_array() {
        return Err(Error::Api(format!(
            "Invalid response format from {}. Expected array.",
            url
        )));
    }
    Ok(serde_json::from_value(value)?)
}

impl Default for NagerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HolidayRecord;

    #[test]
    fn test_404_maps_to_not_found() {
        let result = classify_response(StatusCode::NOT_FOUND, None);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_429_maps_to_rate_limited_with_parsed_hint() {
        let result = classify_response(StatusCode::TOO_MANY_REQUESTS, Some("7"));
        assert!(matches!(
            result,
            Err(Error::RateLimited {
                retry_after: Some(7)
            })
        ));
    }

    #[test]
    fn test_429_without_usable_hint_has_no_retry_after() {
        let result = classify_response(StatusCode::TOO_MANY_REQUESTS, Some("tomorrow"));
        assert!(matches!(
            result,
            Err(Error::RateLimited { retry_after: None })
        ));

        let result = classify_response(StatusCode::TOO_MANY_REQUESTS, None);
        assert!(matches!(
            result,
            Err(Error::RateLimited { retry_after: None })
        ));
    }

    #[test]
    fn test_other_non_success_maps_to_api_error() {
        let result = classify_response(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert!(matches!(result, Err(Error::Api(_))));
        let result = classify_response(StatusCode::BAD_GATEWAY, None);
        assert!(matches!(result, Err(Error::Api(_))));
    }

    #[test]
    fn test_success_statuses_pass_through() {
        assert!(classify_response(StatusCode::OK, None).is_ok());
        assert!(classify_response(StatusCode::NO_CONTENT, None).is_ok());
    }

    #[test]
    fn test_non_array_body_is_api_error() {
        let value = serde_json::json!({ "message": "maintenance" });
        let result: Result<Vec<HolidayRecord>> = decode_array(value, "http://example.test");
        assert!(matches!(result, Err(Error::Api(_))));
    }

    #[test]
    fn test_array_body_decodes() {
        let value = serde_json::json!([
            { "date": "2025-07-04", "localName": "Independence Day", "name": "Independence Day" }
        ]);
        let records: Vec<HolidayRecord> = decode_array(value, "http://example.test").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2025-07-04");
    }
}
