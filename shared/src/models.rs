//! Shared data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw public holiday record as returned by the holiday API.
///
/// The date is kept as a string so one malformed record can be dropped
/// without failing the whole batch. Upstream fields we don't use
/// (countryCode, fixed, global, ...) are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRecord {
    pub date: String,
    pub name: String,
    pub local_name: String,
}

/// A single reminder derived for an upcoming holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderEvent {
    pub days_before: u32,
    pub reminder_date: NaiveDate,
    pub message: String,
}

/// An upcoming holiday annotated with its computed reminder schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub local_name: String,
    pub days_until: i64,
    pub reminders: Vec<ReminderEvent>,
}

/// Full result of one holiday computation for a country and year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputationResult {
    pub holidays: Vec<UpcomingHoliday>,
    pub country: String,
    pub year: i32,
    pub reminder_schedule: Vec<u32>,
}

/// A country supported by the holiday API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    pub country_code: String,
    pub name: String,
}

/// Result of activating the reminder system for a country.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSetup {
    pub success: bool,
    pub message: String,
    pub country: String,
    pub total_holidays: usize,
    pub total_reminders: usize,
    pub reminder_schedule: Vec<u32>,
}

/// A single chat message in an A2A conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A2A chat request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2aRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub user_id: Option<String>,
    pub thread_id: Option<String>,
}

/// Memory identifiers echoed back to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    pub resource_id: String,
    pub thread_id: String,
}

/// A2A chat response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct A2aResponse {
    pub messages: Vec<ChatMessage>,
    pub memory_info: MemoryInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holiday_record_ignores_extra_fields() {
        let json = r#"{
            "date": "2025-07-04",
            "localName": "Independence Day",
            "name": "Independence Day",
            "countryCode": "US",
            "fixed": false,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        }"#;
        let record: HolidayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, "2025-07-04");
        assert_eq!(record.local_name, "Independence Day");
    }

    #[test]
    fn test_computation_result_wire_shape() {
        let result = ComputationResult {
            holidays: vec![UpcomingHoliday {
                date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                name: "Founders Day".to_string(),
                local_name: "Founders Day".to_string(),
                days_until: 31,
                reminders: vec![ReminderEvent {
                    days_before: 30,
                    reminder_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                    message: "reminder".to_string(),
                }],
            }],
            country: "US".to_string(),
            year: 2025,
            reminder_schedule: vec![30, 10, 3, 2],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["holidays"][0]["date"], "2025-02-01");
        assert_eq!(value["holidays"][0]["daysUntil"], 31);
        assert_eq!(value["holidays"][0]["localName"], "Founders Day");
        assert_eq!(
            value["holidays"][0]["reminders"][0]["reminderDate"],
            "2025-01-02"
        );
        assert_eq!(value["holidays"][0]["reminders"][0]["daysBefore"], 30);
        assert_eq!(value["reminderSchedule"], serde_json::json!([30, 10, 3, 2]));
    }
}
