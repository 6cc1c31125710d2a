//! Holiday reminder computation.
//!
//! Pure functions that turn a raw holiday list and a reference date into
//! upcoming holidays annotated with reminder schedules. No I/O; the callers
//! (the agent tools) own fetching and delivery.

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::models::{HolidayRecord, ReminderEvent, UpcomingHoliday};

/// Default reminder schedule: days before each holiday at which to remind.
pub const DEFAULT_REMINDER_DAYS: [u32; 4] = [30, 10, 3, 2];

/// Compute upcoming holidays with their reminder schedules.
///
/// A record is upcoming iff its date is on or after `today` (same-day
/// qualifies, with `days_until` 0). Records whose date does not parse are
/// dropped with a warning rather than failing the batch. Output order
/// follows input order; reminder order follows `offsets` order.
pub fn upcoming_holidays(
    records: &[HolidayRecord],
    today: NaiveDate,
    offsets: &[u32],
) -> Vec<UpcomingHoliday> {
    records
        .iter()
        .filter_map(|record| {
            let date = match NaiveDate::parse_from_str(&record.date, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    warn!(date = %record.date, name = %record.name, error = %e, "Invalid holiday date, skipping record");
                    return None;
                }
            };
            if date < today {
                return None;
            }

            let days_until = date.signed_duration_since(today).num_days();
            let reminders = offsets
                .iter()
                .filter(|&&days_before| days_until > i64::from(days_before))
                .filter_map(|&days_before| {
                    let reminder_date = date.checked_sub_days(Days::new(u64::from(days_before)))?;
                    Some(ReminderEvent {
                        days_before,
                        reminder_date,
                        message: reminder_message(days_before, &record.name),
                    })
                })
                .collect();

            Some(UpcomingHoliday {
                date,
                name: record.name.clone(),
                local_name: record.local_name.clone(),
                days_until,
                reminders,
            })
        })
        .collect()
}

/// Build the human-readable message for a reminder at the given offset.
///
/// The four standard offsets have fixed phrasings; any other offset gets the
/// generic template. Kept as plain conditional dispatch on the offset value.
pub fn reminder_message(days_before: u32, holiday_name: &str) -> String {
    match days_before {
        30 => format!("📅 30-day planning reminder for {}", holiday_name),
        10 => format!("🔔 10-day preparation reminder for {}", holiday_name),
        3 => format!("⏰ 3-day countdown for {}", holiday_name),
        2 => format!("🎊 2-day final reminder for {}", holiday_name),
        n => format!("📌 {}-day reminder for {}", n, holiday_name),
    }
}

/// Total reminder events a subscription would produce: one per upcoming
/// holiday per configured offset.
pub fn total_reminders(upcoming_count: usize, offset_count: usize) -> usize {
    upcoming_count * offset_count
}
