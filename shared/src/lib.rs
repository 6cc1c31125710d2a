//! Shared library for Holiday Reminder Agent Lambda functions.
//!
//! This crate provides common utilities, types, and clients used across all Lambda functions.

pub mod agents;
pub mod config;
pub mod cors;
pub mod error;
pub mod holidays;
pub mod http;
pub mod models;
pub mod nager;
pub mod retry;

pub use agents::AgentClient;
pub use config::Config;
pub use error::{Error, Result};
pub use holidays::{total_reminders, upcoming_holidays, DEFAULT_REMINDER_DAYS};
pub use models::{
    A2aRequest, A2aResponse, ChatMessage, ComputationResult, CountryInfo, HolidayRecord,
    MemoryInfo, ReminderEvent, ReminderSetup, UpcomingHoliday,
};
pub use nager::NagerClient;
pub use retry::RetryPolicy;
