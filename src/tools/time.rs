//! Clock tools: `get_current_time` and `calculate_time_difference`

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::json;

use crate::mcp::protocol::{Arguments, InputSchema, PropertySchema, ToolDefinition};
use crate::mcp::registry::{HandlerError, ToolHandler};
use crate::tools::{optional_str, required_str, ToolError};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Output formats understood by `get_current_time`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Iso,
    Unix,
    Readable,
}

impl TimeFormat {
    /// Unrecognized names fall back to ISO
    pub fn parse(name: &str) -> Self {
        match name {
            "unix" => TimeFormat::Unix,
            "readable" => TimeFormat::Readable,
            _ => TimeFormat::Iso,
        }
    }
}

/// Render `now` for the `get_current_time` tool
/// 
/// The label echoes the requested format name even when it fell back to ISO.
pub fn format_current_time(format: &str, now: DateTime<Utc>) -> String {
    let value = match TimeFormat::parse(format) {
        TimeFormat::Iso => now.to_rfc3339_opts(SecondsFormat::Millis, true),
        TimeFormat::Unix => now.timestamp().to_string(),
        TimeFormat::Readable => now
            .with_timezone(&Local)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
    };

    format!("Current time ({}): {}", format, value)
}

/// Parse an ISO 8601 date or date-time
/// 
/// Inputs without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ToolError> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ToolError::InvalidDate(input.to_string()))
}

/// Describe the span between two dates in days, hours, minutes and milliseconds
/// 
/// Each unit is floored independently, so negative spans round toward the past.
pub fn describe_time_difference(start_date: &str, end_date: &str) -> Result<String, ToolError> {
    let start = parse_timestamp(start_date)?;
    let end = parse_timestamp(end_date)?;
    let diff_ms = (end - start).num_milliseconds();

    Ok(format!(
        "Time difference between {} and {}:\n- Days: {}\n- Hours: {}\n- Minutes: {}\n- Milliseconds: {}",
        start_date,
        end_date,
        diff_ms.div_euclid(MS_PER_DAY),
        diff_ms.div_euclid(MS_PER_HOUR),
        diff_ms.div_euclid(MS_PER_MINUTE),
        diff_ms,
    ))
}

pub fn current_time_definition() -> ToolDefinition {
    ToolDefinition::new(
        "get_current_time",
        "Get the current time in various formats",
        InputSchema::object().property(
            "format",
            PropertySchema::string("Time format (iso, unix, readable)").with_default(json!("iso")),
        ),
    )
}

pub fn time_difference_definition() -> ToolDefinition {
    ToolDefinition::new(
        "calculate_time_difference",
        "Calculate time difference between two dates",
        InputSchema::object()
            .required_property("start_date", PropertySchema::string("Start date (ISO format)"))
            .required_property("end_date", PropertySchema::string("End date (ISO format)")),
    )
}

/// Handler for `get_current_time`
pub struct GetCurrentTime;

#[async_trait]
impl ToolHandler for GetCurrentTime {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let format = optional_str(arguments, "format")?.unwrap_or("iso");
        Ok(format_current_time(format, Utc::now()))
    }
}

/// Handler for `calculate_time_difference`
pub struct CalculateTimeDifference;

#[async_trait]
impl ToolHandler for CalculateTimeDifference {
    async fn call(&self, arguments: &Arguments) -> Result<String, HandlerError> {
        let start_date = required_str(arguments, "start_date")?;
        let end_date = required_str(arguments, "end_date")?;
        Ok(describe_time_difference(start_date, end_date)?)
    }
}
