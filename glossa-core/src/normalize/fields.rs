//! Field alias resolution
//!
//! The backend mixes camelCase and snake_case across endpoints, and
//! across versions of the same endpoint. Every logical field the client
//! reads has one ordered alias list here; nothing else in the workspace
//! reaches into a raw record by key. Keeping the table in one place
//! confines future backend naming drift to this file.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Ordered alias lists, one per logical field. First present key wins.
pub mod alias {
    pub const JOB_ID: &[&str] = &["jobId", "job_id", "id"];
    pub const STATUS: &[&str] = &["status", "jobStatus", "job_status"];
    pub const JOB_TYPE: &[&str] = &["jobType", "job_type", "type"];
    pub const PROGRESS_PERCENT: &[&str] = &["progressPercent", "progress_percent", "progress"];
    pub const CURRENT_STEP: &[&str] = &["currentStep", "current_step", "step"];
    pub const TOTAL_ITEMS: &[&str] = &["totalItems", "total_items", "totalCount", "total_count"];
    pub const COMPLETED_ITEMS: &[&str] = &[
        "completedItems",
        "completed_items",
        "successCount",
        "success_count",
    ];
    pub const FAILED_ITEMS: &[&str] =
        &["failedItems", "failed_items", "failureCount", "failure_count"];
    pub const CREATED_AT: &[&str] = &["createdAt", "created_at"];
    pub const UPDATED_AT: &[&str] = &["updatedAt", "updated_at"];
    pub const FINALIZED_AT: &[&str] = &["finalizedAt", "finalized_at", "completedAt", "completed_at"];
    pub const LESSON_ID: &[&str] = &["lessonId", "lesson_id"];
    pub const TRANSCRIPT: &[&str] = &["transcript", "transcriptText", "transcript_text"];
    pub const AUDIO_OBJECT: &[&str] = &[
        "audioObject",
        "audio_object",
        "objectName",
        "object_name",
        "audioUrl",
        "audio_url",
    ];
    pub const ERROR_MESSAGE: &[&str] = &["errorMessage", "error_message", "error"];
    pub const INPUT_PAYLOAD: &[&str] = &["inputPayload", "input_payload", "input"];
    pub const RESULT_PAYLOAD: &[&str] = &["resultPayload", "result_payload", "result"];
    pub const PAGE_NUMBER: &[&str] = &["pageNumber", "page"];
    pub const PAGE_SIZE: &[&str] = &["pageSize", "size"];
    pub const TOTAL_ELEMENTS: &[&str] = &["totalElements", "total"];
    pub const TOTAL_PAGES: &[&str] = &["totalPages", "total_pages"];
}

/// Resolve a logical field against a raw record.
///
/// Returns the first alias whose key is present on the record. JSON
/// `null` counts as present; absence is `None`, never an error.
pub fn resolve<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| record.get(*key))
}

/// Integer coercion. Accepts JSON integers, whole floats, and numeric
/// strings; everything else degrades to `None`.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Timestamp coercion. Accepts RFC 3339 strings and epoch numbers;
/// epoch values at or above 10^12 are read as milliseconds.
pub fn as_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            if epoch.abs() >= 1_000_000_000_000 {
                Utc.timestamp_millis_opt(epoch).single()
            } else {
                Utc.timestamp_opt(epoch, 0).single()
            }
        }
        _ => None,
    }
}

pub fn resolve_i64(record: &Map<String, Value>, aliases: &[&str]) -> Option<i64> {
    resolve(record, aliases).and_then(as_i64)
}

pub fn resolve_f64(record: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    resolve(record, aliases).and_then(as_f64)
}

pub fn resolve_string(record: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    resolve(record, aliases).and_then(as_string)
}

pub fn resolve_datetime(record: &Map<String, Value>, aliases: &[&str]) -> Option<DateTime<Utc>> {
    resolve(record, aliases).and_then(as_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_resolve_first_present_alias_wins() {
        let rec = record(json!({"objectName": "a.mp3", "object_name": "b.mp3"}));
        let resolved = resolve(&rec, &["objectName", "object_name"]).unwrap();
        assert_eq!(resolved, &json!("a.mp3"));
    }

    #[test]
    fn test_resolve_falls_through_to_later_alias() {
        let rec = record(json!({"object_name": "b.mp3"}));
        let resolved = resolve(&rec, &["objectName", "object_name"]).unwrap();
        assert_eq!(resolved, &json!("b.mp3"));
    }

    #[test]
    fn test_resolve_null_counts_as_present() {
        let rec = record(json!({"objectName": null, "object_name": "b.mp3"}));
        let resolved = resolve(&rec, &["objectName", "object_name"]).unwrap();
        assert!(resolved.is_null());
    }

    #[test]
    fn test_resolve_absent_is_none() {
        let rec = record(json!({"unrelated": 1}));
        assert!(resolve(&rec, alias::JOB_ID).is_none());
    }

    #[test]
    fn test_alias_table_is_ordered_camel_case_first() {
        // Every multi-alias entry lists the camelCase spelling before its
        // snake_case twin, so records carrying both resolve identically
        // across the table.
        for aliases in [
            alias::JOB_ID,
            alias::STATUS,
            alias::JOB_TYPE,
            alias::PROGRESS_PERCENT,
            alias::CURRENT_STEP,
            alias::TOTAL_ITEMS,
            alias::COMPLETED_ITEMS,
            alias::FAILED_ITEMS,
            alias::CREATED_AT,
            alias::UPDATED_AT,
            alias::FINALIZED_AT,
            alias::LESSON_ID,
            alias::TRANSCRIPT,
            alias::AUDIO_OBJECT,
            alias::ERROR_MESSAGE,
            alias::INPUT_PAYLOAD,
            alias::RESULT_PAYLOAD,
        ] {
            assert!(!aliases.is_empty());
            assert!(!aliases[0].contains('_'), "{:?}", aliases);
        }
    }

    #[test]
    fn test_as_i64_coercions() {
        assert_eq!(as_i64(&json!(41)), Some(41));
        assert_eq!(as_i64(&json!(41.0)), Some(41));
        assert_eq!(as_i64(&json!("41")), Some(41));
        assert_eq!(as_i64(&json!(" 41 ")), Some(41));
        assert_eq!(as_i64(&json!(41.5)), None);
        assert_eq!(as_i64(&json!("not a number")), None);
        assert_eq!(as_i64(&json!(null)), None);
        assert_eq!(as_i64(&json!([41])), None);
    }

    #[test]
    fn test_as_f64_coercions() {
        assert_eq!(as_f64(&json!(12.5)), Some(12.5));
        assert_eq!(as_f64(&json!("12.5")), Some(12.5));
        assert_eq!(as_f64(&json!(null)), None);
    }

    #[test]
    fn test_as_datetime_rfc3339() {
        let dt = as_datetime(&json!("2024-03-01T10:30:00Z")).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }

    #[test]
    fn test_as_datetime_epoch_seconds_and_millis() {
        let seconds = as_datetime(&json!(1_709_288_100)).unwrap();
        let millis = as_datetime(&json!(1_709_288_100_000i64)).unwrap();
        assert_eq!(seconds, millis);
    }

    #[test]
    fn test_as_datetime_garbage_is_none() {
        assert!(as_datetime(&json!("yesterday")).is_none());
        assert!(as_datetime(&json!(null)).is_none());
        assert!(as_datetime(&json!(true)).is_none());
    }
}
