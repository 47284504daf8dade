//! Raw record to canonical job mapping
//!
//! Two call shapes exist because the list endpoint returns flat records
//! with separate input/result payload blobs, while the single-job
//! endpoint returns an enveloped record with payload fields flattened
//! alongside the metadata. Both produce the same canonical [`Job`].

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::domain::job::{Job, JobStatus};
use crate::dto::job::JobPage;

use super::fields::{self, alias};
use super::shape::{self, PayloadSlot};

/// Mapping failure.
///
/// Individual malformed fields degrade to `None` and are never
/// surfaced; the one unrecoverable defect is a missing identity, since
/// a job without a coercible id cannot be tracked or polled.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("job record has no coercible id")]
    MissingJobId,
}

/// Map a single-job response to a canonical job.
///
/// The payload may be enveloped (`data`, `data.detail`); payload fields
/// are flattened alongside the job metadata in this shape. A record
/// without a coercible id is a hard error here, because the caller
/// asked for exactly one job.
pub fn map_single_job(raw: &Value) -> Result<Job, MapError> {
    let body = shape::unwrap_body(raw).ok_or(MapError::MissingJobId)?;
    build_job(body, body).ok_or(MapError::MissingJobId)
}

/// Map one record of a list response to a canonical job.
///
/// List records carry `inputPayload`/`resultPayload` blobs, each either
/// a parsed object or a JSON-encoded string. Returns `None` when the
/// record has no coercible id; list callers drop such records instead
/// of failing the page.
pub fn map_list_record(raw: &Value) -> Option<Job> {
    let record = raw.as_object()?;
    let input = PayloadSlot::capture(fields::resolve(record, alias::INPUT_PAYLOAD)).decode();
    let result = PayloadSlot::capture(fields::resolve(record, alias::RESULT_PAYLOAD))
        .decode()
        .map(shape::unwrap_result_envelope);
    let payload = shape::merge_payloads(input, result);
    build_job(record, &payload)
}

/// Map a raw list response to the canonical paginated envelope.
///
/// Accepts a bare array, a `{jobs: [...]}` wrapper, or a page object
/// exposing `content` plus pagination metadata. Records without a
/// coercible id are dropped, preserving the order of the rest; a bare
/// sequence defaults its page metadata to a single full page.
pub fn map_job_page(raw: &Value) -> JobPage {
    let empty: &[Value] = &[];
    let (entries, page_meta): (&[Value], Option<&Map<String, Value>>) = match raw {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(map) => {
            let items = match map.get("jobs").or_else(|| map.get("content")) {
                Some(Value::Array(items)) => items.as_slice(),
                _ => empty,
            };
            (items, Some(map))
        }
        _ => (empty, None),
    };

    let content: Vec<Job> = entries
        .iter()
        .filter_map(|entry| {
            let job = map_list_record(entry);
            if job.is_none() {
                warn!("dropping list record with no coercible job id");
            }
            job
        })
        .collect();

    let len = content.len() as i64;
    match page_meta {
        Some(meta) => JobPage {
            page_number: fields::resolve_i64(meta, alias::PAGE_NUMBER).unwrap_or(1),
            page_size: fields::resolve_i64(meta, alias::PAGE_SIZE).unwrap_or(len),
            total_elements: fields::resolve_i64(meta, alias::TOTAL_ELEMENTS).unwrap_or(len),
            total_pages: fields::resolve_i64(meta, alias::TOTAL_PAGES).unwrap_or(1),
            last: meta.get("last").and_then(Value::as_bool).unwrap_or(true),
            content,
        },
        None => JobPage {
            page_number: 1,
            page_size: len,
            total_elements: len,
            total_pages: 1,
            last: true,
            content,
        },
    }
}

/// Assemble a canonical job from a metadata record and a payload view.
///
/// For the single-job shape the two views are the same record. Domain
/// payload fields prefer the payload view and fall back to the
/// metadata; `updated_at` falls back to `created_at`, and `created_at`
/// to the current time only as a last resort.
fn build_job(meta: &Map<String, Value>, payload: &Map<String, Value>) -> Option<Job> {
    let id = fields::resolve_i64(meta, alias::JOB_ID)?;
    let status = JobStatus::classify(
        fields::resolve(meta, alias::STATUS).and_then(Value::as_str),
    );

    let created_at = fields::resolve_datetime(meta, alias::CREATED_AT).unwrap_or_else(Utc::now);
    let updated_at = fields::resolve_datetime(meta, alias::UPDATED_AT).unwrap_or(created_at);

    let audio_object = fields::resolve_string(payload, alias::AUDIO_OBJECT)
        .or_else(|| fields::resolve_string(meta, alias::AUDIO_OBJECT))
        .as_deref()
        .and_then(shape::normalize_locator);

    Some(Job {
        id,
        status,
        job_type: fields::resolve_string(meta, alias::JOB_TYPE),
        progress_percent: fields::resolve_f64(meta, alias::PROGRESS_PERCENT),
        current_step: fields::resolve_string(meta, alias::CURRENT_STEP),
        total_items: fields::resolve_i64(meta, alias::TOTAL_ITEMS),
        completed_items: fields::resolve_i64(meta, alias::COMPLETED_ITEMS),
        failed_items: fields::resolve_i64(meta, alias::FAILED_ITEMS),
        created_at,
        updated_at,
        finalized_at: fields::resolve_datetime(meta, alias::FINALIZED_AT),
        lesson_id: fields::resolve_i64(payload, alias::LESSON_ID)
            .or_else(|| fields::resolve_i64(meta, alias::LESSON_ID)),
        transcript: fields::resolve_string(payload, alias::TRANSCRIPT)
            .or_else(|| fields::resolve_string(meta, alias::TRANSCRIPT)),
        audio_object,
        error_message: fields::resolve_string(payload, alias::ERROR_MESSAGE)
            .or_else(|| fields::resolve_string(meta, alias::ERROR_MESSAGE)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_naming_convention_invariance() {
        let camel = json!({
            "jobId": 9,
            "status": "PROCESSING",
            "progressPercent": 40.0,
            "totalItems": 10,
            "createdAt": "2024-03-01T10:30:00Z",
            "lessonId": 3
        });
        let snake = json!({
            "job_id": 9,
            "status": "PROCESSING",
            "progress_percent": 40.0,
            "total_items": 10,
            "created_at": "2024-03-01T10:30:00Z",
            "lesson_id": 3
        });
        assert_eq!(
            map_single_job(&camel).unwrap(),
            map_single_job(&snake).unwrap()
        );
    }

    #[test]
    fn test_single_job_unwraps_detail_envelope() {
        let raw = json!({
            "data": {
                "detail": {
                    "id": 12,
                    "status": "REVIEWING",
                    "created_at": "2024-03-01T10:30:00Z",
                    "transcript": "hola mundo"
                }
            }
        });
        let job = map_single_job(&raw).unwrap();
        assert_eq!(job.id, 12);
        assert_eq!(job.status, JobStatus::Reviewing);
        assert_eq!(job.transcript.as_deref(), Some("hola mundo"));
    }

    #[test]
    fn test_single_job_missing_id_is_hard_error() {
        let raw = json!({"status": "PROCESSING"});
        assert!(matches!(
            map_single_job(&raw),
            Err(MapError::MissingJobId)
        ));
    }

    #[test]
    fn test_unknown_status_maps_to_processing() {
        let raw = json!({"id": 1, "status": "SOMETHING_NEW"});
        let job = map_single_job(&raw).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn test_malformed_fields_degrade_independently() {
        let raw = json!({
            "id": 5,
            "status": "PROCESSING",
            "progressPercent": "not a number",
            "totalItems": [1, 2],
            "createdAt": "yesterday"
        });
        let job = map_single_job(&raw).unwrap();
        assert_eq!(job.id, 5);
        assert!(job.progress_percent.is_none());
        assert!(job.total_items.is_none());
        // created_at degraded to the last-resort default, never blank;
        // updated_at follows it.
        assert_eq!(job.updated_at, job.created_at);
    }

    #[test]
    fn test_updated_at_falls_back_to_created_at() {
        let raw = json!({
            "id": 5,
            "status": "PENDING",
            "createdAt": "2024-03-01T10:30:00Z"
        });
        let job = map_single_job(&raw).unwrap();
        assert_eq!(job.updated_at, job.created_at);
        assert_eq!(job.created_at.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }

    #[test]
    fn test_list_record_merges_payloads_result_wins() {
        let raw = json!({
            "id": 20,
            "status": "COMPLETED",
            "created_at": "2024-03-01T10:30:00Z",
            "inputPayload": {"lessonId": 3, "transcript": "draft"},
            "resultPayload": {"transcript": "final"}
        });
        let job = map_list_record(&raw).unwrap();
        assert_eq!(job.lesson_id, Some(3));
        assert_eq!(job.transcript.as_deref(), Some("final"));
    }

    #[test]
    fn test_list_record_decodes_json_in_json_payloads() {
        let raw = json!({
            "id": 21,
            "status": "COMPLETED",
            "created_at": "2024-03-01T10:30:00Z",
            "input_payload": r#"{"lesson_id": 4}"#,
            "result_payload": r#"{"data": {"audio_object": "bucket/sub/final.mp3"}}"#
        });
        let job = map_list_record(&raw).unwrap();
        assert_eq!(job.lesson_id, Some(4));
        assert_eq!(job.audio_object.as_deref(), Some("final.mp3"));
    }

    #[test]
    fn test_list_record_unparseable_payload_is_no_payload() {
        let raw = json!({
            "id": 22,
            "status": "PROCESSING",
            "created_at": "2024-03-01T10:30:00Z",
            "inputPayload": "{not json"
        });
        let job = map_list_record(&raw).unwrap();
        assert_eq!(job.id, 22);
        assert!(job.lesson_id.is_none());
    }

    #[test]
    fn test_locator_normalized_from_url() {
        let raw = json!({
            "id": 23,
            "status": "COMPLETED",
            "created_at": "2024-03-01T10:30:00Z",
            "audioUrl": "https://cdn.example.com/media/23/final.mp3?sig=abc"
        });
        let job = map_single_job(&raw).unwrap();
        assert_eq!(job.audio_object.as_deref(), Some("final.mp3"));
    }

    #[test]
    fn test_mapper_is_idempotent_on_id_and_status() {
        let raw = json!({
            "id": 30,
            "status": "PARTIAL",
            "createdAt": "2024-03-01T10:30:00Z",
            "completedItems": 8,
            "failedItems": 2
        });
        let first = map_single_job(&raw).unwrap();
        let reencoded = serde_json::to_value(&first).unwrap();
        let second = map_single_job(&reencoded).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, first.status);
        assert_eq!(second, first);
    }

    #[test]
    fn test_page_drops_exactly_the_malformed_entries() {
        let raw = json!([
            {"id": 1, "status": "PENDING", "created_at": "2024-03-01T10:30:00Z"},
            {"status": "PENDING"},
            {"id": 3, "status": "PENDING", "created_at": "2024-03-01T10:30:00Z"}
        ]);
        let page = map_job_page(&raw);
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].id, 1);
        assert_eq!(page.content[1].id, 3);
    }

    #[test]
    fn test_page_shape_invariance() {
        let records = json!([
            {"id": 1, "status": "PENDING", "created_at": "2024-03-01T10:30:00Z"},
            {"id": 2, "status": "PENDING", "created_at": "2024-03-01T10:30:00Z"}
        ]);
        let bare = map_job_page(&records);
        let wrapped = map_job_page(&json!({"jobs": records}));
        let paginated = map_job_page(&json!({
            "content": records,
            "pageNumber": 1,
            "pageSize": 2,
            "totalElements": 2,
            "totalPages": 1,
            "last": true
        }));
        assert_eq!(bare, wrapped);
        assert_eq!(bare, paginated);
    }

    #[test]
    fn test_page_metadata_aliases() {
        let raw = json!({
            "content": [],
            "page": 3,
            "size": 25,
            "total": 120,
            "totalPages": 5,
            "last": false
        });
        let page = map_job_page(&raw);
        assert_eq!(page.page_number, 3);
        assert_eq!(page.page_size, 25);
        assert_eq!(page.total_elements, 120);
        assert_eq!(page.total_pages, 5);
        assert!(!page.last);
    }

    #[test]
    fn test_bare_sequence_page_defaults() {
        let raw = json!([
            {"id": 1, "status": "PENDING", "created_at": "2024-03-01T10:30:00Z"}
        ]);
        let page = map_job_page(&raw);
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.last);
    }
}
