//! Envelope and payload shape normalization
//!
//! Handles the three shape problems raw job payloads arrive with:
//! wrapper envelopes of varying depth, payload blobs encoded as JSON
//! strings inside JSON, and storage locators that may be object names,
//! bucket paths, or full URLs.

use serde_json::{Map, Value};
use url::Url;

use super::fields::{self, alias};

/// Locate the job body inside wrapper envelopes.
///
/// Some endpoints return the job itself, some wrap it one level under
/// `data`, some two levels (`data.detail`, `data.data`). At each level
/// `detail` is tried before `data`: endpoints that nest the canonical
/// body under `detail` also duplicate a summary under `data`, and the
/// body must win. Unwrapping goes at most two levels deep.
pub fn unwrap_body(payload: &Value) -> Option<&Map<String, Value>> {
    let mut body = payload.as_object()?;
    for _ in 0..2 {
        match unwrap_once(body) {
            Some(inner) => body = inner,
            None => break,
        }
    }
    Some(body)
}

fn unwrap_once(record: &Map<String, Value>) -> Option<&Map<String, Value>> {
    for key in ["detail", "data"] {
        if let Some(inner) = record.get(key).and_then(Value::as_object) {
            return Some(inner);
        }
    }
    None
}

/// A job payload slot as it arrives from the backend.
///
/// List endpoints ship the input and result payloads either as already
/// parsed objects or as JSON-encoded strings. The decode step is total:
/// a value that cannot become an object is no payload, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadSlot {
    Parsed(Map<String, Value>),
    Unparsed(String),
    Absent,
}

impl PayloadSlot {
    /// Capture a raw slot value without decoding it yet
    pub fn capture(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => PayloadSlot::Parsed(map.clone()),
            Some(Value::String(raw)) => PayloadSlot::Unparsed(raw.clone()),
            _ => PayloadSlot::Absent,
        }
    }

    /// Decode the slot to an object, treating parse failure as absence
    pub fn decode(self) -> Option<Map<String, Value>> {
        match self {
            PayloadSlot::Parsed(map) => Some(map),
            PayloadSlot::Unparsed(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            PayloadSlot::Absent => None,
        }
    }
}

/// Strip a result payload's one-level `data` envelope if present
pub fn unwrap_result_envelope(map: Map<String, Value>) -> Map<String, Value> {
    match map.get("data") {
        Some(Value::Object(inner)) => inner.clone(),
        _ => map,
    }
}

/// Merge the input and result payload views.
///
/// Result values are authoritative: a completed job's produced values
/// shadow whatever was merely submitted, key by key.
pub fn merge_payloads(
    input: Option<Map<String, Value>>,
    result: Option<Map<String, Value>>,
) -> Map<String, Value> {
    let mut merged = input.unwrap_or_default();
    if let Some(result) = result {
        for (key, value) in result {
            merged.insert(key, value);
        }
    }
    merged
}

/// Normalize a storage locator to its base object name.
///
/// Accepts a bare object name, a bucket path (`a/b/c.mp3`), or a full
/// URL. Blank input normalizes to no value, not an empty string.
pub fn normalize_locator(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("://") {
        return url_file_name(trimmed);
    }
    if trimmed.contains('/') {
        return trimmed
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string);
    }
    Some(trimmed.to_string())
}

/// Last non-empty path segment of a URL, query and fragment stripped
fn url_file_name(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed
        .path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Pull the job id out of a submit-response envelope.
///
/// Envelopes place the id at `data.jobId`, `data.job_id`, `data.id`,
/// `jobId`, `job_id`, or `id`; the first match in that order wins.
pub fn extract_job_id(envelope: &Value) -> Option<i64> {
    let root = envelope.as_object()?;
    if let Some(data) = root.get("data").and_then(Value::as_object) {
        if let Some(id) = fields::resolve_i64(data, alias::JOB_ID) {
            return Some(id);
        }
    }
    fields::resolve_i64(root, alias::JOB_ID)
}
