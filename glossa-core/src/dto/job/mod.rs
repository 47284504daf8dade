//! Job DTOs for the admin API

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobStatus};

/// Request to start an audio alignment job for a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlignmentJob {
    pub lesson_id: i64,
    /// Storage object holding the lesson audio
    pub audio_object: String,
    /// Transcript to align against; omitted when the backend should use
    /// the lesson's stored transcript.
    pub transcript: Option<String>,
}

/// One entry in a bulk vocabulary creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub term: String,
    pub translation: String,
    pub notes: Option<String>,
}

/// Request to create vocabulary entries in bulk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBulkVocabularyJob {
    pub lesson_id: i64,
    pub entries: Vec<VocabularyEntry>,
}

/// Server-side filter for job listings
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub job_type: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl JobFilter {
    /// Render the filter as query parameters, omitting unset fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(job_type) = &self.job_type {
            params.push(("jobType", job_type.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            params.push(("size", size.to_string()));
        }
        params
    }
}

/// Canonical paginated job listing
///
/// Produced for every list response shape the backend emits (bare
/// array, `jobs` wrapper, or a page object), so callers never branch on
/// the source shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub content: Vec<Job>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub last: bool,
}
