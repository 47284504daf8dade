//! Job-related admin API endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use glossa_core::domain::job::Job;
use glossa_core::dto::job::{CreateAlignmentJob, CreateBulkVocabularyJob, JobFilter, JobPage};
use glossa_core::normalize::{extract_job_id, map_job_page, map_single_job};

use crate::AdminClient;
use crate::error::{ClientError, Result};
use crate::poller::JobStatusSource;

impl AdminClient {
    // =============================================================================
    // Job Submission
    // =============================================================================

    /// Start an audio alignment job for a lesson
    ///
    /// # Arguments
    /// * `req` - The alignment job request
    ///
    /// # Returns
    /// The id of the created job, for subsequent polling
    ///
    /// # Example
    /// ```no_run
    /// # use glossa_client::AdminClient;
    /// # use glossa_core::dto::job::CreateAlignmentJob;
    /// # async fn example() -> glossa_client::Result<()> {
    /// let client = AdminClient::new("https://admin.glossa.example");
    /// let job_id = client.submit_alignment_job(&CreateAlignmentJob {
    ///     lesson_id: 12,
    ///     audio_object: "lesson-12.mp3".to_string(),
    ///     transcript: None,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_alignment_job(&self, req: &CreateAlignmentJob) -> Result<i64> {
        let url = format!("{}/api/admin/alignment/jobs", self.base_url);
        let response = self.request(Method::POST, &url).json(req).send().await?;

        let envelope = self.handle_raw_response(response).await?;
        extract_job_id(&envelope).ok_or(ClientError::MissingJobId)
    }

    /// Start a bulk vocabulary creation job
    ///
    /// # Arguments
    /// * `req` - The bulk creation request
    ///
    /// # Returns
    /// The id of the created job, for subsequent polling
    pub async fn submit_bulk_vocabulary_job(&self, req: &CreateBulkVocabularyJob) -> Result<i64> {
        let url = format!("{}/api/admin/vocabulary/bulk-jobs", self.base_url);
        let response = self.request(Method::POST, &url).json(req).send().await?;

        let envelope = self.handle_raw_response(response).await?;
        extract_job_id(&envelope).ok_or(ClientError::MissingJobId)
    }

    // =============================================================================
    // Job Queries
    // =============================================================================

    /// Get a job by id
    ///
    /// # Arguments
    /// * `job_id` - The job id
    ///
    /// # Returns
    /// The canonical job. A response without a coercible job id is a
    /// hard error here, since exactly one job was asked for.
    pub async fn fetch_job(&self, job_id: i64) -> Result<Job> {
        let url = format!("{}/api/admin/jobs/{}", self.base_url, job_id);
        let response = self.request(Method::GET, &url).send().await?;

        let envelope = self.handle_raw_response(response).await?;
        map_single_job(&envelope).map_err(ClientError::from)
    }

    /// List jobs matching a filter
    ///
    /// # Arguments
    /// * `filter` - Status/type/pagination filter; `Default::default()`
    ///   lists everything
    ///
    /// # Returns
    /// A canonical page of jobs regardless of the response shape the
    /// backend chose. Records without a coercible id are dropped rather
    /// than failing the page.
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<JobPage> {
        let url = format!("{}/api/admin/jobs", self.base_url);
        let response = self
            .request(Method::GET, &url)
            .query(&filter.to_query())
            .send()
            .await?;

        let envelope = self.handle_raw_response(response).await?;
        Ok(map_job_page(&envelope))
    }

    // =============================================================================
    // Job Control
    // =============================================================================

    /// Ask the backend to cancel a job
    ///
    /// Server-side cancellation; independent of dropping a local poll
    /// session.
    ///
    /// # Arguments
    /// * `job_id` - The job id
    pub async fn cancel_job(&self, job_id: i64) -> Result<()> {
        let url = format!("{}/api/admin/jobs/{}/cancel", self.base_url, job_id);
        let response = self.request(Method::POST, &url).send().await?;

        self.handle_empty_response(response).await
    }
}

#[async_trait]
impl JobStatusSource for AdminClient {
    /// Fetch one raw status payload; the poller maps it.
    async fn fetch_status(&self, job_id: i64) -> Result<Value> {
        let url = format!("{}/api/admin/jobs/{}", self.base_url, job_id);
        let response = self.request(Method::GET, &url).send().await?;
        self.handle_raw_response(response).await
    }
}
