//! Job board calls

use common::models::{JobFilter, JobView, NewJob, StatusUpdate, job};

use crate::{
    error::ClientResult,
    http::{ApiClient, ApiRequest},
};

impl ApiClient {
    /// List jobs; only open jobs unless `filter.status` says otherwise
    pub async fn list_jobs(&self, filter: &JobFilter) -> ClientResult<Vec<JobView>> {
        let mut filter = filter.clone();
        filter
            .status
            .get_or_insert_with(|| job::status::OPEN.to_string());
        self.fetch(ApiRequest::get("/api/jobs").query(&filter)?)
            .await
    }

    /// Post a job as the signed-in user
    pub async fn create_job(&self, new_job: &NewJob) -> ClientResult<JobView> {
        self.fetch(ApiRequest::post("/api/jobs").json(new_job)?)
            .await
    }

    pub async fn update_job_status(&self, id: &str, status: &str) -> ClientResult<JobView> {
        let request =
            ApiRequest::patch(format!("/api/jobs/{}/status", id)).json(&StatusUpdate::new(status))?;
        self.fetch(request).await
    }
}
