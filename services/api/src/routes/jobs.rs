//! Job postings

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::models::{Job, JobFilter, JobView, NewJob, StatusUpdate, UserSummary};
use std::collections::HashMap;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    session::CurrentUser,
    state::AppState,
    validation::{ApiQuery, ValidatedJson},
};

/// Attach poster summaries, looking each poster up once
async fn with_posters(state: &AppState, jobs: Vec<Job>) -> ApiResult<Vec<JobView>> {
    let mut posters: HashMap<String, Option<UserSummary>> = HashMap::new();
    let mut views = Vec::with_capacity(jobs.len());
    for job in jobs {
        if !posters.contains_key(&job.poster_id) {
            let poster = state
                .storage
                .get_user(&job.poster_id)
                .await?
                .map(|user| UserSummary::from(&user));
            posters.insert(job.poster_id.clone(), poster);
        }
        let poster = posters.get(&job.poster_id).cloned().flatten();
        views.push(JobView { job, poster });
    }
    Ok(views)
}

pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<JobFilter>,
) -> ApiResult<Json<Vec<JobView>>> {
    let jobs = state.storage.list_jobs(&filter).await?;
    Ok(Json(with_posters(&state, jobs).await?))
}

/// Post a job as the signed-in user
pub async fn create_job(
    State(state): State<AppState>,
    CurrentUser(poster): CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewJob>,
) -> ApiResult<impl IntoResponse> {
    let job = state.storage.create_job(&poster.id, payload).await?;
    info!("User {} posted job {}", poster.username, job.id);
    let view = JobView {
        job,
        poster: Some(UserSummary::from(&poster)),
    };
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobView>> {
    let job = state
        .storage
        .get_job(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    let mut views = with_posters(&state, vec![job]).await?;
    views.pop().map(Json).ok_or_else(|| ApiError::not_found("Job"))
}

pub async fn update_job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<StatusUpdate>,
) -> ApiResult<Json<JobView>> {
    let job = state
        .storage
        .update_job_status(&id, &payload.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    info!("Job {} is now {}", job.id, job.status);
    let mut views = with_posters(&state, vec![job]).await?;
    views.pop().map(Json).ok_or_else(|| ApiError::not_found("Job"))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.storage.delete_job(&id).await? {
        return Err(ApiError::not_found("Job"));
    }
    info!("Deleted job {}", id);
    Ok(StatusCode::NO_CONTENT)
}
