// src/gigs/handlers/submissions.rs
//
// Submitted-work handling. A document goes to the blob store first; the
// gig record is only touched once the blob write is confirmed, so a
// failed upload leaves the gig exactly where it was.

use axum::extract::{Extension, Multipart, Path};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{gig_response, load_gig, status_of};
use crate::auth::AuthedUser;
use crate::common::{generate_raw_id, ApiError, AppState};
use crate::gigs::lifecycle::GigStatus;
use crate::gigs::models::{Gig, GigResponse, SubmitWorkRequest, UploadResponse};
use crate::gigs::queries;
use crate::gigs::validators::document_extension;

/// Claimant-only gate shared by both submission routes.
fn check_submittable(gig: &Gig, caller_id: &str) -> Result<(), ApiError> {
    let status = GigStatus::parse(&gig.status)
        .ok_or_else(|| ApiError::InvalidState(format!("gig has unrecognized status '{}'", gig.status)))?;

    if status != GigStatus::Claimed {
        return Err(ApiError::InvalidState(format!(
            "work can only be submitted on a claimed gig, not one that is {}",
            status.as_str()
        )));
    }
    if gig.claimed_by.as_deref() != Some(caller_id) {
        return Err(ApiError::Unauthorized(
            "only the writer who claimed this gig may submit work".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/gigs/:id/submit - record an opaque submission reference
pub async fn submit_work(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
    Json(request): Json<SubmitWorkRequest>,
) -> Result<Json<GigResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    if request.submission.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "submission reference is required".to_string(),
        ));
    }

    let gig = load_gig(&state.db, &gig_id).await?;
    check_submittable(&gig, &authed.id)?;

    let recorded =
        queries::record_submission(&state.db, &gig_id, &authed.id, request.submission.trim())
            .await
            .map_err(ApiError::DatabaseError)?;

    if recorded == 0 {
        return Err(ApiError::Conflict(
            "gig is no longer awaiting this submission".to_string(),
        ));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, "Work submitted");

    let gig = load_gig(&state.db, &gig_id).await?;
    Ok(Json(gig_response(&state.db, gig).await?))
}

/// Pull the `document` part out of a multipart body, validating by the
/// declared content type only. Returns the bytes and the extension the
/// stored file should carry.
async fn read_document_field(multipart: &mut Multipart) -> Result<(Vec<u8>, &'static str), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::ValidationError("invalid multipart body".to_string()))?
    {
        if field.name() == Some("document") {
            let content_type = field.content_type().unwrap_or("").to_string();
            let extension = document_extension(&content_type).ok_or_else(|| {
                warn!(content_type = %content_type, "Upload rejected: unsupported document type");
                ApiError::ValidationError(
                    "only PDF, Word, or plain text documents are accepted".to_string(),
                )
            })?;

            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::ValidationError("invalid file".to_string()))?;

            if data.is_empty() {
                return Err(ApiError::ValidationError("document is empty".to_string()));
            }

            return Ok((data.to_vec(), extension));
        }
    }

    Err(ApiError::ValidationError(
        "no document file provided".to_string(),
    ))
}

fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        ".pdf" => "application/pdf",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// POST /api/gigs/:id/submit/upload - upload the finished document,
/// then record its URL as the submission
pub async fn submit_work_upload(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    // Reject before accepting the upload; no point storing a blob the
    // gig can never reference.
    let gig = load_gig(&state.db, &gig_id).await?;
    check_submittable(&gig, &authed.id)?;

    let (data, extension) = read_document_field(&mut multipart).await?;

    let stored_name = format!("{}{}", generate_raw_id(8), extension);
    let key = format!("submissions/{}/{}", gig_id, stored_name);

    let url = state
        .storage
        .put(&key, data, content_type_for_extension(extension))
        .await
        .map_err(|e| ApiError::StorageFailure(e.to_string()))?;

    let recorded = queries::record_submission(&state.db, &gig_id, &authed.id, &url)
        .await
        .map_err(ApiError::DatabaseError)?;

    if recorded == 0 {
        // The blob is stored but the gig moved on; its state is untouched.
        return Err(ApiError::Conflict(
            "gig is no longer awaiting this submission".to_string(),
        ));
    }

    info!(
        user_id = %authed.id,
        gig_id = %gig_id,
        key = %key,
        "Document uploaded and submission recorded"
    );

    let gig = load_gig(&state.db, &gig_id).await?;
    let gig = gig_response(&state.db, gig).await?;
    Ok(Json(UploadResponse { url, gig }))
}

/// POST /api/gigs/:id/completed-work - attach the final document the
/// poster returns to the writer after approval
pub async fn attach_completed_work(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(gig_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let gig = load_gig(&state.db, &gig_id).await?;

    if !authed.can_manage(gig.posted_by.as_deref()) {
        return Err(ApiError::Unauthorized(
            "only the gig's poster or an admin may attach completed work".to_string(),
        ));
    }

    let status = status_of(&gig)?;
    if status != GigStatus::Approved {
        return Err(ApiError::InvalidState(format!(
            "completed work can only be attached to an approved gig, not one that is {}",
            status.as_str()
        )));
    }

    let (data, extension) = read_document_field(&mut multipart).await?;

    let stored_name = format!("{}{}", generate_raw_id(8), extension);
    let key = format!("completed/{}/{}", gig_id, stored_name);

    let url = state
        .storage
        .put(&key, data, content_type_for_extension(extension))
        .await
        .map_err(|e| ApiError::StorageFailure(e.to_string()))?;

    let attached = queries::attach_completed_work(&state.db, &gig_id, &url)
        .await
        .map_err(ApiError::DatabaseError)?;

    if attached == 0 {
        return Err(ApiError::Conflict(
            "gig state changed before the document could be attached".to_string(),
        ));
    }

    info!(user_id = %authed.id, gig_id = %gig_id, key = %key, "Completed work attached");

    let gig = load_gig(&state.db, &gig_id).await?;
    let gig = gig_response(&state.db, gig).await?;
    Ok(Json(UploadResponse { url, gig }))
}

/// GET /api/files/:area/:gig_id/:filename - serve locally stored blobs
pub async fn serve_file(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path((area, gig_id, filename)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if area != "submissions" && area != "completed" {
        return Err(ApiError::NotFound("file not found".to_string()));
    }
    for segment in [&gig_id, &filename] {
        if segment.contains('/') || segment.contains('\\') || segment.contains("..") {
            return Err(ApiError::NotFound("file not found".to_string()));
        }
    }

    let path = state
        .submissions_dir
        .join(&area)
        .join(&gig_id)
        .join(&filename);

    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("file not found".to_string()))?;

    let extension = filename
        .rfind('.')
        .map(|idx| &filename[idx..])
        .unwrap_or("");
    let content_type = content_type_for_extension(extension);

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
