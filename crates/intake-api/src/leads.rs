//! Handlers for `/leads` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/leads` | JSON or multipart body; returns 201 + `{message, lead}` |
//! | `GET`   | `/leads` | Optional `search`, `status`, `page`; returns a [`LeadPage`] |
//! | `GET`   | `/leads/:id` | 404 if not found |
//! | `PATCH` | `/leads/:id` | Body: `{"status":"REACHED_OUT"}` |

use axum::{
  Json,
  extract::{
    FromRequest, Multipart, Path, Query, Request, State,
    multipart::MultipartError, rejection::JsonRejection,
  },
  http::{StatusCode, header},
  response::IntoResponse,
};
use intake_core::{
  attachment::{AttachmentStore, Upload},
  lead::{LeadPatch, LeadRecord, LeadStatus},
  query::{LeadPage, LeadQuery, StatusFilter, query},
  store::LeadStore,
  validate::{FieldError, LeadSubmission},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Name of the multipart part carrying the résumé.
const RESUME_FIELD: &str = "resume";

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreatedBody {
  pub message: &'static str,
  pub lead:    LeadRecord,
}

/// `POST /leads` — body is either JSON or `multipart/form-data` with an
/// optional `resume` file part.
///
/// The attachment is only written once every field has validated.
pub async fn create<S, A>(
  State(state): State<ApiState<S, A>>,
  req: Request,
) -> Result<impl IntoResponse, ApiError>
where
  S: LeadStore + 'static,
  A: AttachmentStore + 'static,
{
  let (submission, upload) = read_submission(req).await?;

  let upload_error = upload
    .as_ref()
    .and_then(|u| u.check(state.settings.max_upload_bytes).err());
  let new_lead = submission.validate_with(upload_error)?;

  let resume_filename = match upload {
    Some(upload) => Some(
      state
        .attachments
        .save(upload)
        .await
        .map_err(|e| ApiError::Attachment(Box::new(e)))?,
    ),
    None => None,
  };

  let lead = LeadRecord::new(new_lead, resume_filename);
  state
    .store
    .create(lead.clone())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    lead_id = %lead.id,
    with_resume = lead.resume_filename.is_some(),
    "lead created"
  );
  Ok((
    StatusCode::CREATED,
    Json(CreatedBody {
      message: "Lead created successfully",
      lead,
    }),
  ))
}

async fn read_submission(
  req: Request,
) -> Result<(LeadSubmission, Option<Upload>), ApiError> {
  let is_multipart = req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("multipart/form-data"));

  if !is_multipart {
    let Json(submission) = Json::<LeadSubmission>::from_request(req, &())
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    return Ok((submission, None));
  }

  let mut multipart = Multipart::from_request(req, &())
    .await
    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let mut submission = LeadSubmission::default();
  let mut upload = None;

  while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
    let name = field.name().unwrap_or_default().to_owned();

    if name == RESUME_FIELD {
      let file_name    = field.file_name().unwrap_or_default().to_owned();
      let content_type = field.content_type().map(str::to_owned);
      let bytes        = field.bytes().await.map_err(multipart_error)?;
      // Browsers send an empty, unnamed part when no file was chosen.
      if !file_name.is_empty() {
        upload = Some(Upload {
          file_name,
          content_type,
          bytes,
        });
      }
      continue;
    }

    let value = field.text().await.map_err(multipart_error)?;
    submission.set_form_field(&name, value)?;
  }

  Ok((submission, upload))
}

fn multipart_error(e: MultipartError) -> ApiError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    ApiError::PayloadTooLarge(e.body_text())
  } else {
    ApiError::BadRequest(e.body_text())
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
  /// `ALL` (default), `PENDING` or `REACHED_OUT`.
  pub status: Option<StatusFilter>,
  /// 1-indexed; defaults to 1.
  pub page:   Option<i64>,
}

/// `GET /leads[?search=...][&status=...][&page=...]`
pub async fn list<S, A>(
  State(state): State<ApiState<S, A>>,
  Query(params): Query<ListParams>,
) -> Result<Json<LeadPage>, ApiError>
where
  S: LeadStore + 'static,
  A: AttachmentStore + 'static,
{
  let all = state
    .store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let q = LeadQuery {
    search:    params.search,
    status:    params.status.unwrap_or_default(),
    page:      params.page.unwrap_or(1),
    page_size: state.settings.page_size,
  };
  let page = query(all, &q);

  tracing::debug!(
    total = page.total_count,
    returned = page.items.len(),
    page = page.page,
    "leads listed"
  );
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /leads/:id`
pub async fn get_one<S, A>(
  State(state): State<ApiState<S, A>>,
  Path(id): Path<String>,
) -> Result<Json<LeadRecord>, ApiError>
where
  S: LeadStore + 'static,
  A: AttachmentStore + 'static,
{
  let id = parse_id(&id)?;
  let lead = state
    .store
    .get(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(lead))
}

// ─── Update status ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: LeadStatus,
}

/// `PATCH /leads/:id` — body: `{"status":"PENDING"|"REACHED_OUT"}`.
///
/// Status only moves forward. Asking for the current status is a no-op;
/// asking to move a reached-out lead back to pending is a 409.
pub async fn update_status<S, A>(
  State(state): State<ApiState<S, A>>,
  Path(id): Path<String>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<LeadRecord>, ApiError>
where
  S: LeadStore + 'static,
  A: AttachmentStore + 'static,
{
  let id = parse_id(&id)?;
  let Json(body) = body.map_err(|rejection| match rejection {
    JsonRejection::JsonDataError(_) => ApiError::from(FieldError::new(
      "status",
      "Status must be PENDING or REACHED_OUT.",
    )),
    other => ApiError::BadRequest(other.body_text()),
  })?;

  let current = state
    .store
    .get(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;

  if !current.status.check_transition(id, body.status)? {
    return Ok(Json(current));
  }

  let updated = state
    .store
    .update(id, LeadPatch::status(body.status))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| not_found(id))?;

  tracing::info!(lead_id = %id, status = %updated.status, "lead status updated");
  Ok(Json(updated))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Ids that do not parse cannot name a stored lead.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("lead {raw} not found")))
}

fn not_found(id: Uuid) -> ApiError { ApiError::NotFound(format!("lead {id} not found")) }
