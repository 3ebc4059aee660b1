//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::artifact::{ArtifactSummary, DEFAULT_MIME};
use crate::models::section::SectionEntry;
use crate::navigation::view::{
    manager_view, page_response, section_view, ArtifactGroup, PageResponse, SectionView,
};
use crate::navigation::NavAction;
use crate::session::upload::read_upload_form;
use crate::state::AppState;
use crate::store::StoreError;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddSectionRequest {
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct AddSectionResponse {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub artifact_id: String,
    pub section_key: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), AppError> {
    let session_id = state.sessions.create().await?;
    info!(
        "Created session {session_id} ({} live)",
        state.sessions.len().await
    );
    Ok((StatusCode::CREATED, Json(SessionCreatedResponse { session_id })))
}

/// GET /api/v1/sessions/:sid/page
///
/// The page the session is currently on, after render-time validation.
pub async fn handle_get_page(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<PageResponse>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    session.store.reconcile();
    Ok(Json(page_response(
        &session.store,
        &state.assets,
        &session.navigator,
    )))
}

/// POST /api/v1/sessions/:sid/navigation
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(action): Json<NavAction>,
) -> Result<Json<PageResponse>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    session.store.reconcile();

    let session = &mut *session;
    let page = session.navigator.apply(&session.store, action)?;
    debug!("Session {sid} now on {page:?}");
    Ok(Json(page_response(
        &session.store,
        &state.assets,
        &session.navigator,
    )))
}

/// GET /api/v1/sessions/:sid/sections
pub async fn handle_list_sections(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Vec<SectionEntry>>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let session = session.lock().await;
    Ok(Json(session.store.sections()))
}

/// POST /api/v1/sessions/:sid/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(request): Json<AddSectionRequest>,
) -> Result<(StatusCode, Json<AddSectionResponse>), AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    let key = session.store.add_custom_section(&request.label)?;
    Ok((StatusCode::CREATED, Json(AddSectionResponse { key })))
}

/// GET /api/v1/sessions/:sid/sections/:key
pub async fn handle_get_section(
    State(state): State<AppState>,
    Path((sid, key)): Path<(Uuid, String)>,
) -> Result<Json<SectionView>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    session.store.reconcile();
    Ok(Json(section_view(&session.store, &state.assets, &key)?))
}

/// GET /api/v1/sessions/:sid/artifacts
///
/// Artefacts manager: every artefact, grouped by section.
pub async fn handle_list_artifacts(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> Result<Json<Vec<ArtifactGroup>>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    session.store.reconcile();
    Ok(Json(manager_view(&session.store)))
}

/// POST /api/v1/sessions/:sid/artifacts
///
/// Multipart fields: `file`, `assign_to`, `new_section_label`.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let (file, target) = read_upload_form(multipart).await?.into_parts()?;

    let mut session = session.lock().await;
    let artifact_id = session.store.add_artifact(file, target)?;
    let section_key = session
        .store
        .artifact(&artifact_id)
        .map(|a| a.section_key.clone())
        .ok_or_else(|| StoreError::InconsistentState(format!("{artifact_id} vanished")))?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            artifact_id,
            section_key,
        }),
    ))
}

/// GET /api/v1/sessions/:sid/artifacts/:id
pub async fn handle_get_artifact(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, String)>,
) -> Result<Json<ArtifactSummary>, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let session = session.lock().await;
    let artifact = session
        .store
        .artifact(&id)
        .ok_or_else(|| AppError::NotFound(format!("Artefact {id} not found")))?;
    Ok(Json(artifact.summary()))
}

/// GET /api/v1/sessions/:sid/artifacts/:id/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let download = session.lock().await.store.download(&id)?;

    let content_type = HeaderValue::from_str(&download.mime)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME));
    let disposition = HeaderValue::from_str(&content_disposition(&download.name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}

/// DELETE /api/v1/sessions/:sid/artifacts/:id
pub async fn handle_remove_artifact(
    State(state): State<AppState>,
    Path((sid, id)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get_or_init(sid).await?;
    let mut session = session.lock().await;
    session.store.remove_artifact(&id)?;
    debug!(
        "Session {sid} holds {} artefacts",
        session.store.artifact_count()
    );
    Ok(StatusCode::NO_CONTENT)
}

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment; filename="..."` with the name reduced to printable ASCII.
/// Names that lose characters in that reduction also get a UTF-8
/// `filename*` parameter carrying the exact name.
fn content_disposition(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    if safe == name {
        return format!("attachment; filename=\"{safe}\"");
    }
    let encoded = utf8_percent_encode(name, ATTR_CHAR);
    format!("attachment; filename=\"{safe}\"; filename*=UTF-8''{encoded}")
}
