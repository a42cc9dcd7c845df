//! JSON HTTP API (`docs serve`).
//!
//! # Endpoints
//!
//! | Method | Path | Access | Description |
//! |--------|------|--------|-------------|
//! | `GET`  | `/health` | anyone | Health check (returns version) |
//! | `GET`  | `/sections` | anyone | All sections in display order |
//! | `GET`  | `/sections/{id}` | anyone | One section (id or slug) with rendered HTML |
//! | `GET`  | `/sections/{id}/examples` | anyone | Code examples for a section |
//! | `POST` | `/sections/{id}/feedback` | anyone | "Was this helpful?" vote |
//! | `GET`  | `/search?q=` | anyone | Substring search over titles and content |
//! | `POST` | `/sections` | admin | Create a section |
//! | `PUT`  | `/sections/{id}` | admin | Replace a section |
//! | `DELETE` | `/sections/{id}?confirm=true` | admin | Delete a section |
//!
//! Writes go through the same editor validation as the CLI. Callers
//! authenticate with `Authorization: Bearer <token>`; see [`crate::auth`].
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "validation", "message": "Title is required",
//!              "fields": [ { "field": "title", "message": "Title is required" } ] } }
//! ```
//!
//! Error codes: `bad_request` (400), `unauthorized` (401), `forbidden` (403),
//! `not_found` (404), `confirmation_required` (409), `validation` (422),
//! `internal` (500).

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use docbase_core::auth::{Actor, Role};
use docbase_core::editor::{
    EditorError, Field, FieldError, SaveOutcome, SectionDraft, SectionEditor,
};
use docbase_core::models::{CodeExample, DocumentationSection, Feedback};
use docbase_core::search::SearchResult;
use docbase_core::store::{SectionRepository, StoreError};

use crate::auth::{resolve_actor, TokenError};
use crate::config::Config;
use crate::db;
use crate::events::{self, DocEvent};
use crate::search::search_sections;
use crate::sections::{section_view, SectionView};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    repo: Arc<dyn SectionRepository>,
}

impl AppState {
    pub fn new(config: Config, repo: Arc<dyn SectionRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repo,
        }
    }

    fn actor(&self, headers: &HeaderMap) -> Result<Actor, AppError> {
        let header = headers.get(AUTHORIZATION).map(|v| v.to_str().unwrap_or(""));
        resolve_actor(&self.config.auth, header).map_err(|e| match e {
            TokenError::Malformed => unauthorized("expected 'Authorization: Bearer <token>'"),
            TokenError::Unknown => unauthorized("unknown token"),
        })
    }
}

/// Starts the HTTP server on `[server].bind`. Runs until the process exits.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let repo = db::open_repository(config).await?;
    let state = AppState::new(config.clone(), Arc::new(repo));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("Docs server listening on http://{}", bind_addr);
    tracing::info!(bind = %bind_addr, "server started");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/sections", get(handle_list_sections).post(handle_create_section))
        .route(
            "/sections/{id}",
            get(handle_get_section)
                .put(handle_update_section)
                .delete(handle_delete_section),
        )
        .route("/sections/{id}/examples", get(handle_list_examples))
        .route("/sections/{id}/feedback", post(handle_feedback))
        .route("/search", get(handle_search))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    fields: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                fields: self.fields,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn app_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> AppError {
    AppError {
        status,
        code,
        message: message.into(),
        fields: Vec::new(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    app_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn unauthorized(message: impl Into<String>) -> AppError {
    app_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

fn forbidden(message: impl Into<String>) -> AppError {
    app_error(StatusCode::FORBIDDEN, "forbidden", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    app_error(StatusCode::NOT_FOUND, "not_found", message)
}

fn validation(fields: Vec<FieldError>) -> AppError {
    let message = fields
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    AppError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        code: "validation",
        message,
        fields,
    }
}

/// Map repository failures: known store errors become client errors,
/// everything else is logged and reported as `internal`.
fn repository_error(err: anyhow::Error) -> AppError {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::SectionNotFound(id)) => not_found(format!("section not found: {}", id)),
        Some(StoreError::DuplicateSlug(slug)) => validation(vec![FieldError {
            field: Field::Slug,
            message: format!("Slug '{}' is already in use", slug),
        }]),
        None => {
            tracing::error!(error = %format!("{:#}", err), "repository call failed");
            app_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                format!("{:#}", err),
            )
        }
    }
}

fn editor_error(err: EditorError) -> AppError {
    match err {
        EditorError::PermissionDenied(message) => forbidden(message),
        EditorError::Validation(errors) => validation(errors.errors),
        EditorError::Repository(e) => repository_error(e),
        other => app_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", other.to_string()),
    }
}

/// Writes are denied before any repository call: 401 without a token,
/// 403 for a non-admin token.
fn require_writer(actor: &Actor) -> Result<(), AppError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Anonymous => Err(unauthorized("authentication required")),
        Role::Reader => Err(forbidden("only admins can edit documentation")),
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| bad_request(format!("invalid request body: {}", e.body_text())))
}

/// Find a section by id, then by slug.
async fn lookup(repo: &dyn SectionRepository, key: &str) -> Result<DocumentationSection, AppError> {
    if let Some(section) = repo.get_section(key).await.map_err(repository_error)? {
        return Ok(section);
    }
    repo.list_sections()
        .await
        .map_err(repository_error)?
        .into_iter()
        .find(|s| s.slug == key)
        .ok_or_else(|| not_found(format!("section not found: {}", key)))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ Sections (read) ============

#[derive(Serialize)]
struct SectionListResponse {
    sections: Vec<DocumentationSection>,
}

async fn handle_list_sections(
    State(state): State<AppState>,
) -> Result<Json<SectionListResponse>, AppError> {
    let sections = state.repo.list_sections().await.map_err(repository_error)?;
    Ok(Json(SectionListResponse { sections }))
}

async fn handle_get_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SectionView>, AppError> {
    let section = lookup(state.repo.as_ref(), &id).await?;
    let view = section_view(state.repo.as_ref(), section)
        .await
        .map_err(repository_error)?;
    Ok(Json(view))
}

#[derive(Serialize)]
struct ExampleListResponse {
    examples: Vec<CodeExample>,
}

async fn handle_list_examples(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExampleListResponse>, AppError> {
    let section = lookup(state.repo.as_ref(), &id).await?;
    let examples = state
        .repo
        .list_code_examples(&section.id)
        .await
        .map_err(repository_error)?;
    Ok(Json(ExampleListResponse { examples }))
}

// ============ POST /sections/{id}/feedback ============

#[derive(Deserialize)]
struct FeedbackRequest {
    helpful: bool,
    #[serde(default)]
    message: String,
}

async fn handle_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let actor = state.actor(&headers)?;
    let request = json_body(body)?;
    let section = lookup(state.repo.as_ref(), &id).await?;
    let feedback = state
        .repo
        .submit_feedback(&section.id, request.helpful, &request.message, actor.user_id.as_deref())
        .await
        .map_err(repository_error)?;
    events::emit(DocEvent::FeedbackSubmitted {
        section_id: &feedback.section_id,
        helpful: feedback.helpful,
    });
    Ok((StatusCode::CREATED, Json(feedback)))
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    outcome: &'static str,
    results: Vec<SearchResult>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let outcome = search_sections(state.repo.as_ref(), &state.config.search.options(), &params.q)
        .await
        .map_err(repository_error)?;
    Ok(Json(SearchResponse {
        outcome: outcome.kind(),
        results: outcome.results().to_vec(),
        query: params.q,
    }))
}

// ============ Sections (write) ============

async fn handle_create_section(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SectionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentationSection>), AppError> {
    let actor = state.actor(&headers)?;
    require_writer(&actor)?;
    let draft = json_body(body)?;

    let mut editor = SectionEditor::from_draft(draft);
    let section = match editor
        .save(state.repo.as_ref(), &actor)
        .await
        .map_err(editor_error)?
    {
        SaveOutcome::Created(section) => section,
        SaveOutcome::Updated(id) => lookup(state.repo.as_ref(), &id).await?,
    };
    events::emit(DocEvent::SectionCreated {
        id: &section.id,
        slug: &section.slug,
        actor: actor.user_id.as_deref(),
    });
    Ok((StatusCode::CREATED, Json(section)))
}

async fn handle_update_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<SectionDraft>, JsonRejection>,
) -> Result<Json<DocumentationSection>, AppError> {
    let actor = state.actor(&headers)?;
    require_writer(&actor)?;
    let draft = json_body(body)?;
    let current = lookup(state.repo.as_ref(), &id).await?;

    let mut editor = SectionEditor::from_draft(draft).for_section(current.id.clone());
    editor
        .save(state.repo.as_ref(), &actor)
        .await
        .map_err(editor_error)?;
    events::emit(DocEvent::SectionUpdated {
        id: &current.id,
        actor: actor.user_id.as_deref(),
    });

    let section = lookup(state.repo.as_ref(), &current.id).await?;
    Ok(Json(section))
}

#[derive(Deserialize)]
struct DeleteParams {
    #[serde(default)]
    confirm: bool,
}

#[derive(Serialize)]
struct DeleteResponse {
    deleted: String,
}

async fn handle_delete_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>, AppError> {
    let actor = state.actor(&headers)?;
    require_writer(&actor)?;
    if !params.confirm {
        return Err(app_error(
            StatusCode::CONFLICT,
            "confirmation_required",
            "deleting a section cannot be undone; repeat with ?confirm=true",
        ));
    }

    let section = lookup(state.repo.as_ref(), &id).await?;
    let mut editor = SectionEditor::edit(&section);
    editor.request_delete().map_err(editor_error)?;
    editor
        .confirm_delete(state.repo.as_ref(), &actor)
        .await
        .map_err(editor_error)?;
    events::emit(DocEvent::SectionDeleted {
        id: &section.id,
        actor: actor.user_id.as_deref(),
    });
    Ok(Json(DeleteResponse {
        deleted: section.id,
    }))
}
