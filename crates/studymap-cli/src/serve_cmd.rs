use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use studymap_core::{progress, synthesize, ChatRouter, ItemSelector, PlanMode};
use studymap_db::models::StoredRoadmap;
use studymap_db::queries::roadmaps;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and wire types
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    chat: Arc<ChatRouter>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoadmapRequest {
    pub text: String,
    /// "exam" or "placement"; defaults to exam.
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// 1-based period index.
    pub period: u32,
    /// Item label, or a 1-based item index as a string.
    pub item: String,
}

#[derive(Debug, Serialize)]
pub struct RoadmapSummary {
    pub id: Uuid,
    pub title: String,
    pub mode: String,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&StoredRoadmap> for RoadmapSummary {
    fn from(r: &StoredRoadmap) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            mode: r.mode.clone(),
            progress: r.progress,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(pool: PgPool, chat: Arc<ChatRouter>) -> Router {
    let state = AppState { pool, chat };
    Router::new()
        .route("/", get(index))
        .route("/api/roadmaps", post(create_roadmap).get(list_roadmaps))
        .route(
            "/api/roadmaps/{id}",
            get(get_roadmap).delete(delete_roadmap),
        )
        .route("/api/roadmaps/{id}/progress", patch(toggle_progress))
        .route("/api/chat", post(chat_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(pool: PgPool, chat: Arc<ChatRouter>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(pool, chat);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("studymap serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("studymap serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Roadmap routes are per-owner; the owner comes from this header.
const OWNER_HEADER: &str = "x-owner-id";

fn owner_from(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let raw = headers
        .get(OWNER_HEADER)
        .ok_or_else(|| AppError::bad_request(format!("missing {OWNER_HEADER} header")))?
        .to_str()
        .map_err(|_| AppError::bad_request(format!("malformed {OWNER_HEADER} header")))?;
    Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request(format!("{OWNER_HEADER} is not a valid UUID")))
}

async fn index() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html>\
<html><head><title>studymap</title></head><body>\
<h1>studymap</h1>\
<p>POST /api/roadmaps | GET /api/roadmaps | GET /api/roadmaps/{id} | \
PATCH /api/roadmaps/{id}/progress | DELETE /api/roadmaps/{id} | POST /api/chat</p>\
<p>Roadmap routes require an <code>x-owner-id</code> header.</p>\
</body></html>",
    )
}

async fn create_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateRoadmapRequest>,
) -> Result<axum::response::Response, AppError> {
    let owner = owner_from(&headers)?;
    if req.text.trim().is_empty() {
        return Err(AppError::bad_request("text must not be empty"));
    }

    let mode = match req.mode.as_deref() {
        None => PlanMode::Exam,
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::bad_request(format!("invalid mode: {raw:?}")))?,
    };

    let roadmap = synthesize(&req.text, mode);
    let stored = roadmaps::insert_roadmap(&state.pool, owner, &roadmap, mode)
        .await
        .map_err(AppError::internal)?;

    Ok((StatusCode::CREATED, Json(stored)).into_response())
}

async fn list_roadmaps(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<axum::response::Response, AppError> {
    let owner = owner_from(&headers)?;
    let rows = roadmaps::list_roadmaps(&state.pool, owner)
        .await
        .map_err(AppError::internal)?;
    let summaries: Vec<RoadmapSummary> = rows.iter().map(RoadmapSummary::from).collect();
    Ok(Json(summaries).into_response())
}

async fn get_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let owner = owner_from(&headers)?;
    let stored = roadmaps::get_roadmap(&state.pool, id, owner)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("roadmap {id} not found")))?;
    Ok(Json(stored).into_response())
}

async fn toggle_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Result<axum::response::Response, AppError> {
    let owner = owner_from(&headers)?;
    let selector = ItemSelector::parse(&req.item);

    // Optimistic-lock loop: re-read and retry when a concurrent writer
    // updated the row between our read and write.
    for _ in 0..3 {
        let stored = roadmaps::get_roadmap(&state.pool, id, owner)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::not_found(format!("roadmap {id} not found")))?;
        let roadmap = stored.roadmap().map_err(AppError::internal)?;

        let updated = progress::toggle(&roadmap, req.period, &selector)
            .map_err(|e| AppError::bad_request(e.to_string()))?;

        let replaced =
            roadmaps::replace_roadmap(&state.pool, id, owner, &updated, stored.updated_at)
                .await
                .map_err(AppError::internal)?;
        if let Some(saved) = replaced {
            return Ok(Json(saved).into_response());
        }
    }

    Err(AppError::conflict(format!(
        "roadmap {id} is being updated concurrently, try again"
    )))
}

async fn delete_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, AppError> {
    let owner = owner_from(&headers)?;
    let removed = roadmaps::delete_roadmap(&state.pool, id, owner)
        .await
        .map_err(AppError::internal)?;
    if removed {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(AppError::not_found(format!("roadmap {id} not found")))
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<axum::response::Response, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }
    let reply = state.chat.respond(&req.message, &[]).await;
    Ok(Json(ChatResponse { reply }).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use sqlx::PgPool;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use studymap_core::ChatRouter;
    use studymap_test_utils::{create_test_db, drop_test_db};

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn app(pool: PgPool) -> axum::Router {
        super::build_router(pool, Arc::new(ChatRouter::local()))
    }

    async fn send(
        pool: PgPool,
        method: Method,
        uri: &str,
        owner: Option<Uuid>,
        body: Option<serde_json::Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(owner) = owner {
            builder = builder.header("x-owner-id", owner.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app(pool).oneshot(request).await.unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_roadmap(pool: &PgPool, owner: Uuid, text: &str) -> serde_json::Value {
        let resp = send(
            pool.clone(),
            Method::POST,
            "/api/roadmaps",
            Some(owner),
            Some(serde_json::json!({ "text": text })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_html() {
        let (pool, db_name) = create_test_db().await;

        let resp = send(pool.clone(), Method::GET, "/", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_roadmap() {
        let (pool, db_name) = create_test_db().await;
        let owner = Uuid::new_v4();

        let json = create_roadmap(&pool, owner, "Google interview preparation roadmap").await;
        assert_eq!(json["title"], "Google - Interview Preparation");
        assert_eq!(json["progress"], 0);
        assert_eq!(json["mode"], "exam");
        let periods = json["body"]["periods"]
            .as_array()
            .expect("body should carry periods");
        assert_eq!(periods.len(), 8);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_requires_owner_header() {
        let (pool, db_name) = create_test_db().await;

        let resp = send(
            pool.clone(),
            Method::POST,
            "/api/roadmaps",
            None,
            Some(serde_json::json!({ "text": "jee" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_rejects_blank_text() {
        let (pool, db_name) = create_test_db().await;
        let owner = Uuid::new_v4();

        let resp = send(
            pool.clone(),
            Method::POST,
            "/api/roadmaps",
            Some(owner),
            Some(serde_json::json!({ "text": "   " })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let (pool, db_name) = create_test_db().await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        create_roadmap(&pool, alice, "10th icse").await;
        create_roadmap(&pool, bob, "neet").await;

        let resp = send(pool.clone(), Method::GET, "/api/roadmaps", Some(alice), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let arr = json.as_array().expect("response should be an array");
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["title"], "10th ICSE Board Exam - Complete Preparation");
        assert!(
            arr[0].get("body").is_none(),
            "list view should not include the full body"
        );

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_get_roadmap_not_found() {
        let (pool, db_name) = create_test_db().await;

        let random_id = Uuid::new_v4();
        let resp = send(
            pool.clone(),
            Method::GET,
            &format!("/api/roadmaps/{random_id}"),
            Some(Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_toggle_progress() {
        let (pool, db_name) = create_test_db().await;
        let owner = Uuid::new_v4();

        let created = create_roadmap(&pool, owner, "10th icse").await;
        let id = created["id"].as_str().unwrap();

        let resp = send(
            pool.clone(),
            Method::PATCH,
            &format!("/api/roadmaps/{id}/progress"),
            Some(owner),
            Some(serde_json::json!({ "period": 1, "item": "1" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["progress"], 2);

        // Toggling the same item again restores 0%.
        let resp = send(
            pool.clone(),
            Method::PATCH,
            &format!("/api/roadmaps/{id}/progress"),
            Some(owner),
            Some(serde_json::json!({ "period": 1, "item": "1" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["progress"], 0);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_toggle_bad_item_is_rejected() {
        let (pool, db_name) = create_test_db().await;
        let owner = Uuid::new_v4();

        let created = create_roadmap(&pool, owner, "ccna").await;
        let id = created["id"].as_str().unwrap();

        let resp = send(
            pool.clone(),
            Method::PATCH,
            &format!("/api/roadmaps/{id}/progress"),
            Some(owner),
            Some(serde_json::json!({ "period": 99, "item": "1" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_delete_roadmap() {
        let (pool, db_name) = create_test_db().await;
        let owner = Uuid::new_v4();

        let created = create_roadmap(&pool, owner, "python").await;
        let id = created["id"].as_str().unwrap();

        let resp = send(
            pool.clone(),
            Method::DELETE,
            &format!("/api/roadmaps/{id}"),
            Some(owner),
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = send(
            pool.clone(),
            Method::GET,
            &format!("/api/roadmaps/{id}"),
            Some(owner),
            None,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_chat_returns_roadmap_narrative() {
        let (pool, db_name) = create_test_db().await;

        let resp = send(
            pool.clone(),
            Method::POST,
            "/api/chat",
            None,
            Some(serde_json::json!({ "message": "roadmap for jee" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let reply = json["reply"].as_str().expect("reply should be a string");
        assert!(reply.contains("JEE"));
        assert!(reply.contains("Week 1"));

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let (pool, db_name) = create_test_db().await;

        let resp = send(
            pool.clone(),
            Method::POST,
            "/api/chat",
            None,
            Some(serde_json::json!({ "message": "" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }
}
