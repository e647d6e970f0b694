use axum::extract::{RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use stafflane_api::ApiError;
use stafflane_core::EntityRecord;
use stafflane_query::{ListEngine, Page};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/applications", get(list_applications))
        .route("/api/contacts", get(list_contacts))
        .route("/api/articles", get(list_articles))
        .route("/api/sectors", get(list_sectors))
        .route("/api/notices", get(list_notices))
        .route("/api/team-members", get(list_team_members))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list(
    state: &AppState,
    engine: &ListEngine,
    query: Option<String>,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let page = engine
        .execute(&state.store, query.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(page))
}

async fn list_applications(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.applications.clone();
    list(&state, &engine, query).await
}

async fn list_contacts(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.contacts.clone();
    list(&state, &engine, query).await
}

async fn list_articles(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.articles.clone();
    list(&state, &engine, query).await
}

async fn list_sectors(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.sectors.clone();
    list(&state, &engine, query).await
}

async fn list_notices(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.notices.clone();
    list(&state, &engine, query).await
}

async fn list_team_members(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<EntityRecord>>, ApiError> {
    let engine = state.engines.team_members.clone();
    list(&state, &engine, query).await
}
