//! Routes for the template library.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use fireside_cards::domain::templates::{DefaultScope, TemplateDraft, TemplatePatch};
use fireside_core::id::TemplateId;

use crate::error::ApiError;
use crate::routes::current_user;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    sheet_type: Option<String>,
}

#[derive(Deserialize)]
struct SetDefaultBody {
    scope: DefaultScope,
}

/// GET /
async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let items = state
        .templates
        .list(&user, query.sheet_type.as_deref())
        .await?;
    Ok(Json(json!({ "items": items })))
}

/// POST /
async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<TemplateDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = current_user(&headers)?;
    let item = state.templates.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}

/// GET /{id}
async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let item = state.templates.get(&user, TemplateId(id)).await?;
    Ok(Json(json!({ "item": item })))
}

/// PUT /{id}
async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(patch): Json<TemplatePatch>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let item = state.templates.update(&user, TemplateId(id), patch).await?;
    Ok(Json(json!({ "item": item })))
}

/// DELETE /{id}
async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = current_user(&headers)?;
    state.templates.delete(&user, TemplateId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{id}/default
async fn set_default(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<SetDefaultBody>,
) -> Result<Json<Value>, ApiError> {
    let user = current_user(&headers)?;
    let item = state
        .templates
        .set_default(&user, TemplateId(id), body.scope)
        .await?;
    Ok(Json(json!({ "item": item })))
}

/// Returns the router for the template library.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
        .route("/{id}/default", post(set_default))
}
