//! Entity endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{authorize, error_response, resolve_cursor, PageCursor};
use crate::mock_server::state::MockState;
use crate::Entity;

/// Query parameters for listing entities.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntitiesQuery {
    pub page_size: Option<u32>,
    pub entity_selector: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub fields: Option<String>,
    pub next_page_key: Option<String>,
}

impl ListEntitiesQuery {
    fn has_other_params(&self) -> bool {
        self.page_size.is_some()
            || self.entity_selector.is_some()
            || self.from.is_some()
            || self.to.is_some()
            || self.fields.is_some()
    }
}

/// Response for listing entities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntitiesResponse {
    pub total_count: u64,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_key: Option<String>,
    pub entities: Vec<Entity>,
}

/// GET /api/v2/entities
pub async fn list_entities(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListEntitiesQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.requests_served += 1;

    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let cursor = match resolve_cursor(
        query.next_page_key.as_deref(),
        query.has_other_params(),
        || match query.entity_selector.clone() {
            Some(selector) => PageCursor::first(query.page_size, selector),
            None => Err("Constraints violated: entitySelector is required".to_string()),
        },
    ) {
        Ok(c) => c,
        Err(rejected) => return rejected,
    };

    let selected = match state.select_entities(&cursor.selector) {
        Ok(s) => s,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, msg),
    };

    let total_count = selected.len() as u64;
    let (entities, next_page_key) = cursor.paginate(&selected);

    (
        StatusCode::OK,
        Json(ListEntitiesResponse {
            total_count,
            page_size: cursor.page_size as u32,
            next_page_key,
            entities,
        }),
    )
        .into_response()
}

/// GET /api/v2/entities/{entityId}
pub async fn get_entity(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(entity_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.requests_served += 1;

    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_entity(&entity_id) {
        Some(entity) => (StatusCode::OK, Json(entity.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Entity {entity_id} not found"),
        ),
    }
}
