//! Entity type endpoint handlers.

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
use crate::EntityType;

/// Query parameters for listing entity types.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntityTypesQuery {
    pub page_size: Option<u32>,
    pub next_page_key: Option<String>,
}

/// Response for listing entity types.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntityTypesResponse {
    pub total_count: u64,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_key: Option<String>,
    pub types: Vec<EntityType>,
}

/// GET /api/v2/entityTypes
pub async fn list_entity_types(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<ListEntityTypesQuery>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.requests_served += 1;

    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let cursor = match resolve_cursor(
        query.next_page_key.as_deref(),
        query.page_size.is_some(),
        || PageCursor::first(query.page_size, String::new()),
    ) {
        Ok(c) => c,
        Err(rejected) => return rejected,
    };

    let all_types = state.list_entity_types();
    let total_count = all_types.len() as u64;
    let (types, next_page_key) = cursor.paginate(&all_types);

    (
        StatusCode::OK,
        Json(ListEntityTypesResponse {
            total_count,
            page_size: cursor.page_size as u32,
            next_page_key,
            types,
        }),
    )
        .into_response()
}

/// GET /api/v2/entityTypes/{type}
pub async fn get_entity_type(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(type_name): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.requests_served += 1;

    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_entity_type(&type_name) {
        Some(entity_type) => (StatusCode::OK, Json(entity_type.clone())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Entity type {type_name} not found"),
        ),
    }
}
