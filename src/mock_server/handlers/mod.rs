//! HTTP request handlers for the mock server.

pub mod entities;
pub mod entity_types;

pub use entities::*;
pub use entity_types::*;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::mock_server::state::MockState;

/// Upper bound the real API enforces on `pageSize`.
const MAX_PAGE_SIZE: usize = 500;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Build a Dynatrace-style error body: `{"error": {"code", "message"}}`.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": message.into()
            }
        })),
    )
        .into_response()
}

/// Check the `Authorization: Api-Token ...` header when the state requires one.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(ref required) = state.required_token else {
        return Ok(());
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Api-Token "));

    if provided == Some(required.as_str()) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing or invalid authorization token",
        ))
    }
}

/// Position in a paged listing, round-tripped through `nextPageKey`.
///
/// Encoded as `offset:pageSize:selector`; the selector is carried so the
/// follow-up request needs no other parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageCursor {
    pub offset: usize,
    pub page_size: usize,
    pub selector: String,
}

impl PageCursor {
    pub fn first(page_size: Option<u32>, selector: String) -> Result<Self, String> {
        let page_size = page_size.map_or(DEFAULT_PAGE_SIZE, |p| p as usize);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "Constraints violated: pageSize must be between 1 and {MAX_PAGE_SIZE}"
            ));
        }
        Ok(Self {
            offset: 0,
            page_size,
            selector,
        })
    }

    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.offset, self.page_size, self.selector)
    }

    pub fn decode(key: &str) -> Option<Self> {
        let mut parts = key.splitn(3, ':');
        let offset = parts.next()?.parse().ok()?;
        let page_size = parts
            .next()?
            .parse::<usize>()
            .ok()
            .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))?;
        let selector = parts.next()?.to_string();
        Some(Self {
            offset,
            page_size,
            selector,
        })
    }

    /// Slice one page out of `items` and compute the key of the next one.
    pub fn paginate<T: Clone>(&self, items: &[&T]) -> (Vec<T>, Option<String>) {
        let start = self.offset.min(items.len());
        let end = (start + self.page_size).min(items.len());
        let page = items[start..end].iter().map(|i| (*i).clone()).collect();

        let next = (end < items.len()).then(|| {
            Self {
                offset: end,
                page_size: self.page_size,
                selector: self.selector.clone(),
            }
            .encode()
        });

        (page, next)
    }
}

/// Resolve the cursor for a list request.
///
/// A `nextPageKey` must arrive alone; mixing it with query parameters is a
/// client error, as on the real API.
pub(crate) fn resolve_cursor(
    next_page_key: Option<&str>,
    has_other_params: bool,
    first: impl FnOnce() -> Result<PageCursor, String>,
) -> Result<PageCursor, Response> {
    match next_page_key {
        Some(_) if has_other_params => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Constraints violated: nextPageKey must not be combined with other query parameters",
        )),
        Some(key) => PageCursor::decode(key).ok_or_else(|| {
            error_response(StatusCode::BAD_REQUEST, format!("Invalid nextPageKey: {key}"))
        }),
        None => first().map_err(|msg| error_response(StatusCode::BAD_REQUEST, msg)),
    }
}
