use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection},
};
use tracing::{debug, info, warn};

use messagewall_db::models::{MessageFilter, MessageRow, NewMessage};
use messagewall_types::api::{CreateMessageRequest, CreateMessageResponse, ListQuery, ListResponse};
use messagewall_types::models::{Identity, Message, MessageKind};

use crate::AppState;
use crate::error::ApiError;
use crate::validation;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Kind selection parsed from the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    Any,
    Only(MessageKind),
    /// Neither `all` nor a known kind. Matches nothing.
    Unknown,
}

impl KindFilter {
    pub fn parse(raw: Option<&str>, default: KindFilter) -> Self {
        // An empty `type=` reads as absent
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return default;
        };
        match raw.to_lowercase().as_str() {
            "all" => KindFilter::Any,
            other => other
                .parse()
                .map(KindFilter::Only)
                .unwrap_or(KindFilter::Unknown),
        }
    }
}

/// `page` is at least 1; `page_size` is clamped into 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    pub fn from_query(query: &ListQuery) -> Self {
        let page = parse_int(query.page.as_deref()).unwrap_or(1).max(1);
        let page_size = parse_int(query.page_size.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        // page >= 1 so this is never negative
        (self.page - 1).saturating_mul(self.page_size) as u64
    }
}

/// Reads a leading decimal integer the way query strings are usually
/// written by hand: `"10"`, `" 3"`, `"2abc"`. Returns `None` if no digits lead.
fn parse_int(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// POST /api/messages
///
/// Order matters: the cooldown is checked (and consumed) before the body is
/// validated, so a rejected body still starts the five-second window.
pub async fn create_message(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<Json<CreateMessageResponse>, ApiError> {
    // A body without a JSON content type reads as an empty object
    let req = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateMessageRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let now = chrono::Utc::now().timestamp_millis();

    if !state.rate_limiter.try_acquire(&identity, now) {
        debug!("Rejected post from {}: too frequent", identity);
        return Err(ApiError::TooFrequent);
    }

    let valid = validation::validate(&req)?;
    let kind = valid.kind;

    let db = state.clone();
    let author = identity.clone();
    let id = tokio::task::spawn_blocking(move || {
        db.db.insert_message(&NewMessage {
            identity: author.as_str(),
            nickname: &valid.nickname,
            content: &valid.content,
            kind: kind.as_str(),
            created_at: now,
        })
    })
    .await
    .map_err(|e| ApiError::Db(e.into()))?
    .map_err(ApiError::Db)?;

    info!("Message {} ({}) created by {}", id, kind, identity);

    Ok(Json(CreateMessageResponse {
        id,
        created_at: now,
    }))
}

/// GET /api/messages — public listing, `type` defaults to `wall`.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let kind = KindFilter::parse(query.kind.as_deref(), KindFilter::Only(MessageKind::Wall));
    let list = fetch(&state, None, kind, Page::from_query(&query)).await?;
    Ok(Json(ListResponse { list }))
}

/// GET /api/my-messages — the caller's own posts, `type` defaults to `all`.
pub async fn list_my_messages(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let kind = KindFilter::parse(query.kind.as_deref(), KindFilter::Any);
    let list = fetch(&state, Some(identity), kind, Page::from_query(&query)).await?;
    Ok(Json(ListResponse { list }))
}

async fn fetch(
    state: &AppState,
    identity: Option<Identity>,
    kind: KindFilter,
    page: Page,
) -> Result<Vec<Message>, ApiError> {
    let kind = match kind {
        KindFilter::Any => None,
        KindFilter::Only(kind) => Some(kind.as_str().to_string()),
        KindFilter::Unknown => return Ok(Vec::new()),
    };

    let filter = MessageFilter {
        kind,
        identity: identity.map(|i| i.as_str().to_string()),
        limit: page.page_size as u32,
        offset: page.offset(),
    };

    // Run blocking DB query off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_messages(&filter))
        .await
        .map_err(|e| ApiError::Db(e.into()))?
        .map_err(ApiError::Db)?;

    Ok(rows.into_iter().filter_map(to_message).collect())
}

fn to_message(row: MessageRow) -> Option<Message> {
    let kind = match row.kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Skipping message {} with corrupt kind: {}", row.id, e);
            return None;
        }
    };

    Some(Message {
        id: row.id,
        identity: row.identity,
        nickname: row.nickname,
        content: row.content,
        kind,
        created_at: row.created_at,
    })
}
