use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Message;

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

// -- Messages --

/// Body of `POST /api/messages`.
///
/// Fields are kept as raw JSON values so that type mismatches surface as
/// the matching validation error instead of a deserialisation failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub nickname: Option<Value>,
}

/// Keeps an explicit `null` distinct from a missing field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMessageResponse {
    pub id: i64,
    pub created_at: i64,
}

/// Query string of both list endpoints.
///
/// Numbers arrive as strings and are parsed leniently by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub list: Vec<Message>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
