//! API models for entities, request payloads and response bodies

use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

pub mod note;
pub mod user;

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Treat `None` and empty strings alike: both count as a missing field.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Deserialize an optional id where `""` is the same as leaving it out.
pub(crate) fn blank_id<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => Uuid::parse_str(&raw).map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
