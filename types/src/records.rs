//! Payload records as served by the remote API.
//!
//! Deserialization is lenient: the dashboard renders what it can. Absent,
//! `null` or oddly typed fields read as empty, so one odd record never blanks
//! a whole list. Ids are optional so that a missing id never accidentally
//! matches another record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_company")]
    pub company: Option<Company>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, rename = "userId", deserialize_with = "lenient_id")]
    pub user_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<u64>,
    #[serde(default, rename = "postId", deserialize_with = "lenient_id")]
    pub post_id: Option<u64>,
}

/// Strings as-is, numbers and booleans as their JSON text, anything else empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Non-negative integers only; anything else is treated as no id.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_u64())
}

fn lenient_company<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Company>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Company::deserialize(value).ok(),
        _ => None,
    })
}
