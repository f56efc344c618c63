//! Deserializers that never fail on well formed JSON. A value of an unexpected type is treated as
//! if it was missing.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use super::entities::{Bucket, Event, EventData};

pub fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

pub fn seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite() && *v >= 0.),
        _ => None,
    })
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        _ => None,
    })
}

pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        v @ Value::Object(_) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

/// Any truthy value counts as present data. Only objects can carry `app` and `title`, anything
/// else results in default labels.
pub fn event_data<'de, D>(deserializer: D) -> Result<Option<EventData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !is_truthy(&value) {
        return Ok(None);
    }
    Ok(Some(match value {
        v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
        _ => EventData::default(),
    }))
}

pub fn buckets<'de, D>(deserializer: D) -> Result<Vec<Bucket>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<(String, Value)> = match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, v)| (index.to_string(), v))
            .collect(),
        _ => vec![],
    };

    Ok(entries
        .into_iter()
        .map(|(id, value)| bucket_from_value(id, value))
        .collect())
}

fn bucket_from_value(id: String, value: Value) -> Bucket {
    let Value::Object(mut map) = value else {
        return Bucket {
            id,
            ..Default::default()
        };
    };

    let kind = match map.remove("type") {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };

    let events = match map.remove("events") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value::<Event>(v).ok())
            .collect(),
        _ => vec![],
    };

    Bucket { id, kind, events }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0. && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
