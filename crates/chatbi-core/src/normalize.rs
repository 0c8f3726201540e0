//! Message normalization.
//!
//! [`normalize`] turns a stored [`PersistedMessageRecord`] into an
//! in-memory [`Message`], reconciling every historical storage shape:
//! sub-fields serialized into JSON strings, flat legacy debug payloads,
//! and records with missing fields. It is pure, total, and idempotent:
//! a malformed message degrades to defaults instead of failing the
//! transcript load it is part of.

use crate::debug::{DebugBundle, DebugRecord};
use crate::result::TabularResult;
use crate::semantic::SemanticQueryDescriptor;
use crate::session::{Message, MessageRole, PersistedMessageRecord};
use serde_json::Value;

/// Unwraps a sub-field that may be JSON serialized into a string.
///
/// A string that parses as JSON is replaced by its parsed value; a string
/// that does not parse is kept as-is rather than discarded.
fn unwrap_serialized(value: Value) -> Value {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

/// Interprets the stored `debug_info` value as a structured bundle.
fn normalize_debug(value: Value) -> Option<DebugBundle> {
    match unwrap_serialized(value) {
        Value::Null => None,
        Value::Object(map) => Some(DebugRecord::classify(map).upgrade()),
        // A string that was not JSON, or a non-object payload: preserve
        // it verbatim so diagnostics are never silently lost.
        Value::String(s) => Some(DebugBundle::from_raw(s)),
        other => Some(DebugBundle::from_raw(other.to_string())),
    }
}

/// Normalizes a stored message record into an in-memory message.
///
/// Guarantees:
/// - never panics, whatever the record contains;
/// - `normalize` applied to the record of its own output is a no-op;
/// - if `debug_info` is absent but `execution_result` is present, a
///   minimal bundle holding only the execution section is synthesized so
///   downstream rendering always sees a uniform shape.
///
/// A record without an id yields a message with an empty id; callers that
/// need client-side identity (e.g. the transcript loader) assign one.
pub fn normalize(record: &PersistedMessageRecord) -> Message {
    let role = match record.role.as_deref() {
        Some("user") => MessageRole::User,
        // "assistant", "system", unknown and missing roles all render as
        // assistant turns; the client only distinguishes its own input.
        _ => MessageRole::Assistant,
    };

    let semantic_sql = record
        .semantic_sql
        .clone()
        .map(unwrap_serialized)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value::<SemanticQueryDescriptor>(v).ok());

    let execution_result = record
        .execution_result
        .clone()
        .map(unwrap_serialized)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value::<TabularResult>(v).ok());

    let mut debug_info = record.debug_info.clone().and_then(normalize_debug);

    // Uniform shape: executed turns always expose an execution section.
    if debug_info.is_none() {
        if let Some(result) = &execution_result {
            if let Ok(value) = serde_json::to_value(result) {
                debug_info = Some(DebugBundle::from_execution(value));
            }
        }
    }

    Message {
        id: record.id.clone().unwrap_or_default(),
        role,
        content: record.content.clone().unwrap_or_default(),
        created_at: record.created_at.clone().unwrap_or_default(),
        semantic_sql,
        sql_query: record.sql_query.clone(),
        execution_result,
        debug_info,
    }
}

/// Normalizes a whole stored transcript, one message at a time.
///
/// Each record is normalized independently; a malformed record degrades
/// to defaults without affecting the rest of the batch.
pub fn normalize_batch(records: &[PersistedMessageRecord]) -> Vec<Message> {
    records.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> PersistedMessageRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_plain_record() {
        let message = normalize(&record(json!({
            "id": 7,
            "role": "user",
            "content": "show me sales",
            "created_at": "2024-03-01T10:00:00Z"
        })));
        assert_eq!(message.id, "7");
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.content, "show me sales");
        assert!(message.debug_info.is_none());
    }

    #[test]
    fn test_string_serialized_sub_fields() {
        let message = normalize(&record(json!({
            "id": "m1",
            "role": "assistant",
            "content": "here you go",
            "semantic_sql": "{\"tables\":[\"orders\"]}",
            "execution_result": "{\"success\":true,\"data\":[{\"n\":1}],\"row_count\":1}"
        })));
        assert_eq!(
            message.semantic_sql.as_ref().unwrap().tables,
            vec!["orders"]
        );
        let result = message.execution_result.as_ref().unwrap();
        assert!(result.success);
        assert_eq!(result.row_count, Some(1));
    }

    #[test]
    fn test_unparseable_debug_string_is_kept_raw() {
        let message = normalize(&record(json!({
            "role": "assistant",
            "content": "x",
            "debug_info": "not json at all {"
        })));
        let bundle = message.debug_info.unwrap();
        assert_eq!(bundle.raw.as_deref(), Some("not json at all {"));
        assert!(bundle.model_debug.is_none());
    }

    #[test]
    fn test_legacy_debug_shape_upgrades() {
        let message = normalize(&record(json!({
            "role": "assistant",
            "content": "x",
            "debug_info": {"provider": "x", "model": "y"}
        })));
        let bundle = message.debug_info.unwrap();
        assert_eq!(
            bundle.model_debug,
            Some(json!({"provider": "x", "model": "y"}))
        );
    }

    #[test]
    fn test_execution_without_debug_synthesizes_bundle() {
        let message = normalize(&record(json!({
            "role": "assistant",
            "content": "x",
            "execution_result": {"success": true, "data": [], "row_count": 0}
        })));
        let bundle = message.debug_info.unwrap();
        assert!(bundle.sql_execution.is_some());
        assert!(bundle.request.is_none());
    }

    #[test]
    fn test_malformed_record_degrades_to_defaults() {
        let message = normalize(&record(json!({
            "semantic_sql": 12345,
            "execution_result": [1, 2, 3],
            "debug_info": 6.5
        })));
        assert_eq!(message.id, "");
        assert_eq!(message.content, "");
        assert_eq!(message.role, MessageRole::Assistant);
        assert!(message.semantic_sql.is_none());
        assert!(message.execution_result.is_none());
        // Non-object debug payloads are preserved verbatim.
        assert_eq!(message.debug_info.unwrap().raw.as_deref(), Some("6.5"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let records = [
            record(json!({
                "id": 1,
                "role": "assistant",
                "content": "a",
                "created_at": "2024-01-01T00:00:00Z",
                "sql_query": "SELECT 1",
                "semantic_sql": "{\"tables\":[\"t\"]}",
                "execution_result": {"success": true, "data": [{"n": 1}], "row_count": 1},
                "debug_info": {"provider": "x", "error": null}
            })),
            record(json!({"role": "user", "content": "b"})),
            record(json!({"debug_info": "broken {"})),
        ];
        for stored in &records {
            let once = normalize(stored);
            let again = normalize(&PersistedMessageRecord::from(&once));
            assert_eq!(once, again);
        }
    }

    #[test]
    fn test_batch_survives_one_bad_record() {
        let records = vec![
            record(json!({"role": "user", "content": "fine"})),
            record(json!({"debug_info": {"nested": {"deeply": true}}})),
            record(json!({"role": "assistant", "content": "also fine"})),
        ];
        let messages = normalize_batch(&records);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "fine");
        assert_eq!(messages[2].content, "also fine");
    }
}
