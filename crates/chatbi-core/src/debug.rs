//! Diagnostic payloads attached to assistant messages.
//!
//! Stored messages carry debug payloads in two historical shapes: a flat
//! legacy object (provider, model, prompt, raw response, ...) written by
//! early backends, and the current structured shape with named sections.
//! Both are modeled here as an explicit tagged union, [`DebugRecord`],
//! with a single upgrade path into the structured [`DebugBundle`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that identify the structured debug shape.
///
/// `ollama` is the section name an early backend used for what is now
/// `model_debug`; it still counts as structured so those bundles are not
/// re-wrapped on load.
const STRUCTURED_KEYS: &[&str] = &[
    "request",
    "response",
    "model_debug",
    "modelDebug",
    "ollama",
    "sql_execution",
    "sqlExecution",
    "raw",
];

/// Keys of the flat legacy debug shape.
const LEGACY_KEYS: &[&str] = &[
    "provider",
    "model",
    "base_url",
    "prompt",
    "raw_response",
    "error",
];

/// Structured diagnostic payload with named sections.
///
/// Every section is optional; the normalizer guarantees downstream
/// rendering always sees this shape regardless of what was stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugBundle {
    /// The request that produced the assistant turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// The raw translation response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Model-level diagnostics (provider, prompt, raw model output, ...).
    #[serde(
        default,
        alias = "modelDebug",
        alias = "ollama",
        skip_serializing_if = "Option::is_none"
    )]
    pub model_debug: Option<Value>,
    /// The SQL execution outcome for this turn.
    #[serde(
        default,
        alias = "sqlExecution",
        skip_serializing_if = "Option::is_none"
    )]
    pub sql_execution: Option<Value>,
    /// Unparseable stored payload, preserved verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl DebugBundle {
    /// Creates a bundle holding only the execution section.
    pub fn from_execution(execution: Value) -> Self {
        Self {
            sql_execution: Some(execution),
            ..Self::default()
        }
    }

    /// Creates a bundle preserving an unparseable stored payload.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Returns true when no section is populated.
    pub fn is_empty(&self) -> bool {
        self.request.is_none()
            && self.response.is_none()
            && self.model_debug.is_none()
            && self.sql_execution.is_none()
            && self.raw.is_none()
    }
}

/// A stored debug payload, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugRecord {
    /// Current structured shape.
    Structured(DebugBundle),
    /// Flat legacy shape (or an unrecognized object, treated the same).
    Legacy(Map<String, Value>),
}

impl DebugRecord {
    /// Classifies a JSON object into legacy or structured shape.
    ///
    /// An object carrying any structured section key is structured;
    /// anything else is legacy. The known legacy keys are listed in
    /// [`LEGACY_KEYS`]; objects outside both sets are still wrapped as
    /// legacy model diagnostics so no stored data is dropped.
    pub fn classify(object: Map<String, Value>) -> Self {
        if object.keys().any(|k| STRUCTURED_KEYS.contains(&k.as_str())) {
            let bundle = serde_json::from_value(Value::Object(object.clone()))
                .unwrap_or_else(|_| DebugBundle::from_raw(Value::Object(object).to_string()));
            Self::Structured(bundle)
        } else {
            Self::Legacy(object)
        }
    }

    /// Returns true when the object matches the known flat legacy shape.
    pub fn is_known_legacy_shape(object: &Map<String, Value>) -> bool {
        !object.keys().any(|k| STRUCTURED_KEYS.contains(&k.as_str()))
            && object.keys().any(|k| LEGACY_KEYS.contains(&k.as_str()))
    }

    /// Upgrades this record to the structured shape.
    ///
    /// Legacy payloads become the `model_debug` section; structured
    /// payloads pass through unchanged. Upgrading is idempotent.
    pub fn upgrade(self) -> DebugBundle {
        match self {
            Self::Structured(bundle) => bundle,
            Self::Legacy(fields) => DebugBundle {
                model_debug: Some(Value::Object(fields)),
                ..DebugBundle::default()
            },
        }
    }
}
