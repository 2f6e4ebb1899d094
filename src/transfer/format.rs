//! Export file format and validation of untrusted import payloads.
//!
//! Import files may be hand-edited or written by another tool version, so
//! [`validate_import_data`] checks the shape of the raw JSON value before
//! anything is deserialized. Malformed input is rejected, never coerced.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::button::{Button, ConfigurationTarget, strip_ids_in_array};
use crate::error::{QbError, Result};

/// The only export format version.
pub const FORMAT_VERSION: &str = "1.0";

/// Optional string fields of a button.
const STRING_FIELDS: [&str; 4] = ["id", "command", "color", "terminalName"];

/// Optional boolean fields of a button.
const BOOL_FIELDS: [&str; 4] = ["executeAll", "useVsCodeApi", "newTerminal", "insertOnly"];

/// Export/backup file payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormat {
    pub version: String,
    /// ISO-8601 timestamp of when the snapshot was taken.
    pub exported_at: String,
    /// Scope the snapshot was taken from.
    pub configuration_target: ConfigurationTarget,
    /// Buttons without identifiers.
    pub buttons: Vec<Button>,
}

impl ExportFormat {
    /// Snapshot `buttons` for `scope`, stripping identifiers and stamping the current time.
    #[must_use]
    pub fn new(buttons: &[Button], scope: ConfigurationTarget) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            exported_at: timestamp_now(),
            configuration_target: scope,
            buttons: strip_ids_in_array(buttons),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QbError::Other(format!("Failed to serialize export: {e}")))
    }
}

/// Current time as an ISO-8601 string with millisecond precision.
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Make a timestamp safe for use in a file name.
#[must_use]
pub fn file_safe_timestamp(timestamp: &str) -> String {
    timestamp.replace([':', '.'], "-")
}

/// Parse and structurally validate an import payload.
///
/// Parser internals are never echoed back; a payload that is not JSON yields
/// [`QbError::InvalidFormat`]. Structural problems yield
/// [`QbError::InvalidField`] naming the offending field.
#[instrument(skip(raw), fields(len = raw.len()))]
pub fn validate_import_data(raw: &str) -> Result<ExportFormat> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        debug!(error = %e, "Import payload is not valid JSON");
        QbError::InvalidFormat
    })?;

    let root = value
        .as_object()
        .ok_or_else(|| QbError::invalid_field("(root)", "expected a JSON object"))?;

    let version = required_str(root, "version", "version")?;
    if version != FORMAT_VERSION {
        return Err(QbError::invalid_field(
            "version",
            format!("unsupported version '{version}', expected '{FORMAT_VERSION}'"),
        ));
    }
    required_str(root, "exportedAt", "exportedAt")?;
    required_str(root, "configurationTarget", "configurationTarget")?
        .parse::<ConfigurationTarget>()?;

    let buttons = root
        .get("buttons")
        .ok_or_else(|| QbError::invalid_field("buttons", "missing required field"))?
        .as_array()
        .ok_or_else(|| QbError::invalid_field("buttons", "expected an array"))?;

    for (i, button) in buttons.iter().enumerate() {
        validate_button(button, &format!("buttons[{i}]"))?;
    }
    trace!(buttons = buttons.len(), "Import payload shape validated");

    serde_json::from_value(value).map_err(|e| {
        debug!(error = %e, "Validated payload failed to deserialize");
        QbError::InvalidFormat
    })
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a str> {
    match obj.get(key) {
        None => Err(QbError::invalid_field(path, "missing required field")),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(QbError::invalid_field(path, "expected a string")),
    }
}

fn validate_button(value: &Value, path: &str) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| QbError::invalid_field(path, "expected a button object"))?;

    let name_path = format!("{path}.name");
    if required_str(obj, "name", &name_path)?.trim().is_empty() {
        return Err(QbError::invalid_field(name_path, "must not be empty"));
    }

    for key in STRING_FIELDS {
        if obj.get(key).is_some_and(|v| !v.is_string()) {
            return Err(QbError::invalid_field(format!("{path}.{key}"), "expected a string"));
        }
    }

    for key in BOOL_FIELDS {
        if obj.get(key).is_some_and(|v| !v.is_boolean()) {
            return Err(QbError::invalid_field(format!("{path}.{key}"), "expected a boolean"));
        }
    }

    if let Some(shortcut) = obj.get("shortcut") {
        let field = format!("{path}.shortcut");
        let s = shortcut
            .as_str()
            .ok_or_else(|| QbError::invalid_field(&field, "expected a string"))?;
        if s.chars().count() != 1 {
            return Err(QbError::invalid_field(field, "must be a single character"));
        }
    }

    if let Some(group) = obj.get("group") {
        let children = group
            .as_array()
            .ok_or_else(|| QbError::invalid_field(format!("{path}.group"), "expected an array"))?;
        for (i, child) in children.iter().enumerate() {
            validate_button(child, &format!("{path}.group[{i}]"))?;
        }
    }

    Ok(())
}
