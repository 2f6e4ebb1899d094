//! Time-stamped import previews.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::ImportAnalysis;
use crate::button::{Button, ConfigurationTarget};

/// How long a preview may be confirmed after it was computed.
pub const PREVIEW_EXPIRY_SECS: i64 = 5 * 60;

/// [`PREVIEW_EXPIRY_SECS`] as a duration.
#[must_use]
pub fn preview_expiry() -> Duration {
    Duration::seconds(PREVIEW_EXPIRY_SECS)
}

/// A computed diff awaiting confirmation.
///
/// Carries its own creation time; expiry is checked lazily by the confirming
/// call, so nothing is held while a preview is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreviewData {
    /// Validated incoming buttons, with identifiers assigned.
    pub buttons: Vec<Button>,
    pub analysis: ImportAnalysis,
    pub file_uri: PathBuf,
    /// Scope the file was exported from.
    pub source_target: ConfigurationTarget,
    /// Scope the diff was computed against.
    pub target_scope: ConfigurationTarget,
    pub timestamp: DateTime<Utc>,
}

impl ImportPreviewData {
    /// Time elapsed since the preview was created.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > preview_expiry()
    }
}
