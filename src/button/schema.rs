//! Data types for the button tree.
//!
//! A [`Button`] is a single recursive record: a button with a `group` is a
//! container whose children are themselves buttons. The same shape is used
//! by the live configuration and by export/backup files; the only difference
//! is that serialized payloads never carry an `id`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QbError, Result};

/// Opaque, process-assigned button identifier.
///
/// Identifiers are not derived from content; generating one twice for the
/// same button yields two different values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonId(String);

impl ButtonId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ButtonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration tier a button list belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationTarget {
    /// Buttons stored with the current workspace.
    #[default]
    Workspace,
    /// Buttons shared by every workspace of this user.
    Global,
    /// Buttons local to this machine and workspace.
    Local,
}

impl ConfigurationTarget {
    /// Lowercase name used in files and file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "workspace",
            Self::Global => "global",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for ConfigurationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationTarget {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "workspace" => Ok(Self::Workspace),
            "global" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            other => Err(QbError::invalid_field(
                "configurationTarget",
                format!("unknown scope '{other}', expected workspace, global or local"),
            )),
        }
    }
}

/// A named, optionally executable configuration node.
///
/// Presentation and execution fields are kept as `Option` so that a button
/// survives a strip/serialize/parse cycle with exactly the fields it had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    /// Live identifier. Never present in export or backup payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ButtonId>,
    /// Display name, unique among siblings.
    pub name: String,
    /// Command to run. Absent or empty means the button is inert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Single-character quick-pick shortcut (case-insensitive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    /// Child buttons. Presence makes this button a group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<Button>>,
    /// Run every child of the group in one go.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_name: Option<String>,
    /// Invoke the command through the host API instead of a terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_vs_code_api: Option<bool>,
    /// Always open a fresh terminal for this button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_terminal: Option<bool>,
    /// Insert the command text without running it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_only: Option<bool>,
}

impl Button {
    /// Create a button with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the command.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the shortcut.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Turn this button into a group with the given children.
    pub fn with_group(mut self, children: Vec<Self>) -> Self {
        self.group = Some(children);
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<ButtonId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether this button is a container node.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        self.group.is_some()
    }

    /// Whether pressing this button does nothing by itself.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        !self.is_group() && self.command.as_deref().is_none_or(str::is_empty)
    }

    /// Children of a group, or an empty slice for leaf buttons.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.group.as_deref().unwrap_or_default()
    }

    /// Lowercased shortcut, if any.
    #[must_use]
    pub fn normalized_shortcut(&self) -> Option<String> {
        self.shortcut.as_deref().map(str::to_lowercase)
    }

    /// Compare every field except `id`, recursing through `group`.
    ///
    /// Shortcuts compare case-insensitively.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.command == other.command
            && self.normalized_shortcut() == other.normalized_shortcut()
            && self.execute_all == other.execute_all
            && self.color == other.color
            && self.terminal_name == other.terminal_name
            && self.use_vs_code_api == other.use_vs_code_api
            && self.new_terminal == other.new_terminal
            && self.insert_only == other.insert_only
            && match (&self.group, &other.group) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y))
                }
                _ => false,
            }
    }

    /// Total number of buttons in this subtree, including this one.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Self::count).sum::<usize>()
    }
}

/// A named, switchable set of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ButtonId>,
    pub name: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl ButtonSet {
    /// Create an empty set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            buttons: Vec::new(),
        }
    }

    /// Replace the set's buttons.
    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}
