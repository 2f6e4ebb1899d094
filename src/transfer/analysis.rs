//! Change analysis between a live button list and an incoming one.
//!
//! Buttons are matched by top-level `name`, never by identifier, and content
//! equality ignores identifiers. Shortcut collisions are scoped to siblings:
//! each shortcut is keyed by the chain of ancestor names.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::button::{Button, ButtonId};

/// Where a button in a conflict report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonSource {
    Existing,
    Imported,
}

/// A same-named button whose content differs from the live one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedButton {
    pub existing_button: Button,
    /// The incoming button, carrying the existing button's identifier.
    pub imported_button: Button,
}

/// One participant in a shortcut conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingButton {
    pub id: Option<ButtonId>,
    pub name: String,
    pub source: ButtonSource,
}

/// Sibling buttons bound to the same shortcut with differing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutConflict {
    /// Lowercased shortcut.
    pub shortcut: String,
    pub buttons: Vec<ConflictingButton>,
}

/// Classification of every incoming button against the live list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportAnalysis {
    pub added: Vec<Button>,
    pub modified: Vec<ModifiedButton>,
    pub unchanged: Vec<Button>,
    pub shortcut_conflicts: Vec<ShortcutConflict>,
}

impl ImportAnalysis {
    /// Number of incoming buttons classified.
    #[must_use]
    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.unchanged.len()
    }

    /// Number of same-named buttons an import will overwrite.
    #[must_use]
    pub fn conflicts_resolved(&self) -> usize {
        self.modified.len()
    }

    #[must_use]
    pub fn has_shortcut_conflicts(&self) -> bool {
        !self.shortcut_conflicts.is_empty()
    }

    /// True when the import would not change anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty()
    }
}

/// Diff `imported` against `existing`.
#[instrument(skip_all, fields(existing = existing.len(), imported = imported.len()))]
pub fn analyze_import_changes(existing: &[Button], imported: &[Button]) -> ImportAnalysis {
    let by_name: HashMap<&str, &Button> = existing.iter().map(|b| (b.name.as_str(), b)).collect();

    let mut analysis = ImportAnalysis::default();
    for incoming in imported {
        match by_name.get(incoming.name.as_str()) {
            None => analysis.added.push(incoming.clone()),
            Some(current) if current.content_eq(incoming) => {
                analysis.unchanged.push(incoming.clone());
            }
            Some(current) => analysis.modified.push(ModifiedButton {
                existing_button: (*current).clone(),
                imported_button: Button {
                    id: current.id.clone(),
                    ..incoming.clone()
                },
            }),
        }
    }

    analysis.shortcut_conflicts = detect_shortcut_conflicts(existing, imported);

    debug!(
        added = analysis.added.len(),
        modified = analysis.modified.len(),
        unchanged = analysis.unchanged.len(),
        conflicts = analysis.shortcut_conflicts.len(),
        "Import changes analyzed"
    );
    analysis
}

struct ShortcutEntry<'a> {
    button: &'a Button,
    source: ButtonSource,
}

/// (ancestor names, lowercased shortcut)
type ShortcutKey = (Vec<String>, String);

/// Find sibling buttons sharing a shortcut across both trees.
#[must_use]
pub fn detect_shortcut_conflicts(existing: &[Button], imported: &[Button]) -> Vec<ShortcutConflict> {
    let mut index: IndexMap<ShortcutKey, Vec<ShortcutEntry<'_>>> = IndexMap::new();
    collect_shortcuts(existing, ButtonSource::Existing, &mut index);
    collect_shortcuts(imported, ButtonSource::Imported, &mut index);

    index
        .into_iter()
        .filter(|(_, entries)| has_distinct_content(entries))
        .map(|((path, shortcut), entries)| {
            trace!(path = ?path, shortcut = %shortcut, count = entries.len(), "Shortcut conflict");
            ShortcutConflict {
                shortcut,
                buttons: entries
                    .into_iter()
                    .map(|e| ConflictingButton {
                        id: e.button.id.clone(),
                        name: e.button.name.clone(),
                        source: e.source,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Pre-order walk registering every shortcut under its parent path.
fn collect_shortcuts<'a>(
    roots: &'a [Button],
    source: ButtonSource,
    index: &mut IndexMap<ShortcutKey, Vec<ShortcutEntry<'a>>>,
) {
    let mut stack: Vec<(Vec<String>, &'a Button)> =
        roots.iter().rev().map(|b| (Vec::new(), b)).collect();

    while let Some((path, button)) = stack.pop() {
        if let Some(shortcut) = button.normalized_shortcut().filter(|s| !s.is_empty()) {
            index
                .entry((path.clone(), shortcut))
                .or_default()
                .push(ShortcutEntry { button, source });
        }

        if let Some(children) = &button.group {
            let mut child_path = path;
            child_path.push(button.name.clone());
            for child in children.iter().rev() {
                stack.push((child_path.clone(), child));
            }
        }
    }
}

/// Identical copies of one button sharing a shortcut do not collide.
fn has_distinct_content(entries: &[ShortcutEntry<'_>]) -> bool {
    entries.split_first().is_some_and(|(first, rest)| {
        rest.iter().any(|e| !e.button.content_eq(first.button))
    })
}
