//! Reconciliation strategies for combining a live list with an incoming one.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::analysis::ImportAnalysis;
use crate::button::Button;

/// How an incoming button list is combined with the live one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImportStrategy {
    /// Overwrite same-named buttons in place, append new ones.
    #[default]
    Merge,
    /// Discard the live list and use the incoming one.
    Replace,
}

impl fmt::Display for ImportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merge => f.write_str("merge"),
            Self::Replace => f.write_str("replace"),
        }
    }
}

/// Final button list produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub buttons: Vec<Button>,
    /// Number of same-named buttons whose content was overwritten.
    pub conflicts_resolved: usize,
}

impl ImportStrategy {
    /// Combine `existing` and `imported`. Pure; performs no I/O.
    #[instrument(skip_all, fields(strategy = %self))]
    pub fn apply(
        self,
        existing: &[Button],
        imported: &[Button],
        analysis: &ImportAnalysis,
    ) -> Reconciliation {
        let buttons = match self {
            Self::Merge => merge_buttons(existing, imported),
            Self::Replace => replace_buttons(imported),
        };
        debug!(
            existing = existing.len(),
            imported = imported.len(),
            result = buttons.len(),
            "Reconciled button lists"
        );
        Reconciliation {
            buttons,
            conflicts_resolved: analysis.conflicts_resolved(),
        }
    }
}

/// Name-keyed union of both lists.
///
/// Existing order is kept; a same-named incoming button takes the existing
/// slot (and the existing identifier), new names are appended in incoming order.
#[must_use]
pub fn merge_buttons(existing: &[Button], imported: &[Button]) -> Vec<Button> {
    let mut by_name: IndexMap<&str, Button> = IndexMap::with_capacity(existing.len() + imported.len());
    for button in existing {
        by_name.insert(button.name.as_str(), button.clone());
    }

    for incoming in imported {
        match by_name.entry(incoming.name.as_str()) {
            Entry::Occupied(mut slot) => {
                let id = slot.get().id.clone().or_else(|| incoming.id.clone());
                slot.insert(Button {
                    id,
                    ..incoming.clone()
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(incoming.clone());
            }
        }
    }

    by_name.into_values().collect()
}

/// The incoming list, verbatim.
#[must_use]
pub fn replace_buttons(imported: &[Button]) -> Vec<Button> {
    imported.to_vec()
}
