//! Identifier assignment at the export/import boundary.
//!
//! Live buttons always carry an [`ButtonId`]; serialized payloads never do.
//! These are the only functions that add or remove identifiers, so the diff
//! and merge code never has to care about them.

use super::schema::{Button, ButtonId, ButtonSet};

/// Copy of `button` with an identifier on it and on every descendant.
///
/// Existing identifiers are kept.
#[must_use]
pub fn ensure_id(button: &Button) -> Button {
    Button {
        id: Some(button.id.clone().unwrap_or_else(ButtonId::generate)),
        group: button.group.as_deref().map(ensure_ids_in_array),
        ..button.clone()
    }
}

/// Copy of `button` with the identifier removed from it and every descendant.
#[must_use]
pub fn strip_id(button: &Button) -> Button {
    Button {
        id: None,
        group: button.group.as_deref().map(strip_ids_in_array),
        ..button.clone()
    }
}

/// [`ensure_id`] applied to each element.
#[must_use]
pub fn ensure_ids_in_array(buttons: &[Button]) -> Vec<Button> {
    buttons.iter().map(ensure_id).collect()
}

/// [`strip_id`] applied to each element.
#[must_use]
pub fn strip_ids_in_array(buttons: &[Button]) -> Vec<Button> {
    buttons.iter().map(strip_id).collect()
}

/// Ensure identifiers on a set and on every button inside it.
#[must_use]
pub fn ensure_ids_in_set(set: &ButtonSet) -> ButtonSet {
    ButtonSet {
        id: Some(set.id.clone().unwrap_or_else(ButtonId::generate)),
        name: set.name.clone(),
        buttons: ensure_ids_in_array(&set.buttons),
    }
}

/// Strip identifiers from a set and from every button inside it.
#[must_use]
pub fn strip_ids_in_set(set: &ButtonSet) -> ButtonSet {
    ButtonSet {
        id: None,
        name: set.name.clone(),
        buttons: strip_ids_in_array(&set.buttons),
    }
}
