//! Button tree model and identity handling.

mod identity;
mod schema;

pub use identity::{
    ensure_id, ensure_ids_in_array, ensure_ids_in_set, strip_id, strip_ids_in_array,
    strip_ids_in_set,
};
pub use schema::{Button, ButtonId, ButtonSet, ConfigurationTarget};
