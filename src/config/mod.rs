//! Application settings and storage locations.

mod path;
mod settings;

pub use path::{APP_DIR_NAME, default_settings_path, default_storage_root, home_dir, resolve_path};
pub use settings::{ConfigFormat, Settings, load_settings, load_settings_from_str};
