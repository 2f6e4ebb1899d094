//! Quick Buttons library - export, import and back up command button configurations.
//!
//! This library exposes the core functionality of the `qb` CLI for use in tests
//! and by editor integrations that provide their own store and dialogs.
//!
//! # Modules
//!
//! - `button`: Button model and identifier management
//! - `transfer`: Export format, diffing, reconciliation, backups and the import/export manager
//! - `store`: Configuration store, file system and file dialog abstractions
//! - `config`: Settings file handling
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod button;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod store;
pub mod transfer;
