//! Core library for hanotify
//!
//! Turns HA state transitions of instances and sync groups into
//! notification script launches.

pub mod command;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod resolver;
pub mod types;
pub mod validator;

// Re-exports
pub use command::{build_command, state_label};
pub use dispatch::Notifier;
pub use error::{Error, Result};
pub use executor::{ScriptExecutor, ShellExecutor};
pub use resolver::{resolve_generic_script, resolve_state_script};
pub use types::{EntityKind, NotifyTarget, State, SyncGroup, VrrpInstance};
pub use validator::{script_name, script_open, script_open_literal};
