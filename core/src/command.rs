//! Generic script command line
//!
//! The generic script receives:
//!
//! ```text
//! "<script>" {INSTANCE|GROUP} "<name>" {MASTER|BACKUP|FAULT|{UNKNOWN}}
//! ```

use crate::{Result, State};

/// Quotes and separators around the four fields, plus one spare byte
const SEPARATOR_OVERHEAD: usize = 8;

/// Label passed to the generic script for a state
pub fn state_label(state: State) -> &'static str {
    match state {
        State::Master => "MASTER",
        State::Backup => "BACKUP",
        State::Fault => "FAULT",
        State::Unknown(_) => "{UNKNOWN}",
    }
}

/// Bytes reserved for a command line built from these fields
pub fn command_capacity(script: &str, type_tag: &str, name: &str, state: State) -> usize {
    script.len() + type_tag.len() + state_label(state).len() + name.len() + SEPARATOR_OVERHEAD
}

/// Build the generic script command line
///
/// The buffer is reserved once with [`command_capacity`] and never grows;
/// a failed reservation is returned as [`crate::Error::BuildFailure`].
pub fn build_command(script: &str, type_tag: &str, name: &str, state: State) -> Result<String> {
    let label = state_label(state);
    let capacity = command_capacity(script, type_tag, name, state);

    let mut command = String::new();
    command.try_reserve_exact(capacity)?;

    command.push('"');
    command.push_str(script);
    command.push_str("\" ");
    command.push_str(type_tag);
    command.push_str(" \"");
    command.push_str(name);
    command.push_str("\" ");
    command.push_str(label);

    debug_assert!(command.len() < capacity);
    Ok(command)
}
