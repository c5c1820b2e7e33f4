//! Script lookup per entity and target state

use crate::{NotifyTarget, State};

/// Per-state script for `state`, if notification is enabled and one is set
pub fn resolve_state_script<T: NotifyTarget + ?Sized>(target: &T, state: State) -> Option<&str> {
    if !target.notify_exec() {
        return None;
    }

    match state {
        State::Master => target.script_master(),
        State::Backup => target.script_backup(),
        State::Fault => target.script_fault(),
        State::Unknown(_) => None,
    }
}

/// Generic script, independent of the notification flag
pub fn resolve_generic_script<T: NotifyTarget + ?Sized>(target: &T) -> Option<&str> {
    target.script()
}
