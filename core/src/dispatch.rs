//! Notification dispatch
//!
//! One dispatch per observed state transition:
//! 1. the per-state script, if notification is enabled and the script's
//!    leading token is readable, is submitted verbatim;
//! 2. the generic script, if its whole reference is readable, is submitted
//!    as `"script" TYPE "name" STATE`.
//!
//! The two branches are independent. Dispatch never blocks on a child.

use tracing::{debug, info, instrument};

use crate::command::build_command;
use crate::executor::ScriptExecutor;
use crate::resolver::{resolve_generic_script, resolve_state_script};
use crate::validator::{script_open, script_open_literal};
use crate::{NotifyTarget, State, SyncGroup, VrrpInstance};

/// Runs notification scripts through an executor
#[derive(Debug, Clone)]
pub struct Notifier<E> {
    executor: E,
}

impl<E: ScriptExecutor> Notifier<E> {
    /// Create a notifier submitting to `executor`
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Notify an instance transition. Returns true if anything was launched.
    pub fn notify_instance_exec(&self, vrrp: &VrrpInstance, state: State) -> bool {
        self.dispatch(vrrp, state)
    }

    /// Notify a sync group transition. Returns true if anything was launched.
    pub fn notify_group_exec(&self, vgroup: &SyncGroup, state: State) -> bool {
        self.dispatch(vgroup, state)
    }

    /// Dispatch for any entity kind
    #[instrument(skip(self, target, state), fields(kind = target.kind().type_tag(), name = %target.name(), state = %state))]
    pub fn dispatch<T: NotifyTarget + ?Sized>(&self, target: &T, state: State) -> bool {
        let mut launched = false;

        // notify_master / notify_backup / notify_fault
        if let Some(script) = resolve_state_script(target, state) {
            if script_open(script) {
                self.executor.submit(script);
                launched = true;
            }
        }

        // generic notify
        if let Some(script) = resolve_generic_script(target) {
            if script_open_literal(script) {
                match build_command(script, target.kind().type_tag(), target.name(), state) {
                    Ok(command) => {
                        self.executor.submit(&command);
                        launched = true;
                    }
                    Err(e) => info!(script = %script, error = %e, "Skipping generic script"),
                }
            }
        }

        debug!(launched, "Notification dispatched");
        launched
    }
}
