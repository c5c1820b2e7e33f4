//! Shared types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Protocol code for BACKUP
pub const STATE_BACKUP: i32 = 1;
/// Protocol code for MASTER
pub const STATE_MASTER: i32 = 2;
/// Protocol code for FAULT
pub const STATE_FAULT: i32 = 3;

/// Target state of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Master,
    Backup,
    Fault,
    /// Any state code without a notification hook (INIT, GOTO_MASTER, ...)
    Unknown(i32),
}

impl State {
    /// Map a protocol state code
    pub fn from_code(code: i32) -> Self {
        match code {
            STATE_MASTER => State::Master,
            STATE_BACKUP => State::Backup,
            STATE_FAULT => State::Fault,
            other => State::Unknown(other),
        }
    }

    /// Protocol state code
    pub fn code(&self) -> i32 {
        match self {
            State::Master => STATE_MASTER,
            State::Backup => STATE_BACKUP,
            State::Fault => STATE_FAULT,
            State::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::command::state_label(*self))
    }
}

impl FromStr for State {
    type Err = Error;

    /// Accepts `master`, `backup`, `fault` in any case, or a numeric code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "master" => Ok(State::Master),
            "backup" => Ok(State::Backup),
            "fault" => Ok(State::Fault),
            _ => s
                .parse::<i32>()
                .map(State::from_code)
                .map_err(|_| Error::InvalidState(format!("'{}'", s))),
        }
    }
}

/// Kind of entity a notification is raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Instance,
    Group,
}

impl EntityKind {
    /// Type tag passed to the generic script
    pub fn type_tag(&self) -> &'static str {
        match self {
            EntityKind::Instance => "INSTANCE",
            EntityKind::Group => "GROUP",
        }
    }
}

/// Read-only view of an entity's notification settings
pub trait NotifyTarget {
    /// Entity kind, selects the type tag
    fn kind(&self) -> EntityKind;

    /// Instance or group name
    fn name(&self) -> &str;

    /// Whether per-state scripts may run
    fn notify_exec(&self) -> bool;

    fn script_master(&self) -> Option<&str>;

    fn script_backup(&self) -> Option<&str>;

    fn script_fault(&self) -> Option<&str>;

    /// Generic script, run on every transition
    fn script(&self) -> Option<&str>;
}

/// Monitored instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VrrpInstance {
    /// Instance name (`iname`)
    pub name: String,
    /// Per-state scripts enabled
    pub notify_exec: bool,
    pub script_master: Option<String>,
    pub script_backup: Option<String>,
    pub script_fault: Option<String>,
    /// Generic notify script
    pub script: Option<String>,
}

impl VrrpInstance {
    /// Create an instance with no scripts configured
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Synchronization group
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncGroup {
    /// Group name (`gname`)
    pub name: String,
    /// Per-state scripts enabled
    pub notify_exec: bool,
    pub script_master: Option<String>,
    pub script_backup: Option<String>,
    pub script_fault: Option<String>,
    /// Generic notify script
    pub script: Option<String>,
}

impl SyncGroup {
    /// Create a group with no scripts configured
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

macro_rules! impl_notify_target {
    ($ty:ty, $kind:expr) => {
        impl NotifyTarget for $ty {
            fn kind(&self) -> EntityKind {
                $kind
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn notify_exec(&self) -> bool {
                self.notify_exec
            }

            fn script_master(&self) -> Option<&str> {
                self.script_master.as_deref()
            }

            fn script_backup(&self) -> Option<&str> {
                self.script_backup.as_deref()
            }

            fn script_fault(&self) -> Option<&str> {
                self.script_fault.as_deref()
            }

            fn script(&self) -> Option<&str> {
                self.script.as_deref()
            }
        }
    };
}

impl_notify_target!(VrrpInstance, EntityKind::Instance);
impl_notify_target!(SyncGroup, EntityKind::Group);
