//! Script execution via the shell

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

use crate::{Error, Result};

/// Default shell used to run command lines
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Accepts command lines for asynchronous execution
///
/// Submission is one-way: implementors own spawning, logging and reaping,
/// and report nothing back to the caller.
pub trait ScriptExecutor: Send + Sync {
    /// Request execution of one fully-formed command line
    fn submit(&self, command: &str);
}

impl<T: ScriptExecutor + ?Sized> ScriptExecutor for std::sync::Arc<T> {
    fn submit(&self, command: &str) {
        (**self).submit(command)
    }
}

/// Runs command lines with `sh -c` on a tokio runtime
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    handle: Handle,
    shell: PathBuf,
    reap: bool,
}

impl ShellExecutor {
    /// Create an executor bound to a runtime
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            shell: PathBuf::from(DEFAULT_SHELL),
            reap: true,
        }
    }

    /// Create an executor bound to the current runtime
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| Error::ExecutionError(format!("No tokio runtime: {}", e)))?;
        Ok(Self::new(handle))
    }

    /// Use a different shell binary
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Wait for children in the background and log their exit status
    pub fn with_reap(mut self, reap: bool) -> Self {
        self.reap = reap;
        self
    }

    /// Spawn `command` detached from our stdio
    pub fn spawn_script(&self, command: &str) -> Result<Child> {
        let _guard = self.handle.enter();

        Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::ExecutionError(format!("Failed to spawn '{}': {}", command, e)))
    }
}

impl ScriptExecutor for ShellExecutor {
    fn submit(&self, command: &str) {
        let mut child = match self.spawn_script(command) {
            Ok(child) => child,
            Err(e) => {
                error!(command = %command, error = %e, "Script launch failed");
                return;
            }
        };

        debug!(command = %command, pid = ?child.id(), "Script launched");

        if self.reap {
            let command = command.to_string();
            self.handle.spawn(async move {
                match child.wait().await {
                    Ok(status) => debug!(command = %command, status = %status, "Script exited"),
                    Err(e) => warn!(command = %command, error = %e, "Failed to wait for script"),
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_spawn_script_runs_through_shell() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("ran");
        let executor = ShellExecutor::current().unwrap();

        let mut child = executor
            .spawn_script(&format!("echo hello > '{}'", marker.display()))
            .unwrap();
        let status = child.wait().await.unwrap();

        assert!(status.success());
        assert_eq!(std::fs::read_to_string(&marker).unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn test_submit_is_fire_and_forget() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("submitted");
        let executor = ShellExecutor::current().unwrap();

        executor.submit(&format!("touch '{}'", marker.display()));

        let mut waited = Duration::ZERO;
        while !marker.exists() && waited < Duration::from_secs(5) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waited += Duration::from_millis(20);
        }
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_missing_shell_is_an_error() {
        let executor = ShellExecutor::current()
            .unwrap()
            .with_shell("/nonexistent/hanotify/sh");

        let err = executor.spawn_script("true").unwrap_err();
        assert!(matches!(err, Error::ExecutionError(_)));

        // submit swallows the failure
        executor.submit("true");
    }

    #[test]
    fn test_current_without_runtime() {
        assert!(ShellExecutor::current().is_err());
    }
}
