//! Configuration management

use hanotify_core::{Error, Result, SyncGroup, VrrpInstance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Config file used when neither `--config` nor `HANOTIFY_CONFIG` is set
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hanotify/hanotify.toml";

/// Notification settings of one instance or group as written in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    pub name: String,
    /// Defaults to true when any per-state script is present
    pub notify_exec: Option<bool>,
    pub notify_master: Option<String>,
    pub notify_backup: Option<String>,
    pub notify_fault: Option<String>,
    /// Generic script
    pub notify: Option<String>,
}

impl NotifyConfig {
    fn notify_exec(&self) -> bool {
        self.notify_exec.unwrap_or(
            self.notify_master.is_some() || self.notify_backup.is_some() || self.notify_fault.is_some(),
        )
    }

    fn into_instance(self) -> VrrpInstance {
        VrrpInstance {
            notify_exec: self.notify_exec(),
            name: self.name,
            script_master: self.notify_master,
            script_backup: self.notify_backup,
            script_fault: self.notify_fault,
            script: self.notify,
        }
    }

    fn into_group(self) -> SyncGroup {
        SyncGroup {
            notify_exec: self.notify_exec(),
            name: self.name,
            script_master: self.notify_master,
            script_backup: self.notify_backup,
            script_fault: self.notify_fault,
            script: self.notify,
        }
    }
}

/// On-disk configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default, rename = "instance")]
    instances: Vec<NotifyConfig>,
    #[serde(default, rename = "group")]
    groups: Vec<NotifyConfig>,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    /// Monitored instances
    pub instances: Vec<VrrpInstance>,

    /// Sync groups
    pub groups: Vec<SyncGroup>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read config {}: {}", path, e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))?;

        check_unique("instance", raw.instances.iter().map(|i| i.name.as_str()))?;
        check_unique("group", raw.groups.iter().map(|g| g.name.as_str()))?;

        Ok(Config {
            instances: raw.instances.into_iter().map(NotifyConfig::into_instance).collect(),
            groups: raw.groups.into_iter().map(NotifyConfig::into_group).collect(),
        })
    }

    /// Find an instance by name
    pub fn instance(&self, name: &str) -> Option<&VrrpInstance> {
        self.instances.iter().find(|i| i.name == name)
    }

    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&SyncGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

fn check_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(Error::ConfigError(format!("Empty {} name", kind)));
        }
        if !seen.insert(name) {
            return Err(Error::ConfigError(format!("Duplicate {} '{}'", kind, name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[[instance]]
name = "VI_1"
notify_master = "/etc/kd/master.sh"
notify = "/etc/kd/notify.sh"

[[instance]]
name = "VI_2"
notify = "/etc/kd/notify.sh"

[[group]]
name = "G1"
notify_exec = false
notify_backup = "/etc/kd/gb.sh"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(config.instances.len(), 2);
        assert_eq!(config.groups.len(), 1);

        let vi1 = config.instance("VI_1").unwrap();
        assert!(vi1.notify_exec);
        assert_eq!(vi1.script_master.as_deref(), Some("/etc/kd/master.sh"));
        assert_eq!(vi1.script.as_deref(), Some("/etc/kd/notify.sh"));

        let vi2 = config.instance("VI_2").unwrap();
        assert!(!vi2.notify_exec);

        let g1 = config.group("G1").unwrap();
        assert!(!g1.notify_exec);
        assert_eq!(g1.script_backup.as_deref(), Some("/etc/kd/gb.sh"));
        assert!(config.group("G2").is_none());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.instances.is_empty());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_duplicate_instance_rejected() {
        let err = Config::parse(
            r#"
[[instance]]
name = "VI_1"

[[instance]]
name = "VI_1"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate instance 'VI_1'"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::parse(
            r#"
[[group]]
name = "G1"
notify_primary = "/x"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert!(config.instance("VI_1").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/hanotify.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
