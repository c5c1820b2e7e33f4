//! hanotify
//!
//! Operator command line: fire the notification scripts configured for an
//! instance or sync group, list them, or check which ones would be skipped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanotify_core::{
    resolve_generic_script, script_open, script_open_literal, Notifier, NotifyTarget, ShellExecutor,
    State,
};
use std::process::ExitCode;
use tracing::{info, warn};

mod config;

use config::{Config, DEFAULT_CONFIG_PATH};

/// hanotify
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "HANOTIFY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scripts for an instance entering STATE
    Instance {
        name: String,
        /// master, backup, fault or a numeric state code
        state: State,
    },
    /// Run the scripts for a sync group entering STATE
    Group {
        name: String,
        /// master, backup, fault or a numeric state code
        state: State,
    },
    /// List configured instances and groups
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report which configured scripts would be skipped
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hanotify=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::load(&args.config).context("Failed to load configuration")?;
    info!(
        config = %args.config,
        instances = config.instances.len(),
        groups = config.groups.len(),
        "Configuration loaded"
    );

    match args.command {
        Commands::Instance { name, state } => {
            let vrrp = config
                .instance(&name)
                .with_context(|| format!("Unknown instance '{}'", name))?;
            Ok(launch_exit_code(notifier()?.notify_instance_exec(vrrp, state)))
        }
        Commands::Group { name, state } => {
            let vgroup = config
                .group(&name)
                .with_context(|| format!("Unknown group '{}'", name))?;
            Ok(launch_exit_code(notifier()?.notify_group_exec(vgroup, state)))
        }
        Commands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print_listing(&config);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let checks = check_config(&config);
            for check in &checks {
                println!(
                    "{:<8} {:<16} {:<8} {:<8} {}",
                    check.kind,
                    check.name,
                    check.slot,
                    check.status.label(),
                    check.script
                );
            }
            if checks.iter().all(|c| c.status == CheckStatus::Ok) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn notifier() -> Result<Notifier<ShellExecutor>> {
    // Children outlive this process; nothing is left to reap them here.
    let executor = ShellExecutor::current()?.with_reap(false);
    Ok(Notifier::new(executor))
}

fn launch_exit_code(launched: bool) -> ExitCode {
    if launched {
        ExitCode::SUCCESS
    } else {
        warn!("No notification script launched");
        ExitCode::FAILURE
    }
}

fn print_listing(config: &Config) {
    for target in config
        .instances
        .iter()
        .map(|i| i as &dyn NotifyTarget)
        .chain(config.groups.iter().map(|g| g as &dyn NotifyTarget))
    {
        println!(
            "{} {} (notify_exec: {})",
            target.kind().type_tag(),
            target.name(),
            target.notify_exec()
        );
        for (slot, script) in scripts(target) {
            println!("  {:<8} {}", slot, script);
        }
    }
}

/// Whether dispatch would run a configured script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Ok,
    /// Fails its validator
    Unreadable,
    /// Per-state script with `notify_exec` off
    Disabled,
}

impl CheckStatus {
    fn label(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Unreadable => "SKIP",
            CheckStatus::Disabled => "disabled",
        }
    }
}

/// Result of validating one configured script
#[derive(Debug, Clone, PartialEq)]
struct ScriptCheck {
    kind: &'static str,
    name: String,
    slot: &'static str,
    script: String,
    status: CheckStatus,
}

/// Configured scripts of an entity, labelled by slot
fn scripts(target: &dyn NotifyTarget) -> Vec<(&'static str, &str)> {
    [
        ("master", target.script_master()),
        ("backup", target.script_backup()),
        ("fault", target.script_fault()),
        ("notify", resolve_generic_script(target)),
    ]
    .into_iter()
    .filter_map(|(slot, script)| script.map(|s| (slot, s)))
    .collect()
}

/// Validate every script the way dispatch would
fn check_target(target: &dyn NotifyTarget) -> Vec<ScriptCheck> {
    scripts(target)
        .into_iter()
        .map(|(slot, script)| {
            let status = if slot == "notify" {
                readable_status(script_open_literal(script))
            } else if !target.notify_exec() {
                CheckStatus::Disabled
            } else {
                readable_status(script_open(script))
            };
            ScriptCheck {
                kind: target.kind().type_tag(),
                name: target.name().to_string(),
                slot,
                script: script.to_string(),
                status,
            }
        })
        .collect()
}

fn readable_status(readable: bool) -> CheckStatus {
    if readable {
        CheckStatus::Ok
    } else {
        CheckStatus::Unreadable
    }
}

fn check_config(config: &Config) -> Vec<ScriptCheck> {
    let instances = config.instances.iter().flat_map(|i| check_target(i));
    let groups = config.groups.iter().flat_map(|g| check_target(g));
    instances.chain(groups).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanotify_core::{EntityKind, SyncGroup, VrrpInstance};
    use tempfile::NamedTempFile;

    #[test]
    fn test_args_parse_instance() {
        let args = Args::try_parse_from(["hanotify", "-c", "/tmp/h.toml", "instance", "VI_1", "MASTER"])
            .unwrap();
        assert_eq!(args.config, "/tmp/h.toml");
        match args.command {
            Commands::Instance { name, state } => {
                assert_eq!(name, "VI_1");
                assert_eq!(state, State::Master);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_parse_numeric_state() {
        let args = Args::try_parse_from(["hanotify", "group", "G1", "99"]).unwrap();
        match args.command {
            Commands::Group { state, .. } => assert_eq!(state, State::Unknown(99)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_args_reject_bad_state() {
        assert!(Args::try_parse_from(["hanotify", "group", "G1", "primary"]).is_err());
    }

    #[test]
    fn test_check_uses_matching_validator() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let mut vrrp = VrrpInstance::new("VI_1");
        vrrp.notify_exec = true;
        vrrp.script_master = Some(format!("{} arg", path));
        vrrp.script = Some(format!("{} --verbose", path));

        let checks = check_target(&vrrp);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].slot, "master");
        assert_eq!(checks[0].status, CheckStatus::Ok);
        assert_eq!(checks[1].slot, "notify");
        assert_eq!(checks[1].status, CheckStatus::Unreadable);
    }

    #[test]
    fn test_check_reports_disabled_per_state_scripts() {
        let backup = NamedTempFile::new().unwrap();
        let generic = NamedTempFile::new().unwrap();

        let mut group = SyncGroup::new("G1");
        group.notify_exec = false;
        group.script_backup = Some(backup.path().to_str().unwrap().to_string());
        group.script = Some(generic.path().to_str().unwrap().to_string());

        let checks = check_target(&group);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].slot, "backup");
        assert_eq!(checks[0].status, CheckStatus::Disabled);
        assert_eq!(checks[1].slot, "notify");
        assert_eq!(checks[1].status, CheckStatus::Ok);
    }

    #[test]
    fn test_check_config_covers_groups() {
        let mut group = SyncGroup::new("G1");
        group.notify_exec = true;
        group.script_fault = Some("/nonexistent/hanotify/gf.sh".to_string());
        let config = Config {
            instances: vec![VrrpInstance::new("VI_1")],
            groups: vec![group],
        };

        let checks = check_config(&config);
        assert_eq!(
            checks,
            vec![ScriptCheck {
                kind: EntityKind::Group.type_tag(),
                name: "G1".to_string(),
                slot: "fault",
                script: "/nonexistent/hanotify/gf.sh".to_string(),
                status: CheckStatus::Unreadable,
            }]
        );
    }
}
