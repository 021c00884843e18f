//! Toolforge CLI invocation under per-account sudo impersonation.
//!
//! Every platform interaction is `sudo -ni -u tools.<account> env
//! XDG_CONFIG_HOME=<home> toolforge ...`. Argument construction is kept
//! pure so it can be unit tested; process execution is not.

use crate::constants;
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// sudo + env prefix for running `toolforge` as the given account.
fn impersonation_args(account: &str) -> Vec<String> {
    vec![
        "-ni".to_string(),
        "-u".to_string(),
        format!("{}{}", constants::TOOL_USER_PREFIX, account),
        "env".to_string(),
        format!(
            "XDG_CONFIG_HOME={}/{}",
            constants::TOOL_BASE_DIR,
            account
        ),
        constants::TOOLFORGE_BIN.to_string(),
    ]
}

fn toolforge_command(account: &str, subcommand: &[&str]) -> Command {
    let mut cmd = Command::new(constants::SUDO_BIN);
    cmd.args(impersonation_args(account));
    cmd.args(subcommand);
    cmd
}

/// Read one envvar for an account. Surfaces the CLI's own failure output.
pub fn envvar_show(account: &str, name: &str) -> Result<String> {
    let cmd = toolforge_command(account, &["envvars", "show", name]);
    let stdout = run_capture(cmd)
        .with_context(|| format!("read envvar {} for {}", name, account))?;
    Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
}

/// Create or replace one envvar for an account.
pub fn envvar_create(account: &str, name: &str, value: &str) -> Result<()> {
    let cmd = toolforge_command(account, &["envvars", "create", name, value]);
    run(cmd).with_context(|| format!("write envvar {} for {}", name, account))
}

/// stderr marker the CLI emits when an account has no component configs yet.
fn missing_configs_marker(account: &str) -> String {
    format!(
        "Unable to find namespace tool-{} or config {}-config for {}",
        account, account, account
    )
}

/// Whether the account already has component configs.
///
/// The CLI reports "missing" as exit code 1 plus a namespace-not-found line
/// on stderr; anything else non-zero is a real failure.
pub fn has_component_configs(account: &str) -> Result<bool> {
    let mut cmd = toolforge_command(account, &["components", "config", "show"]);
    let output = cmd
        .output()
        .with_context(|| format!("run toolforge components config show for {}", account))?;
    if output.status.success() {
        return Ok(true);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.status.code() == Some(1) && stderr.contains(&missing_configs_marker(account)) {
        return Ok(false);
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    bail!(
        "components config show failed for {}: {}{}",
        account,
        stdout,
        stderr
    );
}

/// Apply a component config by streaming a YAML file to the CLI's stdin.
pub fn components_config_create(account: &str, config_file: &Path) -> Result<()> {
    let file = std::fs::File::open(config_file)
        .with_context(|| format!("open config {}", config_file.display()))?;
    let mut cmd = toolforge_command(account, &["components", "config", "create"]);
    cmd.stdin(Stdio::from(file));
    run(cmd).with_context(|| format!("create component config for {}", account))
}

/// Whether the toolforge CLI is installed at all (version probe, no sudo).
pub fn available() -> bool {
    Command::new(constants::TOOLFORGE_BIN)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn run(mut cmd: Command) -> Result<()> {
    let output = cmd.output().context("run command")?;
    if output.status.success() {
        return Ok(());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("command failed: {}{}", stdout, stderr);
}

fn run_capture(mut cmd: Command) -> Result<String> {
    let output = cmd.output().context("run command")?;
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    bail!("command failed: {}{}", stdout, stderr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impersonation_args() {
        let args = impersonation_args("examplebot-worker-2");
        assert_eq!(
            args,
            vec![
                "-ni",
                "-u",
                "tools.examplebot-worker-2",
                "env",
                "XDG_CONFIG_HOME=/data/project/examplebot-worker-2",
                "toolforge",
            ]
        );
    }

    #[test]
    fn test_missing_configs_marker() {
        assert_eq!(
            missing_configs_marker("mybot"),
            "Unable to find namespace tool-mybot or config mybot-config for mybot"
        );
    }

    #[test]
    fn test_command_uses_sudo() {
        let cmd = toolforge_command("mybot", &["envvars", "show", "X"]);
        assert_eq!(cmd.get_program(), constants::SUDO_BIN);
        let args: Vec<_> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args.last().unwrap(), "X");
        assert!(args.contains(&"envvars".to_string()));
    }
}
