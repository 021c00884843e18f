//! Config download via curl into a temp file.
//!
//! Downloading first and streaming the complete file into the CLI avoids a
//! half-applied config if the transfer dies mid-pipe.

use anyhow::{bail, Context, Result};
use std::process::Command;
use tempfile::NamedTempFile;

/// Fetch a URL into a named temp file. `--fail` turns HTTP errors into a
/// non-zero exit instead of saving the error body.
pub fn fetch_to_temp(url: &str) -> Result<NamedTempFile> {
    let tmp = tempfile::Builder::new()
        .prefix(".poolcreds-fetch-")
        .suffix(".yaml")
        .tempfile()
        .context("create download temp file")?;

    let output = Command::new("curl")
        .arg("--fail")
        .arg("--silent")
        .arg("--show-error")
        .arg("--location")
        .arg("--output")
        .arg(tmp.path())
        .arg(url)
        .output()
        .with_context(|| format!("run curl for {}", url))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("download failed for {}: {}", url, stderr.trim());
    }
    Ok(tmp)
}

/// Build the config URL for one account.
pub fn account_config_url(base_url: &str, account: &str) -> String {
    format!("{}/{}.yaml", base_url.trim_end_matches('/'), account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_config_url() {
        assert_eq!(
            account_config_url("https://example.org/configs", "bot-1"),
            "https://example.org/configs/bot-1.yaml"
        );
    }

    #[test]
    fn test_account_config_url_trailing_slash() {
        assert_eq!(
            account_config_url("https://example.org/configs/", "bot-1"),
            "https://example.org/configs/bot-1.yaml"
        );
    }
}
