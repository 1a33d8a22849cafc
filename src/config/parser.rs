use super::settings::AppConfig;
use anyhow::{bail, Context, Result};
use crate::balancer::{Method, Mode};

/// Split a comma-separated value into trimmed, non-empty entries.
fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("config key {key} must be 0 or 1, got {value:?}"),
    }
}

impl AppConfig {
    /// Parse the INI config format: `[section]` headers followed by
    /// `key = value` lines. Values may be double-quoted; `#` and `;` start
    /// comment lines; unknown sections and keys are ignored.
    pub(crate) fn parse_ini(&mut self, contents: &str) -> Result<()> {
        let mut section = String::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = header.trim().to_string();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match (section.as_str(), key) {
                ("proxmox", "api_host") => self.api_host = value.to_string(),
                ("proxmox", "api_user") => self.api_user = value.to_string(),
                ("proxmox", "api_pass") => self.api_pass = value.to_string(),
                ("proxmox", "verify_ssl") => self.verify_ssl = parse_flag("verify_ssl", value)?,

                ("balancing", "method") => {
                    self.method = Method::try_from(value).map_err(anyhow::Error::msg)?;
                }
                ("balancing", "mode") => {
                    self.mode = Mode::try_from(value).map_err(anyhow::Error::msg)?;
                }
                ("balancing", "balanciness") => {
                    self.balanciness = value
                        .parse()
                        .with_context(|| format!("balanciness must be an integer, got {value:?}"))?;
                }
                ("balancing", "ignore_nodes") => self.ignore_nodes = split_list(value),
                ("balancing", "ignore_vms") => self.ignore_vms = split_list(value),

                ("service", "daemon") => self.daemon = parse_flag("daemon", value)?,
                ("service", "schedule") => {
                    self.schedule_hours = value
                        .parse()
                        .with_context(|| format!("schedule must be an integer, got {value:?}"))?;
                }
                ("service", "log_verbosity") => self.log_verbosity = value.to_string(),

                _ => {} // Ignore unknown keys
            }
        }

        Ok(())
    }
}
