use super::defaults::{
    DEFAULT_BALANCINESS, DEFAULT_LOG_VERBOSITY, DEFAULT_METHOD, DEFAULT_MODE,
    DEFAULT_SCHEDULE_HOURS,
};
use anyhow::{Context, Result};
use crate::balancer::{Method, Mode, Policy};
use std::fs;
use std::path::Path;

/// Runtime configuration, loaded from an INI file with `[proxmox]`,
/// `[balancing]` and `[service]` sections.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_host: String,
    pub api_user: String,
    pub api_pass: String,
    pub verify_ssl: bool,

    pub method: Method,
    pub mode: Mode,
    pub balanciness: u64,
    /// Node names excluded from balancing.
    pub ignore_nodes: Vec<String>,
    /// VM names excluded from balancing. A trailing `*` makes the entry a
    /// substring match (the `*` is stripped, the rest matched anywhere in
    /// the name).
    pub ignore_vms: Vec<String>,

    pub daemon: bool,
    pub schedule_hours: u64,
    pub log_verbosity: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_host: String::new(),
            api_user: String::new(),
            api_pass: String::new(),
            verify_ssl: true,
            method: DEFAULT_METHOD,
            mode: DEFAULT_MODE,
            balanciness: DEFAULT_BALANCINESS,
            ignore_nodes: Vec::new(),
            ignore_vms: Vec::new(),
            daemon: true,
            schedule_hours: DEFAULT_SCHEDULE_HOURS,
            log_verbosity: DEFAULT_LOG_VERBOSITY.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the given file, merging file values over
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let mut config = Self::default();
        config.parse_ini(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The balancing policy this configuration selects.
    pub(crate) const fn policy(&self) -> Policy {
        Policy { method: self.method, mode: self.mode, balanciness: self.balanciness }
    }

    /// Map `log_verbosity` onto a tracing filter directive.
    pub(crate) fn tracing_filter(&self) -> &'static str {
        match self.log_verbosity.as_str() {
            "DEBUG" => "proxbalance=debug",
            "INFO" => "proxbalance=info",
            "WARNING" => "proxbalance=warn",
            _ => "proxbalance=error",
        }
    }
}
