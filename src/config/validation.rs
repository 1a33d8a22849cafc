use super::settings::AppConfig;
use anyhow::Result;

impl AppConfig {
    /// Validate configuration values are sane.
    pub(crate) fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.api_host.is_empty(), "[proxmox] api_host is required");
        anyhow::ensure!(!self.api_user.is_empty(), "[proxmox] api_user is required");
        anyhow::ensure!(!self.api_pass.is_empty(), "[proxmox] api_pass is required");
        anyhow::ensure!(self.schedule_hours >= 1, "[service] schedule must be at least 1 hour");
        anyhow::ensure!(
            matches!(self.log_verbosity.as_str(), "CRITICAL" | "WARNING" | "INFO" | "DEBUG"),
            "[service] log_verbosity must be CRITICAL, WARNING, INFO or DEBUG"
        );
        Ok(())
    }
}
