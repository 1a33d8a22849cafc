use super::types::{Envelope, NodeListItem, Ticket, VmConfig, VmListItem};
use anyhow::{Context, Result};
use reqwest::header;
use serde::de::DeserializeOwned;

/// Client for the Proxmox VE HTTP API.
///
/// Authenticates once with a username/password ticket; every subsequent
/// request carries the ticket cookie, and writes additionally carry the
/// CSRF prevention token.
pub(crate) struct ProxmoxClient {
    base_url: String,
    http: reqwest::Client,
    ticket: String,
    csrf_token: String,
}

impl ProxmoxClient {
    /// Connect and authenticate against the cluster API.
    ///
    /// `host` may carry an explicit port; the Proxmox default of 8006 is
    /// appended otherwise. With `verify_ssl` off the client accepts the
    /// self-signed certificates a stock PVE install ships with.
    pub(crate) async fn connect(
        host: &str,
        user: &str,
        pass: &str,
        verify_ssl: bool,
    ) -> Result<Self> {
        let authority = if host.contains(':') { host.to_string() } else { format!("{host}:8006") };
        let base_url = format!("https://{authority}/api2/json");

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .context("failed to build HTTP client")?;

        let resp = http
            .post(format!("{base_url}/access/ticket"))
            .form(&[("username", user), ("password", pass)])
            .send()
            .await
            .with_context(|| format!("failed to reach Proxmox API at {authority}"))?
            .error_for_status()
            .context("Proxmox authentication failed")?;

        let ticket: Envelope<Ticket> =
            resp.json().await.context("failed to parse authentication ticket")?;

        Ok(Self {
            base_url,
            http,
            ticket: ticket.data.ticket,
            csrf_token: ticket.data.csrf_token,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(header::COOKIE, format!("PVEAuthCookie={}", self.ticket))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {path} rejected"))?;

        let body: Envelope<T> =
            resp.json().await.with_context(|| format!("failed to parse GET {path} response"))?;
        Ok(body.data)
    }

    pub(crate) async fn list_nodes(&self) -> Result<Vec<NodeListItem>> {
        self.get("/nodes").await.context("list nodes")
    }

    pub(crate) async fn list_vms(&self, node: &str) -> Result<Vec<VmListItem>> {
        self.get(&format!("/nodes/{node}/qemu")).await.with_context(|| format!("list VMs on {node}"))
    }

    pub(crate) async fn vm_config(&self, node: &str, vmid: u32) -> Result<VmConfig> {
        self.get(&format!("/nodes/{node}/qemu/{vmid}/config"))
            .await
            .with_context(|| format!("fetch config of VM {vmid} on {node}"))
    }

    /// Request an online migration of a VM to another node.
    pub(crate) async fn migrate(&self, node: &str, vmid: u32, target: &str) -> Result<()> {
        self.http
            .post(format!("{}/nodes/{node}/qemu/{vmid}/migrate", self.base_url))
            .header(header::COOKIE, format!("PVEAuthCookie={}", self.ticket))
            .header("CSRFPreventionToken", &self.csrf_token)
            .form(&[("target", target), ("online", "1")])
            .send()
            .await
            .with_context(|| format!("send migrate request for VM {vmid}"))?
            .error_for_status()
            .with_context(|| format!("migration of VM {vmid} to {target} rejected"))?;
        Ok(())
    }
}
