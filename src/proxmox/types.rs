use serde::Deserialize;

/// Every Proxmox API response wraps its payload in a `data` field.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Authentication ticket returned by `POST /access/ticket`.
#[derive(Debug, Deserialize)]
pub(crate) struct Ticket {
    pub ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    pub csrf_token: String,
}

/// A node as returned by `GET /nodes`.
///
/// Resource fields can be absent for nodes the API cannot reach, so they
/// default to zero rather than failing the whole listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NodeListItem {
    pub node: String,
    pub status: String,
    /// Core count.
    #[serde(default)]
    pub maxcpu: u32,
    /// CPU usage as a fraction of all cores (0.0 - 1.0).
    #[serde(default)]
    pub cpu: f64,
    /// Memory capacity in bytes.
    #[serde(default)]
    pub maxmem: u64,
    /// Memory usage in bytes.
    #[serde(default)]
    pub mem: u64,
    /// Root filesystem capacity in bytes.
    #[serde(default)]
    pub maxdisk: u64,
    /// Root filesystem usage in bytes.
    #[serde(default)]
    pub disk: u64,
}

/// A VM as returned by `GET /nodes/{node}/qemu`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VmListItem {
    pub vmid: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    /// Provisioned vCPU count.
    #[serde(default)]
    pub cpus: f64,
    /// CPU usage as a fraction of the provisioned vCPUs (0.0 - 1.0).
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub maxmem: u64,
    #[serde(default)]
    pub mem: u64,
    #[serde(default)]
    pub maxdisk: u64,
    #[serde(default)]
    pub disk: u64,
}

/// The subset of `GET /nodes/{node}/qemu/{vmid}/config` the balancer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct VmConfig {
    /// Semicolon-separated tag list, if any tags are set.
    #[serde(default)]
    pub tags: Option<String>,
}
