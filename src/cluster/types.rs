use crate::balancer::Method;
use serde::Serialize;
use std::collections::BTreeMap;

/// Integer percentage of `part` over `whole`, truncated.
///
/// Truncation is deliberate: the evaluator detects fixed points by comparing
/// these integers for exact equality between iterations.
pub(crate) const fn pct(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        0
    } else {
        part * 100 / whole
    }
}

/// Per-dimension counters for a node.
///
/// `total` and `used` come straight from the node inventory; `assigned` is
/// the sum of resident VM totals, folded in by the snapshot builder and
/// transferred between nodes by the plan mutator. Derived values are always
/// computed from these bases, never stored.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub(crate) struct NodeResource {
    pub total: u64,
    pub used: u64,
    pub assigned: u64,
}

impl NodeResource {
    pub(crate) const fn free(&self) -> u64 {
        self.total.saturating_sub(self.used)
    }

    pub(crate) const fn free_pct(&self) -> u64 {
        pct(self.free(), self.total)
    }

    pub(crate) const fn assigned_pct(&self) -> u64 {
        pct(self.assigned, self.total)
    }
}

/// A physical node in the cluster.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub name: String,
    pub cpu: NodeResource,
    pub mem: NodeResource,
    pub disk: NodeResource,
    /// Tracked metric observed at the previous evaluator iteration.
    pub last_run_pct: Option<u64>,
    /// True when the tracked metric did not change between iterations.
    pub stable: bool,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, cpu: NodeResource, mem: NodeResource, disk: NodeResource) -> Self {
        Self { name: name.into(), cpu, mem, disk, last_run_pct: None, stable: false }
    }

    pub(crate) const fn resource(&self, method: Method) -> &NodeResource {
        match method {
            Method::Cpu => &self.cpu,
            Method::Memory => &self.mem,
            Method::Disk => &self.disk,
        }
    }

    pub(crate) fn resource_mut(&mut self, method: Method) -> &mut NodeResource {
        match method {
            Method::Cpu => &mut self.cpu,
            Method::Memory => &mut self.mem,
            Method::Disk => &mut self.disk,
        }
    }
}

/// Per-dimension footprint of a VM.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub(crate) struct VmResource {
    pub total: u64,
    pub used: u64,
}

/// A running VM admitted into the snapshot.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct Vm {
    pub name: String,
    pub vmid: u32,
    pub cpu: VmResource,
    pub mem: VmResource,
    pub disk: VmResource,
    /// Node the VM currently runs on. Never rewritten during planning; the
    /// executor migrates from here to `node_rebalance`.
    pub node_parent: String,
    /// Planned placement. Starts equal to `node_parent`.
    pub node_rebalance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_exclude: Option<String>,
}

impl Vm {
    pub(crate) const fn footprint(&self, method: Method) -> &VmResource {
        match method {
            Method::Cpu => &self.cpu,
            Method::Memory => &self.mem,
            Method::Disk => &self.disk,
        }
    }
}

/// Immutable view of the cluster captured at the start of one planning
/// cycle, then used as the mutable working copy of that pass.
///
/// BTreeMaps keep iteration in lexicographic key order, which is what the
/// selection rules rely on for deterministic tie-breaking.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClusterState {
    pub nodes: BTreeMap<String, Node>,
    pub vms: BTreeMap<String, Vm>,
}
