use super::types::{ClusterState, Node, NodeResource, Vm, VmResource};
use anyhow::Result;
use crate::config::AppConfig;
use crate::proxmox::{NodeListItem, ProxmoxClient, VmListItem};
use tracing::{debug, warn};

/// Tag prefix that removes a VM from balancing entirely.
const TAG_IGNORE: &str = "plb_ignore_vm";
/// Tag prefix for co-location groups.
const TAG_INCLUDE: &str = "plb_include_";
/// Tag prefix for anti-co-location groups.
const TAG_EXCLUDE: &str = "plb_exclude_";

/// A VM record as gathered from the API, before admission.
#[derive(Debug, Clone)]
pub(crate) struct RawVm {
    pub node: String,
    pub vm: VmListItem,
    pub tags: Option<String>,
}

/// Fetch node and VM inventories from the cluster and build the snapshot.
///
/// Per-VM configs are only requested for VMs that pass the name filters, so
/// an ignore list also saves API round-trips.
pub(crate) async fn fetch(client: &ProxmoxClient, config: &AppConfig) -> Result<ClusterState> {
    let nodes = client.list_nodes().await?;

    let mut raw_vms = Vec::new();
    for node in &nodes {
        if node.status != "online" || config.ignore_nodes.contains(&node.node) {
            continue;
        }
        for vm in client.list_vms(&node.node).await? {
            if vm.status != "running" {
                continue;
            }
            if let Some(name) = &vm.name {
                if vm_name_ignored(name, &config.ignore_vms) {
                    continue;
                }
            }
            let vm_config = client.vm_config(&node.node, vm.vmid).await?;
            raw_vms.push(RawVm { node: node.node.clone(), vm, tags: vm_config.tags });
        }
    }

    Ok(build(nodes, raw_vms, &config.ignore_nodes, &config.ignore_vms))
}

/// Build an internally consistent snapshot from raw inventories.
///
/// Admission rules: nodes must be online and not ignored; VMs must be
/// running, named, not ignored by name or wildcard or `plb_ignore_vm` tag,
/// and resident on an admitted node. Every admitted VM's provisioned totals
/// are folded into its parent's `assigned` counters.
pub(crate) fn build(
    nodes: Vec<NodeListItem>,
    vms: Vec<RawVm>,
    ignore_nodes: &[String],
    ignore_vms: &[String],
) -> ClusterState {
    let mut state = ClusterState::default();

    for item in nodes {
        if item.status != "online" {
            debug!("skipping node {} (status {})", item.node, item.status);
            continue;
        }
        if ignore_nodes.contains(&item.node) {
            debug!("skipping ignored node {}", item.node);
            continue;
        }
        let cpu_total = u64::from(item.maxcpu) * 1000;
        let node = Node::new(
            item.node.clone(),
            NodeResource {
                total: cpu_total,
                used: (item.cpu * item.maxcpu as f64 * 1000.0).round() as u64,
                assigned: 0,
            },
            NodeResource { total: item.maxmem, used: item.mem, assigned: 0 },
            NodeResource { total: item.maxdisk, used: item.disk, assigned: 0 },
        );
        state.nodes.insert(item.node, node);
    }

    for raw in vms {
        if raw.vm.status != "running" {
            continue;
        }
        let Some(name) = raw.vm.name.clone() else {
            debug!("skipping unnamed VM {} on {}", raw.vm.vmid, raw.node);
            continue;
        };
        if vm_name_ignored(&name, ignore_vms) {
            debug!("skipping ignored VM {name}");
            continue;
        }
        if !state.nodes.contains_key(&raw.node) {
            debug!("skipping VM {name}: parent node {} not in snapshot", raw.node);
            continue;
        }

        let (group_include, group_exclude, ignored) = parse_group_tags(raw.tags.as_deref());
        if ignored {
            debug!("skipping VM {name}: tagged {TAG_IGNORE}");
            continue;
        }

        let cpu_total = (raw.vm.cpus * 1000.0).round() as u64;
        let vm = Vm {
            name: name.clone(),
            vmid: raw.vm.vmid,
            cpu: VmResource {
                total: cpu_total,
                used: (raw.vm.cpu * raw.vm.cpus * 1000.0).round() as u64,
            },
            mem: VmResource { total: raw.vm.maxmem, used: raw.vm.mem },
            disk: VmResource { total: raw.vm.maxdisk, used: raw.vm.disk },
            node_parent: raw.node.clone(),
            node_rebalance: raw.node,
            group_include,
            group_exclude,
        };
        state.vms.insert(name, vm);
    }

    fold_assigned(&mut state);
    state
}

/// Fold every VM's provisioned totals into its parent node's assigned
/// counters, then warn about overprovisioned nodes. Assigned exceeding
/// capacity is allowed; the warning is the only surfacing.
fn fold_assigned(state: &mut ClusterState) {
    for vm in state.vms.values() {
        if let Some(node) = state.nodes.get_mut(&vm.node_parent) {
            node.cpu.assigned += vm.cpu.total;
            node.mem.assigned += vm.mem.total;
            node.disk.assigned += vm.disk.total;
        }
    }

    for node in state.nodes.values() {
        for (dim, res) in
            [("cpu", &node.cpu), ("memory", &node.mem), ("disk", &node.disk)]
        {
            if res.assigned_pct() > 99 {
                warn!(
                    "node {} is overprovisioned on {dim}: {}% of capacity assigned",
                    node.name,
                    res.assigned_pct()
                );
            }
        }
    }
}

/// Check a VM name against the ignore list.
///
/// A trailing `*` makes the pattern a substring match: the `*` is stripped
/// and the remainder is tested for containment anywhere in the name (not a
/// prefix match). Anything else must match literally.
pub(crate) fn vm_name_ignored(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(stripped) = pattern.strip_suffix('*') {
            name.contains(stripped)
        } else {
            name == pattern
        }
    })
}

/// Extract group membership from a semicolon-separated tag list.
///
/// Returns (include group, exclude group, ignore flag). The first tag with
/// each group prefix wins; other `plb_*` tags are ignored.
pub(crate) fn parse_group_tags(tags: Option<&str>) -> (Option<String>, Option<String>, bool) {
    let mut include = None;
    let mut exclude = None;
    let mut ignored = false;

    if let Some(tags) = tags {
        for tag in tags.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            if tag.starts_with(TAG_IGNORE) {
                ignored = true;
            } else if include.is_none() && tag.starts_with(TAG_INCLUDE) {
                include = Some(tag.to_string());
            } else if exclude.is_none() && tag.starts_with(TAG_EXCLUDE) {
                exclude = Some(tag.to_string());
            }
        }
    }

    (include, exclude, ignored)
}
