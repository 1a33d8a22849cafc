mod output_tests;
mod snapshot_tests;

use crate::balancer::{Method, Mode, Policy};
use crate::cluster::{ClusterState, Node, NodeResource, Vm, VmResource};

/// Build a node with the given memory counters and fixed CPU/disk counters.
pub(crate) fn mem_node(name: &str, mem_total: u64, mem_used: u64) -> Node {
    Node::new(
        name,
        NodeResource { total: 32_000, used: 4_000, assigned: 0 },
        NodeResource { total: mem_total, used: mem_used, assigned: 0 },
        NodeResource { total: 1_000, used: 100, assigned: 0 },
    )
}

/// Build a VM with the given memory footprint and a small fixed CPU/disk
/// footprint, resident on `node`.
pub(crate) fn mem_vm(name: &str, vmid: u32, node: &str, mem_total: u64, mem_used: u64) -> Vm {
    Vm {
        name: name.to_string(),
        vmid,
        cpu: VmResource { total: 2_000, used: 500 },
        mem: VmResource { total: mem_total, used: mem_used },
        disk: VmResource { total: 100, used: 10 },
        node_parent: node.to_string(),
        node_rebalance: node.to_string(),
        group_include: None,
        group_exclude: None,
    }
}

/// Assemble a state and fold VM totals into their parents' assigned
/// counters, the way the snapshot builder does.
pub(crate) fn state_of(nodes: Vec<Node>, vms: Vec<Vm>) -> ClusterState {
    let mut state = ClusterState::default();
    for node in nodes {
        state.nodes.insert(node.name.clone(), node);
    }
    for vm in vms {
        if let Some(node) = state.nodes.get_mut(&vm.node_parent) {
            node.cpu.assigned += vm.cpu.total;
            node.mem.assigned += vm.mem.total;
            node.disk.assigned += vm.disk.total;
        }
        state.vms.insert(vm.name.clone(), vm);
    }
    state
}

pub(crate) const fn mem_used_policy(balanciness: u64) -> Policy {
    Policy { method: Method::Memory, mode: Mode::Used, balanciness }
}

pub(crate) const fn mem_assigned_policy(balanciness: u64) -> Policy {
    Policy { method: Method::Memory, mode: Mode::Assigned, balanciness }
}
