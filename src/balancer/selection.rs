use super::types::{Mode, Policy};
use crate::cluster::ClusterState;
use std::collections::BTreeSet;

/// Pick the heaviest VM on the policy dimension not yet considered this pass.
///
/// Weight is runtime consumption under `used` mode and the provisioned total
/// under `assigned` mode. Iteration is in name order and only a strictly
/// greater weight displaces the current best, so ties resolve to the
/// lexicographically smallest name.
pub(crate) fn heaviest_vm(
    state: &ClusterState,
    policy: &Policy,
    processed: &BTreeSet<String>,
) -> Option<String> {
    let mut best: Option<(&str, u64)> = None;

    for vm in state.vms.values() {
        if processed.contains(&vm.name) {
            continue;
        }
        let footprint = vm.footprint(policy.method);
        let weight = match policy.mode {
            Mode::Used => footprint.used,
            Mode::Assigned => footprint.total,
        };
        if best.is_none() || weight > best.map_or(0, |(_, w)| w) {
            best = Some((&vm.name, weight));
        }
    }

    best.map(|(name, _)| name.to_string())
}

/// Pick the node a move should land on.
///
/// Under `used` mode this is the node with the most free capacity on the
/// policy dimension. Under `assigned` mode it is the node with the least
/// assigned capacity, restricted to nodes whose assigned percentage is
/// strictly between 0 and 100. Ties resolve lexicographically by name.
pub(crate) fn lightest_node(state: &ClusterState, policy: &Policy) -> Option<String> {
    match policy.mode {
        Mode::Used => {
            let mut best: Option<(&str, u64)> = None;
            for node in state.nodes.values() {
                let free = node.resource(policy.method).free();
                if best.is_none() || free > best.map_or(0, |(_, f)| f) {
                    best = Some((&node.name, free));
                }
            }
            best.map(|(name, _)| name.to_string())
        }
        Mode::Assigned => {
            let mut best: Option<(&str, u64)> = None;
            for node in state.nodes.values() {
                let res = node.resource(policy.method);
                let assigned_pct = res.assigned_pct();
                if assigned_pct == 0 || assigned_pct >= 100 {
                    continue;
                }
                if best.is_none() || res.assigned < best.map_or(u64::MAX, |(_, a)| a) {
                    best = Some((&node.name, res.assigned));
                }
            }
            best.map(|(name, _)| name.to_string())
        }
    }
}
