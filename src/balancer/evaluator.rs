use super::types::{Mode, Policy};
use crate::cluster::{ClusterState, Node};

/// The metric the pass tries to even out across nodes.
///
/// Under `used` mode the engine moves load toward the node with the most
/// free runtime capacity, so free percentage is what it watches; under
/// `assigned` mode it equalises provisioned commitment instead.
pub(crate) fn tracked_metric(node: &Node, policy: &Policy) -> u64 {
    let res = node.resource(policy.method);
    match policy.mode {
        Mode::Used => res.free_pct(),
        Mode::Assigned => res.assigned_pct(),
    }
}

/// Max - min of the tracked metric across all nodes. Read-only.
pub(crate) fn spread(state: &ClusterState, policy: &Policy) -> u64 {
    let mut min = u64::MAX;
    let mut max = 0u64;
    for node in state.nodes.values() {
        let metric = tracked_metric(node, policy);
        min = min.min(metric);
        max = max.max(metric);
    }
    if state.nodes.is_empty() {
        0
    } else {
        max - min
    }
}

/// Decide whether another rebalancing iteration is warranted.
///
/// Updates each node's fixed-point bookkeeping as a side effect: a node is
/// stable when its tracked metric is exactly equal (integer comparison, no
/// epsilon) to the value seen on the previous iteration. When every node is
/// stable the pass is converged or stuck and must stop regardless of the
/// remaining spread.
pub(crate) fn should_continue(state: &mut ClusterState, policy: &Policy) -> bool {
    if state.nodes.is_empty() {
        return false;
    }

    let mut all_stable = true;
    let mut min = u64::MAX;
    let mut max = 0u64;

    for node in state.nodes.values_mut() {
        let metric = tracked_metric(node, policy);
        node.stable = node.last_run_pct == Some(metric);
        node.last_run_pct = Some(metric);
        if !node.stable {
            all_stable = false;
        }
        min = min.min(metric);
        max = max.max(metric);
    }

    if all_stable {
        return false;
    }

    min + policy.balanciness < max
}
