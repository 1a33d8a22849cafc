use super::mutator;
use anyhow::{Context, Result};
use crate::cluster::ClusterState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Bucket VM names by a group tag. Members come out sorted by name.
fn bucket_by<F>(state: &ClusterState, tag_of: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&crate::cluster::Vm) -> Option<&String>,
{
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for vm in state.vms.values() {
        if let Some(tag) = tag_of(vm) {
            buckets.entry(tag.clone()).or_default().push(vm.name.clone());
        }
    }
    buckets
}

/// Enforce include groups: all VMs sharing an include tag end on one node.
///
/// The first member's planned node anchors the group; every other member is
/// relocated onto it. Single-member groups need no work.
pub(crate) fn reconcile_include(state: &mut ClusterState) -> Result<()> {
    let buckets = bucket_by(state, |vm| vm.group_include.as_ref());

    for (tag, members) in buckets {
        if members.len() < 2 {
            continue;
        }
        let anchor = state
            .vms
            .get(&members[0])
            .with_context(|| format!("unknown VM in include group: {}", members[0]))?
            .node_rebalance
            .clone();
        info!("include group {tag}: anchoring {} VMs on {anchor}", members.len());
        for member in &members[1..] {
            mutator::apply_move(state, member, &anchor)?;
        }
    }

    Ok(())
}

/// Enforce exclude groups: no two VMs sharing an exclude tag end on the
/// same node.
///
/// Members are walked in name order. A member whose planned node is not yet
/// taken by a group peer keeps it; otherwise the candidate nodes (everything
/// except nodes already taken and the member's own parent) are shuffled and
/// the head is used. A group with more members than nodes cannot be fully
/// dispersed; the surplus members stay put and the conflict is logged.
pub(crate) fn reconcile_exclude(state: &mut ClusterState, rng: &mut StdRng) -> Result<()> {
    let buckets = bucket_by(state, |vm| vm.group_exclude.as_ref());

    for (tag, members) in buckets {
        if members.len() < 2 {
            continue;
        }
        let mut occupied: BTreeSet<String> = BTreeSet::new();
        for member in &members {
            let vm = state
                .vms
                .get(member)
                .with_context(|| format!("unknown VM in exclude group: {member}"))?;
            let planned = vm.node_rebalance.clone();
            if !occupied.contains(&planned) {
                occupied.insert(planned);
                continue;
            }

            let parent = vm.node_parent.clone();
            let mut candidates: Vec<String> = state
                .nodes
                .keys()
                .filter(|name| !occupied.contains(*name) && **name != parent)
                .cloned()
                .collect();
            candidates.shuffle(rng);

            match candidates.first() {
                Some(target) => {
                    let target = target.clone();
                    info!("exclude group {tag}: dispersing {member} to {target}");
                    mutator::apply_move(state, member, &target)?;
                    occupied.insert(target);
                }
                None => {
                    warn!("exclude group {tag}: no node left for {member}, constraint not satisfiable");
                }
            }
        }
    }

    Ok(())
}
