use super::types::{Migration, PlanResult, Policy};
use super::{evaluator, groups, mutator, selection};
use anyhow::Result;
use crate::cluster::ClusterState;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use tracing::info;

/// Generate a migration plan.
///
/// Runs the main balancing loop over the working state, then the group
/// reconciliation sweeps, and finally projects the state into the list of
/// migrations worth executing. The state is mutated in place and reflects
/// the post-plan picture when this returns.
pub(crate) fn generate_plan(
    state: &mut ClusterState,
    policy: &Policy,
    rng: &mut StdRng,
) -> Result<PlanResult> {
    let initial_spread = evaluator::spread(state, policy);
    info!(
        "planning: method={}, mode={}, balanciness={}%, spread={}%",
        policy.method, policy.mode, policy.balanciness, initial_spread
    );

    let mut processed: BTreeSet<String> = BTreeSet::new();
    while evaluator::should_continue(state, policy) {
        let Some(vm_name) = selection::heaviest_vm(state, policy, &processed) else {
            break;
        };
        processed.insert(vm_name.clone());
        let Some(target) = selection::lightest_node(state, policy) else {
            break;
        };
        mutator::apply_move(state, &vm_name, &target)?;
    }

    groups::reconcile_include(state)?;
    groups::reconcile_exclude(state, rng)?;

    let migrations = finalise(state);
    let projected_spread = evaluator::spread(state, policy);

    info!(
        "plan generated: {} migrations, spread {}% -> {}%",
        migrations.len(),
        initial_spread,
        projected_spread
    );

    Ok(PlanResult { migrations, initial_spread, projected_spread })
}

/// Drop VMs whose planned node equals their current node; the rest, in name
/// order, form the migration plan.
fn finalise(state: &ClusterState) -> Vec<Migration> {
    state
        .vms
        .values()
        .filter(|vm| vm.node_rebalance != vm.node_parent)
        .map(|vm| Migration {
            vm_name: vm.name.clone(),
            vmid: vm.vmid,
            from_node: vm.node_parent.clone(),
            to_node: vm.node_rebalance.clone(),
        })
        .collect()
}
