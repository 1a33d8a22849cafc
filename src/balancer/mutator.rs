use anyhow::{ensure, Context, Result};
use crate::cluster::ClusterState;

/// Apply a tentative move to the working state.
///
/// The VM's counters are transferred from the node currently carrying them
/// to `target`, and `node_rebalance` is updated to match. The node carrying
/// the counters is `node_rebalance`, not `node_parent` — they coincide until
/// a VM is moved for the first time, and using the rebalance node keeps
/// resource totals conserved when the group reconciler re-places a VM that
/// the main loop already moved. `node_parent` is never rewritten; the
/// executor migrates from parent to rebalance.
pub(crate) fn apply_move(state: &mut ClusterState, vm_name: &str, target: &str) -> Result<()> {
    let (source, cpu, mem, disk) = {
        let vm = state
            .vms
            .get(vm_name)
            .with_context(|| format!("unknown VM in move: {vm_name}"))?;
        (vm.node_rebalance.clone(), vm.cpu, vm.mem, vm.disk)
    };

    if source == target {
        return Ok(());
    }
    ensure!(state.nodes.contains_key(target), "unknown target node in move: {target}");

    {
        let src = state
            .nodes
            .get_mut(&source)
            .with_context(|| format!("unknown source node in move: {source}"))?;
        src.cpu.used = src.cpu.used.saturating_sub(cpu.used);
        src.cpu.assigned = src.cpu.assigned.saturating_sub(cpu.total);
        src.mem.used = src.mem.used.saturating_sub(mem.used);
        src.mem.assigned = src.mem.assigned.saturating_sub(mem.total);
        src.disk.used = src.disk.used.saturating_sub(disk.used);
        src.disk.assigned = src.disk.assigned.saturating_sub(disk.total);
    }

    {
        let dst = state
            .nodes
            .get_mut(target)
            .with_context(|| format!("unknown target node in move: {target}"))?;
        dst.cpu.used += cpu.used;
        dst.cpu.assigned += cpu.total;
        dst.mem.used += mem.used;
        dst.mem.assigned += mem.total;
        dst.disk.used += disk.used;
        dst.disk.assigned += disk.total;
    }

    state
        .vms
        .get_mut(vm_name)
        .with_context(|| format!("unknown VM in move: {vm_name}"))?
        .node_rebalance = target.to_string();

    Ok(())
}
