use crate::balancer::PlanResult;
use crate::proxmox::ProxmoxClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Execute the plan's migrations sequentially.
///
/// A rejected migration is logged and skipped; the remaining migrations
/// still run, and the next cycle re-plans from fresh state. Returns the
/// number of failures. Checks for shutdown before each request so a
/// partially executed plan is where cancellation lands.
pub(crate) async fn execute_plan(
    client: &ProxmoxClient,
    plan: &PlanResult,
    cancel: &CancellationToken,
) -> usize {
    let mut failures = 0usize;

    for (i, m) in plan.migrations.iter().enumerate() {
        if cancel.is_cancelled() {
            warn!(
                "shutdown requested, stopping after {i} of {} migrations",
                plan.migrations.len()
            );
            break;
        }

        info!("migrating {} ({}) from {} to {}", m.vm_name, m.vmid, m.from_node, m.to_node);
        match client.migrate(&m.from_node, m.vmid, &m.to_node).await {
            Ok(()) => info!("migration of {} submitted", m.vm_name),
            Err(e) => {
                error!("migration of {} failed: {e:#}", m.vm_name);
                failures += 1;
            }
        }
    }

    failures
}
