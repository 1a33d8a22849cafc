use anyhow::Result;
use crate::balancer::PlanResult;
use crate::cluster::{ClusterState, Vm};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render the plan as a right-aligned table for `--dry-run` output.
pub(crate) fn render_table(plan: &PlanResult) -> String {
    if plan.migrations.is_empty() {
        return "cluster is balanced, no migrations planned".to_string();
    }

    let headers = ["VM", "Current Node", "Rebalanced Node"];
    let rows: Vec<[&str; 3]> = plan
        .migrations
        .iter()
        .map(|m| [m.vm_name.as_str(), m.from_node.as_str(), m.to_node.as_str()])
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>w0$} | {:>w1$} | {:>w2$}",
        headers[0],
        headers[1],
        headers[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2]
    );
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 6));
    for row in &rows {
        let _ = writeln!(
            out,
            "{:>w0$} | {:>w1$} | {:>w2$}",
            row[0],
            row[1],
            row[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        );
    }
    out.pop();
    out
}

/// Render the plan as a JSON object mapping VM name to its finalised
/// record (vmid, parent and rebalance nodes, resource counters).
pub(crate) fn render_json(state: &ClusterState, plan: &PlanResult) -> Result<String> {
    let records: BTreeMap<&str, &Vm> = plan
        .migrations
        .iter()
        .filter_map(|m| state.vms.get(&m.vm_name).map(|vm| (m.vm_name.as_str(), vm)))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
