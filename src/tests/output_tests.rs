use super::{mem_node, mem_vm, state_of};
use crate::balancer::{apply_move, Migration, PlanResult};
use crate::output::{render_json, render_table};

fn plan_of(migrations: Vec<Migration>) -> PlanResult {
    PlanResult { migrations, initial_spread: 30, projected_spread: 5 }
}

#[test]
fn empty_plan_prints_a_notice() {
    let table = render_table(&plan_of(Vec::new()));
    assert!(table.contains("cluster is balanced"));
}

#[test]
fn table_is_right_aligned() {
    let plan = plan_of(vec![Migration {
        vm_name: "verylongvmname01".to_string(),
        vmid: 101,
        from_node: "a".to_string(),
        to_node: "b".to_string(),
    }]);

    let table = render_table(&plan);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "              VM | Current Node | Rebalanced Node");
    assert_eq!(lines[2], "verylongvmname01 |            a |               b");
}

#[test]
fn json_is_keyed_by_vm_name() {
    let mut state = state_of(
        vec![mem_node("a", 100, 80), mem_node("b", 100, 10)],
        vec![mem_vm("v1", 101, "a", 40, 40), mem_vm("v2", 102, "a", 10, 10)],
    );
    apply_move(&mut state, "v1", "b").unwrap();

    let plan = plan_of(vec![Migration {
        vm_name: "v1".to_string(),
        vmid: 101,
        from_node: "a".to_string(),
        to_node: "b".to_string(),
    }]);

    let rendered = render_json(&state, &plan).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    let record = &value["v1"];
    assert_eq!(record["vmid"], 101);
    assert_eq!(record["node_parent"], "a");
    assert_eq!(record["node_rebalance"], "b");
    assert_eq!(record["mem"]["total"], 40);
    assert_eq!(record["mem"]["used"], 40);
    // Only planned VMs are emitted.
    assert!(value.get("v2").is_none());
}
