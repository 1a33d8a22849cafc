use crate::cluster::{build, parse_group_tags, vm_name_ignored, RawVm};
use crate::proxmox::{NodeListItem, VmListItem};

fn api_node(name: &str, maxmem: u64, mem: u64) -> NodeListItem {
    NodeListItem {
        node: name.to_string(),
        status: "online".to_string(),
        maxcpu: 8,
        cpu: 0.25,
        maxmem,
        mem,
        maxdisk: 1_000,
        disk: 100,
    }
}

fn api_vm(vmid: u32, name: &str, maxmem: u64, mem: u64) -> VmListItem {
    VmListItem {
        vmid,
        name: Some(name.to_string()),
        status: "running".to_string(),
        cpus: 2.0,
        cpu: 0.25,
        maxmem,
        mem,
        maxdisk: 100,
        disk: 10,
    }
}

fn raw(node: &str, vm: VmListItem, tags: Option<&str>) -> RawVm {
    RawVm { node: node.to_string(), vm, tags: tags.map(String::from) }
}

#[test]
fn wildcard_is_a_substring_match() {
    let patterns = vec!["test*".to_string(), "vm42".to_string()];
    assert!(vm_name_ignored("test01", &patterns));
    // The trailing * strips to a containment test, not a prefix test.
    assert!(vm_name_ignored("mytest", &patterns));
    assert!(vm_name_ignored("vm42", &patterns));
    assert!(!vm_name_ignored("vm421", &patterns));
    assert!(!vm_name_ignored("prod01", &patterns));
}

#[test]
fn ignored_vms_never_enter_the_snapshot() {
    let ignore_vms = vec!["test*".to_string()];
    let state = build(
        vec![api_node("n1", 100, 50)],
        vec![
            raw("n1", api_vm(101, "test01", 10, 5), None),
            raw("n1", api_vm(102, "prod01", 10, 5), None),
        ],
        &[],
        &ignore_vms,
    );

    assert!(!state.vms.contains_key("test01"));
    assert!(state.vms.contains_key("prod01"));
}

#[test]
fn ignore_tag_drops_the_vm() {
    let state = build(
        vec![api_node("n1", 100, 50)],
        vec![
            raw("n1", api_vm(101, "pinned", 10, 5), Some("prod;plb_ignore_vm")),
            raw("n1", api_vm(102, "mobile", 10, 5), Some("prod")),
        ],
        &[],
        &[],
    );

    assert!(!state.vms.contains_key("pinned"));
    assert!(state.vms.contains_key("mobile"));
}

#[test]
fn group_tags_are_extracted() {
    let (include, exclude, ignored) =
        parse_group_tags(Some("prod;plb_include_db;plb_exclude_ha;plb_include_web"));
    assert_eq!(include.as_deref(), Some("plb_include_db"));
    assert_eq!(exclude.as_deref(), Some("plb_exclude_ha"));
    assert!(!ignored);

    let (include, exclude, ignored) = parse_group_tags(Some("plb_ignore_vm"));
    assert!(include.is_none());
    assert!(exclude.is_none());
    assert!(ignored);

    // Unknown plb_ tags and no tags at all are both fine.
    let (include, exclude, ignored) = parse_group_tags(Some("plb_whatever;backup"));
    assert!(include.is_none() && exclude.is_none() && !ignored);
    let (include, exclude, ignored) = parse_group_tags(None);
    assert!(include.is_none() && exclude.is_none() && !ignored);
}

#[test]
fn offline_and_ignored_nodes_are_skipped() {
    let mut offline = api_node("n2", 100, 50);
    offline.status = "offline".to_string();
    let ignore_nodes = vec!["n3".to_string()];

    let state = build(
        vec![api_node("n1", 100, 50), offline, api_node("n3", 100, 50)],
        vec![
            raw("n1", api_vm(101, "keeper", 10, 5), None),
            raw("n2", api_vm(102, "orphan1", 10, 5), None),
            raw("n3", api_vm(103, "orphan2", 10, 5), None),
        ],
        &ignore_nodes,
        &[],
    );

    assert_eq!(state.nodes.len(), 1);
    assert!(state.nodes.contains_key("n1"));
    // VMs whose parent did not make it into the snapshot are dropped too.
    assert_eq!(state.vms.len(), 1);
    assert!(state.vms.contains_key("keeper"));
}

#[test]
fn stopped_and_unnamed_vms_are_skipped() {
    let mut stopped = api_vm(101, "asleep", 10, 5);
    stopped.status = "stopped".to_string();
    let mut unnamed = api_vm(102, "x", 10, 5);
    unnamed.name = None;

    let state = build(
        vec![api_node("n1", 100, 50)],
        vec![
            raw("n1", stopped, None),
            raw("n1", unnamed, None),
            raw("n1", api_vm(103, "awake", 10, 5), None),
        ],
        &[],
        &[],
    );

    assert_eq!(state.vms.len(), 1);
    assert!(state.vms.contains_key("awake"));
}

#[test]
fn assigned_counters_fold_resident_vm_totals() {
    let state = build(
        vec![api_node("n1", 100, 50), api_node("n2", 100, 10)],
        vec![
            raw("n1", api_vm(101, "v1", 30, 20), None),
            raw("n1", api_vm(102, "v2", 20, 10), None),
            raw("n2", api_vm(103, "v3", 10, 5), None),
        ],
        &[],
        &[],
    );

    let n1 = &state.nodes["n1"];
    assert_eq!(n1.mem.assigned, 50);
    assert_eq!(n1.cpu.assigned, 4_000);
    assert_eq!(n1.disk.assigned, 200);
    assert_eq!(state.nodes["n2"].mem.assigned, 10);

    for vm in state.vms.values() {
        assert_eq!(vm.node_rebalance, vm.node_parent);
        assert!(state.nodes.contains_key(&vm.node_parent));
    }
}

#[test]
fn overprovisioned_snapshot_still_plans() {
    use crate::balancer::generate_plan;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // 200G of VM memory committed on a 100G node: warned about, not fatal.
    let mut state = build(
        vec![api_node("n1", 100, 80), api_node("n2", 100, 10)],
        vec![raw("n1", api_vm(101, "big", 200, 60), None)],
        &[],
        &[],
    );

    let n1 = &state.nodes["n1"];
    assert!(n1.mem.assigned > n1.mem.total);

    let policy = super::mem_used_policy(10);
    let plan = generate_plan(&mut state, &policy, &mut StdRng::seed_from_u64(42)).unwrap();
    assert!(!plan.migrations.is_empty());
}

#[test]
fn cpu_is_normalized_to_millicores() {
    let mut node = api_node("n1", 100, 50);
    node.maxcpu = 8;
    node.cpu = 0.5;
    let vm = api_vm(101, "v1", 10, 5);

    let state = build(vec![node], vec![raw("n1", vm, None)], &[], &[]);

    let n1 = &state.nodes["n1"];
    assert_eq!(n1.cpu.total, 8_000);
    assert_eq!(n1.cpu.used, 4_000);

    let v1 = &state.vms["v1"];
    assert_eq!(v1.cpu.total, 2_000);
    assert_eq!(v1.cpu.used, 500);
}
