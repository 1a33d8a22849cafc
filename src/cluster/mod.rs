mod snapshot;
mod types;

pub(crate) use snapshot::fetch;
pub(crate) use types::{ClusterState, Node, NodeResource, Vm, VmResource};

#[cfg(test)]
pub(crate) use snapshot::{build, parse_group_tags, vm_name_ignored, RawVm};
