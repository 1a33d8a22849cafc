mod client;
mod types;

pub(crate) use client::ProxmoxClient;
pub(crate) use types::{NodeListItem, VmListItem};
