use crate::balancer::{Method, Mode};

/// Dimension balanced when `[balancing] method` is not set.
pub(super) const DEFAULT_METHOD: Method = Method::Memory;

/// Mode used when `[balancing] mode` is not set.
pub(super) const DEFAULT_MODE: Mode = Mode::Used;

/// Default tolerated spread between the most- and least-loaded nodes, in
/// integer percent.
pub(super) const DEFAULT_BALANCINESS: u64 = 10;

/// Default hours between daemon cycles.
pub(super) const DEFAULT_SCHEDULE_HOURS: u64 = 24;

/// Default log verbosity (quiet: only migration failures and fatal errors).
pub(super) const DEFAULT_LOG_VERBOSITY: &str = "CRITICAL";
