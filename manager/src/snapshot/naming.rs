use regex::Regex;
use std::sync::LazyLock;

/// Snapshot names look like `c-<cluster>-<type><provider>-<timestamp>` where
/// type is `r` (recurring) or `m` (manual) and provider is `l` (local) or `s`
/// (S3). Only the provider flag is checked; any type letter matches.
const LOCAL_SNAPSHOT_PATTERN: &str = "^c-[a-z0-9].*?-.l-";

static LOCAL_SNAPSHOT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(LOCAL_SNAPSHOT_PATTERN).ok());

/// Whether `name` denotes a snapshot kept on the hosts' local disks
pub fn is_local_snapshot(name: &str) -> bool {
    LOCAL_SNAPSHOT_RE
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}
