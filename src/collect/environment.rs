//! `GAEA`-prefixed environment variables.
//!
//! Values are passed through unredacted. Anything injected under the prefix,
//! secrets included, is visible to every client of `/envs` and `/`.

use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::config::ENV_REPORTED_PREFIX;

/// Variable name → value, serialized as a JSON object.
pub type EnvironmentInfo = BTreeMap<String, String>;

/// Keep entries whose key starts with the reported prefix.
pub fn filter_environment<I>(vars: I) -> EnvironmentInfo
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(key, _)| key.starts_with(ENV_REPORTED_PREFIX))
        .collect()
}

/// Snapshot of the reported environment of this process. Entries that are
/// not valid UTF-8 are skipped.
pub fn collect_environment() -> EnvironmentInfo {
    filter_environment(std::env::vars_os().filter_map(utf8_pair))
}

fn utf8_pair((key, value): (OsString, OsString)) -> Option<(String, String)> {
    Some((key.into_string().ok()?, value.into_string().ok()?))
}
