//! Build identity.

use serde::Serialize;

use crate::config::{
    BUILD_GIT_COMMIT, BUILD_TIME, BUILD_VERSION, ENV_RUNTIME_VERSION, RUNTIME_VERSION_PREFIX,
};

/// Response body for `/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_commit: String,
    pub build_time: String,
    #[serde(rename = "go_version")]
    pub runtime_version: String,
}

/// Immutable build identity, created once at startup and shared through
/// application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    version: VersionInfo,
}

impl BuildInfo {
    /// Compile-time constants plus the runtime version read from the process environment.
    pub fn from_env() -> Self {
        let raw = std::env::var(ENV_RUNTIME_VERSION).unwrap_or_default();
        Self::new(BUILD_VERSION, BUILD_GIT_COMMIT, BUILD_TIME, &raw)
    }

    pub fn new(version: &str, git_commit: &str, build_time: &str, raw_runtime_version: &str) -> Self {
        Self {
            version: VersionInfo {
                version: version.to_string(),
                git_commit: git_commit.to_string(),
                build_time: build_time.to_string(),
                runtime_version: parse_runtime_version(raw_runtime_version),
            },
        }
    }

    pub fn version_info(&self) -> &VersionInfo {
        &self.version
    }
}

/// First space-delimited token with a leading "go" removed:
/// `"go1.22.4 linux/amd64"` becomes `"1.22.4"`.
fn parse_runtime_version(raw: &str) -> String {
    let token = raw.split(' ').next().unwrap_or_default();
    token
        .strip_prefix(RUNTIME_VERSION_PREFIX)
        .unwrap_or(token)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runtime_version_plain() {
        assert_eq!(parse_runtime_version("1.22.4"), "1.22.4");
    }

    #[test]
    fn test_parse_runtime_version_with_prefix_and_platform() {
        assert_eq!(parse_runtime_version("go1.22.4 linux/amd64"), "1.22.4");
    }

    #[test]
    fn test_parse_runtime_version_empty() {
        assert_eq!(parse_runtime_version(""), "");
    }

    #[test]
    fn test_parse_runtime_version_leading_space() {
        // Only a single space separates tokens, so a leading space yields an empty token
        assert_eq!(parse_runtime_version(" go1.21"), "");
    }

    #[test]
    fn test_version_info_serialization() {
        let build = BuildInfo::new("1.2.3", "abc1234", "2026-10-01T00:00:00Z", "go1.22.4");
        let json = serde_json::to_value(build.version_info()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": "1.2.3",
                "git_commit": "abc1234",
                "build_time": "2026-10-01T00:00:00Z",
                "go_version": "1.22.4",
            })
        );
    }

    #[test]
    fn test_defaults_without_build_overrides() {
        let build = BuildInfo::new(BUILD_VERSION, BUILD_GIT_COMMIT, BUILD_TIME, "");
        assert!(!build.version_info().version.is_empty());
        assert!(!build.version_info().git_commit.is_empty());
    }
}
