//! crewAI version compatibility.
//!
//! Generated projects target the crewAI releases listed in the catalog's
//! `crewai` section. An installed version is compatible when it is one of
//! them or falls between the oldest and the latest tested release.

use std::fmt;

use serde::Serialize;

use crate::catalog::CrewaiVersions;

/// Where an installed version sits relative to the tested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    /// No version given.
    NotInstalled,
    /// Exactly one of the tested versions.
    Tested,
    /// Inside the tested range but not itself tested.
    InRange,
    /// Newer than the latest tested version.
    Untested,
    /// Older than the first tested version.
    Outdated,
}

/// Result of [`check_version_compatibility`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityCheck {
    pub compatible: bool,
    pub status: VersionStatus,
    /// Warning for the user; empty when compatible.
    pub message: String,
}

impl CompatibilityCheck {
    fn ok(status: VersionStatus) -> Self {
        Self {
            compatible: true,
            status,
            message: String::new(),
        }
    }
}

impl fmt::Display for CompatibilityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return f.write_str(&self.message);
        }
        match self.status {
            VersionStatus::NotInstalled => f.write_str("crewAI not installed"),
            VersionStatus::Tested => f.write_str("tested and compatible"),
            _ => f.write_str("compatible"),
        }
    }
}

/// Parse `major.minor.patch` into its components, ignoring any `-pre` or
/// `+build` suffix. Unparseable input yields `[0, 0, 0]`.
pub fn parse_version(version: &str) -> Vec<u64> {
    let clean = version
        .split('-')
        .next()
        .and_then(|v| v.split('+').next())
        .unwrap_or_default();

    clean
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|_| vec![0, 0, 0])
}

/// Compare an installed crewAI version against the tested ones.
pub fn check_version_compatibility(
    installed: &str,
    tested_versions: &[String],
    latest_tested: &str,
) -> CompatibilityCheck {
    if installed.is_empty() {
        return CompatibilityCheck::ok(VersionStatus::NotInstalled);
    }
    if tested_versions.iter().any(|v| v == installed) {
        return CompatibilityCheck::ok(VersionStatus::Tested);
    }

    let current = parse_version(installed);

    if current > parse_version(latest_tested) {
        return CompatibilityCheck {
            compatible: false,
            status: VersionStatus::Untested,
            message: format!(
                "crewAI v{} is newer than the latest tested release (v{}). \
                 It may have new features or breaking changes; generated projects may need adjustments.",
                installed, latest_tested
            ),
        };
    }

    if let Some(oldest) = tested_versions.first() {
        if current < parse_version(oldest) {
            return CompatibilityCheck {
                compatible: false,
                status: VersionStatus::Outdated,
                message: format!(
                    "crewAI v{} is older than the tested range ({} - {}). \
                     Consider upgrading crewAI.",
                    installed, oldest, latest_tested
                ),
            };
        }
    }

    CompatibilityCheck::ok(VersionStatus::InRange)
}

/// [`check_version_compatibility`] against the catalog's tested versions.
pub fn check_against(installed: &str, versions: &CrewaiVersions) -> CompatibilityCheck {
    check_version_compatibility(installed, &versions.tested_versions, &versions.latest_tested)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tested() -> Vec<String> {
        vec!["1.3.0".into(), "1.4.0".into(), "1.4.1".into()]
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.4.1"), [1, 4, 1]);
        assert_eq!(parse_version("0.86.0-beta"), [0, 86, 0]);
        assert_eq!(parse_version("2.0.0+build.7"), [2, 0, 0]);
        assert_eq!(parse_version("1.4"), [1, 4]);
        assert_eq!(parse_version("not-a-version"), [0, 0, 0]);
        assert_eq!(parse_version(""), [0, 0, 0]);
    }

    #[test]
    fn test_exact_match_is_tested() {
        let check = check_version_compatibility("1.4.0", &tested(), "1.4.1");
        assert!(check.compatible);
        assert_eq!(check.status, VersionStatus::Tested);
        assert!(check.message.is_empty());
    }

    #[test]
    fn test_newer_is_untested() {
        let check = check_version_compatibility("1.5.0", &tested(), "1.4.1");
        assert!(!check.compatible);
        assert_eq!(check.status, VersionStatus::Untested);
        assert!(check.message.contains("v1.5.0"));
        assert!(check.message.contains("v1.4.1"));
    }

    #[test]
    fn test_older_is_outdated() {
        let check = check_version_compatibility("1.2.9", &tested(), "1.4.1");
        assert!(!check.compatible);
        assert_eq!(check.status, VersionStatus::Outdated);
        assert!(check.message.contains("(1.3.0 - 1.4.1)"));
    }

    #[test]
    fn test_in_range_and_missing() {
        let check = check_version_compatibility("1.3.5", &tested(), "1.4.1");
        assert!(check.compatible);
        assert_eq!(check.status, VersionStatus::InRange);

        let check = check_version_compatibility("", &tested(), "1.4.1");
        assert!(check.compatible);
        assert_eq!(check.status, VersionStatus::NotInstalled);
    }

    #[test]
    fn test_prerelease_of_latest_is_not_newer() {
        let check = check_version_compatibility("1.4.1-rc1", &tested(), "1.4.1");
        assert!(check.compatible);
        assert_eq!(check.status, VersionStatus::InRange);
    }
}
