//! The firmware release manifest stored at `{project}/manifest.json`.
//!
//! Read-modify-write with no locking: concurrent releases are not
//! coordinated and the last writer wins.

use super::version::Version;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub project: String,
    pub versions: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub version: String,
    pub timestamp: String,
    pub firmware_path: String,
}

impl Manifest {
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            versions: Vec::new(),
        }
    }

    /// Record a published firmware version. An entry for the same version is
    /// replaced rather than duplicated, and the list is kept sorted
    /// descending by semantic version (unparseable versions sort last).
    pub fn upsert(&mut self, version: Version, firmware_path: &str) {
        let entry = ManifestEntry {
            version: version.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            firmware_path: firmware_path.to_string(),
        };
        self.versions.retain(|e| e.version != entry.version);
        self.versions.push(entry);
        self.versions.sort_by(|a, b| {
            let a_version = a.version.parse::<Version>().ok();
            let b_version = b.version.parse::<Version>().ok();
            b_version.cmp(&a_version)
        });
    }

    /// The most recently published version, if any.
    pub fn latest(&self) -> Option<&ManifestEntry> {
        self.versions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn upsert_replaces_existing_version_entry() {
        let mut manifest = Manifest::new("BootBoots");
        manifest.upsert(version("1.0.0"), "BootBoots/1.0.0/firmware.bin");
        manifest.upsert(version("1.0.0"), "BootBoots/1.0.0/firmware.bin");
        assert_eq!(manifest.versions.len(), 1);
    }

    #[test]
    fn entries_sorted_descending_by_semantic_version() {
        let mut manifest = Manifest::new("BootBoots");
        manifest.upsert(version("1.2.0"), "BootBoots/1.2.0/firmware.bin");
        manifest.upsert(version("1.10.0"), "BootBoots/1.10.0/firmware.bin");
        manifest.upsert(version("1.9.1"), "BootBoots/1.9.1/firmware.bin");

        let order: Vec<&str> = manifest.versions.iter().map(|e| e.version.as_str()).collect();
        assert_eq!(order, vec!["1.10.0", "1.9.1", "1.2.0"]);
        assert_eq!(manifest.latest().unwrap().version, "1.10.0");
    }

    #[test]
    fn manifest_json_shape_matches_store_convention() {
        let mut manifest = Manifest::new("BootBoots");
        manifest.upsert(version("1.0.1"), "BootBoots/1.0.1/firmware.bin");

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["project"], "BootBoots");
        let entry = &json["versions"][0];
        assert_eq!(entry["version"], "1.0.1");
        assert_eq!(entry["firmware_path"], "BootBoots/1.0.1/firmware.bin");
        // ISO-8601 timestamp
        let timestamp = entry["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn unparseable_versions_sort_after_valid_ones() {
        let mut manifest = Manifest::new("BootBoots");
        manifest.versions.push(ManifestEntry {
            version: "garbage".to_string(),
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            firmware_path: "BootBoots/garbage/firmware.bin".to_string(),
        });
        manifest.upsert(version("0.0.1"), "BootBoots/0.0.1/firmware.bin");
        assert_eq!(manifest.versions[0].version, "0.0.1");
    }
}
