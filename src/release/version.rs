//! Semantic firmware versions and the generated version.h header.
//!
//! The firmware version lives as C preprocessor constants in
//! `include/version.h`; the release flow parses the current triple out of the
//! header, bumps it, and rewrites the file in place.

use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid version string '{input}': expected MAJOR.MINOR.PATCH")]
    InvalidFormat { input: String },
}

/// A semantic version triple, ordered by (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Return the version bumped according to the bump type. Bumping a
    /// component resets the lower-order ones to zero.
    pub fn bump(&self, bump_type: BumpType) -> Version {
        match bump_type {
            BumpType::Major => Version::new(self.major + 1, 0, 0),
            BumpType::Minor => Version::new(self.major, self.minor + 1, 0),
            BumpType::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidFormat {
            input: s.to_string(),
        };
        let mut parts = s.split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let patch = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Version::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The generated include/version.h consumed by the firmware build.
pub struct VersionFile {
    path: PathBuf,
    project_name: String,
}

impl VersionFile {
    pub fn new(project_root: &Path, project_name: &str) -> Self {
        Self {
            path: project_root.join("include").join("version.h"),
            project_name: project_name.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the current version from version.h. Missing file or
    /// unparseable contents fall back to 1.0.0, matching a fresh checkout.
    pub fn current_version(&self) -> Result<Version> {
        if !self.path.exists() {
            return Ok(Version::new(1, 0, 0));
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(parse_firmware_version(&content).unwrap_or(Version::new(1, 0, 0)))
    }

    /// Rewrite version.h with the given version.
    pub fn write_version(&self, version: Version) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = render_version_header(&self.project_name, version);
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Pull the FIRMWARE_VERSION define out of a version.h body.
pub fn parse_firmware_version(content: &str) -> Option<Version> {
    let re = Regex::new(r#"#define FIRMWARE_VERSION "(\d+\.\d+\.\d+)""#).ok()?;
    let captures = re.captures(content)?;
    captures.get(1)?.as_str().parse().ok()
}

fn render_version_header(project_name: &str, version: Version) -> String {
    format!(
        r#"#ifndef VERSION_H
#define VERSION_H

// Auto-generated version information
#define FIRMWARE_VERSION "{version}"
#define BUILD_TIMESTAMP __DATE__ " " __TIME__
#define PROJECT_NAME "{project_name}"

// Version components for programmatic access
#define VERSION_MAJOR {major}
#define VERSION_MINOR {minor}
#define VERSION_PATCH {patch}

// Build a version string
#define VERSION_STRING PROJECT_NAME " v" FIRMWARE_VERSION " (" BUILD_TIMESTAMP ")"

#endif // VERSION_H
"#,
        version = version,
        project_name = project_name,
        major = version.major,
        minor = version.minor,
        patch = version.patch,
    )
}
