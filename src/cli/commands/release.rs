use crate::aws::{ensure_aws_profile, load_sdk_config, ContentStore};
use crate::cli::commands::confirm;
use crate::config::config;
use crate::external::ProcessCommandExecutor;
use crate::git::{Git2Operations, GitOperations};
use crate::release::{
    find_project_root, publish_firmware, update_manifest, BumpType, FirmwareBuilder, Version,
    VersionFile,
};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::warn;

pub struct ReleaseCommand {
    pub version_type: BumpType,
    pub no_bump: bool,
    pub build_only: bool,
    pub environment: Option<String>,
    pub auto_approve: bool,
}

impl ReleaseCommand {
    pub async fn execute(&self) -> Result<()> {
        let config = config()?;

        let current_dir = std::env::current_dir()?;
        let Some(project_root) = find_project_root(&current_dir) else {
            println!("❌ Error: Could not find platformio.ini file");
            println!("   Run this command from within the firmware project directory");
            bail!("platformio.ini not found");
        };

        println!("{}", "=".repeat(60));
        println!("  {} Firmware Build & Upload", config.project.name);
        println!("{}", "=".repeat(60));

        // Git bookkeeping is opportunistic: no repository just means no
        // commit/tag, never a failed release
        let git = match Git2Operations::discover(&project_root) {
            Ok(git) => Some(git),
            Err(_) => {
                warn!("not a git repository, skipping release bookkeeping");
                None
            }
        };

        let mut clean_tree = false;
        if let Some(git) = &git {
            let dirty = git.dirty_paths()?;
            clean_tree = dirty.is_empty();
            if !clean_tree && !self.auto_approve {
                println!("⚠️  Working tree has uncommitted changes:");
                for path in dirty.iter().take(10) {
                    println!("   {path}");
                }
                if dirty.len() > 10 {
                    println!("   ... and {} more", dirty.len() - 10);
                }
                if !confirm("Release from a dirty tree?")? {
                    bail!("Aborted: commit or stash your changes first (or pass --yes)");
                }
            }
        }

        let version_file = VersionFile::new(&project_root, &config.project.name);
        let current_version = version_file.current_version()?;
        println!("📦 Current version: {current_version}");

        let version = if self.no_bump {
            println!("📦 Using current version: {current_version}");
            current_version
        } else {
            let bumped = current_version.bump(self.version_type);
            version_file.write_version(bumped)?;
            println!("📦 New version: {bumped}");

            if let (Some(git), true) = (&git, clean_tree) {
                if let Err(e) = git.commit_paths(
                    &[version_file.path()],
                    &format!("Bump firmware version to {bumped}"),
                ) {
                    warn!(error = %e, "failed to commit version bump");
                    println!("⚠️  Could not commit version bump: {e}");
                }
            }
            bumped
        };

        let environment = self
            .environment
            .as_deref()
            .unwrap_or(&config.project.default_environment);

        println!();
        println!("🔨 Building firmware for {environment}...");
        let builder = FirmwareBuilder::new(&project_root, Arc::new(ProcessCommandExecutor));
        if let Err(e) = builder.build(environment).await {
            println!("❌ Build failed: {e}");
            println!();
            println!("❌ Build failed! Fix errors and try again.");
            bail!("build failed");
        }
        println!("✅ Build successful!");

        let firmware_file = builder.find_firmware_file(environment)?;

        if self.build_only {
            println!("{}", "=".repeat(60));
            println!("✅ Firmware v{version} built successfully");
            println!("{}", "=".repeat(60));
            println!("   (Upload skipped - build-only mode)");
            println!("   Firmware: {}", firmware_file.display());
            return Ok(());
        }

        let profile = ensure_aws_profile(config.aws.profile.as_deref())?;
        println!();
        println!("📡 Uploading to the content store (profile: {profile})...");

        let sdk_config = load_sdk_config(&profile, config.aws.region.as_deref()).await;
        let store = ContentStore::new(&sdk_config, &config.storage.firmware_bucket);

        let firmware_size = std::fs::metadata(&firmware_file)?.len();
        println!(
            "📤 Uploading {} ({firmware_size} bytes)",
            firmware_file.display()
        );
        let key = publish_firmware(&store, &config.project.name, version, &firmware_file)
            .await
            .map_err(|e| {
                println!("❌ Upload failed: {e}");
                println!();
                println!("❌ Upload failed! Check AWS credentials and bucket permissions.");
                anyhow::anyhow!("upload failed")
            })?;
        println!("   → s3://{}/{key}", store.bucket());

        let manifest = update_manifest(&store, &config.project.name, version)
            .await
            .map_err(|e| {
                println!("❌ Manifest update failed: {e}");
                anyhow::anyhow!("manifest update failed")
            })?;
        match manifest.latest() {
            Some(entry) => println!(
                "📝 Manifest updated ({} versions, latest v{})",
                manifest.versions.len(),
                entry.version
            ),
            None => println!("📝 Manifest updated"),
        }

        self.tag_release(git.as_ref(), clean_tree, version);

        println!();
        println!("{}", "=".repeat(60));
        println!("✅ Firmware v{version} successfully built and uploaded!");
        println!("{}", "=".repeat(60));
        println!("   Bucket:  {}", store.bucket());
        println!("   Project: {}", config.project.name);
        println!("   Version: {version}");
        println!();
        println!("🎉 Ready for OTA deployment!");
        Ok(())
    }

    /// Tag the release and push the tag. Failures here are logged, not
    /// fatal: the firmware is already published.
    fn tag_release(&self, git: Option<&Git2Operations>, clean_tree: bool, version: Version) {
        let Some(git) = git else { return };
        if !clean_tree {
            return;
        }

        let tag = format!("device/{version}");
        if let Err(e) = git.create_tag(&tag) {
            warn!(tag, error = %e, "failed to create release tag");
            println!("⚠️  Could not create tag {tag}: {e}");
            return;
        }
        match git.push_tag("origin", &tag) {
            Ok(()) => println!("🏷️  Tagged and pushed {tag}"),
            Err(e) => {
                warn!(tag, error = %e, "failed to push release tag");
                println!("⚠️  Tag {tag} created but not pushed: {e}");
            }
        }
    }
}
