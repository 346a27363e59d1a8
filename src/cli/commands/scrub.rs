use crate::aws::{ensure_aws_profile, load_sdk_config, ContentStore};
use crate::config::config;
use crate::scrub::scrub_prefix;
use anyhow::Result;

pub struct ScrubCommand {
    pub dry_run: bool,
}

impl ScrubCommand {
    pub async fn execute(&self) -> Result<()> {
        let config = config()?;
        let profile = ensure_aws_profile(config.aws.profile.as_deref())?;

        let sdk_config = load_sdk_config(&profile, config.aws.region.as_deref()).await;
        let store = ContentStore::new(&sdk_config, &config.storage.images_bucket);
        let prefix = &config.storage.training_prefix;

        println!("Scanning s3://{}/{prefix} ...", store.bucket());
        let report = scrub_prefix(&store, prefix, self.dry_run).await?;

        println!();
        println!(
            "Done. Scanned {} images, found {} corrupt.",
            report.scanned, report.corrupt
        );
        if self.dry_run {
            println!("Dry-run mode — nothing deleted. Re-run without --dry-run to delete.");
        } else {
            println!("Deleted {} corrupt images.", report.deleted);
        }
        Ok(())
    }
}
