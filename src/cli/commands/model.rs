use crate::aws::{ensure_aws_profile, load_sdk_config, ContentStore};
use crate::config::config;
use crate::model::{fetch_model, find_latest_job};
use anyhow::Result;

pub struct ModelFetchCommand {
    pub job: Option<String>,
    pub refresh: bool,
}

impl ModelFetchCommand {
    pub async fn execute(&self) -> Result<()> {
        let config = config()?;
        let profile = ensure_aws_profile(config.aws.profile.as_deref())?;

        let sdk_config = load_sdk_config(&profile, config.aws.region.as_deref()).await;
        let store = ContentStore::new(&sdk_config, &config.storage.models_bucket);
        let prefix = &config.storage.training_output_prefix;

        let job = match &self.job {
            Some(job) => job.clone(),
            None => {
                let latest = find_latest_job(&store, prefix).await?;
                println!("  Latest training job: {latest}");
                latest
            }
        };

        let outcome = fetch_model(&store, prefix, &job, self.refresh).await?;
        if outcome.downloaded {
            println!(
                "✅ Downloaded model for {} ({} bytes)",
                outcome.job, outcome.bytes
            );
        } else {
            println!("✅ Using cached model for {}", outcome.job);
        }
        println!("   {}", outcome.path.display());
        Ok(())
    }
}
