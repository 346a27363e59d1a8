//! AWS integrations: object storage, parameter store, IoT control and data
//! planes, and credential verification.

pub mod content_store;
pub mod errors;
pub mod identity;
pub mod iot;
pub mod secret_store;

pub use content_store::{ContentStore, ObjectSummary};
pub use errors::AwsError;
pub use identity::{verify_credentials, CallerIdentity};
pub use iot::{IotControlPlane, IotDataPlane};
pub use secret_store::SecretStore;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Profile offered at the interactive prompt when nothing is configured.
pub const DEFAULT_AWS_PROFILE: &str = "nakom.is-sandbox";

/// Load the shared AWS SDK configuration for the resolved profile, with an
/// optional region override.
pub async fn load_sdk_config(profile: &str, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).profile_name(profile);
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

/// Resolve the AWS profile. A configured profile (config file, BBOPS__ env,
/// or AWS_PROFILE) wins; otherwise the operator is prompted, and EOF on the
/// prompt aborts rather than silently picking the default.
pub fn ensure_aws_profile(configured: Option<&str>) -> anyhow::Result<String> {
    if let Some(profile) = configured {
        return Ok(profile.to_string());
    }

    println!("AWS_PROFILE is not set.");
    print!("Enter AWS profile name (default: {DEFAULT_AWS_PROFILE}): ");
    use std::io::Write;
    std::io::stdout().flush()?;

    let mut input = String::new();
    let bytes_read = std::io::stdin().read_line(&mut input)?;
    if bytes_read == 0 {
        anyhow::bail!("No AWS profile provided");
    }

    let profile = input.trim();
    if profile.is_empty() {
        Ok(DEFAULT_AWS_PROFILE.to_string())
    } else {
        Ok(profile.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_profile_wins_without_prompting() {
        let profile = ensure_aws_profile(Some("ops-dev")).unwrap();
        assert_eq!(profile, "ops-dev");
    }
}
