use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the BootBoots ops tooling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BbopsConfig {
    /// Firmware project settings
    pub project: ProjectConfig,
    /// AWS settings shared by all subcommands
    pub aws: AwsConfig,
    /// Object storage buckets and key prefixes
    pub storage: StorageConfig,
    /// Device / IoT settings
    pub device: DeviceConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Project name used in object keys and generated headers
    pub name: String,
    /// Default PlatformIO environment to build
    pub default_environment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AwsConfig {
    /// AWS profile to use (can also come from the AWS_PROFILE env var)
    pub profile: Option<String>,
    /// AWS region override (default: resolved from the profile)
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket holding firmware binaries and the release manifest
    pub firmware_bucket: String,
    /// Bucket holding captured training images
    pub images_bucket: String,
    /// Key prefix for training images within the images bucket
    pub training_prefix: String,
    /// Bucket holding trained model archives
    pub models_bucket: String,
    /// Key prefix for training job output within the models bucket
    pub training_output_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// IoT thing name of the cat-flap camera
    pub thing_name: String,
    /// Topic namespace; commands go to {namespace}/{thing}/commands
    pub topic_namespace: String,
    /// Response timeout in seconds. Accepted by the CLI but reserved:
    /// response correlation is deliberately not implemented.
    pub default_timeout_secs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level for the tracing subscriber
    pub log_level: String,
}

impl Default for BbopsConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "BootBoots".to_string(),
                default_environment: "esp32s3cam".to_string(),
            },
            aws: AwsConfig {
                profile: None, // Resolved from AWS_PROFILE or prompted for
                region: None,
            },
            storage: StorageConfig {
                firmware_bucket: "bootboots-firmware-updates".to_string(),
                images_bucket: "bootboots-images-975050268859-eu-west-2".to_string(),
                training_prefix: "catcam-training/".to_string(),
                models_bucket: "bootboots-models-975050268859".to_string(),
                training_output_prefix: "training-output".to_string(),
            },
            device: DeviceConfig {
                thing_name: "BootBootsThing".to_string(),
                topic_namespace: "catcam".to_string(),
                default_timeout_secs: 5.0,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl BbopsConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (bbops.toml)
    /// 3. Environment variables (prefixed with BBOPS__)
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);

        if Path::new("bbops.toml").exists() {
            builder = builder.add_source(File::with_name("bbops"));
        }

        builder = builder.add_source(
            Environment::with_prefix("BBOPS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut bbops_config: BbopsConfig = config.try_deserialize()?;

        // AWS_PROFILE from the environment wins over the config file, matching
        // how the AWS SDK itself resolves profiles
        if let Ok(profile) = std::env::var("AWS_PROFILE") {
            bbops_config.aws.profile = Some(profile);
        }

        Ok(bbops_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<BbopsConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = BbopsConfig::load_env_file();
        BbopsConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static BbopsConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_project_naming_conventions() {
        let config = BbopsConfig::default();
        assert_eq!(config.project.name, "BootBoots");
        assert_eq!(config.device.thing_name, "BootBootsThing");
        assert_eq!(config.storage.firmware_bucket, "bootboots-firmware-updates");
        assert!(config.storage.training_prefix.ends_with('/'));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = BbopsConfig::default();
        let toml_content = toml::to_string_pretty(&config).unwrap();
        let parsed: BbopsConfig = toml::from_str(&toml_content).unwrap();
        assert_eq!(parsed.device.topic_namespace, config.device.topic_namespace);
        assert_eq!(parsed.storage.models_bucket, config.storage.models_bucket);
    }
}
