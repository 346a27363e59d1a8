use crate::release::BumpType;
use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "bbops")]
#[command(about = "BootBoots cat-flap camera operations")]
#[command(long_about = "bbops consolidates the BootBoots operational flows: firmware release \
                       (version bump, build, upload), device secret provisioning, one-shot \
                       device commands over IoT, training-image scrubbing, and trained-model \
                       fetching. Start with 'bbops release --build-only' to check your build.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bump the firmware version, build it, and upload to the content store
    Release {
        /// Type of version bump
        #[arg(long, value_enum, default_value_t = BumpType::Patch, help = "Type of version bump (default: patch)")]
        version_type: BumpType,
        /// Skip the version bump and release the current version
        #[arg(long, help = "Skip version bump, use current version")]
        no_bump: bool,
        /// Build without uploading
        #[arg(long, help = "Only build, do not upload to the content store")]
        build_only: bool,
        /// PlatformIO environment to build
        #[arg(short = 'e', long, help = "PlatformIO environment to build (default: from config, esp32s3cam)")]
        environment: Option<String>,
        /// Proceed without prompting when the working tree is dirty
        #[arg(short = 'y', long, help = "Skip the dirty-working-tree confirmation prompt")]
        yes: bool,
    },
    /// Fetch device credentials and render include/secrets.h
    Secrets,
    /// Send a one-shot command to the device over the IoT command topic
    Device {
        /// Command to send (ping, get_status, take_photo, get_settings, set_setting, reboot)
        command: String,
        /// Command arguments (set_setting takes NAME VALUE)
        args: Vec<String>,
        /// AWS region override
        #[arg(long, help = "AWS region (default: from profile)")]
        region: Option<String>,
        /// Response timeout in seconds
        #[arg(long, help = "Response timeout in seconds (reserved: responses are observed out-of-band)")]
        timeout: Option<f64>,
    },
    /// Scan training images in the content store and delete corrupt ones
    Scrub {
        /// Show what would be deleted without making changes
        #[arg(long, help = "List corrupt images without deleting them")]
        dry_run: bool,
    },
    /// Work with trained model artifacts
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// Download a trained model archive into the local cache
    Fetch {
        /// Training job whose model to fetch
        #[arg(long, help = "Training job name (default: latest job on the store)")]
        job: Option<String>,
        /// Ignore the local cache
        #[arg(long, help = "Re-download even if the model is already cached")]
        refresh: bool,
    },
}
