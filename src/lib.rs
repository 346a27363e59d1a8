// BootBoots ops library - exposes the operational flows for testing and integration

pub mod aws;
pub mod cli;
pub mod config;
pub mod device;
pub mod external;
pub mod git;
pub mod model;
pub mod release;
pub mod scrub;
pub mod secrets;
pub mod telemetry;

// Re-export key types for easy access
pub use aws::{AwsError, ContentStore, IotControlPlane, IotDataPlane, SecretStore};
pub use config::{config, BbopsConfig};
pub use device::CommandTopics;
pub use external::{CommandExecutor, ProcessCommandExecutor};
pub use git::{Git2Operations, GitOperations};
pub use release::{BumpType, FirmwareBuilder, Manifest, Version, VersionFile};
pub use scrub::{ImageDefect, ImageKind};
pub use secrets::SecretsBundle;
pub use telemetry::init_telemetry;
