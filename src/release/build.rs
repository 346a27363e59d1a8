//! PlatformIO build invocation and artifact lookup.

use crate::external::{CommandExecutor, CommandOutput};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build failed for environment '{environment}':\n{stderr}")]
    BuildFailed {
        environment: String,
        stderr: String,
    },
    #[error("Could not find firmware.bin for environment '{environment}' (expected {expected})")]
    ArtifactNotFound {
        environment: String,
        expected: String,
    },
    #[error("Build tool error: {0}")]
    Tool(#[from] crate::external::CommandError),
}

/// Runs `pio` against the firmware project and locates the produced binary.
pub struct FirmwareBuilder {
    project_root: PathBuf,
    executor: Arc<dyn CommandExecutor>,
}

impl FirmwareBuilder {
    pub fn new(project_root: &Path, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            executor,
        }
    }

    /// Clean and build the given PlatformIO environment. A failed clean is
    /// only a warning; a failed build is terminal.
    pub async fn build(&self, environment: &str) -> Result<(), BuildError> {
        let clean: CommandOutput = self
            .executor
            .execute(
                "pio",
                &["run", "-e", environment, "--target", "clean"],
                &self.project_root,
            )
            .await?;
        if !clean.success() {
            warn!(environment, stderr = %clean.stderr, "clean target failed, continuing");
        }

        let build = self
            .executor
            .execute("pio", &["run", "-e", environment], &self.project_root)
            .await?;
        if !build.success() {
            return Err(BuildError::BuildFailed {
                environment: environment.to_string(),
                stderr: build.stderr,
            });
        }
        debug!(environment, "firmware build succeeded");
        Ok(())
    }

    /// Locate the built firmware binary for the environment.
    pub fn find_firmware_file(&self, environment: &str) -> Result<PathBuf, BuildError> {
        let firmware_file = self
            .project_root
            .join(".pio")
            .join("build")
            .join(environment)
            .join("firmware.bin");

        if !firmware_file.exists() {
            return Err(BuildError::ArtifactNotFound {
                environment: environment.to_string(),
                expected: firmware_file.display().to_string(),
            });
        }
        Ok(firmware_file)
    }
}

/// Walk up from the starting directory looking for platformio.ini.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join("platformio.ini").exists() {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::command::test_support::MockCommandExecutor;
    use tempfile::TempDir;

    fn executor_with(
        clean: Result<CommandOutput, crate::external::CommandError>,
        build: Result<CommandOutput, crate::external::CommandError>,
    ) -> Arc<MockCommandExecutor> {
        Arc::new(
            MockCommandExecutor::new()
                .expect_command("pio", &["run", "-e", "esp32s3cam", "--target", "clean"], clean)
                .expect_command("pio", &["run", "-e", "esp32s3cam"], build),
        )
    }

    #[tokio::test]
    async fn build_failure_is_terminal() {
        let executor = executor_with(
            Ok(MockCommandExecutor::ok_output()),
            Ok(MockCommandExecutor::failed_output("undefined reference")),
        );
        let builder = FirmwareBuilder::new(Path::new("/tmp"), executor);
        let err = builder.build("esp32s3cam").await.unwrap_err();
        assert!(matches!(err, BuildError::BuildFailed { .. }));
        assert!(err.to_string().contains("undefined reference"));
    }

    #[tokio::test]
    async fn clean_failure_does_not_abort_build() {
        let executor = executor_with(
            Ok(MockCommandExecutor::failed_output("nothing to clean")),
            Ok(MockCommandExecutor::ok_output()),
        );
        let builder = FirmwareBuilder::new(Path::new("/tmp"), executor.clone());
        builder.build("esp32s3cam").await.unwrap();
        assert_eq!(executor.invocations.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_pio_surfaces_command_not_found() {
        let executor = Arc::new(MockCommandExecutor::new());
        let builder = FirmwareBuilder::new(Path::new("/tmp"), executor);
        let err = builder.build("esp32s3cam").await.unwrap_err();
        assert!(matches!(err, BuildError::Tool(_)));
    }

    #[test]
    fn artifact_lookup_points_at_environment_build_dir() {
        let temp = TempDir::new().unwrap();
        let build_dir = temp.path().join(".pio/build/esp32s3cam");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(build_dir.join("firmware.bin"), b"\xe9binary").unwrap();

        let executor = Arc::new(MockCommandExecutor::new());
        let builder = FirmwareBuilder::new(temp.path(), executor);
        let found = builder.find_firmware_file("esp32s3cam").unwrap();
        assert!(found.ends_with(".pio/build/esp32s3cam/firmware.bin"));
        assert!(builder.find_firmware_file("other-env").is_err());
    }

    #[test]
    fn project_root_discovery_walks_upward() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("platformio.ini"), "[env]\n").unwrap();
        let nested = temp.path().join("src/deeply/nested");
        std::fs::create_dir_all(&nested).unwrap();

        let root = find_project_root(&nested).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
        assert!(find_project_root(Path::new("/nonexistent-dir-xyz")).is_none());
    }
}
