use anyhow::Result;
use clap::Parser;

use bbops::cli::commands::{
    DeviceCommand, ModelFetchCommand, ReleaseCommand, ScrubCommand, SecretsCommand,
};
use bbops::cli::{Cli, Commands, ModelAction};
use bbops::config;
use bbops::telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = config::config()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    telemetry::init_telemetry(&log_level)?;

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Release {
            version_type,
            no_bump,
            build_only,
            environment,
            yes,
        } => runtime.block_on(
            ReleaseCommand {
                version_type,
                no_bump,
                build_only,
                environment,
                auto_approve: yes,
            }
            .execute(),
        ),
        Commands::Secrets => runtime.block_on(SecretsCommand.execute()),
        Commands::Device {
            command,
            args,
            region,
            timeout,
        } => runtime.block_on(
            DeviceCommand {
                command,
                args,
                region,
                timeout,
            }
            .execute(),
        ),
        Commands::Scrub { dry_run } => runtime.block_on(ScrubCommand { dry_run }.execute()),
        Commands::Model {
            action: ModelAction::Fetch { job, refresh },
        } => runtime.block_on(ModelFetchCommand { job, refresh }.execute()),
    }
}
