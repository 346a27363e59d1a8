use crate::aws::{ensure_aws_profile, load_sdk_config, IotDataPlane};
use crate::config::config;
use crate::device::{build_payload, setting_params, CommandTopics};
use anyhow::{bail, Result};

pub struct DeviceCommand {
    pub command: String,
    pub args: Vec<String>,
    pub region: Option<String>,
    /// Accepted for forward compatibility with response correlation; the
    /// publish itself is fire-and-forget.
    pub timeout: Option<f64>,
}

impl DeviceCommand {
    pub async fn execute(&self) -> Result<()> {
        let config = config()?;

        let profile = ensure_aws_profile(config.aws.profile.as_deref())?;
        println!("Using AWS profile: {profile}");
        println!();

        let timeout = self.timeout.unwrap_or(config.device.default_timeout_secs);
        tracing::debug!(timeout, "response timeout accepted but unused");

        let params = if self.command == "set_setting" {
            if self.args.len() < 2 {
                println!("Error: set_setting requires NAME and VALUE arguments");
                println!("Example: bbops device set_setting training_mode true");
                bail!("missing set_setting arguments");
            }
            Some(setting_params(&self.args[0], &self.args[1]))
        } else {
            None
        };

        let topics = CommandTopics::for_thing(
            &config.device.topic_namespace,
            &config.device.thing_name,
        );
        let payload = build_payload(&self.command, params);

        println!("Sending command: {}", self.command);
        println!("  Topic: {}", topics.command_topic);
        println!("  Payload: {}", serde_json::to_string(&payload)?);
        println!();

        let region = self.region.as_deref().or(config.aws.region.as_deref());
        let sdk_config = load_sdk_config(&profile, region).await;
        let data_plane = IotDataPlane::new(&sdk_config);
        data_plane
            .publish_json(&topics.command_topic, &payload)
            .await?;

        if self.command == "reboot" {
            println!("Command sent. Device will reboot.");
        } else {
            println!("Command sent successfully.");
            println!();
            println!("Note: To see the response, monitor the device logs or use the web app.");
            println!("Response topic: {}", topics.response_topic);
        }

        println!();
        println!("Result:");
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"status": "sent"}))?
        );
        Ok(())
    }
}
