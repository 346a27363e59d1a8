//! IoT control plane (endpoint discovery) and data plane (command publish).

use super::errors::AwsError;
use aws_config::SdkConfig;
use aws_sdk_iotdataplane::primitives::Blob;
use tracing::debug;

pub struct IotControlPlane {
    client: aws_sdk_iot::Client,
}

impl IotControlPlane {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_iot::Client::new(config),
        }
    }

    /// The MQTT data endpoint for the account (iot:Data-ATS).
    pub async fn data_endpoint(&self) -> Result<String, AwsError> {
        self.describe_endpoint("iot:Data-ATS").await
    }

    /// The credentials provider endpoint (iot:CredentialProvider); the
    /// device exchanges its certificate for temporary AWS credentials here.
    pub async fn credentials_endpoint(&self) -> Result<String, AwsError> {
        self.describe_endpoint("iot:CredentialProvider").await
    }

    async fn describe_endpoint(&self, endpoint_type: &str) -> Result<String, AwsError> {
        let output = self
            .client
            .describe_endpoint()
            .endpoint_type(endpoint_type)
            .send()
            .await
            .map_err(|e| AwsError::api(format!("resolving {endpoint_type} endpoint"), e))?;
        output
            .endpoint_address()
            .map(|a| a.to_string())
            .ok_or_else(|| AwsError::Api {
                operation: format!("resolving {endpoint_type} endpoint"),
                message: "no endpoint address returned".to_string(),
            })
    }
}

pub struct IotDataPlane {
    client: aws_sdk_iotdataplane::Client,
}

impl IotDataPlane {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_iotdataplane::Client::new(config),
        }
    }

    /// Publish a JSON payload to a topic at QoS 1.
    pub async fn publish_json(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), AwsError> {
        let body = serde_json::to_vec(payload).map_err(|e| AwsError::Api {
            operation: format!("serializing payload for {topic}"),
            message: e.to_string(),
        })?;

        self.client
            .publish()
            .topic(topic)
            .qos(1)
            .payload(Blob::new(body))
            .send()
            .await
            .map_err(|e| AwsError::api(format!("publishing to {topic}"), e))?;
        debug!(topic, "command published");
        Ok(())
    }
}
