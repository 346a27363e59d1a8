//! SSM Parameter Store access for device credentials.

use super::errors::AwsError;
use aws_config::SdkConfig;
use tracing::debug;

pub struct SecretStore {
    client: aws_sdk_ssm::Client,
}

impl SecretStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ssm::Client::new(config),
        }
    }

    /// Fetch a parameter with decryption (credentials are SecureString).
    pub async fn get_parameter(&self, name: &str) -> Result<String, AwsError> {
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await;

        match response {
            Ok(output) => {
                let value = output
                    .parameter()
                    .and_then(|p| p.value())
                    .ok_or_else(|| AwsError::Api {
                        operation: format!("fetching parameter {name}"),
                        message: "parameter has no value".to_string(),
                    })?;
                debug!(name, bytes = value.len(), "parameter fetched");
                Ok(value.to_string())
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_parameter_not_found() {
                    Err(AwsError::ParameterNotFound {
                        name: name.to_string(),
                    })
                } else {
                    Err(AwsError::api(format!("fetching parameter {name}"), service_err))
                }
            }
        }
    }
}
