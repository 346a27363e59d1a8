//! Credential preflight via STS get-caller-identity.

use super::errors::AwsError;
use aws_config::SdkConfig;

#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// Verify that usable AWS credentials are available, returning the caller
/// identity. Any failure here means the operator needs to fix their
/// environment before the real work starts.
pub async fn verify_credentials(config: &SdkConfig) -> Result<CallerIdentity, AwsError> {
    let client = aws_sdk_sts::Client::new(config);
    let output = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| AwsError::CredentialsUnavailable {
            message: format!("{}", aws_sdk_sts::error::DisplayErrorContext(e)),
        })?;

    Ok(CallerIdentity {
        account: output.account().unwrap_or("unknown").to_string(),
        arn: output.arn().unwrap_or("unknown").to_string(),
    })
}
