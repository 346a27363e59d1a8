use aws_sdk_s3::error::DisplayErrorContext;

/// Errors from the AWS seams, with operator-facing remediation in Display.
///
/// These tools are hand-invoked; failure handling is terminal-output
/// oriented rather than recoverable.
#[derive(Debug)]
pub enum AwsError {
    CredentialsUnavailable {
        message: String,
    },
    ParameterNotFound {
        name: String,
    },
    Api {
        operation: String,
        message: String,
    },
}

impl AwsError {
    /// Wrap an SDK error with the operation that was being attempted.
    pub fn api<E: std::error::Error>(operation: impl Into<String>, err: E) -> Self {
        AwsError::Api {
            operation: operation.into(),
            message: format!("{}", DisplayErrorContext(err)),
        }
    }
}

impl std::fmt::Display for AwsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AwsError::CredentialsUnavailable { message } => {
                writeln!(f, "AWS credentials not found")?;
                writeln!(f, "─────────────────────────")?;
                write!(f, "🔑 {message}\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → Set a profile: export AWS_PROFILE=nakom.is-sandbox")?;
                writeln!(f, "   → Log in via SSO: aws sso login")?;
                write!(f, "   → Check configured profiles: aws configure list-profiles")
            }
            AwsError::ParameterNotFound { name } => {
                writeln!(f, "Parameter not found: {name}")?;
                writeln!(f)?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → List parameters: aws ssm describe-parameters")?;
                write!(
                    f,
                    "   → Verify the device was provisioned (cert/key parameters are created at enrollment)"
                )
            }
            AwsError::Api { operation, message } => {
                writeln!(f, "AWS error while {operation}:")?;
                write!(f, "   {message}")
            }
        }
    }
}

impl std::error::Error for AwsError {}
