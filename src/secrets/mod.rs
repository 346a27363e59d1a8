//! Secrets materializer: parameter-store credentials and IoT endpoints
//! rendered into the generated include/secrets.h consumed at firmware
//! compile time.

pub mod render;

use anyhow::{Context, Result};
use std::path::Path;

/// Parameter store path for the WiFi SSID.
pub const WIFI_SSID_PARAM: &str = "/Nakomis/Wifi/SSID";
/// Parameter store path for the WiFi password.
pub const WIFI_PASSWORD_PARAM: &str = "/Nakomis/Wifi/Password";

/// Parameter store path for the device certificate PEM.
pub fn cert_param(thing_name: &str) -> String {
    format!("/BootsBoots/{thing_name}/certPem")
}

/// Parameter store path for the device private key PEM.
pub fn key_param(thing_name: &str) -> String {
    format!("/BootsBoots/{thing_name}/privKey")
}

/// Everything that goes into secrets.h. Assembled fully in memory before
/// anything is written, so a fetch failure never leaves a partial file.
#[derive(Debug, Clone)]
pub struct SecretsBundle {
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub iot_endpoint: String,
    pub iot_credentials_endpoint: String,
    pub root_ca: String,
    pub cert_pem: String,
    pub priv_key: String,
}

/// Read the Amazon root CA certificate from the project root.
pub fn read_root_ca(project_root: &Path) -> Result<String> {
    let ca_file = project_root.join("AmazonRootCA1.pem");
    let content = std::fs::read_to_string(&ca_file)
        .with_context(|| format!("Root CA file not found: {}", ca_file.display()))?;
    Ok(content.trim().to_string())
}

/// Render the bundle and write include/secrets.h in one step.
pub fn write_header(bundle: &SecretsBundle, path: &Path) -> Result<()> {
    let content = render::render_secrets_header(bundle);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parameter_paths_embed_thing_name() {
        assert_eq!(
            cert_param("BootBootsThing"),
            "/BootsBoots/BootBootsThing/certPem"
        );
        assert_eq!(
            key_param("BootBootsThing"),
            "/BootsBoots/BootBootsThing/privKey"
        );
    }

    #[test]
    fn root_ca_read_trims_trailing_whitespace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("AmazonRootCA1.pem"),
            "-----BEGIN CERTIFICATE-----\nabc\n-----END CERTIFICATE-----\n\n",
        )
        .unwrap();
        let ca = read_root_ca(temp.path()).unwrap();
        assert!(ca.ends_with("-----END CERTIFICATE-----"));
    }

    #[test]
    fn missing_root_ca_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(read_root_ca(temp.path()).is_err());
    }

    #[test]
    fn write_header_creates_include_dir() {
        let temp = TempDir::new().unwrap();
        let bundle = SecretsBundle {
            wifi_ssid: "CatNet".to_string(),
            wifi_password: "hunter2".to_string(),
            iot_endpoint: "example-ats.iot.eu-west-2.amazonaws.com".to_string(),
            iot_credentials_endpoint: "example.credentials.iot.eu-west-2.amazonaws.com"
                .to_string(),
            root_ca: "CA".to_string(),
            cert_pem: "CERT".to_string(),
            priv_key: "KEY".to_string(),
        };
        let path = temp.path().join("include").join("secrets.h");
        write_header(&bundle, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"const char WIFI_SSID[] = "CatNet";"#));
        assert!(written.contains("example-ats.iot.eu-west-2.amazonaws.com"));
    }
}
