use crate::aws::{
    ensure_aws_profile, load_sdk_config, verify_credentials, IotControlPlane, SecretStore,
};
use crate::config::config;
use crate::release::find_project_root;
use crate::secrets::{
    cert_param, key_param, read_root_ca, write_header, SecretsBundle, WIFI_PASSWORD_PARAM,
    WIFI_SSID_PARAM,
};
use anyhow::{bail, Result};

pub struct SecretsCommand;

impl SecretsCommand {
    pub async fn execute(&self) -> Result<()> {
        let config = config()?;

        println!("{}", "=".repeat(60));
        println!("  {} Secrets Generator", config.project.name);
        println!("{}", "=".repeat(60));
        println!();

        let current_dir = std::env::current_dir()?;
        let Some(project_root) = find_project_root(&current_dir) else {
            println!("❌ Error: Could not find platformio.ini in the project root");
            bail!("platformio.ini not found");
        };

        let secrets_file = project_root.join("include").join("secrets.h");
        println!("Project root: {}", project_root.display());
        println!("Output file:  {}", secrets_file.display());
        println!();

        let profile = ensure_aws_profile(config.aws.profile.as_deref())?;
        println!("Using AWS profile: {profile}");

        let sdk_config = load_sdk_config(&profile, config.aws.region.as_deref()).await;
        let identity = verify_credentials(&sdk_config).await?;
        println!("AWS Account:  {}", identity.account);
        println!();

        // Everything is fetched before anything is written: a failure on any
        // input leaves the previous secrets.h untouched
        let secret_store = SecretStore::new(&sdk_config);
        let iot = IotControlPlane::new(&sdk_config);
        let thing_name = &config.device.thing_name;

        println!("Fetching parameters from the secret store...");
        println!("  - {WIFI_SSID_PARAM}");
        let wifi_ssid = secret_store.get_parameter(WIFI_SSID_PARAM).await?;

        println!("  - {WIFI_PASSWORD_PARAM}");
        let wifi_password = secret_store.get_parameter(WIFI_PASSWORD_PARAM).await?;

        let cert_param_name = cert_param(thing_name);
        println!("  - {cert_param_name}");
        let cert_pem = secret_store.get_parameter(&cert_param_name).await?;

        let key_param_name = key_param(thing_name);
        println!("  - {key_param_name}");
        let priv_key = secret_store.get_parameter(&key_param_name).await?;

        println!("  - IoT endpoint");
        let iot_endpoint = iot.data_endpoint().await?;

        println!("  - IoT credentials endpoint");
        let iot_credentials_endpoint = iot.credentials_endpoint().await?;

        println!(
            "Reading Root CA from {}...",
            project_root.join("AmazonRootCA1.pem").display()
        );
        let root_ca = read_root_ca(&project_root)?;

        println!("Generating secrets.h...");
        let bundle = SecretsBundle {
            wifi_ssid,
            wifi_password,
            iot_endpoint,
            iot_credentials_endpoint,
            root_ca,
            cert_pem,
            priv_key,
        };
        write_header(&bundle, &secrets_file)?;

        println!();
        println!("{}", "=".repeat(60));
        println!("  Secrets generated successfully!");
        println!("{}", "=".repeat(60));
        println!("  WiFi SSID:            {}", bundle.wifi_ssid);
        println!("  IoT Endpoint:         {}", bundle.iot_endpoint);
        println!("  Credentials Endpoint: {}", bundle.iot_credentials_endpoint);
        println!("  Certificate:          {} bytes", bundle.cert_pem.len());
        println!("  Private Key:          {} bytes", bundle.priv_key.len());
        println!("  Root CA:              {} bytes", bundle.root_ca.len());
        println!();
        println!("Output written to: {}", secrets_file.display());
        println!();
        println!("Note: secrets.h is gitignored and should not be committed!");
        Ok(())
    }
}
