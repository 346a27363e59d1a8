pub mod device;
pub mod model;
pub mod release;
pub mod scrub;
pub mod secrets;

pub use device::DeviceCommand;
pub use model::ModelFetchCommand;
pub use release::ReleaseCommand;
pub use scrub::ScrubCommand;
pub use secrets::SecretsCommand;

use anyhow::Result;

/// Ask the operator a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
