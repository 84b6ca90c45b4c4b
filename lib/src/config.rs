use serde::Deserialize;

use crate::mailjet::api;
use crate::Error;

pub const DEFAULT_PATH: &str = "/etc/mailjet/mailjet.toml";
const ENV_PREFIX: &str = "MAILJET";

/// Mailjet account and transport settings.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub public_key: String,
    pub private_key: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_endpoint() -> String {
    api::MAILJET_SEND_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    api::MAILJET_REQUEST_TIMEOUT
}

/// Loads the config from the filesystem and merges it with any
/// environment variables prefixed with MAILJET_.
///
/// The file is optional, so a config made up purely of environment
/// variables (MAILJET_PUBLIC_KEY, MAILJET_PRIVATE_KEY) is valid.
pub fn load_config(path: Option<&str>) -> Result<Config, Error> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path.unwrap_or(DEFAULT_PATH)).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize::<Config>()?)
}
