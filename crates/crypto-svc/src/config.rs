//! Configuration loading and validation.
//!
//! Configuration is read once, by the caller, and handed to
//! [`CryptoSvc::from_config`](crate::CryptoSvc::from_config). Two sources are
//! supported:
//!
//! - Environment variables only ([`Config::from_env`]).
//! - A JSON file in the `conf/config.json` shape, with environment variables
//!   layered on top ([`Config::from_file`]):
//!
//! ```json
//! { "awsRegion": "eu-west-1", "awsKeyARN": "arn:aws:kms:eu-west-1:123456789012:key/..." }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{builder::DefaultState, ConfigBuilder, Environment, FileFormat};
use serde::Deserialize;

/// Validated crypto service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// AWS region hosting the KMS key (`AWS_REGION`). **Required.**
    pub aws_region: String,

    /// ARN, alias, or key ID of the KMS key used by encrypt (`AWS_KEY_ARN`).
    /// **Required.**
    pub aws_key_arn: String,

    /// Override for the KMS endpoint, e.g. a local emulator (`KMS_ENDPOINT_URL`).
    #[serde(default)]
    pub kms_endpoint_url: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Keys accepted in the JSON configuration file.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(rename = "awsRegion", alias = "awsregion", alias = "aws_region")]
    aws_region: Option<String>,
    #[serde(rename = "awsKeyARN", alias = "awskeyarn", alias = "aws_key_arn")]
    aws_key_arn: Option<String>,
    #[serde(
        rename = "kmsEndpointUrl",
        alias = "kmsendpointurl",
        alias = "kms_endpoint_url"
    )]
    kms_endpoint_url: Option<String>,
    #[serde(rename = "logLevel", alias = "loglevel", alias = "log_level")]
    log_level: Option<String>,
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_builder(config::Config::builder().add_source(Environment::default()))
    }

    /// Load configuration from a JSON file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the merged
    /// configuration fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = config::File::from(path).format(FileFormat::Json);
        let builder = file_defaults(file)
            .with_context(|| format!("failed to load configuration file {}", path.display()))?;
        Self::from_builder(builder.add_source(Environment::default()))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.aws_region, "AWS_REGION")?;
        ensure_non_empty(&self.aws_key_arn, "AWS_KEY_ARN")?;
        if let Some(url) = &self.kms_endpoint_url {
            ensure_non_empty(url, "KMS_ENDPOINT_URL")?;
        }
        Ok(())
    }
}

/// Read a JSON configuration source and turn its values into builder defaults,
/// so that environment sources added afterwards take precedence.
fn file_defaults<S>(source: S) -> Result<ConfigBuilder<DefaultState>>
where
    S: config::Source + Send + Sync + 'static,
{
    let file: FileConfig = config::Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()?;

    let mut builder = config::Config::builder();
    if let Some(v) = file.aws_region {
        builder = builder.set_default("aws_region", v)?;
    }
    if let Some(v) = file.aws_key_arn {
        builder = builder.set_default("aws_key_arn", v)?;
    }
    if let Some(v) = file.kms_endpoint_url {
        builder = builder.set_default("kms_endpoint_url", v)?;
    }
    if let Some(v) = file.log_level {
        builder = builder.set_default("log_level", v)?;
    }
    Ok(builder)
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
