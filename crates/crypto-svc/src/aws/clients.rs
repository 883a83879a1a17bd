//! KMS SDK client construction.

use aws_config::BehaviorVersion;
use aws_sdk_kms::config::Region;
use tracing::debug;

use crate::config::Config;

/// Build a KMS client for the configured region.
///
/// The shared [`aws_config::SdkConfig`] is loaded from the default provider
/// chain with the region pinned to [`Config::aws_region`]. When
/// [`Config::kms_endpoint_url`] is set, the client targets that endpoint
/// instead of the regional AWS one.
pub async fn kms_client(cfg: &Config) -> aws_sdk_kms::Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(cfg.aws_region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_kms::config::Builder::from(&sdk_config);
    if let Some(url) = &cfg.kms_endpoint_url {
        debug!(endpoint = %url, "overriding KMS endpoint");
        builder = builder.endpoint_url(url);
    }

    aws_sdk_kms::Client::from_conf(builder.build())
}
