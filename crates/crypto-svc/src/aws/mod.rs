//! AWS KMS client initialisation and the SDK-backed [`KmsBackend`](crate::KmsBackend).
//!
//! Credentials are resolved through the standard AWS credential chain
//! (environment, profile, IMDS / IAM role). Only the region and, optionally,
//! the endpoint URL come from [`Config`](crate::Config).

pub mod clients;
pub mod kms;

pub use clients::kms_client;
pub use kms::AwsKms;
