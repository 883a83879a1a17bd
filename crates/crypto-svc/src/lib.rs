//! `crypto-svc`: encrypt and decrypt secrets through AWS KMS, and mint
//! random unique keys.
//!
//! Secrets are encrypted once (for example with `aws kms encrypt ... --query
//! CiphertextBlob --output text`) and stored base64-encoded in configuration
//! files. At runtime a [`CryptoSvc`] decrypts them on demand.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use crypto_svc::{Config, CryptoSvc};
//!
//! let cfg = Config::from_file("conf/config.json")?;
//! let svc = CryptoSvc::from_config(&cfg).await;
//!
//! let secret = svc.encrypt("db-password").await?;
//! assert_eq!(svc.decrypt(&secret).await?, "db-password");
//!
//! let key = svc.generate_unique_key();
//! assert_eq!(key.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging invariants
//!
//! - Plaintext, ciphertext, and key material never appear in log fields.
//!   Only byte lengths and the KMS operation name are recorded.

pub mod aws;
pub mod config;
pub mod crypto;
pub mod error;
pub mod telemetry;

pub use crate::config::Config;
pub use crypto::{generate_unique_key, CryptoSvc, KmsBackend};
pub use error::{CryptoError, KmsOperation};
