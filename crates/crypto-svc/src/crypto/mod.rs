//! The [`CryptoSvc`] facade and its KMS seam.
//!
//! # Ciphertext format
//!
//! Ciphertext is the opaque KMS `CiphertextBlob`, rendered at the API boundary
//! as standard padded base64, the same text `aws kms encrypt --output text`
//! prints, so secrets encrypted with the AWS CLI decrypt unchanged.

pub mod backend;
pub mod service;
pub mod unique_key;

pub use backend::KmsBackend;
pub use service::CryptoSvc;
pub use unique_key::generate_unique_key;
