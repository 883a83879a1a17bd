//! [`KmsBackend`]: the remote key-management operations the service consumes.

use async_trait::async_trait;

use crate::error::CryptoError;

/// Remote key-management service.
///
/// Implemented by [`AwsKms`](crate::aws::AwsKms) in production and by stubs in
/// tests. Each method is exactly one request/response round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KmsBackend: Send + Sync {
    /// Encrypt `plaintext` under `key_id`, returning the ciphertext blob.
    async fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a ciphertext blob previously produced by [`KmsBackend::encrypt`].
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}
