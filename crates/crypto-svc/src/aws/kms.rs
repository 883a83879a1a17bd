//! [`AwsKms`]: the [`KmsBackend`] implementation over the AWS SDK.

use async_trait::async_trait;
use aws_sdk_kms::{primitives::Blob, Client};

use crate::crypto::KmsBackend;
use crate::error::{CryptoError, KmsOperation};

/// AWS KMS backend.
///
/// Thin adapter: one SDK request per call, SDK errors passed through
/// unmodified as the [`CryptoError::Kms`] source.
#[derive(Clone, Debug)]
pub struct AwsKms {
    client: Client,
}

impl AwsKms {
    /// Wrap an already configured KMS client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KmsBackend for AwsKms {
    async fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let resp = self
            .client
            .encrypt()
            .key_id(key_id)
            .plaintext(Blob::new(plaintext))
            .send()
            .await
            .map_err(|e| CryptoError::kms(KmsOperation::Encrypt, e))?;

        blob_bytes(resp.ciphertext_blob, KmsOperation::Encrypt)
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        // Symmetric ciphertext blobs embed the key reference; KMS resolves it.
        let resp = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .send()
            .await
            .map_err(|e| CryptoError::kms(KmsOperation::Decrypt, e))?;

        blob_bytes(resp.plaintext, KmsOperation::Decrypt)
    }
}

/// Unwrap the blob of a successful KMS response.
fn blob_bytes(blob: Option<Blob>, operation: KmsOperation) -> Result<Vec<u8>, CryptoError> {
    blob.map(Blob::into_inner)
        .ok_or(CryptoError::EmptyResponse { operation })
}
