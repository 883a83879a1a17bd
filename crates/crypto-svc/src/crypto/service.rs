//! [`CryptoSvc`]: encrypt / decrypt through KMS, plus unique key generation.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use super::backend::KmsBackend;
use super::unique_key;
use crate::aws::{kms_client, AwsKms};
use crate::config::Config;
use crate::error::{CryptoError, KmsOperation};

/// Stateless facade over a KMS backend and a fixed key reference.
///
/// Cheap to clone; clones share the same backend. Concurrent calls need no
/// coordination because nothing here is mutable after construction.
#[derive(Clone)]
pub struct CryptoSvc {
    kms: Arc<dyn KmsBackend>,
    key_id: Arc<str>,
}

impl CryptoSvc {
    /// Create a service that encrypts under `key_id` using `kms`.
    pub fn new(kms: Arc<dyn KmsBackend>, key_id: impl Into<String>) -> Self {
        Self {
            kms,
            key_id: Arc::from(key_id.into()),
        }
    }

    /// Create a service backed by AWS KMS, using the region, key ARN, and
    /// optional endpoint override from `cfg`.
    pub async fn from_config(cfg: &Config) -> Self {
        let client = kms_client(cfg).await;
        Self::new(Arc::new(AwsKms::new(client)), cfg.aws_key_arn.clone())
    }

    /// The key reference passed to every encrypt call.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Encrypt `text` and return the ciphertext blob as standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Kms`] with the service error as source if the
    /// remote call fails, or [`CryptoError::EmptyResponse`] if KMS returns no
    /// ciphertext.
    pub async fn encrypt(&self, text: impl AsRef<[u8]>) -> Result<String, CryptoError> {
        let plaintext = text.as_ref();
        let ciphertext = self
            .kms
            .encrypt(&self.key_id, plaintext)
            .await
            .map_err(|e| {
                warn!(error = %e, "kms encrypt failed");
                e
            })?;

        if ciphertext.is_empty() {
            return Err(CryptoError::EmptyResponse {
                operation: KmsOperation::Encrypt,
            });
        }

        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "secret encrypted"
        );
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decrypt a base64 `secret` produced by [`CryptoSvc::encrypt`] (or by
    /// `aws kms encrypt`) back to text.
    ///
    /// # Errors
    ///
    /// As [`CryptoSvc::decrypt_bytes`], plus [`CryptoError::InvalidUtf8`] if
    /// the plaintext is not UTF-8.
    pub async fn decrypt(&self, secret: &str) -> Result<String, CryptoError> {
        let plaintext = self.decrypt_bytes(secret).await?;
        Ok(String::from_utf8(plaintext)?)
    }

    /// Decrypt a base64 `secret` back to raw plaintext bytes.
    ///
    /// Leading and trailing whitespace around `secret` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidBase64`] without contacting KMS if
    /// `secret` is not standard base64. Returns [`CryptoError::Kms`] or
    /// [`CryptoError::EmptyResponse`] if the remote call fails.
    pub async fn decrypt_bytes(&self, secret: &str) -> Result<Vec<u8>, CryptoError> {
        let ciphertext = STANDARD.decode(secret.trim())?;
        let plaintext = self.kms.decrypt(&ciphertext).await.map_err(|e| {
            warn!(error = %e, "kms decrypt failed");
            e
        })?;

        debug!(
            ciphertext_len = ciphertext.len(),
            plaintext_len = plaintext.len(),
            "secret decrypted"
        );
        Ok(plaintext)
    }

    /// Generate a random 64-character lowercase hex key.
    ///
    /// See [`generate_unique_key`](crate::generate_unique_key).
    pub fn generate_unique_key(&self) -> String {
        unique_key::generate_unique_key()
    }
}

impl fmt::Debug for CryptoSvc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoSvc")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::backend::MockKmsBackend;
    use std::error::Error as _;

    const KEY_ID: &str = "arn:aws:kms:eu-west-1:123456789012:key/test";

    fn svc(mock: MockKmsBackend) -> CryptoSvc {
        CryptoSvc::new(Arc::new(mock), KEY_ID)
    }

    /// A reversible fake: ciphertext is the key id, a NUL, then the reversed plaintext.
    fn reversing_kms() -> MockKmsBackend {
        let mut mock = MockKmsBackend::new();
        mock.expect_encrypt()
            .returning(|key_id: &str, plaintext: &[u8]| {
                let mut blob = key_id.as_bytes().to_vec();
                blob.push(0);
                blob.extend(plaintext.iter().rev());
                Ok(blob)
            });
        mock.expect_decrypt().returning(|ciphertext: &[u8]| {
            let sep = ciphertext
                .iter()
                .position(|b| *b == 0)
                .ok_or_else(|| CryptoError::kms(KmsOperation::Decrypt, "InvalidCiphertextException"))?;
            Ok(ciphertext[sep + 1..].iter().rev().copied().collect())
        });
        mock
    }

    #[tokio::test]
    async fn encrypt_returns_base64_of_blob() {
        let mut mock = MockKmsBackend::new();
        mock.expect_encrypt()
            .withf(|key_id: &str, plaintext: &[u8]| key_id == KEY_ID && plaintext == b"hello")
            .times(1)
            .returning(|_: &str, _: &[u8]| Ok(b"CIPHERTEXT".to_vec()));

        let secret = svc(mock).encrypt("hello").await.unwrap();
        assert_eq!(secret, "Q0lQSEVSVEVYVA==");
    }

    #[tokio::test]
    async fn decrypt_returns_plaintext_text() {
        let mut mock = MockKmsBackend::new();
        mock.expect_decrypt()
            .withf(|ciphertext: &[u8]| ciphertext == b"CIPHERTEXT")
            .times(1)
            .returning(|_: &[u8]| Ok(b"hello".to_vec()));

        let plaintext = svc(mock).decrypt("Q0lQSEVSVEVYVA==").await.unwrap();
        assert_eq!(plaintext, "hello");
    }

    #[tokio::test]
    async fn encrypt_decrypt_round_trip() {
        let svc = svc(reversing_kms());
        for plaintext in ["hello", "p@ss w0rd!", "äöü 秘密", "x"] {
            let secret = svc.encrypt(plaintext).await.unwrap();
            assert!(!STANDARD.decode(&secret).unwrap().is_empty());
            assert_eq!(svc.decrypt(&secret).await.unwrap(), plaintext);
        }
    }

    #[tokio::test]
    async fn encrypt_accepts_raw_bytes() {
        let svc = svc(reversing_kms());
        let bytes = [0xffu8, 0x00, 0x10];
        let secret = svc.encrypt(bytes).await.unwrap();
        assert_eq!(svc.decrypt_bytes(&secret).await.unwrap(), bytes);
    }

    #[tokio::test]
    async fn encrypt_surfaces_remote_failure() {
        let mut mock = MockKmsBackend::new();
        mock.expect_encrypt().times(1).returning(|_: &str, _: &[u8]| {
            Err(CryptoError::kms(
                KmsOperation::Encrypt,
                "NotFoundException: key does not exist",
            ))
        });

        let err = svc(mock).encrypt("hello").await.unwrap_err();
        assert!(matches!(
            err,
            CryptoError::Kms {
                operation: KmsOperation::Encrypt,
                ..
            }
        ));
        assert_eq!(
            err.source().unwrap().to_string(),
            "NotFoundException: key does not exist"
        );
    }

    #[tokio::test]
    async fn decrypt_surfaces_remote_failure() {
        let mut mock = MockKmsBackend::new();
        mock.expect_decrypt().times(1).returning(|_: &[u8]| {
            Err(CryptoError::kms(
                KmsOperation::Decrypt,
                "AccessDeniedException: not authorized",
            ))
        });

        let err = svc(mock).decrypt("Q0lQSEVSVEVYVA==").await.unwrap_err();
        assert!(err.is_remote());
        assert!(err.to_string().contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn empty_ciphertext_is_an_error() {
        let mut mock = MockKmsBackend::new();
        mock.expect_encrypt()
            .returning(|_: &str, _: &[u8]| Ok(Vec::new()));

        let err = svc(mock).encrypt("hello").await.unwrap_err();
        assert!(matches!(
            err,
            CryptoError::EmptyResponse {
                operation: KmsOperation::Encrypt
            }
        ));
    }

    #[tokio::test]
    async fn invalid_base64_fails_before_remote_call() {
        let mut mock = MockKmsBackend::new();
        mock.expect_decrypt().never();

        let err = svc(mock).decrypt("not base64!").await.unwrap_err();
        assert!(matches!(err, CryptoError::InvalidBase64(_)));
        assert!(!err.is_remote());
    }

    #[tokio::test]
    async fn decrypt_ignores_surrounding_whitespace() {
        let mut mock = MockKmsBackend::new();
        mock.expect_decrypt()
            .withf(|ciphertext: &[u8]| ciphertext == b"CIPHERTEXT")
            .returning(|_: &[u8]| Ok(b"hello".to_vec()));

        let plaintext = svc(mock).decrypt("  Q0lQSEVSVEVYVA==\n").await.unwrap();
        assert_eq!(plaintext, "hello");
    }

    #[tokio::test]
    async fn non_utf8_plaintext_is_rejected_as_text() {
        let mut mock = MockKmsBackend::new();
        mock.expect_decrypt()
            .times(2)
            .returning(|_: &[u8]| Ok(vec![0xc3, 0x28]));
        let svc = svc(mock);

        let err = svc.decrypt("Q0lQSEVSVEVYVA==").await.unwrap_err();
        assert!(matches!(err, CryptoError::InvalidUtf8(_)));

        let bytes = svc.decrypt_bytes("Q0lQSEVSVEVYVA==").await.unwrap();
        assert_eq!(bytes, vec![0xc3, 0x28]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_calls_share_one_service() {
        let svc = svc(reversing_kms());
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let svc = svc.clone();
                tokio::spawn(async move {
                    let plaintext = format!("secret-{i}");
                    let secret = svc.encrypt(&plaintext).await.unwrap();
                    assert_eq!(svc.decrypt(&secret).await.unwrap(), plaintext);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
    }

    #[test]
    fn unique_key_is_64_chars() {
        let svc = svc(MockKmsBackend::new());
        assert_eq!(svc.generate_unique_key().len(), 64);
    }

    #[test]
    fn debug_shows_key_id_only() {
        let svc = svc(MockKmsBackend::new());
        let s = format!("{svc:?}");
        assert!(s.contains(KEY_ID));
        assert_eq!(svc.key_id(), KEY_ID);
    }
}
