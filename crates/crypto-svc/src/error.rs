//! Error types for the crypto service.

use std::fmt;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Boxed error produced by a KMS backend (the AWS SDK error, or a test stub's).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The remote KMS call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmsOperation {
    Encrypt,
    Decrypt,
}

impl fmt::Display for KmsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KmsOperation::Encrypt => f.write_str("encrypt"),
            KmsOperation::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Errors returned by [`CryptoSvc`](crate::CryptoSvc) operations.
///
/// Every failure is scoped to the single call that produced it. Remote
/// failures are never retried or reclassified: the underlying error is kept
/// as [`std::error::Error::source`] and its message is repeated verbatim.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The KMS call itself failed (auth, invalid key, throttling, network).
    #[error("kms {operation} failed: {source}")]
    Kms {
        operation: KmsOperation,
        #[source]
        source: BoxError,
    },

    /// KMS answered but the response held no blob.
    #[error("kms {operation} response contained no data")]
    EmptyResponse { operation: KmsOperation },

    /// The secret handed to decrypt is not standard base64.
    #[error("secret is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decrypted plaintext is not UTF-8 text.
    #[error("decrypted plaintext is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl CryptoError {
    /// Wrap a remote failure for `operation`, keeping it as the error source.
    pub fn kms<E>(operation: KmsOperation, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        CryptoError::Kms {
            operation,
            source: err.into(),
        }
    }

    /// Returns `true` if the failure came from the remote service rather than
    /// from local input handling.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CryptoError::Kms { .. } | CryptoError::EmptyResponse { .. }
        )
    }
}
