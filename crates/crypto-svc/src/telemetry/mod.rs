//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the embedding process. [`init`] is the default setup: JSON lines on stdout.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, ciphertext, or key material** in any log field.
//! - Log level comes from [`Config::log_level`](crate::Config::log_level),
//!   overridable with `RUST_LOG`.

pub mod init;

pub use init::init;
