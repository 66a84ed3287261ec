//! Password-based encryption vaults for pwvault.
//!
//! This module provides:
//! - The [`Vault`] capability: encrypt/decrypt over opaque bytes, plus an
//!   explicit, idempotent `close` that erases the password
//! - [`AesVault`]: AES-CBC under a key derived from the password and the IV
//! - [`NoOpVault`]: pass-through for deployments without encryption
//! - [`VaultBuilder`] and [`VaultConfig`] to assemble either from settings
//!
//! # Architecture
//! A vault owns its password and a KDF built from a
//! [`KdfSpec`](pwvault_crypto::KdfSpec). Every `encrypt` call draws a fresh
//! IV, derives a key with the IV as salt, and emits `IV || ciphertext`.

pub mod aes;
pub mod builder;
pub mod config;
pub mod noop;
pub mod vault;

pub use aes::AesVault;
pub use builder::VaultBuilder;
pub use config::VaultConfig;
pub use noop::NoOpVault;
pub use vault::{Vault, VaultType};

/// Random source used to draw IVs.
pub type SecureRandom = Box<dyn rand::CryptoRng + Send>;
