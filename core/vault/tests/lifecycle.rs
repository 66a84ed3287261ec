//! Round trips and close semantics across threads.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use pwvault_common::Error;
use pwvault_crypto::{KdfFunction, KdfSpecBuilder};
use pwvault_vault::{Vault, VaultBuilder, VaultConfig, VaultType};

fn legacy_vault() -> Arc<dyn Vault> {
    let vault = VaultBuilder::new(VaultType::Aes)
        .with_password("password")
        .with_kdf_spec(KdfSpecBuilder::new(KdfFunction::Legacy).build().unwrap())
        .unwrap()
        .build()
        .unwrap();
    Arc::from(vault)
}

#[test]
fn test_concurrent_close() {
    let vault = legacy_vault();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let vault = Arc::clone(&vault);
            thread::spawn(move || vault.close())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(vault.is_destroyed());
    assert!(matches!(vault.encrypt(b"data"), Err(Error::VaultDestroyed)));
}

#[test]
fn test_encrypt_racing_close() {
    let vault = legacy_vault();

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let vault = Arc::clone(&vault);
            thread::spawn(move || {
                let data = vec![i as u8; 100];
                for _ in 0..50 {
                    match vault.encrypt(&data) {
                        Ok(payload) => match vault.decrypt(&payload) {
                            Ok(plaintext) => assert_eq!(plaintext, data),
                            Err(e) => assert!(matches!(e, Error::VaultDestroyed)),
                        },
                        Err(e) => assert!(matches!(e, Error::VaultDestroyed)),
                    }
                }
            })
        })
        .collect();

    vault.close();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(matches!(vault.encrypt(b"late"), Err(Error::VaultDestroyed)));
}

#[test]
fn test_vault_from_config_json() {
    let config = VaultConfig::from_json(
        r#"{"type":"aes","codec":"base64","kdf":{"function":"OPENSSL"}}"#,
    )
    .unwrap();
    let vault = VaultBuilder::from_config(&config)
        .unwrap()
        .with_password("password")
        .build()
        .unwrap();

    let spec = vault.spec().unwrap();
    assert_eq!(spec.derived_key_length(), 16);

    let text = vault.encrypt_encoded(b"hello").unwrap();
    assert_eq!(vault.decrypt_encoded(&text).unwrap(), b"hello");
}

#[test]
fn test_noop_from_config() {
    let vault = VaultBuilder::from_config(&VaultConfig::none())
        .unwrap()
        .build()
        .unwrap();
    vault.close();
    assert!(!vault.is_destroyed());
    assert_eq!(vault.decrypt(b"plain").unwrap(), b"plain");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let vault = legacy_vault();
        let payload = vault.encrypt(&data).unwrap();
        prop_assert_eq!(payload.len(), 16 + (data.len() / 16 + 1) * 16);
        prop_assert_eq!(vault.decrypt(&payload).unwrap(), data);
    }
}
