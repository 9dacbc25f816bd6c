//! Keystore registry: generated wallets and their private keys.
//!
//! # Security
//! - Private keys are never logged
//! - The on-disk file is created owner-only when backed by [`FileStore`](crate::storage::FileStore)

use std::collections::BTreeMap;
use std::fmt;

use alloy::primitives::hex;
use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;

use crate::storage::{load_map, save_map, StorageError, Store};

/// A generated wallet: checksummed address plus the key it was derived from.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletEntry {
    pub address: Address,
    pub private_key: B256,
}

impl WalletEntry {
    /// Private key as bare lowercase hex (no `0x`), the persisted form.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key)
    }
}

impl fmt::Debug for WalletEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletEntry")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derive the account address controlled by `private_key`.
///
/// Returns `None` for values that are not valid secp256k1 scalars.
pub fn derive_address(private_key: &B256) -> Option<Address> {
    PrivateKeySigner::from_bytes(private_key)
        .ok()
        .map(|signer| signer.address())
}

/// Address → private key mapping, loaded from and flushed to a [`Store`].
pub struct Keystore {
    store: Box<dyn Store>,
    wallets: BTreeMap<Address, B256>,
}

impl Keystore {
    /// Create an empty keystore over `store` without reading it.
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
            wallets: BTreeMap::new(),
        }
    }

    /// Create a keystore over `store` and load whatever it holds.
    pub fn open(store: impl Store + 'static) -> Result<Self, StorageError> {
        let mut keystore = Self::new(store);
        keystore.load()?;
        Ok(keystore)
    }

    /// Replace the in-memory mapping with the stored one.
    ///
    /// Every entry is checked: the address must be the one its key derives.
    pub fn load(&mut self) -> Result<(), StorageError> {
        let raw: BTreeMap<String, String> = load_map(self.store.as_ref())?;
        let mut wallets = BTreeMap::new();

        for (address, key) in raw {
            let address = address
                .parse::<Address>()
                .map_err(|e| self.corrupt(format!("invalid address '{}': {}", address, e)))?;
            let private_key = key
                .parse::<B256>()
                .map_err(|_| self.corrupt(format!("invalid private key for {}", address)))?;

            if derive_address(&private_key) != Some(address) {
                return Err(self.corrupt(format!(
                    "private key does not match address {}",
                    address
                )));
            }
            wallets.insert(address, private_key);
        }

        tracing::debug!(wallets = wallets.len(), "Keystore loaded");
        self.wallets = wallets;
        Ok(())
    }

    /// Write the whole mapping back to storage.
    pub fn save(&self) -> Result<(), StorageError> {
        let raw: BTreeMap<String, String> = self
            .wallets
            .iter()
            .map(|(address, key)| (address.to_checksum(None), hex::encode(key)))
            .collect();
        save_map(self.store.as_ref(), &raw)?;
        tracing::info!(location = %self.store.location(), wallets = raw.len(), "Keystore saved");
        Ok(())
    }

    /// Generate a fresh random key pair and insert it. Does not persist.
    pub fn generate(&mut self) -> WalletEntry {
        loop {
            let signer = PrivateKeySigner::random();
            let address = signer.address();
            if self.wallets.contains_key(&address) {
                continue;
            }

            let private_key = signer.to_bytes();
            self.wallets.insert(address, private_key);
            tracing::info!(address = %address, "Generated wallet");
            return WalletEntry {
                address,
                private_key,
            };
        }
    }

    /// Known addresses.
    pub fn list(&self) -> Vec<Address> {
        self.wallets.keys().copied().collect()
    }

    /// Private key for `address`, if this keystore holds it.
    pub fn lookup(&self, address: &Address) -> Option<B256> {
        self.wallets.get(address).copied()
    }

    /// A ready-to-use signer for `address`.
    pub fn signer(&self, address: &Address) -> Option<PrivateKeySigner> {
        self.lookup(address)
            .and_then(|key| PrivateKeySigner::from_bytes(&key).ok())
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    fn corrupt(&self, reason: String) -> StorageError {
        StorageError::Corrupt {
            location: self.store.location(),
            reason,
        }
    }
}

impl fmt::Debug for Keystore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keystore")
            .field("location", &self.store.location())
            .field("wallets", &self.wallets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_derive_known_address() {
        let key: B256 = TEST_PRIVATE_KEY.parse().unwrap();
        let address = derive_address(&key).unwrap();
        assert_eq!(address.to_checksum(None), TEST_ADDRESS);
    }

    #[test]
    fn test_zero_key_does_not_derive() {
        assert!(derive_address(&B256::ZERO).is_none());
    }

    #[test]
    fn test_generate_derives_address_from_key() {
        let mut keystore = Keystore::new(MemoryStore::new());
        let entry = keystore.generate();

        assert_eq!(derive_address(&entry.private_key), Some(entry.address));
        assert_eq!(keystore.lookup(&entry.address), Some(entry.private_key));
        assert_eq!(entry.private_key_hex().len(), 64);
    }

    #[test]
    fn test_generate_never_repeats() {
        let mut keystore = Keystore::new(MemoryStore::new());
        let mut seen = std::collections::HashSet::new();
        for _ in 0..32 {
            assert!(seen.insert(keystore.generate().address));
        }
        assert_eq!(keystore.len(), 32);
    }

    #[test]
    fn test_save_then_fresh_load_round_trips() {
        let store = MemoryStore::new();
        let mut keystore = Keystore::new(store.clone());
        let first = keystore.generate();
        let second = keystore.generate();
        keystore.save().unwrap();

        let reloaded = Keystore::open(store.clone()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.lookup(&first.address), Some(first.private_key));
        assert_eq!(reloaded.lookup(&second.address), Some(second.private_key));

        // Persisted keys are checksummed addresses.
        let raw = store.contents().unwrap();
        assert!(raw.contains(&first.address.to_checksum(None)));
    }

    #[test]
    fn test_load_accepts_lowercase_addresses() {
        let store = MemoryStore::with_contents(&format!(
            "{{\"{}\": \"{}\"}}",
            TEST_ADDRESS.to_lowercase(),
            TEST_PRIVATE_KEY
        ));
        let keystore = Keystore::open(store).unwrap();
        let address: Address = TEST_ADDRESS.parse().unwrap();
        assert!(keystore.signer(&address).is_some());
    }

    #[test]
    fn test_load_rejects_mismatched_key() {
        let store = MemoryStore::with_contents(&format!(
            "{{\"0x0000000000000000000000000000000000000001\": \"{}\"}}",
            TEST_PRIVATE_KEY
        ));
        let err = Keystore::open(store).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let keystore = Keystore::new(MemoryStore::new());
        assert!(keystore.lookup(&Address::ZERO).is_none());
        assert!(keystore.signer(&Address::ZERO).is_none());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let mut keystore = Keystore::new(MemoryStore::new());
        let entry = keystore.generate();
        let rendered = format!("{:?}", entry);
        assert!(!rendered.contains(&entry.private_key_hex()));
    }
}
