//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{CredentialStore, StorageKey, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<StorageKey, String>>>;

/// Thread-safe storage backend that keeps credentials in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of keys currently stored.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn set_now(map: StoreMap, key: StorageKey, value: String) -> Result<(), StoreError> {
		map.write().insert(key, value);

		Ok(())
	}

	fn delete_now(map: StoreMap, key: StorageKey) -> Result<(), StoreError> {
		map.write().remove(&key);

		Ok(())
	}
}
impl CredentialStore for MemoryStore {
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<String>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}

	fn set(&self, key: StorageKey, value: String) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::set_now(map, key, value) })
	}

	fn delete(&self, key: StorageKey) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::delete_now(map, key) })
	}
}
