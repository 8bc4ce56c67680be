//! Storage contracts and built-in backends for session credentials.
//!
//! Mobile hosts plug their platform keychain in through [`CredentialStore`]; the crate ships an
//! in-process [`MemoryStore`] and a JSON-snapshot [`FileStore`] for desktop tools and tests.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key/value contract implemented by secure credential stores.
///
/// Each operation is an independent atomic step; callers never group them into transactions.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: StorageKey) -> StoreFuture<'_, Option<String>>;

	/// Writes or replaces the value stored under `key`.
	fn set(&self, key: StorageKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes the value stored under `key`. Removing a missing key succeeds.
	fn delete(&self, key: StorageKey) -> StoreFuture<'_, ()>;
}

/// Fixed keys under which session material is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StorageKey {
	/// Current access token.
	#[serde(rename = "auth_token")]
	AccessToken,
	/// Current refresh token.
	#[serde(rename = "refresh_token")]
	RefreshToken,
	/// Serialized user profile returned at login.
	#[serde(rename = "user_data")]
	UserData,
}
impl StorageKey {
	/// Every key owned by the session, in erase order.
	pub const ALL: [StorageKey; 3] = [Self::AccessToken, Self::RefreshToken, Self::UserData];

	/// Returns the stable storage label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "auth_token",
			Self::RefreshToken => "refresh_token",
			Self::UserData => "user_data",
		}
	}
}
impl Display for StorageKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
