//! Explicit session handle over a [`CredentialStore`].
//!
//! The client reads and rotates tokens exclusively through [`Session`], so hosts can swap the
//! storage backend without touching the request pipeline.

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenSecret},
	store::{CredentialStore, MemoryStore, StorageKey, StoreError},
};

/// Shared handle to the credentials and cached profile of the signed-in student.
#[derive(Clone)]
pub struct Session {
	store: Arc<dyn CredentialStore>,
}
impl Session {
	/// Creates a session backed by the provided store.
	pub fn new(store: Arc<dyn CredentialStore>) -> Self {
		Self { store }
	}

	/// Creates a session backed by a fresh [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryStore::default()))
	}

	/// Underlying credential store.
	pub fn store(&self) -> &Arc<dyn CredentialStore> {
		&self.store
	}

	/// Current access token, if one is stored.
	pub async fn access_token(&self) -> Result<Option<TokenSecret>> {
		self.secret(StorageKey::AccessToken).await
	}

	/// Current refresh token, if one is stored.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>> {
		self.secret(StorageKey::RefreshToken).await
	}

	/// Both tokens, when both are stored.
	pub async fn credential(&self) -> Result<Option<Credential>> {
		let access_token = self.access_token().await?;
		let refresh_token = self.refresh_token().await?;

		Ok(access_token
			.zip(refresh_token)
			.map(|(access_token, refresh_token)| Credential { access_token, refresh_token }))
	}

	/// Persists a freshly issued token pair.
	pub async fn set_credential(&self, credential: &Credential) -> Result<()> {
		self.set_access_token(&credential.access_token).await?;
		self.set_refresh_token(&credential.refresh_token).await
	}

	/// Replaces the stored access token.
	pub async fn set_access_token(&self, token: &TokenSecret) -> Result<()> {
		Ok(self.store.set(StorageKey::AccessToken, token.expose().to_owned()).await?)
	}

	/// Replaces the stored refresh token.
	pub async fn set_refresh_token(&self, token: &TokenSecret) -> Result<()> {
		Ok(self.store.set(StorageKey::RefreshToken, token.expose().to_owned()).await?)
	}

	/// Erases both tokens and the cached profile.
	///
	/// Every key is attempted even when an earlier delete fails; the first failure is returned.
	pub async fn clear_credential(&self) -> Result<()> {
		let mut first_error = None;

		for key in StorageKey::ALL {
			if let Err(e) = self.store.delete(key).await {
				first_error.get_or_insert(e);
			}
		}

		match first_error {
			Some(e) => Err(e.into()),
			None => Ok(()),
		}
	}

	/// Cached user profile, if one is stored.
	pub async fn profile(&self) -> Result<Option<JsonValue>> {
		let Some(raw) = self.store.get(StorageKey::UserData).await? else {
			return Ok(None);
		};
		let profile = serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
			message: format!("Cached user profile is not valid JSON: {e}"),
		})?;

		Ok(Some(profile))
	}

	/// Caches the user profile as serialized JSON.
	pub async fn set_profile(&self, profile: &JsonValue) -> Result<()> {
		let raw = serde_json::to_string(profile).map_err(|e| StoreError::Serialization {
			message: format!("User profile could not be serialized: {e}"),
		})?;

		Ok(self.store.set(StorageKey::UserData, raw).await?)
	}

	/// Returns the cached profile when a previous login is still on disk.
	///
	/// A profile without an access token (or the reverse) does not count as a session.
	pub async fn restore(&self) -> Result<Option<JsonValue>> {
		if self.access_token().await?.is_none() {
			return Ok(None);
		}

		self.profile().await
	}

	async fn secret(&self, key: StorageKey) -> Result<Option<TokenSecret>> {
		Ok(self.store.get(key).await?.map(TokenSecret::new))
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::in_memory()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Session(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn credential_requires_both_tokens() {
		let session = Session::in_memory();

		session
			.set_access_token(&TokenSecret::new("access-only"))
			.await
			.expect("Writing the access token should succeed.");

		assert!(session.credential().await.expect("Reading should succeed.").is_none());

		session
			.set_refresh_token(&TokenSecret::new("refresh"))
			.await
			.expect("Writing the refresh token should succeed.");

		let credential = session
			.credential()
			.await
			.expect("Reading should succeed.")
			.expect("Both tokens are stored.");

		assert_eq!(credential.access_token.expose(), "access-only");
		assert_eq!(credential.refresh_token.expose(), "refresh");
	}

	#[tokio::test]
	async fn restore_needs_token_and_profile() {
		let session = Session::in_memory();
		let profile = serde_json::json!({ "name": "Siti", "school": "SCH001" });

		session.set_profile(&profile).await.expect("Caching the profile should succeed.");

		assert!(session.restore().await.expect("Restore should succeed.").is_none());

		session
			.set_credential(&Credential::new("access", "refresh"))
			.await
			.expect("Writing the credential should succeed.");

		assert_eq!(session.restore().await.expect("Restore should succeed."), Some(profile));

		session.clear_credential().await.expect("Clearing should succeed.");

		assert!(session.restore().await.expect("Restore should succeed.").is_none());
		assert!(session.profile().await.expect("Reading should succeed.").is_none());
	}

	#[tokio::test]
	async fn corrupt_profile_surfaces_serialization_error() {
		let store = Arc::new(MemoryStore::default());
		let session = Session::new(store.clone());

		store
			.set(StorageKey::UserData, "{not json".into())
			.await
			.expect("Raw write should succeed.");

		let err = session.profile().await.expect_err("Corrupt JSON must not parse.");

		assert!(matches!(err, Error::Storage(StoreError::Serialization { .. })));
	}
}
