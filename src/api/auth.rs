//! Login, logout, and account endpoints.

// self
use crate::{
	_prelude::*,
	api::endpoints,
	auth::{Credential, SchoolId, StudentId, TokenSecret},
	client::{ApiClient, RequestOptions},
	http::{HttpMethod, HttpTransport, RequestBody},
};

/// Token pair and user returned by a successful login.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginGrant {
	/// Short-lived bearer token.
	pub access_token: TokenSecret,
	/// Token exchanged for a new access token after a 401.
	pub refresh_token: TokenSecret,
	/// Signed-in student's profile.
	pub user: JsonValue,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
	nisn: &'a StudentId,
	school_id: &'a SchoolId,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
	nisn: &'a StudentId,
	email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct PasswordChange<'a> {
	pub(crate) old_password: &'a str,
	pub(crate) new_password: &'a str,
}

/// Authentication endpoints.
#[derive(Debug)]
pub struct AuthApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> AuthApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Logs a student in and persists the issued tokens and profile.
	///
	/// A 401 here means the credentials were rejected, so it surfaces as [`Error::Server`] with
	/// the server's message instead of triggering a refresh.
	pub async fn login(&self, nisn: &StudentId, school_id: &SchoolId) -> Result<JsonValue> {
		let grant: LoginGrant = self
			.client
			.data_with(
				HttpMethod::Post,
				endpoints::LOGIN,
				&LoginRequest { nisn, school_id },
				RequestOptions::new().without_refresh(),
			)
			.await?;
		let session = &self.client.session;

		session.set_credential(&Credential::new(grant.access_token, grant.refresh_token)).await?;
		session.set_profile(&grant.user).await?;

		Ok(grant.user)
	}

	/// Notifies the server and erases local credentials.
	///
	/// The server call is best effort; local credentials are cleared even when it fails.
	pub async fn logout(&self) -> Result<()> {
		let _ = self
			.client
			.send(HttpMethod::Post, endpoints::LOGOUT, RequestBody::Empty, RequestOptions::new())
			.await;

		self.client.session.clear_credential().await
	}

	/// Asks the server whether the stored access token is still valid.
	pub async fn verify_token(&self) -> Result<JsonValue> {
		self.client
			.data(HttpMethod::Get, endpoints::VERIFY, RequestBody::Empty, RequestOptions::new())
			.await
	}

	/// Starts a password reset for the given student.
	pub async fn request_password_reset(&self, nisn: &StudentId, email: &str) -> Result<JsonValue> {
		self.client
			.data_with(
				HttpMethod::Post,
				endpoints::FORGOT_PASSWORD,
				&PasswordResetRequest { nisn, email },
				RequestOptions::new(),
			)
			.await
	}

	/// Changes the account password.
	pub async fn change_password(
		&self,
		old_password: &str,
		new_password: &str,
	) -> Result<JsonValue> {
		self.client
			.data_with(
				HttpMethod::Post,
				endpoints::CHANGE_PASSWORD,
				&PasswordChange { old_password, new_password },
				RequestOptions::new(),
			)
			.await
	}

	/// Merges `patch` into the cached profile and returns the merged profile.
	///
	/// Only top-level fields are merged; a non-object patch leaves the profile unchanged.
	pub async fn update_user(&self, patch: &JsonValue) -> Result<JsonValue> {
		let session = &self.client.session;
		let mut user = session
			.profile()
			.await?
			.filter(JsonValue::is_object)
			.unwrap_or_else(|| JsonValue::Object(Default::default()));

		if let (Some(target), Some(fields)) = (user.as_object_mut(), patch.as_object()) {
			for (name, value) in fields {
				target.insert(name.clone(), value.clone());
			}
		}

		session.set_profile(&user).await?;

		Ok(user)
	}
}
