//! Student profile endpoints.

// self
use crate::{
	_prelude::*,
	api::{Envelope, auth::PasswordChange, endpoints},
	client::{ApiClient, RequestOptions},
	http::{HttpMethod, HttpTransport, MultipartForm, PhotoFile, RequestBody},
};

/// Student profile endpoints.
#[derive(Debug)]
pub struct ProfileApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> ProfileApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Fetches the signed-in student's profile.
	pub async fn profile(&self) -> Result<JsonValue> {
		self.get(endpoints::PROFILE).await
	}

	/// Updates profile fields.
	pub async fn update_profile<B>(&self, data: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.put(endpoints::UPDATE_PROFILE, data).await
	}

	/// Replaces the profile photo.
	pub async fn upload_photo(&self, photo: PhotoFile) -> Result<JsonValue> {
		let PhotoFile { file_name, mime, bytes } = photo;
		let form = MultipartForm::new().file("photo", file_name, mime, bytes);
		let payload: Envelope<JsonValue> =
			self.client.upload(endpoints::PROFILE_PHOTO, form, None).await?;

		Ok(payload.into_inner())
	}

	/// Removes the profile photo.
	pub async fn delete_photo(&self) -> Result<JsonValue> {
		self.client
			.data(
				HttpMethod::Delete,
				endpoints::PROFILE_PHOTO,
				RequestBody::Empty,
				RequestOptions::new(),
			)
			.await
	}

	/// Updates height, weight, and hemoglobin data.
	pub async fn update_health_data<B>(&self, data: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.put(endpoints::PROFILE_HEALTH, data).await
	}

	/// Fetches profile statistics.
	pub async fn statistics(&self) -> Result<JsonValue> {
		self.get(endpoints::PROFILE_STATISTICS).await
	}

	/// Fetches notification preferences.
	pub async fn notification_preferences(&self) -> Result<JsonValue> {
		self.get(endpoints::PROFILE_NOTIFICATIONS).await
	}

	/// Updates notification preferences.
	pub async fn update_notification_preferences<B>(&self, preferences: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.put(endpoints::PROFILE_NOTIFICATIONS, preferences).await
	}

	/// Changes the password through the profile endpoint.
	pub async fn change_password(
		&self,
		old_password: &str,
		new_password: &str,
	) -> Result<JsonValue> {
		self.client
			.data_with(
				HttpMethod::Post,
				endpoints::PROFILE_CHANGE_PASSWORD,
				&PasswordChange { old_password, new_password },
				RequestOptions::new(),
			)
			.await
	}

	/// Updates contact information.
	pub async fn update_contact_info<B>(&self, data: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.put(endpoints::PROFILE_CONTACT, data).await
	}

	async fn get(&self, path: &str) -> Result<JsonValue> {
		self.client.data(HttpMethod::Get, path, RequestBody::Empty, RequestOptions::new()).await
	}

	async fn put<B>(&self, path: &str, data: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.client.data_with(HttpMethod::Put, path, data, RequestOptions::new()).await
	}
}
