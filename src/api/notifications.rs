//! Notification inbox and push registration endpoints.

// self
use crate::{
	_prelude::*,
	api::endpoints,
	client::{ApiClient, RequestOptions},
	http::{HttpMethod, HttpTransport, RequestBody},
};

/// Default page size for the notification inbox.
pub const NOTIFICATION_PAGE_SIZE: u32 = 20;

/// Inbox filter; [`NotificationFilter::All`] sends no `filter` parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFilter {
	/// Every notification.
	#[default]
	All,
	/// Notifications not yet opened.
	Unread,
	/// Notifications already opened.
	Read,
}
impl NotificationFilter {
	/// Wire value used in query strings.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Unread => "unread",
			Self::Read => "read",
		}
	}
}

#[derive(Serialize)]
struct PushRegistration<'a, D>
where
	D: ?Sized + Serialize,
{
	fcm_token: &'a str,
	device_info: &'a D,
}

#[derive(Serialize)]
struct PushUnregistration<'a> {
	fcm_token: &'a str,
}

/// Notification endpoints.
#[derive(Debug)]
pub struct NotificationApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	client: &'a ApiClient<T>,
}
impl<'a, T> NotificationApi<'a, T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
		Self { client }
	}

	/// Lists notifications.
	pub async fn notifications(
		&self,
		filter: NotificationFilter,
		page: u32,
		limit: u32,
	) -> Result<JsonValue> {
		let mut options = RequestOptions::new().query("page", page).query("limit", limit);

		if filter != NotificationFilter::All {
			options = options.query("filter", filter.as_str());
		}

		self.client
			.data(HttpMethod::Get, endpoints::NOTIFICATIONS, RequestBody::Empty, options)
			.await
	}

	/// Fetches one notification.
	pub async fn notification_detail(&self, id: &str) -> Result<JsonValue> {
		self.call(HttpMethod::Get, &endpoints::with_id(endpoints::NOTIFICATIONS, id)?).await
	}

	/// Marks one notification as read.
	pub async fn mark_as_read(&self, id: &str) -> Result<JsonValue> {
		self.call(HttpMethod::Post, &endpoints::with_id(endpoints::MARK_AS_READ, id)?).await
	}

	/// Marks every notification as read.
	pub async fn mark_all_as_read(&self) -> Result<JsonValue> {
		self.call(HttpMethod::Post, &format!("{}/all", endpoints::MARK_AS_READ)).await
	}

	/// Deletes one notification.
	pub async fn delete_notification(&self, id: &str) -> Result<JsonValue> {
		self.call(HttpMethod::Delete, &endpoints::with_id(endpoints::NOTIFICATIONS, id)?).await
	}

	/// Deletes every notification.
	pub async fn delete_all_notifications(&self) -> Result<JsonValue> {
		self.call(HttpMethod::Delete, &format!("{}/all", endpoints::NOTIFICATIONS)).await
	}

	/// Number of unread notifications.
	pub async fn unread_count(&self) -> Result<JsonValue> {
		self.call(HttpMethod::Get, endpoints::UNREAD_COUNT).await
	}

	/// Registers a push token for this device.
	pub async fn register_push_token<D>(&self, token: &str, device_info: &D) -> Result<JsonValue>
	where
		D: ?Sized + Serialize,
	{
		self.client
			.data_with(
				HttpMethod::Post,
				endpoints::REGISTER_PUSH_TOKEN,
				&PushRegistration { fcm_token: token, device_info },
				RequestOptions::new(),
			)
			.await
	}

	/// Removes a push token.
	pub async fn unregister_push_token(&self, token: &str) -> Result<JsonValue> {
		self.client
			.data_with(
				HttpMethod::Post,
				endpoints::UNREGISTER_PUSH_TOKEN,
				&PushUnregistration { fcm_token: token },
				RequestOptions::new(),
			)
			.await
	}

	/// Fetches delivery settings.
	pub async fn settings(&self) -> Result<JsonValue> {
		self.call(HttpMethod::Get, endpoints::NOTIFICATION_SETTINGS).await
	}

	/// Updates delivery settings.
	pub async fn update_settings<B>(&self, settings: &B) -> Result<JsonValue>
	where
		B: ?Sized + Serialize,
	{
		self.client
			.data_with(
				HttpMethod::Put,
				endpoints::NOTIFICATION_SETTINGS,
				settings,
				RequestOptions::new(),
			)
			.await
	}

	async fn call(&self, method: HttpMethod, path: &str) -> Result<JsonValue> {
		self.client.data(method, path, RequestBody::Empty, RequestOptions::new()).await
	}
}
