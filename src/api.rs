//! Endpoint services layered on top of [`ApiClient`].
//!
//! Each service borrows the client, so all of them share one session, one transport, and one
//! refresh gate. Backend payloads arrive inside a `{ "data": ... }` envelope; [`Envelope`]
//! accepts that shape as well as a bare payload.

pub mod auth;
pub mod notifications;
pub mod profile;
pub mod reports;

pub use auth::*;
pub use notifications::*;
pub use profile::*;
pub use reports::*;

// self
use crate::{
	_prelude::*,
	client::{ApiClient, RequestOptions},
	http::{HttpMethod, HttpTransport, RequestBody},
};

/// Backend endpoint paths, relative to the configured base URL.
pub mod endpoints {
	// self
	use crate::error::ConfigError;

	/// Student login.
	pub const LOGIN: &str = "/auth/login/siswi";
	/// Server-side logout.
	pub const LOGOUT: &str = "/auth/logout";
	/// Access token validation.
	pub const VERIFY: &str = "/auth/verify";
	/// Password reset request.
	pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
	/// Account password change.
	pub const CHANGE_PASSWORD: &str = "/auth/change-password";

	/// Report submission; `/{id}` addresses an existing report.
	pub const SUBMIT_REPORT: &str = "/report/submit";
	/// Report history; `/{id}` addresses one report.
	pub const REPORTS: &str = "/siswi/reports";
	/// Hemoglobin trend series.
	pub const REPORT_TREND: &str = "/siswi/report/trend";
	/// Detailed per-student report listing.
	pub const STUDENT_REPORTS: &str = "/reports/student-detail";
	/// Aggregated report statistics.
	pub const REPORT_STATISTICS: &str = "/reports/statistics";

	/// Student profile.
	pub const PROFILE: &str = "/siswi/profile";
	/// Student profile update.
	pub const UPDATE_PROFILE: &str = "/siswi/profile/update";
	/// Profile photo upload and removal.
	pub const PROFILE_PHOTO: &str = "/profile/photo";
	/// Height, weight, and hemoglobin data.
	pub const PROFILE_HEALTH: &str = "/profile/health";
	/// Profile statistics.
	pub const PROFILE_STATISTICS: &str = "/profile/statistics";
	/// Notification preferences stored on the profile.
	pub const PROFILE_NOTIFICATIONS: &str = "/profile/notifications";
	/// Profile password change.
	pub const PROFILE_CHANGE_PASSWORD: &str = "/profile/change-password";
	/// Contact information.
	pub const PROFILE_CONTACT: &str = "/profile/contact";

	/// Notification inbox; `/{id}` addresses one notification.
	pub const NOTIFICATIONS: &str = "/notifications";
	/// Read markers; `/{id}` or `/all`.
	pub const MARK_AS_READ: &str = "/notifications/read";
	/// Unread notification count.
	pub const UNREAD_COUNT: &str = "/notifications/unread-count";
	/// Push token registration.
	pub const REGISTER_PUSH_TOKEN: &str = "/notifications/register-token";
	/// Push token removal.
	pub const UNREGISTER_PUSH_TOKEN: &str = "/notifications/unregister-token";
	/// Notification delivery settings.
	pub const NOTIFICATION_SETTINGS: &str = "/notifications/settings";

	/// Appends `id` to `base` as one percent-encoded path segment.
	///
	/// Empty, `.` and `..` identifiers are rejected since URL parsing would collapse them.
	pub fn with_id(base: &str, id: &str) -> Result<String, ConfigError> {
		Ok(format!("{base}/{}", segment(id)?))
	}

	/// Report PDF download path.
	pub fn report_download(id: &str) -> Result<String, ConfigError> {
		Ok(format!("/reports/{}/download", segment(id)?))
	}

	fn segment(id: &str) -> Result<String, ConfigError> {
		if matches!(id, "" | "." | "..") {
			return Err(ConfigError::InvalidPathSegment { segment: id.to_owned() });
		}

		Ok(urlencoding::encode(id).into_owned())
	}
}

/// Response payload, with or without the backend's `data` wrapper.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
	/// `{ "data": ... }`
	Wrapped {
		/// Wrapped payload.
		data: T,
	},
	/// Payload returned without a wrapper.
	Bare(T),
}
impl<T> Envelope<T> {
	/// Returns the payload regardless of wrapping.
	pub fn into_inner(self) -> T {
		match self {
			Self::Wrapped { data } | Self::Bare(data) => data,
		}
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Runs a call and unwraps the response [`Envelope`].
	pub(crate) async fn data<R>(
		&self,
		method: HttpMethod,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.execute::<Envelope<R>>(method, path, body, options).await.map(Envelope::into_inner)
	}

	/// Serializes `body` as JSON, runs the call, and unwraps the response [`Envelope`].
	pub(crate) async fn data_with<B, R>(
		&self,
		method: HttpMethod,
		path: &str,
		body: &B,
		options: RequestOptions,
	) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		let body = RequestBody::json(body).map_err(crate::error::ConfigError::from)?;

		self.data(method, path, body, options).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn envelope_accepts_wrapped_and_bare_payloads() {
		let wrapped: Envelope<JsonValue> =
			serde_json::from_str(r#"{"data":{"count":3}}"#).expect("Wrapped payload should parse.");
		let bare: Envelope<JsonValue> =
			serde_json::from_str(r#"{"count":3}"#).expect("Bare payload should parse.");

		assert_eq!(wrapped.into_inner(), serde_json::json!({ "count": 3 }));
		assert_eq!(bare.into_inner(), serde_json::json!({ "count": 3 }));

		let empty: Envelope<JsonValue> =
			serde_json::from_str("null").expect("Null payload should parse.");

		assert_eq!(empty.into_inner(), JsonValue::Null);
	}

	#[test]
	fn download_path_embeds_the_report_id() {
		assert_eq!(
			endpoints::report_download("42").expect("Numeric id should be accepted."),
			"/reports/42/download"
		);
	}

	#[test]
	fn ids_are_escaped_as_a_single_segment() {
		assert_eq!(
			endpoints::with_id(endpoints::REPORTS, "12?status=all").expect("Id should encode."),
			"/siswi/reports/12%3Fstatus%3Dall"
		);
		assert_eq!(
			endpoints::with_id(endpoints::NOTIFICATIONS, "../profile").expect("Id should encode."),
			"/notifications/..%2Fprofile"
		);

		for id in ["", ".", ".."] {
			assert!(matches!(
				endpoints::with_id(endpoints::NOTIFICATIONS, id),
				Err(crate::error::ConfigError::InvalidPathSegment { .. })
			));
		}
	}
}
