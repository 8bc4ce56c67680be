//! Per-call options and the pending request tracked through the refresh-retry cycle.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::ApiClient,
	error::ConfigError,
	http::{HttpMethod, HttpTransport, ProgressCallback, RequestBody, TransportRequest},
};

pub(crate) const AUTHORIZATION: &str = "authorization";

/// Optional query parameters, headers, and refresh behavior for a single call.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Extra headers; names are normalized to lower case when the request is built.
	pub headers: BTreeMap<String, String>,
	/// Treat 401 like any other error status instead of refreshing.
	pub skip_refresh: bool,
}
impl RequestOptions {
	/// Empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Adds a request header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Disables the refresh-and-retry path, for endpoints where 401 means bad input.
	pub fn without_refresh(mut self) -> Self {
		self.skip_refresh = true;

		self
	}
}

/// Outbound request plus the one-time retry flag.
///
/// `retried` flips to `true` at most once; a second 401 on a retried request is final.
#[derive(Debug)]
pub(crate) struct PendingRequest {
	pub(crate) request: TransportRequest,
	pub(crate) retried: bool,
	pub(crate) refresh_on_unauthorized: bool,
	pub(crate) path: String,
}
impl PendingRequest {
	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}

	/// Replaces (or removes) the bearer header, returning the token that will be sent.
	pub(crate) fn authorize(&mut self, token: Option<TokenSecret>) -> Option<TokenSecret> {
		match &token {
			Some(secret) => self.request.set_header(AUTHORIZATION, secret.bearer()),
			None => {
				self.request.remove_header(AUTHORIZATION);
			},
		}

		token
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) fn prepare(
		&self,
		method: HttpMethod,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
		progress: Option<ProgressCallback>,
	) -> Result<PendingRequest, ConfigError> {
		let mut url = self.config.resolve(path)?;

		if !options.query.is_empty() {
			url.query_pairs_mut().extend_pairs(options.query.iter());
		}

		let mut request = TransportRequest::new(method, url, self.config.timeout);

		request.set_header("accept", "application/json");

		if matches!(body, RequestBody::Json(_)) {
			request.set_header("content-type", "application/json");
		}
		for (name, value) in options.headers {
			request.set_header(&name, value);
		}

		request.body = body;
		request.progress = progress;

		Ok(PendingRequest {
			request,
			retried: false,
			refresh_on_unauthorized: !options.skip_refresh,
			path: path.to_owned(),
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		config::ClientConfig,
		http::{TransportFailure, TransportFuture},
		session::Session,
	};

	struct Unreachable;
	impl HttpTransport for Unreachable {
		fn send(&self, _request: TransportRequest) -> TransportFuture<'_> {
			Box::pin(async {
				Err(TransportFailure::no_response(std::io::Error::other("unreachable")))
			})
		}
	}

	fn client() -> ApiClient<Unreachable> {
		let config = ClientConfig::builder().build().expect("Default config should build.");

		ApiClient::with_transport(config, Session::in_memory(), Unreachable)
	}

	#[test]
	fn prepare_applies_query_and_default_headers() {
		let options = RequestOptions::new()
			.query("page", 2)
			.query("limit", 10)
			.header("X-Request-Source", "dashboard");
		let pending = client()
			.prepare(
				HttpMethod::Post,
				"/siswi/reports",
				RequestBody::Json(b"{}".to_vec()),
				options,
				None,
			)
			.expect("Request should prepare.");

		assert_eq!(
			pending.request.url.as_str(),
			"https://api.modiva.com/v1/siswi/reports?page=2&limit=10"
		);
		assert_eq!(pending.request.header("accept"), Some("application/json"));
		assert_eq!(pending.request.header("content-type"), Some("application/json"));
		assert_eq!(pending.request.header("x-request-source"), Some("dashboard"));
		assert!(pending.request.header(AUTHORIZATION).is_none());
		assert!(pending.refresh_on_unauthorized);
		assert!(!pending.retried);
	}

	#[test]
	fn bodyless_requests_omit_content_type() {
		let pending = client()
			.prepare(
				HttpMethod::Get,
				"/siswi/profile",
				RequestBody::Empty,
				RequestOptions::new().without_refresh(),
				None,
			)
			.expect("Request should prepare.");

		assert!(pending.request.header("content-type").is_none());
		assert!(!pending.refresh_on_unauthorized);
	}

	#[test]
	fn authorize_replaces_and_clears_bearer() {
		let mut pending = client()
			.prepare(
				HttpMethod::Get,
				"/auth/verify",
				RequestBody::Empty,
				RequestOptions::new(),
				None,
			)
			.expect("Request should prepare.");

		pending.authorize(Some(TokenSecret::new("T1")));

		assert_eq!(pending.request.header(AUTHORIZATION), Some("Bearer T1"));

		pending.authorize(Some(TokenSecret::new("T2")));

		assert_eq!(pending.request.header(AUTHORIZATION), Some("Bearer T2"));

		pending.authorize(None);

		assert!(pending.request.header(AUTHORIZATION).is_none());
	}
}
