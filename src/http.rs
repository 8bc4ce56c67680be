//! Transport primitives for API calls.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. Implementations perform
//! exactly one exchange per [`TransportRequest`], enforce [`TransportRequest::timeout`], and
//! report non-2xx statuses as ordinary [`TransportResponse`] values. Only failures where no
//! response exists are reported through [`TransportFailure`], which keeps "the server said no"
//! and "the server never answered" in separate channels for the pipeline's classifier.

pub mod multipart;

pub use multipart::*;

// self
use crate::{_prelude::*, error::BoxError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportFailure>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing API exchanges.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by clones of
/// the client across tasks.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs a single HTTP exchange.
	fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// Serialized JSON document.
	Json(Vec<u8>),
	/// Multipart form upload.
	Multipart(MultipartForm),
}
impl RequestBody {
	/// Serializes `value` into a JSON body.
	pub fn json<T>(value: &T) -> Result<Self, serde_json::Error>
	where
		T: ?Sized + Serialize,
	{
		serde_json::to_vec(value).map(Self::Json)
	}

	/// Parses a JSON body back into a value, for transports and tests that inspect payloads.
	pub fn as_json(&self) -> Option<JsonValue> {
		match self {
			Self::Json(bytes) => serde_json::from_slice(bytes).ok(),
			_ => None,
		}
	}
}
impl Debug for RequestBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Json(bytes) => f.debug_struct("Json").field("len", &bytes.len()).finish(),
			Self::Multipart(form) => f.debug_tuple("Multipart").field(form).finish(),
		}
	}
}

/// Fully resolved request handed to an [`HttpTransport`].
#[derive(Clone)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute request URL including query parameters.
	pub url: Url,
	/// Request headers keyed by lower-case name.
	pub headers: BTreeMap<String, String>,
	/// Request payload.
	pub body: RequestBody,
	/// Budget after which the transport must abandon the exchange.
	pub timeout: StdDuration,
	/// Upload progress observer for multipart bodies.
	pub progress: Option<ProgressCallback>,
}
impl TransportRequest {
	/// Creates a request with no headers, no body, and the given timeout.
	pub fn new(method: HttpMethod, url: Url, timeout: StdDuration) -> Self {
		Self {
			method,
			url,
			headers: BTreeMap::new(),
			body: RequestBody::Empty,
			timeout,
			progress: None,
		}
	}

	/// Sets a header, normalizing the name to lower case.
	pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
		self.headers.insert(name.to_ascii_lowercase(), value.into());
	}

	/// Reads a header by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Removes a header by case-insensitive name.
	pub fn remove_header(&mut self, name: &str) -> Option<String> {
		self.headers.remove(&name.to_ascii_lowercase())
	}
}
impl Debug for TransportRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let header_names: Vec<_> = self.headers.keys().collect();

		f.debug_struct("TransportRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &header_names)
			.field("body", &self.body)
			.field("timeout", &self.timeout)
			.field("progress", &self.progress.is_some())
			.finish()
	}
}

/// Response returned by an [`HttpTransport`], for any status code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lower-case name.
	pub headers: BTreeMap<String, String>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Creates a response with the given status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Creates a JSON response.
	pub fn json(status: u16, value: &JsonValue) -> Self {
		let mut response = Self::new(status, value.to_string());

		response.headers.insert("content-type".into(), "application/json".into());

		response
	}

	/// Adds a response header.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Reads a header by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Retry-After hint expressed as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(self.header("retry-after")?)
	}
}

/// Failures where no HTTP response is available.
#[derive(Debug, ThisError)]
pub enum TransportFailure {
	/// The exchange exceeded [`TransportRequest::timeout`].
	#[error("Request exceeded its timeout budget.")]
	Timeout {
		/// Transport-specific failure, when available.
		#[source]
		source: Option<BoxError>,
	},
	/// No response was received (DNS, connect, TLS, reset).
	#[error("No response was received.")]
	NoResponse {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The transport could not build the request.
	#[error("Request could not be constructed.")]
	Build {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
}
impl TransportFailure {
	/// Wraps a connectivity failure.
	pub fn no_response(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::NoResponse { source: Box::new(src) }
	}

	/// Wraps a request construction failure.
	pub fn build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Build { source: Box::new(src) }
	}
}

/// Default transport built on [`ReqwestClient`].
///
/// Redirects follow reqwest's default policy; the bearer header is only ever attached by the
/// client pipeline, so a custom [`ReqwestClient`] must not inject its own `Authorization`.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	const UPLOAD_CHUNK: usize = 64 * 1024;

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured user agent.
	pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self, ReqwestError> {
		let mut builder = ReqwestClient::builder();

		if let Some(agent) = &config.user_agent {
			builder = builder.user_agent(agent.clone());
		}

		builder.build().map(Self)
	}

	fn method(method: HttpMethod) -> reqwest::Method {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Patch => reqwest::Method::PATCH,
			HttpMethod::Delete => reqwest::Method::DELETE,
		}
	}

	fn form(
		form: MultipartForm,
		progress: Option<ProgressCallback>,
	) -> Result<reqwest::multipart::Form, TransportFailure> {
		// std
		use std::sync::atomic::{AtomicU64, Ordering};
		// crates.io
		use reqwest::multipart::{Form, Part};

		let total = form.file_bytes();
		let sent = Arc::new(AtomicU64::new(0));
		let mut out = Form::new();

		for part in form.into_parts() {
			match part.data {
				PartData::Text(value) => out = out.text(part.name, value),
				PartData::File { file_name, mime, bytes } => {
					let len = bytes.len() as u64;
					let body = match &progress {
						Some(callback) => {
							let callback = callback.clone();
							let sent = sent.clone();
							let chunks: Vec<Vec<u8>> =
								bytes.chunks(Self::UPLOAD_CHUNK).map(<[u8]>::to_vec).collect();
							let stream = futures_util::stream::iter(chunks.into_iter().map(
								move |chunk| {
									let now = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed)
										+ chunk.len() as u64;

									callback(UploadProgress { sent: now, total });

									Ok::<_, std::io::Error>(chunk)
								},
							));

							Part::stream_with_length(reqwest::Body::wrap_stream(stream), len)
						},
						None => Part::bytes(bytes),
					};
					let body =
						body.file_name(file_name).mime_str(&mime).map_err(TransportFailure::build)?;

					out = out.part(part.name, body);
				},
			}
		}

		Ok(out)
	}

	fn classify(err: ReqwestError) -> TransportFailure {
		if err.is_timeout() {
			TransportFailure::Timeout { source: Some(Box::new(err)) }
		} else if err.is_builder() {
			TransportFailure::build(err)
		} else {
			TransportFailure::no_response(err)
		}
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let TransportRequest { method, url, headers, body, timeout, progress } = request;
			let mut builder = self.0.request(Self::method(method), url).timeout(timeout);

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}

			builder = match body {
				RequestBody::Empty => builder,
				RequestBody::Json(bytes) => builder.body(bytes),
				RequestBody::Multipart(form) => builder.multipart(Self::form(form, progress)?),
			};

			let response = builder.send().await.map_err(Self::classify)?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await.map_err(Self::classify)?.to_vec();

			Ok(TransportResponse { status, headers, body })
		})
	}
}

fn parse_retry_after(raw: &str) -> Option<Duration> {
	use time::format_description::well_known::Rfc2822;

	let raw = raw.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).ok()?));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_dates() {
		let response = TransportResponse::new(503, "").with_header("Retry-After", "120");

		assert_eq!(response.retry_after(), Some(Duration::seconds(120)));

		let past = TransportResponse::new(503, "")
			.with_header("retry-after", "Wed, 21 Oct 2015 07:28:00 +0000");

		assert_eq!(past.retry_after(), None);
		assert_eq!(TransportResponse::new(503, "").retry_after(), None);
	}

	#[test]
	fn request_headers_are_case_insensitive() {
		let url = Url::parse("https://api.modiva.com/v1/siswi/profile").expect("URL should parse.");
		let mut request = TransportRequest::new(HttpMethod::Get, url, StdDuration::from_secs(5));

		request.set_header("Authorization", "Bearer abc");

		assert_eq!(request.header("authorization"), Some("Bearer abc"));
		assert_eq!(request.remove_header("AUTHORIZATION").as_deref(), Some("Bearer abc"));
		assert!(request.header("authorization").is_none());
	}

	#[test]
	fn request_debug_hides_header_values() {
		let url = Url::parse("https://api.modiva.com/v1/siswi/profile").expect("URL should parse.");
		let mut request = TransportRequest::new(HttpMethod::Get, url, StdDuration::from_secs(5));

		request.set_header("authorization", "Bearer top-secret");

		let rendered = format!("{request:?}");

		assert!(rendered.contains("authorization"));
		assert!(!rendered.contains("top-secret"));
	}

	#[test]
	fn request_debug_hides_json_payload() {
		let url = Url::parse("https://api.modiva.com/v1/auth/refresh").expect("URL should parse.");
		let mut request = TransportRequest::new(HttpMethod::Post, url, StdDuration::from_secs(5));

		request.body = RequestBody::json(&serde_json::json!({ "refresh_token": "R-secret" }))
			.expect("Refresh payload should serialize.");

		let rendered = format!("{request:?}");
		let secret_bytes = format!("{:?}", b"R-secret");

		assert!(rendered.contains("Json { len: 28 }"));
		assert!(!rendered.contains("R-secret"));
		assert!(!rendered.contains(secret_bytes.trim_matches(|c| c == '[' || c == ']')));
	}

	#[test]
	fn success_range_is_2xx() {
		assert!(TransportResponse::new(200, "").is_success());
		assert!(TransportResponse::new(204, "").is_success());
		assert!(!TransportResponse::new(301, "").is_success());
		assert!(!TransportResponse::new(401, "").is_success());
	}
}
