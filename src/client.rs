//! Authenticated API client with bearer injection and one-shot refresh retry.
//!
//! Every call made through [`ApiClient`] follows the same pipeline: attach the session's access
//! token, send, and on a 401 refresh the token once (behind a client-wide single-flight gate)
//! before resubmitting exactly once. All other outcomes are classified into [`Error`] variants
//! without retrying.

pub mod metrics;
pub mod request;

mod pipeline;
mod refresh;

pub use metrics::ClientMetrics;
pub use request::RequestOptions;

// self
use crate::{
	_prelude::*,
	api::{AuthApi, NotificationApi, ProfileApi, ReportApi},
	config::ClientConfig,
	http::{
		HttpMethod, HttpTransport, MultipartForm, ProgressCallback, RequestBody, TransportResponse,
	},
	obs::CallKind,
	session::Session,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Authenticated HTTP client shared by every endpoint service.
///
/// Clones share the transport, session, metrics, and refresh gate, so concurrent requests from
/// any clone are coordinated by the same single-flight refresh.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request, including the refresh call.
	pub transport: Arc<T>,
	/// Session providing and persisting credentials.
	pub session: Session,
	/// Validated configuration.
	pub config: ClientConfig,
	/// Shared counters for refresh and retry outcomes.
	pub metrics: Arc<ClientMetrics>,
	refresh_gate: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client over a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		session: Session,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			session,
			config,
			metrics: Default::default(),
			refresh_gate: Default::default(),
		}
	}

	/// Sends a `GET` request and decodes the response body.
	pub async fn get<R>(&self, path: &str, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.execute(HttpMethod::Get, path, RequestBody::Empty, options).await
	}

	/// Sends a `POST` request with a JSON body and decodes the response body.
	pub async fn post<B, R>(&self, path: &str, body: &B, options: RequestOptions) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.execute(HttpMethod::Post, path, json_body(body)?, options).await
	}

	/// Sends a `PUT` request with a JSON body and decodes the response body.
	pub async fn put<B, R>(&self, path: &str, body: &B, options: RequestOptions) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.execute(HttpMethod::Put, path, json_body(body)?, options).await
	}

	/// Sends a `PATCH` request with a JSON body and decodes the response body.
	pub async fn patch<B, R>(&self, path: &str, body: &B, options: RequestOptions) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.execute(HttpMethod::Patch, path, json_body(body)?, options).await
	}

	/// Sends a `DELETE` request and decodes the response body.
	pub async fn delete<R>(&self, path: &str, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.execute(HttpMethod::Delete, path, RequestBody::Empty, options).await
	}

	/// Posts a multipart form, reporting file progress to `progress`.
	pub async fn upload<R>(
		&self,
		path: &str,
		form: MultipartForm,
		progress: Option<ProgressCallback>,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let pending = self.prepare(
			HttpMethod::Post,
			path,
			RequestBody::Multipart(form),
			RequestOptions::default(),
			progress,
		)?;
		let response = self.run(CallKind::Upload, pending).await?;

		decode_body(&response)
	}

	/// Runs the pipeline and decodes the 2xx body into `R`.
	///
	/// An empty body decodes as JSON `null`, so `()` and `Option<_>` targets accept `204`.
	pub async fn execute<R>(
		&self,
		method: HttpMethod,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let response = self.send(method, path, body, options).await?;

		decode_body(&response)
	}

	/// Runs the pipeline and returns the raw 2xx response.
	pub async fn send(
		&self,
		method: HttpMethod,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> Result<TransportResponse> {
		let pending = self.prepare(method, path, body, options, None)?;

		self.run(CallKind::Request, pending).await
	}

	/// Authentication endpoints.
	pub fn auth(&self) -> AuthApi<'_, T> {
		AuthApi::new(self)
	}

	/// Vitamin report endpoints.
	pub fn reports(&self) -> ReportApi<'_, T> {
		ReportApi::new(self)
	}

	/// Student profile endpoints.
	pub fn profile(&self) -> ProfileApi<'_, T> {
		ProfileApi::new(self)
	}

	/// Notification endpoints.
	pub fn notifications(&self) -> NotificationApi<'_, T> {
		NotificationApi::new(self)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport from `config`.
	pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config).map_err(ConfigError::from)?;

		Ok(Self::with_transport(config, session, transport))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			session: self.session.clone(),
			config: self.config.clone(),
			metrics: self.metrics.clone(),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("timeout", &self.config.timeout)
			.field("metrics", &self.metrics)
			.finish()
	}
}

fn json_body<B>(body: &B) -> Result<RequestBody>
where
	B: ?Sized + Serialize,
{
	RequestBody::json(body).map_err(|e| crate::error::ConfigError::from(e).into())
}

pub(crate) fn decode_body<R>(response: &TransportResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let bytes: &[u8] =
		if response.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { status: response.status, source })
}
