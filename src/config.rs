//! Client configuration: base URL, timeout budget, refresh endpoint, and user-facing messages.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.modiva.com/v1";
/// Per-request budget applied to every call, including refresh and retry.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// Path of the token-refresh endpoint relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "MODIVA_API_BASE_URL";
/// Environment variable overriding the timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "MODIVA_API_TIMEOUT_SECS";

/// User-facing messages attached to normalized errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
	/// Shown when no response reached the client.
	pub network: String,
	/// Shown when the request budget elapsed.
	pub timeout: String,
	/// Shown when the session can no longer be refreshed.
	pub unauthorized: String,
	/// Shown when the server failed without providing its own message.
	pub server_error: String,
}
impl Default for ErrorMessages {
	fn default() -> Self {
		Self {
			network: "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.".into(),
			timeout: "Request timeout. Silakan coba lagi.".into(),
			unauthorized: "Sesi Anda telah berakhir. Silakan login kembali.".into(),
			server_error: "Terjadi kesalahan pada server. Coba lagi nanti.".into(),
		}
	}
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// API root; request paths are appended to its path.
	pub base_url: Url,
	/// Per-request timeout budget.
	pub timeout: StdDuration,
	/// Refresh endpoint path, resolved against [`ClientConfig::base_url`].
	pub refresh_path: String,
	/// Optional `User-Agent` applied by the default transport.
	pub user_agent: Option<String>,
	/// Messages attached to normalized errors.
	pub messages: ErrorMessages,
}
impl ClientConfig {
	/// Starts a builder seeded with production defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Builds a configuration from `MODIVA_API_BASE_URL` and `MODIVA_API_TIMEOUT_SECS`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds a configuration from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut builder = Self::builder();

		if let Some(raw) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
			builder = builder.base_url(raw.trim());
		}
		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnv {
				name: ENV_TIMEOUT_SECS,
				value: raw.clone(),
			})?;

			builder = builder.timeout(StdDuration::from_secs(secs));
		}

		builder.build()
	}

	/// Resolves a request path against the base URL.
	///
	/// Absolute `http(s)://` URLs pass through unchanged. Relative paths are appended to the base
	/// URL's own path, so `/auth/login` under `https://host/v1` becomes
	/// `https://host/v1/auth/login`.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		if path.starts_with("http://") || path.starts_with("https://") {
			return Url::parse(path)
				.map_err(|source| ConfigError::InvalidUrl { url: path.to_owned(), source });
		}

		let (route, query) = match path.split_once('?') {
			Some((route, query)) => (route, Some(query)),
			None => (path, None),
		};
		let mut url = self.base_url.clone();
		let joined =
			format!("{}/{}", url.path().trim_end_matches('/'), route.trim_start_matches('/'));

		url.set_path(&joined);
		url.set_query(query);
		url.set_fragment(None);

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: String,
	timeout: StdDuration,
	refresh_path: String,
	user_agent: Option<String>,
	messages: ErrorMessages,
}
impl ClientConfigBuilder {
	/// Overrides the API root.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Overrides the per-request timeout budget.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Sets the `User-Agent` used by the default transport.
	pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
		self.user_agent = Some(agent.into());

		self
	}

	/// Replaces the user-facing error messages.
	pub fn messages(mut self, messages: ErrorMessages) -> Self {
		self.messages = messages;

		self
	}

	/// Validates the configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidUrl { url: self.base_url.clone(), source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.to_string() });
		}
		if base_url.scheme() != "https" && !is_loopback(&base_url) {
			return Err(ConfigError::InsecureBaseUrl { url: base_url.to_string() });
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}
		if self.refresh_path.trim().is_empty() {
			return Err(ConfigError::EmptyRefreshPath);
		}

		Ok(ClientConfig {
			base_url,
			timeout: self.timeout,
			refresh_path: self.refresh_path,
			user_agent: self.user_agent,
			messages: self.messages,
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.into(),
			timeout: DEFAULT_TIMEOUT,
			refresh_path: DEFAULT_REFRESH_PATH.into(),
			user_agent: None,
			messages: ErrorMessages::default(),
		}
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}
