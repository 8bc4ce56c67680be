//! Client-level error types shared by the request pipeline, session, and endpoint services.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used where the concrete transport type must not leak to callers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every failure a caller can observe is one of these variants, so UI code can match
/// exhaustively instead of inspecting transport-specific fields.
#[derive(Debug, ThisError)]
pub enum Error {
	/// No response reached the client (DNS, TCP, TLS, connection reset).
	#[error("{message}")]
	Network {
		/// User-facing connectivity message.
		message: String,
		/// Transport-specific failure.
		#[source]
		source: Option<BoxError>,
	},
	/// The response did not arrive within the per-request budget.
	#[error("{message}")]
	Timeout {
		/// User-facing timeout message.
		message: String,
	},
	/// The session can no longer be used; the caller should log the user out.
	#[error("{message}")]
	Unauthorized {
		/// User-facing session-expired message.
		message: String,
		/// Why the client gave up on the session.
		reason: UnauthorizedReason,
		/// Failure that caused the refresh to be abandoned, when there was one.
		#[source]
		source: Option<Box<Error>>,
	},
	/// Any other non-2xx response.
	#[error("{message}")]
	Server {
		/// Server-provided message, or the generic server-error message.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Raw response body for caller inspection.
		body: Vec<u8>,
		/// Retry-After hint expressed as a relative duration.
		retry_after: Option<Duration>,
	},
	/// A successful response carried a body that does not match the expected shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}
impl Error {
	/// Stable code describing the error class.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Network { .. } => ErrorCode::NetworkError,
			Self::Timeout { .. } => ErrorCode::Timeout,
			Self::Unauthorized { .. } => ErrorCode::Unauthorized,
			Self::Server { .. } => ErrorCode::ServerError,
			Self::Decode { .. } | Self::Config(_) | Self::Storage(_) => ErrorCode::ClientError,
		}
	}

	/// HTTP status associated with the failure, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Unauthorized { .. } => Some(401),
			Self::Server { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Advisory flag telling the caller to terminate the local session.
	pub fn force_logout(&self) -> bool {
		matches!(self, Self::Unauthorized { .. })
	}

	/// Server response body, when the failure carried one.
	pub fn body(&self) -> Option<&[u8]> {
		match self {
			Self::Server { body, .. } => Some(body),
			_ => None,
		}
	}

	/// Server response body parsed as JSON, when it is valid JSON.
	pub fn body_json(&self) -> Option<JsonValue> {
		self.body().and_then(|body| serde_json::from_slice(body).ok())
	}

	/// Flattens the error into the shape UI layers render.
	pub fn normalized(&self) -> NormalizedError {
		NormalizedError {
			message: self.to_string(),
			code: self.code(),
			status: self.status(),
			force_logout: self.force_logout(),
		}
	}
}

/// Reason attached to [`Error::Unauthorized`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedReason {
	/// The request was rejected and no refresh token is stored.
	MissingRefreshToken,
	/// The refresh endpoint rejected the refresh token or could not be reached.
	RefreshFailed,
	/// The request was rejected again after a successful refresh.
	RetryRejected,
}

/// Stable error codes surfaced to UI layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// No response reached the client.
	NetworkError,
	/// The per-request budget elapsed.
	Timeout,
	/// The session is no longer valid.
	Unauthorized,
	/// The server returned a non-2xx status.
	ServerError,
	/// A local problem (configuration, storage, decoding).
	ClientError,
}
impl ErrorCode {
	/// Returns a stable label suitable for logs and UI bridges.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NetworkError => "NETWORK_ERROR",
			Self::Timeout => "TIMEOUT",
			Self::Unauthorized => "UNAUTHORIZED",
			Self::ServerError => "SERVER_ERROR",
			Self::ClientError => "CLIENT_ERROR",
		}
	}
}
impl Display for ErrorCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Serializable snapshot of an [`Error`] for UI bridges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
	/// User-facing message.
	pub message: String,
	/// Stable error code.
	pub code: ErrorCode,
	/// HTTP status, when a response was received.
	pub status: Option<u16>,
	/// Whether the caller should terminate the local session.
	pub force_logout: bool,
}

/// Configuration and request construction failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The transport rejected the request before sending it.
	#[error("HTTP request could not be constructed.")]
	RequestBuild {
		/// Underlying transport failure.
		#[source]
		source: BoxError,
	},
	/// Base URL or request path cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must use HTTPS unless it points at a loopback host.
	#[error("The base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry a path (for example `mailto:` or `data:` URLs).
	#[error("The base URL cannot be used as a path prefix: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Request timeout must be positive.
	#[error("The request timeout must be positive.")]
	ZeroTimeout,
	/// Resource identifier cannot be used as a single path segment.
	#[error("`{segment}` is not a valid resource identifier.")]
	InvalidPathSegment {
		/// Rejected identifier.
		segment: String,
	},
	/// Refresh endpoint path cannot be empty.
	#[error("The refresh endpoint path cannot be empty.")]
	EmptyRefreshPath,
	/// Environment variable holds an unusable value.
	#[error("Environment variable `{name}` has an invalid value: {value}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value read from the environment.
		value: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	BodySerialization(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	fn unauthorized(reason: UnauthorizedReason) -> Error {
		Error::Unauthorized { message: "Sesi berakhir.".into(), reason, source: None }
	}

	#[test]
	fn codes_and_logout_flags_follow_variants() {
		let network = Error::Network { message: "offline".into(), source: None };
		let timeout = Error::Timeout { message: "slow".into() };
		let server = Error::Server {
			message: "boom".into(),
			status: 503,
			body: b"{\"message\":\"boom\"}".to_vec(),
			retry_after: None,
		};

		assert_eq!(network.code(), ErrorCode::NetworkError);
		assert_eq!(timeout.code(), ErrorCode::Timeout);
		assert_eq!(server.code(), ErrorCode::ServerError);
		assert!(!network.force_logout());
		assert!(!timeout.force_logout());
		assert!(!server.force_logout());
		assert_eq!(server.status(), Some(503));
		assert_eq!(network.status(), None);

		for reason in [
			UnauthorizedReason::MissingRefreshToken,
			UnauthorizedReason::RefreshFailed,
			UnauthorizedReason::RetryRejected,
		] {
			let err = unauthorized(reason);

			assert_eq!(err.code(), ErrorCode::Unauthorized);
			assert!(err.force_logout());
			assert_eq!(err.status(), Some(401));
		}
	}

	#[test]
	fn normalized_snapshot_serializes_in_camel_case() {
		let payload = serde_json::to_value(
			unauthorized(UnauthorizedReason::RefreshFailed).normalized(),
		)
		.expect("NormalizedError should serialize to JSON.");

		assert_eq!(
			payload,
			serde_json::json!({
				"message": "Sesi berakhir.",
				"code": "UNAUTHORIZED",
				"status": 401,
				"forceLogout": true,
			})
		);
	}

	#[test]
	fn server_body_is_exposed_as_json() {
		let err = Error::Server {
			message: "Data tidak valid".into(),
			status: 422,
			body: b"{\"message\":\"Data tidak valid\",\"field\":\"nisn\"}".to_vec(),
			retry_after: None,
		};
		let body = err.body_json().expect("Server body should parse as JSON.");

		assert_eq!(body["field"], "nisn");
	}

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "keychain locked".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert_eq!(client_error.code(), ErrorCode::ClientError);
		assert!(client_error.to_string().contains("keychain locked"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
