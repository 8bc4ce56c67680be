// self
use crate::{_prelude::*, http::HttpMethod, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("modiva_client.call", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event for a received response.
pub fn record_response(method: HttpMethod, path: &str, status: u16, retried: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(method = method.as_str(), path, status, retried, "response received");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path, status, retried);
	}
}

/// Emits a warning for an exchange that produced no response.
pub fn record_transport_failure(method: HttpMethod, path: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			method = method.as_str(),
			path,
			code = error.code().as_str(),
			"request produced no response"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, path, error);
	}
}

/// Emits a warning when a refresh attempt is abandoned and the session is cleared.
pub fn record_refresh_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			code = error.code().as_str(),
			status = error.status(),
			"token refresh failed; clearing credentials"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

/// Emits a warning when clearing credentials after a failed refresh did not succeed.
pub fn record_clear_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "credentials could not be cleared after refresh failure");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
