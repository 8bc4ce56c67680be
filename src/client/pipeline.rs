//! Request pipeline: bearer attachment, dispatch, classification, and the single retry.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, request::PendingRequest},
	config::ErrorMessages,
	error::{ConfigError, UnauthorizedReason},
	http::{HttpTransport, TransportFailure, TransportResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

const UNAUTHORIZED: u16 = 401;

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	pub(crate) async fn run(
		&self,
		kind: CallKind,
		mut pending: PendingRequest,
	) -> Result<TransportResponse> {
		let span = CallSpan::new(kind, "run");

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span.instrument(self.drive(&mut pending)).await;
		let outcome = if result.is_ok() { CallOutcome::Success } else { CallOutcome::Failure };

		obs::record_call_outcome(kind, outcome);

		result
	}

	async fn drive(&self, pending: &mut PendingRequest) -> Result<TransportResponse> {
		let mut sent_with = pending.authorize(self.session.access_token().await?);

		loop {
			let response = self.dispatch(pending).await?;

			if response.status != UNAUTHORIZED || !pending.refresh_on_unauthorized {
				return accept(response, &self.config.messages);
			}
			if pending.retried {
				return Err(self.unauthorized(UnauthorizedReason::RetryRejected, None));
			}

			pending.mark_retried();

			let token = self.refreshed_token(sent_with.as_ref()).await?;

			sent_with = pending.authorize(Some(token));
			self.metrics.record_retry();
		}
	}

	/// Sends the current request, converting transport failures into client errors.
	pub(crate) async fn dispatch(&self, pending: &PendingRequest) -> Result<TransportResponse> {
		let method = pending.request.method;

		match self.transport.send(pending.request.clone()).await {
			Ok(response) => {
				obs::record_response(method, &pending.path, response.status, pending.retried);

				Ok(response)
			},
			Err(failure) => {
				let err = classify(failure, &self.config.messages);

				obs::record_transport_failure(method, &pending.path, &err);

				Err(err)
			},
		}
	}

	pub(crate) fn unauthorized(&self, reason: UnauthorizedReason, source: Option<Error>) -> Error {
		Error::Unauthorized {
			message: self.config.messages.unauthorized.clone(),
			reason,
			source: source.map(Box::new),
		}
	}
}

/// Maps a failure without a response onto the client taxonomy.
pub(crate) fn classify(failure: TransportFailure, messages: &ErrorMessages) -> Error {
	match failure {
		TransportFailure::Timeout { .. } => Error::Timeout { message: messages.timeout.clone() },
		TransportFailure::NoResponse { source } =>
			Error::Network { message: messages.network.clone(), source: Some(source) },
		TransportFailure::Build { source } => ConfigError::RequestBuild { source }.into(),
	}
}

/// Passes 2xx responses through and turns every other status into [`Error::Server`].
pub(crate) fn accept(
	response: TransportResponse,
	messages: &ErrorMessages,
) -> Result<TransportResponse> {
	if response.is_success() {
		return Ok(response);
	}

	Err(server_error(response, messages))
}

fn server_error(response: TransportResponse, messages: &ErrorMessages) -> Error {
	let retry_after = response.retry_after();
	let message = serde_json::from_slice::<JsonValue>(&response.body)
		.ok()
		.and_then(|body| {
			["message", "error"].into_iter().find_map(|field| {
				body.get(field).and_then(JsonValue::as_str).map(ToOwned::to_owned)
			})
		})
		.unwrap_or_else(|| messages.server_error.clone());

	Error::Server { message, status: response.status, body: response.body, retry_after }
}
