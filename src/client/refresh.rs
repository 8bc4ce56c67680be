//! Single-flight token refresh shared by every request of a client.

// self
use crate::{
	_prelude::*,
	api::Envelope,
	auth::TokenSecret,
	client::{ApiClient, RequestOptions, decode_body, pipeline},
	error::{ConfigError, UnauthorizedReason},
	http::{HttpMethod, HttpTransport, RequestBody},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

#[derive(Serialize)]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshGrant {
	access_token: TokenSecret,
	#[serde(default)]
	refresh_token: Option<TokenSecret>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns an access token that is newer than `sent_with`, refreshing at most once per gate.
	///
	/// Callers that queue behind an in-flight refresh pick up the token it stored instead of
	/// spending the refresh token again.
	pub(crate) async fn refreshed_token(
		&self,
		sent_with: Option<&TokenSecret>,
	) -> Result<TokenSecret> {
		let _gate = self.refresh_gate.lock().await;

		let stored = self.session.access_token().await?;

		if let Some(current) = stored.filter(|stored| sent_with.is_none_or(|sent| sent != stored)) {
			self.metrics.record_token_reuse();

			return Ok(current);
		}

		let Some(refresh_token) = self.session.refresh_token().await? else {
			return Err(self.unauthorized(UnauthorizedReason::MissingRefreshToken, None));
		};
		let span = CallSpan::new(CallKind::Refresh, "refreshed_token");

		self.metrics.record_refresh_attempt();
		obs::record_call_outcome(CallKind::Refresh, CallOutcome::Attempt);

		match span.instrument(self.exchange(&refresh_token)).await {
			Ok(grant) => {
				self.session.set_access_token(&grant.access_token).await?;

				if let Some(rotated) = &grant.refresh_token {
					self.session.set_refresh_token(rotated).await?;
				}

				self.metrics.record_refresh_success();
				obs::record_call_outcome(CallKind::Refresh, CallOutcome::Success);

				Ok(grant.access_token)
			},
			Err(err) => {
				self.metrics.record_refresh_failure();
				obs::record_call_outcome(CallKind::Refresh, CallOutcome::Failure);
				obs::record_refresh_failure(&err);

				if let Err(clear) = self.session.clear_credential().await {
					obs::record_clear_failure(&clear);
				}

				Err(self.unauthorized(UnauthorizedReason::RefreshFailed, Some(err)))
			},
		}
	}

	async fn exchange(&self, refresh_token: &TokenSecret) -> Result<RefreshGrant> {
		let body = RequestBody::json(&RefreshRequest { refresh_token: refresh_token.expose() })
			.map_err(ConfigError::from)?;
		let pending = self.prepare(
			HttpMethod::Post,
			&self.config.refresh_path,
			body,
			RequestOptions::new().without_refresh(),
			None,
		)?;
		let response = pipeline::accept(self.dispatch(&pending).await?, &self.config.messages)?;
		let grant: Envelope<RefreshGrant> = decode_body(&response)?;

		Ok(grant.into_inner())
	}
}
