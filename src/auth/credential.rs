//! Access/refresh token pair persisted by the session.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Token pair issued at login and rotated by the refresh endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Short-lived bearer credential authorizing API calls.
	pub access_token: TokenSecret,
	/// Longer-lived credential exchanged for a new access token.
	pub refresh_token: TokenSecret,
}
impl Credential {
	/// Creates a credential from raw token strings.
	pub fn new(
		access_token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
	) -> Self {
		Self { access_token: access_token.into(), refresh_token: refresh_token.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_never_contains_tokens() {
		let credential = Credential::new("access-abc", "refresh-xyz");
		let rendered = format!("{credential:?}");

		assert!(!rendered.contains("access-abc"));
		assert!(!rendered.contains("refresh-xyz"));
	}
}
