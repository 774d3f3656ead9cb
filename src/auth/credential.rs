//! Authorization header construction for personal access tokens.

// crates.io
use http::HeaderValue;
// self
use crate::{_prelude::*, error::ConfigError};

/// Fixed authorization scheme understood by the Discogs API.
pub const AUTH_SCHEME: &str = "Discogs";

/// Credential attached to every request issued by an authenticated client.
///
/// The token never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: String,
}
impl Credential {
	/// Wraps a personal access token.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: token.into() }
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose_token(&self) -> &str {
		&self.token
	}

	/// Renders the `Authorization` header value, `Discogs token=<token>`.
	///
	/// The value is marked sensitive so transports that log headers skip it.
	pub fn header_value(&self) -> Result<HeaderValue, ConfigError> {
		let mut value =
			HeaderValue::from_str(&format!("{AUTH_SCHEME} token={}", self.token))
				.map_err(|source| ConfigError::InvalidHeader { name: "authorization", source })?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("scheme", &AUTH_SCHEME)
			.field("token", &"<redacted>")
			.finish()
	}
}
