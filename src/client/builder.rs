//! Validating builder for [`Client`] values.

// self
use crate::{
	_prelude::*,
	auth::Credential,
	client::{Client, ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT},
	error::ConfigError,
	ext::RatePolicy,
	http::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Builder for [`Client`] values.
///
/// Setting a token switches the default ceiling from 25 to 60 requests per minute and makes
/// [`build`](Self::build_with_http_client) verify the token with one identity call; a rejected
/// token fails construction.
#[derive(Debug, Default)]
pub struct ClientBuilder {
	/// Base URL override; defaults to [`DEFAULT_BASE_URL`].
	pub base_url: Option<Url>,
	/// `User-Agent` override; defaults to [`DEFAULT_USER_AGENT`].
	pub user_agent: Option<String>,
	/// Personal access token.
	pub credential: Option<Credential>,
	/// Explicit rate policy; defaults to the ceiling for the authentication state.
	pub rate_policy: Option<RatePolicy>,
	/// Transport timeout applied by [`build`](Self::build).
	pub timeout: Option<StdDuration>,
	/// Cancellation signal bounding the identity check; never fires when unset.
	pub cancel: Option<CancellationToken>,
}
impl ClientBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the API base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the `User-Agent` string; an empty string omits the header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Authenticates every request with a personal access token.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.credential = Some(Credential::new(token));

		self
	}

	/// Replaces the authentication-derived rate policy.
	pub fn rate_policy(mut self, policy: RatePolicy) -> Self {
		self.rate_policy = Some(policy);

		self
	}

	/// Sets the per-request transport timeout for the reqwest transport.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Bounds the construction-time identity check with `cancel`.
	pub fn cancel_token(mut self, cancel: CancellationToken) -> Self {
		self.cancel = Some(cancel);

		self
	}

	/// Validates the builder into an immutable [`ClientConfig`].
	pub fn config(&self) -> Result<ClientConfig, ConfigError> {
		let base_url = match self.base_url.as_ref() {
			Some(url) => normalize_base_url(url.clone())?,
			None => Url::parse(DEFAULT_BASE_URL)
				.map_err(|_| ConfigError::InvalidBaseUrl { url: DEFAULT_BASE_URL.into() })?,
		};
		let rate_policy = self
			.rate_policy
			.unwrap_or_else(|| RatePolicy::for_authentication(self.credential.is_some()));

		Ok(ClientConfig {
			base_url,
			user_agent: self.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.into()),
			credential: self.credential.clone(),
			rate_policy,
		})
	}

	/// Builds a client on the default reqwest transport.
	#[cfg(feature = "reqwest")]
	pub async fn build(self) -> Result<Client<ReqwestHttpClient>> {
		let http_client = match self.timeout {
			Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
			None => ReqwestHttpClient::default(),
		};

		self.build_with_http_client(http_client).await
	}

	/// Builds a client on a caller-provided transport.
	///
	/// Authenticated clients issue one identity call through the new client (spending one token
	/// from its bucket) and return that call's error if the service rejects the credential. The
	/// check observes the token set with [`cancel_token`](Self::cancel_token).
	pub async fn build_with_http_client<C, H>(self, http_client: H) -> Result<Client<C>>
	where
		C: ?Sized + HttpTransport,
		H: Into<Arc<C>>,
	{
		let client = Client::from_parts(self.config()?, http_client.into());

		if client.is_authenticated() {
			let cancel = self.cancel.unwrap_or_default();
			let identity = client.identity(&cancel).await.inspect_err(|_e| {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "Credential check failed during client construction.");
			})?;

			#[cfg(feature = "tracing")]
			tracing::info!(username = %identity.username, "Authenticated Discogs client.");
			#[cfg(not(feature = "tracing"))]
			let _ = identity;
		}

		Ok(client)
	}
}

fn normalize_base_url(mut url: Url) -> Result<Url, ConfigError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(ConfigError::InvalidBaseUrl { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url.set_query(None);
	url.set_fragment(None);

	Ok(url)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_follow_authentication_state() {
		let anonymous = ClientBuilder::new().config().expect("Default config should validate.");

		assert_eq!(anonymous.base_url.as_str(), "https://api.discogs.com/");
		assert_eq!(anonymous.user_agent, DEFAULT_USER_AGENT);
		assert_eq!(anonymous.rate_policy, RatePolicy::unauthenticated());
		assert!(anonymous.credential.is_none());

		let authenticated =
			ClientBuilder::new().token("abc").config().expect("Token config should validate.");

		assert_eq!(authenticated.rate_policy, RatePolicy::authenticated());
		assert_eq!(
			authenticated.credential.expect("Credential should be stored.").expose_token(),
			"abc"
		);
	}

	#[test]
	fn base_urls_gain_a_trailing_slash() {
		let config = ClientBuilder::new()
			.base_url(Url::parse("http://127.0.0.1:8080/api?x=1").expect("URL should parse."))
			.config()
			.expect("Loopback base URL should validate.");

		assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/api/");
		assert_eq!(
			config.base_url.join("users/alice").expect("Join should succeed.").as_str(),
			"http://127.0.0.1:8080/api/users/alice"
		);
	}

	#[test]
	fn non_http_base_urls_are_rejected() {
		let err = ClientBuilder::new()
			.base_url(Url::parse("mailto:ops@example.com").expect("URL should parse."))
			.config()
			.expect_err("mailto cannot act as a base URL.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
	}

	#[test]
	fn explicit_policies_win_over_the_token_default() {
		let policy =
			RatePolicy::new(5, StdDuration::from_secs(10)).expect("Custom policy should be valid.");
		let config = ClientBuilder::new()
			.token("abc")
			.rate_policy(policy)
			.config()
			.expect("Explicit policy should validate.");

		assert_eq!(config.rate_policy, policy);
		assert!(matches!(
			RatePolicy::new(0, StdDuration::from_secs(60)),
			Err(ConfigError::InvalidRatePolicy)
		));
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn reqwest_clients_reach_the_configured_base_url() {
		// crates.io
		use httpmock::prelude::*;
		// self
		use crate::{_preludet::*, client::NO_BODY};

		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/releases/1")
					.header("user-agent", "discogs-client-tests/0.0.0");
				then.status(200).body("{}");
			})
			.await;
		let policy =
			RatePolicy::new(3, StdDuration::from_secs(1)).expect("Test policy should be valid.");
		let client = build_reqwest_test_client_with_policy(&server.base_url(), policy).await;
		let request = client
			.new_request(http::Method::GET, "releases/1", NO_BODY, &[])
			.expect("Request should build.");

		client.send(request, &CancellationToken::new()).await.expect("Dispatch should succeed.");
		mock.assert_async().await;

		assert_eq!(client.rate_limiter().policy(), policy);
		assert_eq!(
			build_reqwest_test_client(&server.base_url()).await.rate_limiter().policy(),
			RatePolicy::unauthenticated()
		);
	}
}
