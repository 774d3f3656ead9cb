//! Client handle that builds authenticated requests and dispatches them through the rate gate.

pub mod builder;

pub use builder::*;

// crates.io
use http::{
	HeaderValue, Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::{ConfigError, TransportError},
	ext::{RateLimiter, RatePolicy, RequestOption},
	http::{HttpRequest, HttpTransport},
	obs::{self, RequestOutcome, RequestSpan},
	response::ResponseEnvelope,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Base URL of the public Discogs API.
pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com/";
/// Identification string sent when the caller does not override it.
pub const DEFAULT_USER_AGENT: &str = concat!("discogs-client/", env!("CARGO_PKG_VERSION"));

/// Placeholder for [`Client::new_request`] calls that carry no body.
pub const NO_BODY: Option<&()> = None;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestDiscogsClient = Client<ReqwestHttpClient>;

/// Immutable settings shared by every request a [`Client`] issues.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Base URL relative paths are resolved against; always ends with `/`.
	pub base_url: Url,
	/// `User-Agent` value; an empty string omits the header.
	pub user_agent: String,
	/// Credential sent as `Authorization`, if any.
	pub credential: Option<Credential>,
	/// Request ceiling fixed at construction.
	pub rate_policy: RatePolicy,
}

/// Discogs API client.
///
/// Cloning is cheap and clones share the transport, configuration, and rate limiter, so one
/// bucket governs every request issued from any clone.
pub struct Client<C>
where
	C: ?Sized + HttpTransport,
{
	http_client: Arc<C>,
	config: Arc<ClientConfig>,
	limiter: Arc<RateLimiter>,
}
impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	pub(crate) fn from_parts(config: ClientConfig, http_client: Arc<C>) -> Self {
		let limiter = Arc::new(RateLimiter::new(config.rate_policy));

		Self { http_client, config: Arc::new(config), limiter }
	}

	/// Configuration fixed at construction.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Rate limiter shared by every clone of this client.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// Transport backing this client.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Whether requests carry a credential.
	pub fn is_authenticated(&self) -> bool {
		self.config.credential.is_some()
	}

	/// Builds a request for `target`, resolved against the configured base URL.
	///
	/// `target` may be relative (`users/alice/collection/folders`), root-relative
	/// (`/releases/1`), or absolute. A supplied `body` is encoded as JSON with a trailing newline
	/// and tagged `application/json`; `None` sends no payload and no content type. `options` run
	/// after the standard headers are in place.
	pub fn new_request<B>(
		&self,
		method: Method,
		target: &str,
		body: Option<&B>,
		options: &[&dyn RequestOption],
	) -> Result<HttpRequest>
	where
		B: ?Sized + Serialize,
	{
		let url = self
			.config
			.base_url
			.join(target)
			.map_err(|source| Error::MalformedTarget { target: target.to_owned(), source })?;
		let payload = match body {
			Some(body) => {
				let mut buf = serde_json::to_vec(body).map_err(ConfigError::RequestBody)?;

				buf.push(b'\n');

				Some(buf)
			},
			None => None,
		};
		let has_payload = payload.is_some();
		let mut request = Request::builder()
			.method(method)
			.uri(url.as_str())
			.body(payload.unwrap_or_default())
			.map_err(ConfigError::from)?;
		let headers = request.headers_mut();

		if let Some(credential) = self.config.credential.as_ref() {
			headers.insert(AUTHORIZATION, credential.header_value()?);
		}
		if has_payload {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}
		if !self.config.user_agent.is_empty() {
			let user_agent = HeaderValue::from_str(&self.config.user_agent)
				.map_err(|source| ConfigError::InvalidHeader { name: "user-agent", source })?;

			headers.insert(USER_AGENT, user_agent);
		}

		for (index, option) in options.iter().enumerate() {
			option
				.apply(&mut request)
				.map_err(|source| Error::RequestOptionFailed { index, source })?;
		}

		Ok(request)
	}

	/// Waits for a rate-limit token, sends `request`, and wraps whatever comes back.
	///
	/// Status codes are not interpreted here. If `cancel` fires while waiting for a token the
	/// request is never sent ([`Error::RateLimitWaitCanceled`]); if it fires during the transport
	/// call the call is dropped ([`Error::RequestCanceled`]).
	pub async fn send(
		&self,
		request: HttpRequest,
		cancel: &CancellationToken,
	) -> Result<ResponseEnvelope> {
		self.dispatch("request", request, cancel).await
	}

	pub(crate) async fn dispatch(
		&self,
		operation: &'static str,
		request: HttpRequest,
		cancel: &CancellationToken,
	) -> Result<ResponseEnvelope> {
		let span = RequestSpan::new(operation, request.method());

		obs::record_request_outcome(operation, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.limiter.acquire(cancel).await?;

				let response = tokio::select! {
					biased;
					_ = cancel.cancelled() => return Err(Error::RequestCanceled),
					response = C::execute(self.http_client.as_ref(), request) =>
						response.map_err(TransportError::network)?,
				};
				let envelope = ResponseEnvelope::new(response);

				#[cfg(feature = "tracing")]
				{
					let rate = envelope.rate();

					tracing::debug!(
						status = envelope.status().as_u16(),
						rate_limit = rate.limit,
						rate_remaining = rate.remaining,
						"Received response."
					);

					if rate.limit > 0 && rate.remaining == 0 {
						tracing::warn!("Server reports the rate limit window is exhausted.");
					}
				}

				Ok::<_, Error>(envelope)
			})
			.await;

		obs::record_request_outcome(operation, RequestOutcome::of(&result));

		result
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			limiter: self.limiter.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.config.base_url.as_str())
			.field("user_agent", &self.config.user_agent)
			.field("authenticated", &self.is_authenticated())
			.field("rate_policy", &self.config.rate_policy)
			.finish()
	}
}
