//! Transport primitives for Discogs API calls.
//!
//! The module exposes [`HttpTransport`] so downstream crates can plug in custom HTTP stacks
//! (recording fakes, proxies, alternative runtimes) without touching the dispatch pipeline.
//! Requests and responses are plain [`::http`] values with fully buffered bodies; the client
//! never streams because catalog payloads are small and every response body has to be re-read
//! after pagination metadata is peeked out of it.

// crates.io
use ::http::{Request, Response};
// self
use crate::_prelude::*;

/// Outbound request handed to an [`HttpTransport`].
pub type HttpRequest = Request<Vec<u8>>;
/// Buffered response returned by an [`HttpTransport`].
pub type HttpResponse = Response<Vec<u8>>;
/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = std::result::Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing Discogs API requests.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can back many cloned clients, and the futures they
/// return must be `Send` so dispatch can hop executors. Implementations return every response
/// they receive, whatever its status; interpreting status codes is left to endpoint callers.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and buffers the full response body.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}
impl<T> HttpTransport for Arc<T>
where
	T: HttpTransport,
{
	type TransportError = T::TransportError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		T::execute(self.as_ref(), request)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail once `timeout` elapses.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl std::ops::Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(reqwest::Request::try_from(request)?).await?;
			let status = response.status();
			let version = response.version();
			let headers = response.headers().to_owned();
			let mut buffered = HttpResponse::new(response.bytes().await?.to_vec());

			*buffered.status_mut() = status;
			*buffered.version_mut() = version;
			*buffered.headers_mut() = headers;

			Ok::<_, ReqwestError>(buffered)
		})
	}
}
