//! Client-level error types shared across request building, dispatch, and pagination.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type accepted from transports and request hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Request path could not be resolved against the configured base URL.
	#[error("Request target `{target}` cannot be resolved against the base URL.")]
	MalformedTarget {
		/// Path or URL supplied by the caller.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A caller-supplied request hook rejected the request.
	#[error("Request option {index} failed.")]
	RequestOptionFailed {
		/// Zero-based position of the failing hook.
		index: usize,
		/// Error returned by the hook.
		#[source]
		source: BoxError,
	},
	/// The rate limiter wait was cancelled before a token became available.
	#[error("Rate limit wait was cancelled before a token became available.")]
	RateLimitWaitCanceled,
	/// The request was cancelled while the transport call was in flight.
	#[error("Request was cancelled while awaiting the transport.")]
	RequestCanceled,
	/// The pager has no further pages; callers use this to end iteration.
	#[error("No more pages to iterate.")]
	PageDone,
	/// An endpoint received a status code outside its expected set.
	#[error("{operation} expected one of {expected:?} but the server returned {status}.")]
	UnexpectedStatus {
		/// Endpoint label.
		operation: &'static str,
		/// Status codes the endpoint accepts.
		expected: &'static [u16],
		/// Status code the server returned.
		status: u16,
		/// Response body, lossily decoded for diagnostics.
		body: String,
	},
	/// The server refused the operation for the authenticated user.
	#[error("Not authorized to perform {operation}.")]
	Forbidden {
		/// Endpoint label.
		operation: &'static str,
	},
}
impl Error {
	/// Returns `true` for the end-of-iteration sentinel emitted by [`Pager`](crate::pager::Pager).
	pub fn is_page_done(&self) -> bool {
		matches!(self, Self::PageDone)
	}

	/// Returns `true` when the error came from a cancellation signal rather than a failure.
	pub fn is_canceled(&self) -> bool {
		matches!(self, Self::RateLimitWaitCanceled | Self::RequestCanceled)
	}
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
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Base URL does not use an HTTP scheme or cannot act as a base.
	#[error("Base URL must be an absolute http(s) URL: {url}.")]
	InvalidBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// A header value contains characters that cannot be sent.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: ::http::header::InvalidHeaderValue,
	},
	/// Request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	RequestBody(#[source] serde_json::Error),
	/// A rate policy with zero capacity or an empty window was supplied.
	#[error("Rate policy must allow at least one request per non-empty window.")]
	InvalidRatePolicy,
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

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Discogs API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Discogs API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Response body failed to decode into the requested type.
#[derive(Debug, ThisError)]
#[error("Response body with status {status} does not match the expected shape at `{path}`.")]
pub struct DecodeError {
	/// JSON path where decoding stopped.
	pub path: String,
	/// HTTP status of the decoded response.
	pub status: u16,
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
impl DecodeError {
	/// Builds a decode error from a path-aware parse failure.
	pub fn new(status: u16, source: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self { path: source.path().to_string(), status, source }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sentinels_are_distinguishable() {
		assert!(Error::PageDone.is_page_done());
		assert!(!Error::RateLimitWaitCanceled.is_page_done());
		assert!(Error::RateLimitWaitCanceled.is_canceled());
		assert!(Error::RequestCanceled.is_canceled());
		assert!(!Error::PageDone.is_canceled());
	}

	#[test]
	fn unexpected_status_reports_expectation() {
		let err = Error::UnexpectedStatus {
			operation: "get_folder",
			expected: &[200],
			status: 404,
			body: String::new(),
		};

		assert_eq!(
			err.to_string(),
			"get_folder expected one of [200] but the server returned 404."
		);
	}
}
