//! Request mutation hooks applied after the client has set its standard headers.

// crates.io
use http::{HeaderName, HeaderValue};
// self
use crate::{_prelude::*, error::BoxError, http::HttpRequest};

/// Mutates an outbound request before it is dispatched.
///
/// Hooks run in the order they were supplied, after `Authorization`, `Content-Type`, and
/// `User-Agent` are set, so a hook may override any of them. The first hook that fails aborts
/// request construction with [`Error::RequestOptionFailed`] carrying its position.
///
/// Closures of shape `Fn(&mut HttpRequest) -> Result<(), BoxError>` implement the trait directly.
pub trait RequestOption
where
	Self: Send + Sync,
{
	/// Applies the hook to `request`.
	fn apply(&self, request: &mut HttpRequest) -> Result<(), BoxError>;
}
impl<F> RequestOption for F
where
	F: Send + Sync + Fn(&mut HttpRequest) -> Result<(), BoxError>,
{
	fn apply(&self, request: &mut HttpRequest) -> Result<(), BoxError> {
		self(request)
	}
}

/// Sets (or replaces) one header on the outbound request.
#[derive(Clone, Debug)]
pub struct SetHeader {
	name: HeaderName,
	value: HeaderValue,
}
impl SetHeader {
	/// Validates the header pair eagerly so failures surface at the call site.
	pub fn new(name: &str, value: &str) -> Result<Self, BoxError> {
		let name = HeaderName::from_bytes(name.as_bytes())?;
		let value = HeaderValue::from_str(value)?;

		Ok(Self { name, value })
	}
}
impl RequestOption for SetHeader {
	fn apply(&self, request: &mut HttpRequest) -> Result<(), BoxError> {
		request.headers_mut().insert(self.name.clone(), self.value.clone());

		Ok(())
	}
}

/// Appends query parameters (sorting, page size) to the outbound request URL.
#[derive(Clone, Debug, Default)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds one `key=value` pair.
	pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.0.push((key.into(), value.to_string()));

		self
	}

	/// Returns `true` when no parameters were added.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl RequestOption for QueryParams {
	fn apply(&self, request: &mut HttpRequest) -> Result<(), BoxError> {
		if self.0.is_empty() {
			return Ok(());
		}

		let mut url = Url::parse(&request.uri().to_string())?;

		url.query_pairs_mut().extend_pairs(self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())));

		*request.uri_mut() = url.as_str().parse()?;

		Ok(())
	}
}
