//! Typed Discogs endpoints layered on the request pipeline.
//!
//! Every endpoint builds a path, dispatches through the client's rate gate, checks the status
//! against the single set it accepts, and decodes the body. List endpoints drain the server's
//! pagination chain through a [`Pager`](crate::pager::Pager) and return the concatenated items.

pub mod collection;
pub mod database;
pub mod identity;

pub use collection::*;
pub use database::*;
pub use identity::*;

// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	client::Client,
	ext::RequestOption,
	http::HttpTransport,
	response::ResponseEnvelope,
};

/// Static description of one endpoint: its label, verb, and accepted statuses.
#[derive(Clone, Debug)]
pub(crate) struct Endpoint {
	pub(crate) operation: &'static str,
	pub(crate) method: Method,
	pub(crate) expected: &'static [u16],
}
impl Endpoint {
	pub(crate) const fn get(operation: &'static str) -> Self {
		Self { operation, method: Method::GET, expected: &[200] }
	}

	pub(crate) const fn new(
		operation: &'static str,
		method: Method,
		expected: &'static [u16],
	) -> Self {
		Self { operation, method, expected }
	}
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Builds and dispatches an endpoint request without interpreting the status.
	pub(crate) async fn exchange<B>(
		&self,
		endpoint: &Endpoint,
		target: &str,
		body: Option<&B>,
		options: &[&dyn RequestOption],
		cancel: &CancellationToken,
	) -> Result<ResponseEnvelope>
	where
		B: ?Sized + Serialize,
	{
		let request = self.new_request(endpoint.method.clone(), target, body, options)?;

		self.dispatch(endpoint.operation, request, cancel).await
	}

	/// Like [`exchange`](Self::exchange), but fails unless the status is one the endpoint accepts.
	pub(crate) async fn call<B>(
		&self,
		endpoint: &Endpoint,
		target: &str,
		body: Option<&B>,
		options: &[&dyn RequestOption],
		cancel: &CancellationToken,
	) -> Result<ResponseEnvelope>
	where
		B: ?Sized + Serialize,
	{
		let envelope = self.exchange(endpoint, target, body, options, cancel).await?;

		envelope.ensure_status(endpoint.operation, endpoint.expected)?;

		Ok(envelope)
	}
}

/// Builds `users/{username}/{rest}` with the username encoded as one path segment.
pub(crate) fn user_path(username: &str, rest: &str) -> String {
	format!("users/{}/{rest}", urlencoding::encode(username))
}
