//! Async Discogs API client with rate-limited dispatch, re-readable response envelopes, and generic
//! cursor pagination in one crate.
//!
//! The pipeline reads left to right: [`Client::new_request`](client::Client::new_request) builds
//! an authenticated request, [`Client::send`](client::Client::send) waits on the client's
//! [`RateLimiter`](ext::RateLimiter) before handing it to the transport, the transport response
//! becomes a [`ResponseEnvelope`](response::ResponseEnvelope) carrying rate and pagination
//! metadata, and list calls hand that envelope to a [`Pager`](pager::Pager) that follows the
//! server's `next` cursor until the chain ends.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod error;
pub mod ext;
pub mod http;
pub mod obs;
pub mod pager;
pub mod resources;
pub mod response;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{Client, ClientBuilder},
		ext::RatePolicy,
		http::ReqwestHttpClient,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = Client<ReqwestHttpClient>;

	/// Returns a builder pointed at a mock server base URL with a short transport timeout.
	pub fn test_client_builder(base_url: &str) -> ClientBuilder {
		let base_url = Url::parse(base_url).expect("Mock server base URL should parse.");

		ClientBuilder::new()
			.base_url(base_url)
			.user_agent("discogs-client-tests/0.0.0")
			.timeout(StdDuration::from_secs(5))
	}

	/// Builds an unauthenticated reqwest-backed client with the default 25 per minute policy.
	pub async fn build_reqwest_test_client(base_url: &str) -> ReqwestTestClient {
		test_client_builder(base_url)
			.build()
			.await
			.expect("Unauthenticated test client should build without network access.")
	}

	/// Builds an unauthenticated reqwest-backed client with a caller-chosen policy.
	pub async fn build_reqwest_test_client_with_policy(
		base_url: &str,
		policy: RatePolicy,
	) -> ReqwestTestClient {
		test_client_builder(base_url)
			.rate_policy(policy)
			.build()
			.await
			.expect("Test client with explicit policy should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use ::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
