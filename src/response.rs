//! Response envelopes carrying rate-limit counters and pagination cursors.
//!
//! Metadata and payload share one body, so construction buffers the body once, peeks the
//! `pagination` object out of it, and keeps the original bytes untouched. Every later reader
//! ([`ResponseEnvelope::body`], [`ResponseEnvelope::reader`], [`ResponseEnvelope::json`]) sees
//! exactly what the server sent. Metadata is observational: missing or malformed headers and
//! pagination objects degrade to zero values and never fail construction.

// std
use std::{borrow::Cow, io::Cursor};
// crates.io
use http::{HeaderMap, StatusCode};
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::{_prelude::*, error::DecodeError, http::HttpResponse};

/// Header carrying the request ceiling for the current window.
pub const RATE_LIMIT_HEADER: &str = "x-discogs-ratelimit";
/// Header carrying the number of requests used in the current window.
pub const RATE_LIMIT_USED_HEADER: &str = "x-discogs-ratelimit-used";
/// Header carrying the number of requests left in the current window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-discogs-ratelimit-remaining";

/// Server-reported rate-limit counters; zero when absent or malformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateInfo {
	/// Requests allowed in the window.
	pub limit: u32,
	/// Requests already used in the window.
	pub used: u32,
	/// Requests remaining in the window.
	pub remaining: u32,
}
impl RateInfo {
	/// Reads the three `x-discogs-ratelimit*` headers.
	pub fn from_headers(headers: &HeaderMap) -> Self {
		Self {
			limit: header_count(headers, RATE_LIMIT_HEADER),
			used: header_count(headers, RATE_LIMIT_USED_HEADER),
			remaining: header_count(headers, RATE_LIMIT_REMAINING_HEADER),
		}
	}
}

fn header_count(headers: &HeaderMap, name: &str) -> u32 {
	headers
		.get(name)
		.and_then(|value| value.to_str().ok())
		.and_then(|raw| raw.trim().parse().ok())
		.unwrap_or_default()
}

/// Pagination descriptor embedded in list responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
	/// One-based index of the current page.
	#[serde(deserialize_with = "null_as_default")]
	pub page: u32,
	/// Total number of pages.
	#[serde(deserialize_with = "null_as_default")]
	pub pages: u32,
	/// Total number of items across all pages.
	#[serde(deserialize_with = "null_as_default")]
	pub items: u64,
	/// Page size.
	#[serde(deserialize_with = "null_as_default")]
	pub per_page: u32,
	/// Cursor URLs for neighbouring pages.
	#[serde(deserialize_with = "null_as_default")]
	pub urls: PageUrls,
}
impl PageInfo {
	/// Extracts the `pagination` object from a JSON body, defaulting on any mismatch.
	pub fn from_body(body: &[u8]) -> Self {
		#[derive(Deserialize)]
		struct Peek {
			#[serde(default)]
			pagination: Option<PageInfo>,
		}

		match serde_json::from_slice::<Peek>(body) {
			Ok(peek) => peek.pagination.unwrap_or_default(),
			Err(_e) => {
				#[cfg(feature = "tracing")]
				if !body.is_empty() {
					tracing::trace!(error = %_e, "Response body carries no pagination object.");
				}

				Self::default()
			},
		}
	}

	/// Returns the next-page cursor, treating an empty string as absent.
	pub fn next_url(&self) -> Option<&str> {
		self.urls.next.as_deref().filter(|next| !next.is_empty())
	}
}

/// Reads `null` as the field's zero value so one null sibling keeps the others intact.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Cursor URLs published by the server; each may be absolute or relative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageUrls {
	/// First page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first: Option<String>,
	/// Previous page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prev: Option<String>,
	/// Next page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub next: Option<String>,
	/// Last page.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last: Option<String>,
}

/// One HTTP response decorated with rate and pagination metadata.
#[derive(Clone, Debug)]
pub struct ResponseEnvelope {
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
	rate: RateInfo,
	page: PageInfo,
}
impl ResponseEnvelope {
	/// Wraps a buffered transport response, whatever its status.
	pub fn new(response: HttpResponse) -> Self {
		let (parts, body) = response.into_parts();
		let rate = RateInfo::from_headers(&parts.headers);
		let page = PageInfo::from_body(&body);

		Self { status: parts.status, headers: parts.headers, body, rate, page }
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Rate-limit counters reported with this response.
	pub fn rate(&self) -> RateInfo {
		self.rate
	}

	/// Pagination descriptor; zero-valued for non-list responses.
	pub fn page_info(&self) -> &PageInfo {
		&self.page
	}

	/// Raw body bytes exactly as received.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Fresh reader positioned at the start of the body; each call starts over.
	pub fn reader(&self) -> Cursor<&[u8]> {
		Cursor::new(self.body.as_slice())
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}

	/// Consumes the envelope and returns the body bytes.
	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Decodes the body as `T`, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| DecodeError::new(self.status.as_u16(), source).into())
	}

	/// Fails with [`Error::UnexpectedStatus`] unless the status is one of `expected`.
	pub fn ensure_status(&self, operation: &'static str, expected: &'static [u16]) -> Result<()> {
		if expected.contains(&self.status.as_u16()) {
			Ok(())
		} else {
			Err(Error::UnexpectedStatus {
				operation,
				expected,
				status: self.status.as_u16(),
				body: self.text().into_owned(),
			})
		}
	}
}
