//! Cursor-following iteration over paginated list responses.
//!
//! A [`Pager`] is seeded from the envelope of the first page and follows the server's
//! `pagination.urls.next` cursor one request at a time. Every follow-up request goes through the
//! owning client's rate limiter like any other call. The chain ends when the cursor is empty,
//! which [`Pager::next`] reports as [`Error::PageDone`].

// std
use std::marker::PhantomData;
// crates.io
use http::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::{Client, NO_BODY},
	http::HttpTransport,
	response::{PageInfo, ResponseEnvelope},
};

const NEXT_PAGE_OPERATION: &str = "next_page";
const NEXT_PAGE_STATUS: &[u16] = &[200];

/// Sequential iterator over the pages of one list response.
///
/// Pages are yielded strictly in server order; `next` borrows the pager mutably, so one chain is
/// never advanced concurrently.
pub struct Pager<'c, C, T>
where
	C: ?Sized + HttpTransport,
{
	client: &'c Client<C>,
	page: PageInfo,
	_page: PhantomData<fn() -> T>,
}
impl<'c, C, T> Pager<'c, C, T>
where
	C: ?Sized + HttpTransport,
	T: DeserializeOwned,
{
	/// Decodes the first page from `envelope` and captures its pagination state.
	pub fn new(envelope: &ResponseEnvelope, client: &'c Client<C>) -> Result<(T, Self)> {
		let first = envelope.json::<T>()?;
		let pager = Self { client, page: envelope.page_info().clone(), _page: PhantomData };

		Ok((first, pager))
	}

	/// Pagination state of the most recently fetched page.
	pub fn page_info(&self) -> &PageInfo {
		&self.page
	}

	/// Whether the chain is exhausted.
	pub fn is_done(&self) -> bool {
		self.page.next_url().is_none()
	}

	/// Fetches and decodes the next page.
	///
	/// Fails with [`Error::PageDone`] once the server stops publishing a `next` cursor, and with
	/// [`Error::UnexpectedStatus`] when a follow-up page is not served with 200. The pager state
	/// only advances when the page was fetched and decoded successfully.
	pub async fn next(&mut self, cancel: &CancellationToken) -> Result<T> {
		let Some(next) = self.page.next_url() else {
			return Err(Error::PageDone);
		};
		let target = cursor_target(&self.client.config().base_url, next)?;
		let request = self.client.new_request(Method::GET, &target, NO_BODY, &[])?;
		let envelope = self.client.dispatch(NEXT_PAGE_OPERATION, request, cancel).await?;

		envelope.ensure_status(NEXT_PAGE_OPERATION, NEXT_PAGE_STATUS)?;

		let page = envelope.json::<T>()?;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			page = envelope.page_info().page,
			pages = envelope.page_info().pages,
			"Fetched next page."
		);

		self.page = envelope.page_info().clone();

		Ok(page)
	}

	/// Drains the remaining pages, appending the items `extract` pulls from each one after the
	/// items of `first`.
	///
	/// Any failure mid-chain discards the items gathered so far and returns the error.
	pub async fn collect_all<I, F>(
		mut self,
		first: T,
		cancel: &CancellationToken,
		mut extract: F,
	) -> Result<Vec<I>>
	where
		F: FnMut(T) -> Vec<I>,
	{
		let mut items = extract(first);

		loop {
			match self.next(cancel).await {
				Ok(page) => items.extend(extract(page)),
				Err(e) if e.is_page_done() => break,
				Err(e) => return Err(e),
			}
		}

		Ok(items)
	}
}
impl<C, T> Debug for Pager<'_, C, T>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Pager").field("page", &self.page).finish()
	}
}

/// Reduces a cursor to the path and query that are replayed against the client's base URL.
fn cursor_target(base_url: &Url, next: &str) -> Result<String> {
	let url = base_url
		.join(next)
		.map_err(|source| Error::MalformedTarget { target: next.to_owned(), source })?;

	Ok(match url.query() {
		Some(query) => format!("{}?{query}", url.path()),
		None => url.path().to_owned(),
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::StatusCode;
	// self
	use super::*;
	use crate::{
		client::{ClientConfig, DEFAULT_USER_AGENT},
		ext::RatePolicy,
		http::{HttpRequest, HttpResponse, TransportFuture},
	};

	#[derive(Debug, Deserialize)]
	struct Items {
		items: Vec<u32>,
	}

	#[derive(Default)]
	struct Scripted {
		pages: HashMap<String, String>,
		seen: Mutex<Vec<String>>,
	}
	impl Scripted {
		fn page(mut self, path_and_query: &str, body: &str) -> Self {
			self.pages.insert(path_and_query.into(), body.into());

			self
		}
	}
	impl HttpTransport for Scripted {
		type TransportError = std::io::Error;

		fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
			let key = request
				.uri()
				.path_and_query()
				.map(|path_and_query| path_and_query.to_string())
				.unwrap_or_default();
			let body = self.pages.get(&key).cloned();

			self.seen.lock().push(key);

			Box::pin(async move {
				let mut response = HttpResponse::new(body.clone().unwrap_or_default().into_bytes());

				*response.status_mut() =
					if body.is_some() { StatusCode::OK } else { StatusCode::NOT_FOUND };

				Ok::<_, std::io::Error>(response)
			})
		}
	}

	fn client(transport: Scripted) -> Client<Scripted> {
		let config = ClientConfig {
			base_url: Url::parse("https://api.discogs.com/").expect("Base URL should parse."),
			user_agent: DEFAULT_USER_AGENT.into(),
			credential: None,
			rate_policy: RatePolicy::unauthenticated(),
		};

		Client::from_parts(config, Arc::new(transport))
	}

	fn first_page(body: &str) -> ResponseEnvelope {
		ResponseEnvelope::new(HttpResponse::new(body.as_bytes().to_vec()))
	}

	const P1: &str = r#"{"pagination":{"page":1,"pages":3,"urls":{"next":"https://api.discogs.com/list?page=2"}},"items":[1,2]}"#;
	const P2: &str = r#"{"pagination":{"page":2,"pages":3,"urls":{"next":"/list?page=3"}},"items":[3,4]}"#;
	const P3: &str = r#"{"pagination":{"page":3,"pages":3,"urls":{}},"items":[5]}"#;

	#[tokio::test]
	async fn next_follows_the_cursor_until_page_done() {
		let client = client(Scripted::default().page("/list?page=2", P2).page("/list?page=3", P3));
		let cancel = CancellationToken::new();
		let (first, mut pager) =
			Pager::<_, Items>::new(&first_page(P1), &client).expect("First page should decode.");

		assert_eq!(first.items, [1, 2]);
		assert!(!pager.is_done());

		let second = pager.next(&cancel).await.expect("Second page should load.");

		assert_eq!(second.items, [3, 4]);
		assert_eq!(pager.page_info().page, 2);

		let third = pager.next(&cancel).await.expect("Third page should load.");

		assert_eq!(third.items, [5]);
		assert!(pager.is_done());

		let err = pager.next(&cancel).await.expect_err("Chain should be exhausted.");

		assert!(err.is_page_done());
		assert_eq!(*client.http_client().seen.lock(), ["/list?page=2", "/list?page=3"]);
	}

	#[tokio::test]
	async fn single_page_responses_are_done_immediately() {
		let client = client(Scripted::default());
		let (first, mut pager) =
			Pager::<_, Items>::new(&first_page(P3), &client).expect("Page should decode.");

		assert_eq!(first.items, [5]);
		assert!(pager.is_done());
		assert!(
			pager.next(&CancellationToken::new()).await.expect_err("No cursor.").is_page_done()
		);
		assert!(client.http_client().seen.lock().is_empty());
	}

	#[tokio::test]
	async fn collect_all_appends_pages_in_order() {
		let client = client(Scripted::default().page("/list?page=2", P2).page("/list?page=3", P3));
		let cancel = CancellationToken::new();
		let (first, pager) =
			Pager::<_, Items>::new(&first_page(P1), &client).expect("First page should decode.");
		let items = pager
			.collect_all(first, &cancel, |page| page.items)
			.await
			.expect("Chain should drain.");

		assert_eq!(items, [1, 2, 3, 4, 5]);
	}

	#[tokio::test]
	async fn decode_failures_keep_the_previous_state() {
		let client = client(Scripted::default().page("/list?page=2", r#"{"items":"nope"}"#));
		let (_, mut pager) =
			Pager::<_, Items>::new(&first_page(P1), &client).expect("First page should decode.");
		let err = pager
			.next(&CancellationToken::new())
			.await
			.expect_err("A string is not a list of items.");

		assert!(matches!(err, Error::Decode(_)));
		assert_eq!(pager.page_info().page, 1);
	}

	#[tokio::test]
	async fn missing_pages_report_their_status() {
		let client = client(Scripted::default());
		let (_, mut pager) =
			Pager::<_, Items>::new(&first_page(P1), &client).expect("First page should decode.");
		let err = pager.next(&CancellationToken::new()).await.expect_err("Page two is missing.");

		assert!(matches!(err, Error::UnexpectedStatus { status: 404, .. }));
		assert_eq!(pager.page_info().page, 1);
	}

	#[test]
	fn first_page_shape_mismatch_is_a_decode_error() {
		let client = client(Scripted::default());
		let err = Pager::<_, Items>::new(&first_page(r#"{"items":{}}"#), &client)
			.expect_err("An object is not a list.");

		assert!(matches!(err, Error::Decode(_)));
	}

	#[test]
	fn cursor_targets_keep_the_query_verbatim() {
		let base = Url::parse("https://api.discogs.com/").expect("Base URL should parse.");

		assert_eq!(
			cursor_target(&base, "https://svc/x?page=2").expect("Absolute cursor."),
			"/x?page=2"
		);
		assert_eq!(
			cursor_target(&base, "users/a/collection/folders/0/releases?page=3&per_page=50")
				.expect("Relative cursor."),
			"/users/a/collection/folders/0/releases?page=3&per_page=50"
		);
		assert_eq!(cursor_target(&base, "/x").expect("Query-less cursor."), "/x");
	}
}
