#![cfg(feature = "reqwest")]

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
use serde_json::json;
// self
use discogs_client::{
	CancellationToken,
	client::{ClientBuilder, NO_BODY, ReqwestDiscogsClient},
	error::Error,
	ext::QueryParams,
	http_types::Method,
	pager::Pager,
	url::Url,
};

#[derive(Debug, Deserialize)]
struct Page {
	items: Vec<String>,
}

async fn client(server: &MockServer) -> ReqwestDiscogsClient {
	ClientBuilder::new()
		.base_url(Url::parse(&server.base_url()).expect("Mock server base URL should parse."))
		.timeout(Duration::from_secs(5))
		.build()
		.await
		.expect("Anonymous client should build.")
}

fn page(number: u32, next: Option<String>, items: &[&str]) -> serde_json::Value {
	json!({
		"pagination": {
			"page": number,
			"pages": 3,
			"items": 5,
			"per_page": 2,
			"urls": next.map(|next| json!({ "next": next })).unwrap_or_else(|| json!({})),
		},
		"items": items,
	})
}

#[tokio::test]
async fn pager_walks_the_chain_and_reports_page_done() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/list").query_param("page", "1");
			then.status(200).json_body(page(1, Some(server.url("/list?page=2")), &["a", "b"]));
		})
		.await;

	let second = server
		.mock_async(|when, then| {
			when.method(GET).path("/list").query_param("page", "2");
			then.status(200).json_body(page(2, Some("/list?page=3".into()), &["c", "d"]));
		})
		.await;
	let third = server
		.mock_async(|when, then| {
			when.method(GET).path("/list").query_param("page", "3");
			then.status(200).json_body(page(3, None, &["e"]));
		})
		.await;
	let client = client(&server).await;
	let cancel = CancellationToken::new();
	let request = client
		.new_request(Method::GET, "list?page=1", NO_BODY, &[])
		.expect("Request should build.");
	let envelope = client.send(request, &cancel).await.expect("First page should load.");
	let (first, mut pager) =
		Pager::<_, Page>::new(&envelope, &client).expect("First page should decode.");

	assert_eq!(first.items, ["a", "b"]);

	let p2 = pager.next(&cancel).await.expect("Second page should load.");

	assert_eq!(p2.items, ["c", "d"]);

	let p3 = pager.next(&cancel).await.expect("Third page should load.");

	assert_eq!(p3.items, ["e"]);
	assert!(pager.is_done());

	let err = pager.next(&cancel).await.expect_err("Chain should be exhausted.");

	assert!(matches!(err, Error::PageDone));

	second.assert_calls_async(1).await;
	third.assert_calls_async(1).await;
}

#[tokio::test]
async fn next_cursor_query_is_preserved_against_the_configured_host() {
	let server = MockServer::start_async().await;
	let followed = server
		.mock_async(|when, then| {
			when.method(GET).path("/x").query_param("page", "2");
			then.status(200).json_body(page(2, None, &["z"]));
		})
		.await;
	let client = client(&server).await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/start");
			then.status(200).json_body(page(1, Some("https://svc/x?page=2".into()), &["y"]));
		})
		.await;
	let cancel = CancellationToken::new();
	let request =
		client.new_request(Method::GET, "start", NO_BODY, &[]).expect("Request should build.");
	let envelope = client.send(request, &cancel).await.expect("First page should load.");
	let (_, mut pager) = Pager::<_, Page>::new(&envelope, &client).expect("Page should decode.");
	let next = pager.next(&cancel).await.expect("Cursor should be followed.");

	assert_eq!(next.items, ["z"]);

	first.assert_async().await;
	followed.assert_async().await;
}

#[tokio::test]
async fn folder_listing_drains_every_page() {
	let server = MockServer::start_async().await;
	let instance = |id: u64| {
		json!({
			"id": id,
			"instance_id": id * 10,
			"folder_id": 0,
			"rating": 0,
			"date_added": "2020-01-02T03:04:05-08:00",
			"basic_information": { "id": id, "title": format!("Release {id}") },
		})
	};
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/alice/collection/folders/0/releases")
				.query_param("sort", "added")
				.query_param_missing("page");
			then.status(200).json_body(json!({
				"pagination": {
					"page": 1,
					"pages": 2,
					"urls": {
						"next": server.url("/users/alice/collection/folders/0/releases?sort=added&page=2"),
					},
				},
				"releases": [instance(1), instance(2)],
			}));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/alice/collection/folders/0/releases")
				.query_param("sort", "added")
				.query_param("page", "2");
			then.status(200).json_body(json!({
				"pagination": { "page": 2, "pages": 2, "urls": {} },
				"releases": [instance(3)],
			}));
		})
		.await;
	let client = client(&server).await;
	let releases = client
		.releases_in_folder(
			"alice",
			0,
			&QueryParams::new().with("sort", "added"),
			&CancellationToken::new(),
		)
		.await
		.expect("Folder listing should drain.");

	assert_eq!(releases.iter().map(|release| release.id).collect::<Vec<_>>(), [1, 2, 3]);
	assert_eq!(releases[2].basic_info.title, "Release 3");

	first.assert_async().await;
	second.assert_async().await;
}

#[tokio::test]
async fn mid_chain_failures_discard_partial_results() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/alice/collection/releases/7")
				.query_param_missing("page");
			then.status(200).json_body(json!({
				"pagination": {
					"page": 1,
					"pages": 2,
					"urls": { "next": "/users/alice/collection/releases/7?page=2" },
				},
				"releases": [],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/alice/collection/releases/7")
				.query_param("page", "2");
			then.status(500).body("upstream exploded");
		})
		.await;

	let client = client(&server).await;
	let err = client
		.folders_by_release("alice", 7, &CancellationToken::new())
		.await
		.expect_err("A failing page must fail the whole listing.");

	assert!(
		matches!(err, Error::UnexpectedStatus { operation: "next_page", status: 500, .. }),
		"Unexpected error: {err:?}."
	);
}
