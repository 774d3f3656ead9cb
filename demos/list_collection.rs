//! Lists a user's collection folder against a local mock of the Discogs API, following the
//! server's pagination cursors and printing the rate-limit counters it reports.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use discogs_client::{
	CancellationToken,
	client::{ClientBuilder, NO_BODY},
	ext::QueryParams,
	http_types::Method,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let release = |id: u64, title: &str| {
		json!({
			"id": id,
			"instance_id": id * 100,
			"folder_id": 1,
			"rating": 0,
			"date_added": "2024-03-09T18:22:41-08:00",
			"basic_information": { "id": id, "title": title },
		})
	};

	server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth/identity");
			then.status(200).json_body(json!({ "id": 1, "username": "demo" }));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/users/demo/collection/folders");
			then.status(200)
				.header("x-discogs-ratelimit", "60")
				.header("x-discogs-ratelimit-used", "2")
				.header("x-discogs-ratelimit-remaining", "58")
				.json_body(json!({
					"folders": [{ "id": 1, "name": "Uncategorized", "count": 3 }],
				}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/demo/collection/folders/1/releases")
				.query_param_missing("page");
			then.status(200).json_body(json!({
				"pagination": {
					"page": 1,
					"pages": 2,
					"urls": {
						"next": server.url("/users/demo/collection/folders/1/releases?page=2"),
					},
				},
				"releases": [release(1, "Blue Train"), release(2, "Kind of Blue")],
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/users/demo/collection/folders/1/releases")
				.query_param("page", "2");
			then.status(200).json_body(json!({
				"pagination": { "page": 2, "pages": 2, "urls": {} },
				"releases": [release(3, "A Love Supreme")],
			}));
		})
		.await;

	let client = ClientBuilder::new()
		.base_url(Url::parse(&server.base_url())?)
		.token("demo-token")
		.build()
		.await?;
	let cancel = CancellationToken::new();
	let request = client.new_request(Method::GET, "users/demo/collection/folders", NO_BODY, &[])?;
	let envelope = client.send(request, &cancel).await?;
	let rate = envelope.rate();

	println!("Rate limit: {} used, {} of {} remaining.", rate.used, rate.remaining, rate.limit);

	for folder in client.list_folders("demo", &cancel).await? {
		println!("Folder {} `{}` holds {} releases.", folder.id, folder.name, folder.count);

		let releases =
			client.releases_in_folder("demo", folder.id, &QueryParams::new(), &cancel).await?;

		for instance in releases {
			println!(
				"  #{} {} (added {}).",
				instance.instance_id,
				instance.basic_info.title,
				instance.date_added.date()
			);
		}
	}

	Ok(())
}
