//! Catalog lookups.

// self
use crate::{
	_prelude::*,
	client::{Client, NO_BODY},
	http::HttpTransport,
	resources::Endpoint,
};

const RELEASE: Endpoint = Endpoint::get("release");

/// Artist credit on a release or track.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artist {
	/// Artist id.
	pub id: u64,
	/// API URL of the artist.
	pub resource_url: String,
	/// Canonical artist name.
	pub name: String,
	/// Artist name variation used on this release.
	pub anv: String,
	/// Join phrase to the next credit (`&`, `feat.`).
	pub join: String,
	/// Credited role for extra artists.
	pub role: String,
	/// Tracks the credit applies to.
	pub tracks: String,
}

/// Label or company credit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
	/// Label id.
	pub id: u64,
	/// API URL of the label.
	pub resource_url: String,
	/// Label name.
	pub name: String,
	/// Catalog number.
	pub catno: String,
	/// Entity type code; the API sends it as a string.
	pub entity_type: String,
	/// Human-readable entity type.
	pub entity_type_name: String,
}

/// User reference inside community data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRef {
	/// API URL of the user.
	pub resource_url: String,
	/// Login name.
	pub username: String,
}

/// Community metadata of a release.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Community {
	/// Users who contributed to the release entry.
	pub contributors: Vec<UserRef>,
}

/// One tracklist entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
	/// Track length as printed (`4:21`).
	pub duration: String,
	/// Side or track position (`A1`).
	pub position: String,
	/// Track title.
	pub title: String,
	/// Entry kind (`track`, `heading`, `index`).
	#[serde(rename = "type_")]
	pub kind: String,
}

/// Physical or digital format of a release.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
	/// Format descriptors (`LP`, `Album`).
	pub descriptions: Vec<String>,
	/// Format name (`Vinyl`, `CD`).
	pub name: String,
	/// Quantity as sent by the API.
	pub qty: String,
}

/// Barcode, matrix, or other identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifier {
	/// Identifier kind.
	#[serde(rename = "type")]
	pub kind: String,
	/// Identifier value.
	pub value: String,
}

/// Image attached to a release.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
	/// Pixel height.
	pub height: u32,
	/// Pixel width.
	pub width: u32,
	/// API URL of the image.
	pub resource_url: String,
	/// `primary` or `secondary`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Full-size image URL.
	pub uri: String,
	/// 150px thumbnail URL.
	pub uri150: String,
}

/// Video linked from a release.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
	/// Video description.
	pub description: String,
	/// Length in seconds.
	pub duration: u32,
	/// Whether the video may be embedded.
	pub embed: bool,
	/// Video title.
	pub title: String,
	/// Video URL.
	pub uri: String,
}

/// Full release record from the catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
	/// Release id.
	pub id: u64,
	/// Release title.
	pub title: String,
	/// Main artist credits.
	pub artists: Vec<Artist>,
	/// Data quality grade (`Correct`, `Needs Vote`).
	pub data_quality: String,
	/// Thumbnail URL.
	pub thumb: String,
	/// Community metadata.
	pub community: Community,
	/// Companies involved in the release.
	pub companies: Vec<Label>,
	/// Release country.
	pub country: String,
	/// When the release was added to the catalog.
	#[serde(with = "time::serde::rfc3339::option")]
	pub date_added: Option<OffsetDateTime>,
	/// When the release entry last changed.
	#[serde(with = "time::serde::rfc3339::option")]
	pub date_changed: Option<OffsetDateTime>,
	/// Estimated shipping weight in grams.
	pub estimated_weight: u32,
	/// Credits beyond the main artists.
	#[serde(rename = "extraartists")]
	pub extra_artists: Vec<Artist>,
	/// Number of physical items.
	pub format_quantity: u32,
	/// Formats.
	pub formats: Vec<Format>,
	/// Genres.
	pub genres: Vec<String>,
	/// Barcodes and other identifiers.
	pub identifiers: Vec<Identifier>,
	/// Images.
	pub images: Vec<Image>,
	/// Label credits.
	pub labels: Vec<Label>,
	/// Lowest marketplace price, if listed.
	pub lowest_price: Option<f64>,
	/// Master release id; zero when the release has no master.
	pub master_id: u64,
	/// API URL of the master release.
	pub master_url: Option<String>,
	/// Free-form notes.
	pub notes: String,
	/// Number of marketplace listings.
	pub num_for_sale: u32,
	/// Release date as entered (`1997`, `1997-05-21`).
	pub released: String,
	/// Release date formatted for display.
	pub released_formatted: String,
	/// API URL of the release.
	pub resource_url: String,
	/// Catalog status (`Accepted`).
	pub status: String,
	/// Styles.
	pub styles: Vec<String>,
	/// Tracklist in release order.
	pub tracklist: Vec<Track>,
	/// Website URL of the release.
	pub uri: String,
	/// Linked videos.
	pub videos: Vec<Video>,
	/// Release year; zero when unknown.
	pub year: u32,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches one catalog release (`GET /releases/{id}`).
	pub async fn release(&self, release_id: u64, cancel: &CancellationToken) -> Result<Release> {
		self.call(&RELEASE, &format!("/releases/{release_id}"), NO_BODY, &[], cancel).await?.json()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn release_decodes_sparse_payloads() {
		let release = serde_json::from_str::<Release>(
			r#"{
				"id": 249504,
				"title": "Never Gonna Give You Up",
				"date_added": "2004-04-30T08:10:05-07:00",
				"extraartists": [{"id": 1, "name": "Stock, Aitken & Waterman", "role": "Producer"}],
				"labels": [{"id": 895, "name": "RCA", "catno": "PB 41447", "entity_type": "1"}],
				"tracklist": [{"position": "A", "title": "Never Gonna Give You Up", "type_": "track"}],
				"unknown_field": true
			}"#,
		)
		.expect("Sparse release should decode.");

		assert_eq!(release.id, 249504);
		assert_eq!(release.extra_artists[0].role, "Producer");
		assert_eq!(release.labels[0].entity_type, "1");
		assert_eq!(release.tracklist[0].kind, "track");
		assert_eq!(release.date_added.map(|date| date.year()), Some(2004));
		assert!(release.date_changed.is_none());
		assert_eq!(release.year, 0);
	}
}
