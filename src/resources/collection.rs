//! Collection folders, release instances, custom fields, and collection value.
//!
//! Instance ids identify one copy of a release inside a collection; the same release may be
//! held several times, in different folders.

// crates.io
use http::{Method, StatusCode};
// self
use crate::{
	_prelude::*,
	client::{Client, NO_BODY},
	ext::QueryParams,
	http::HttpTransport,
	pager::Pager,
	resources::{Artist, Endpoint, Format, Label, user_path},
};

const LIST_FOLDERS: Endpoint = Endpoint::get("list_folders");
const CREATE_FOLDER: Endpoint = Endpoint::new("create_folder", Method::POST, &[201]);
const FOLDER: Endpoint = Endpoint::get("folder");
const EDIT_FOLDER: Endpoint = Endpoint::new("edit_folder", Method::POST, &[200]);
const DELETE_FOLDER: Endpoint = Endpoint::new("delete_folder", Method::DELETE, &[204]);
const RELEASES_IN_FOLDER: Endpoint = Endpoint::get("releases_in_folder");
const FOLDERS_BY_RELEASE: Endpoint = Endpoint::get("folders_by_release");
const ADD_RELEASE_TO_FOLDER: Endpoint =
	Endpoint::new("add_release_to_folder", Method::POST, &[201]);
const RATE_RELEASE_INSTANCE: Endpoint =
	Endpoint::new("rate_release_instance", Method::POST, &[204]);
const REMOVE_RELEASE_INSTANCE: Endpoint =
	Endpoint::new("remove_release_instance", Method::DELETE, &[204]);
const CUSTOM_FIELDS: Endpoint = Endpoint::get("custom_fields");
const EDIT_INSTANCE_FIELD: Endpoint = Endpoint::new("edit_instance_field", Method::POST, &[204]);
const COLLECTION_VALUE: Endpoint = Endpoint::get("collection_value");

/// Collection folder. Folder `0` holds everything, folder `1` is "Uncategorized".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Folder {
	/// Folder id.
	pub id: u64,
	/// Number of release instances in the folder.
	pub count: u64,
	/// Folder name.
	pub name: String,
	/// API URL of the folder.
	pub resource_url: String,
}

/// Release summary embedded in collection listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInformation {
	/// Release id.
	pub id: u64,
	/// API URL of the release.
	pub resource_url: String,
	/// Master release id; zero when absent.
	pub master_id: u64,
	/// API URL of the master release.
	pub master_url: Option<String>,
	/// Thumbnail URL.
	pub thumb: String,
	/// Cover image URL.
	pub cover_image: String,
	/// Release title.
	pub title: String,
	/// Release year; zero when unknown.
	pub year: u32,
	/// Genres.
	pub genres: Vec<String>,
	/// Styles.
	pub styles: Vec<String>,
	/// Artist credits.
	pub artists: Vec<Artist>,
	/// Label credits.
	pub labels: Vec<Label>,
	/// Formats.
	pub formats: Vec<Format>,
}

/// One copy of a release held in a collection folder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInstance {
	/// Release id.
	pub id: u64,
	/// Id of this copy.
	pub instance_id: u64,
	/// Folder the copy lives in.
	pub folder_id: u64,
	/// When the copy was added to the collection.
	#[serde(with = "time::serde::rfc3339")]
	pub date_added: OffsetDateTime,
	/// Owner's rating from 0 (unrated) to 5.
	#[serde(default)]
	pub rating: u8,
	/// Release summary.
	#[serde(default, rename = "basic_information")]
	pub basic_info: BasicInformation,
}

/// One page of release instances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasesPage {
	/// Release instances on this page.
	pub releases: Vec<ReleaseInstance>,
}

/// User-defined collection field (dropdown or free text).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
	/// Field id.
	pub id: u64,
	/// Field name.
	pub name: String,
	/// Allowed values for dropdown fields.
	pub options: Vec<String>,
	/// Display position.
	pub position: u32,
	/// `dropdown` or `textarea`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Whether other users can see the field.
	pub public: bool,
	/// Visible line count for text fields.
	pub lines: u32,
}

/// Estimated collection value as formatted currency strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionValue {
	/// Upper estimate.
	pub maximum: String,
	/// Median estimate.
	pub median: String,
	/// Lower estimate.
	pub minimum: String,
}

/// Handle to a release copy that was just added to a folder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
	/// Id of the new copy.
	pub instance_id: u64,
	/// API URL of the new copy.
	pub resource_url: String,
}

/// Address of one release copy: folder, release, and instance ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceRef {
	/// Folder holding the copy.
	pub folder_id: u64,
	/// Release the copy belongs to.
	pub release_id: u64,
	/// Id of the copy.
	pub instance_id: u64,
}
impl InstanceRef {
	/// Bundles the three ids that address a release copy.
	pub const fn new(folder_id: u64, release_id: u64, instance_id: u64) -> Self {
		Self { folder_id, release_id, instance_id }
	}
}

#[derive(Deserialize)]
struct FoldersBody {
	folders: Vec<Folder>,
}

#[derive(Deserialize)]
struct FieldsBody {
	fields: Vec<Field>,
}

#[derive(Serialize)]
struct CreateFolderBody<'a> {
	username: &'a str,
	name: &'a str,
}

#[derive(Serialize)]
struct NameBody<'a> {
	name: &'a str,
}

#[derive(Serialize)]
struct RatingBody {
	rating: u8,
}

#[derive(Serialize)]
struct ValueBody<'a> {
	value: &'a str,
}

fn folder_path(username: &str, folder_id: u64) -> String {
	user_path(username, &format!("collection/folders/{folder_id}"))
}

fn instance_path(username: &str, instance: InstanceRef) -> String {
	format!(
		"{}/releases/{}/instances/{}",
		folder_path(username, instance.folder_id),
		instance.release_id,
		instance.instance_id
	)
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the user's collection folders.
	pub async fn list_folders(
		&self,
		username: &str,
		cancel: &CancellationToken,
	) -> Result<Vec<Folder>> {
		let target = user_path(username, "collection/folders");
		let body =
			self.call(&LIST_FOLDERS, &target, NO_BODY, &[], cancel).await?.json::<FoldersBody>()?;

		Ok(body.folders)
	}

	/// Creates a folder named `name`.
	pub async fn create_folder(
		&self,
		username: &str,
		name: &str,
		cancel: &CancellationToken,
	) -> Result<Folder> {
		let target = user_path(username, "collection/folders");
		let body = CreateFolderBody { username, name };

		self.call(&CREATE_FOLDER, &target, Some(&body), &[], cancel).await?.json()
	}

	/// Fetches one folder.
	pub async fn folder(
		&self,
		username: &str,
		folder_id: u64,
		cancel: &CancellationToken,
	) -> Result<Folder> {
		self.call(&FOLDER, &folder_path(username, folder_id), NO_BODY, &[], cancel).await?.json()
	}

	/// Renames a folder.
	pub async fn edit_folder(
		&self,
		username: &str,
		folder_id: u64,
		name: &str,
		cancel: &CancellationToken,
	) -> Result<Folder> {
		let target = folder_path(username, folder_id);

		self.call(&EDIT_FOLDER, &target, Some(&NameBody { name }), &[], cancel).await?.json()
	}

	/// Deletes an empty folder.
	pub async fn delete_folder(
		&self,
		username: &str,
		folder_id: u64,
		cancel: &CancellationToken,
	) -> Result<()> {
		let target = folder_path(username, folder_id);

		self.call(&DELETE_FOLDER, &target, NO_BODY, &[], cancel).await?;

		Ok(())
	}

	/// Lists every release instance in a folder, following pagination to the end.
	///
	/// `query` is applied to the first request only (sort order, page size); later pages follow
	/// the server's cursors, which already carry those parameters.
	pub async fn releases_in_folder(
		&self,
		username: &str,
		folder_id: u64,
		query: &QueryParams,
		cancel: &CancellationToken,
	) -> Result<Vec<ReleaseInstance>> {
		let target = format!("{}/releases", folder_path(username, folder_id));
		let envelope = self.call(&RELEASES_IN_FOLDER, &target, NO_BODY, &[query], cancel).await?;
		let (first, pager) = Pager::<_, ReleasesPage>::new(&envelope, self)?;

		pager.collect_all(first, cancel, |page| page.releases).await
	}

	/// Lists every instance of `release_id` in the user's collection, across folders.
	pub async fn folders_by_release(
		&self,
		username: &str,
		release_id: u64,
		cancel: &CancellationToken,
	) -> Result<Vec<ReleaseInstance>> {
		let target = user_path(username, &format!("collection/releases/{release_id}"));
		let envelope = self.call(&FOLDERS_BY_RELEASE, &target, NO_BODY, &[], cancel).await?;
		let (first, pager) = Pager::<_, ReleasesPage>::new(&envelope, self)?;

		pager.collect_all(first, cancel, |page| page.releases).await
	}

	/// Adds a copy of `release_id` to a folder.
	pub async fn add_release_to_folder(
		&self,
		username: &str,
		folder_id: u64,
		release_id: u64,
		cancel: &CancellationToken,
	) -> Result<Instance> {
		let target = format!("{}/releases/{release_id}", folder_path(username, folder_id));

		self.call(&ADD_RELEASE_TO_FOLDER, &target, NO_BODY, &[], cancel).await?.json()
	}

	/// Rates one release copy from 0 to 5.
	pub async fn rate_release_instance(
		&self,
		username: &str,
		instance: InstanceRef,
		rating: u8,
		cancel: &CancellationToken,
	) -> Result<()> {
		let target = instance_path(username, instance);

		self.call(&RATE_RELEASE_INSTANCE, &target, Some(&RatingBody { rating }), &[], cancel)
			.await?;

		Ok(())
	}

	/// Removes one release copy from a folder.
	///
	/// A 403 means the user may not edit the folder and is reported as [`Error::Forbidden`].
	pub async fn remove_release_instance(
		&self,
		username: &str,
		instance: InstanceRef,
		cancel: &CancellationToken,
	) -> Result<()> {
		let target = instance_path(username, instance);
		let envelope =
			self.exchange(&REMOVE_RELEASE_INSTANCE, &target, NO_BODY, &[], cancel).await?;

		if envelope.status() == StatusCode::FORBIDDEN {
			return Err(Error::Forbidden { operation: REMOVE_RELEASE_INSTANCE.operation });
		}

		envelope.ensure_status(REMOVE_RELEASE_INSTANCE.operation, REMOVE_RELEASE_INSTANCE.expected)
	}

	/// Lists the user's custom collection fields.
	pub async fn custom_fields(
		&self,
		username: &str,
		cancel: &CancellationToken,
	) -> Result<Vec<Field>> {
		let target = user_path(username, "collection/fields");
		let body =
			self.call(&CUSTOM_FIELDS, &target, NO_BODY, &[], cancel).await?.json::<FieldsBody>()?;

		Ok(body.fields)
	}

	/// Sets a custom field on one release copy.
	pub async fn edit_instance_field(
		&self,
		username: &str,
		instance: InstanceRef,
		field_id: u64,
		value: &str,
		cancel: &CancellationToken,
	) -> Result<()> {
		let target = format!("{}/fields/{field_id}", instance_path(username, instance));

		self.call(&EDIT_INSTANCE_FIELD, &target, Some(&ValueBody { value }), &[], cancel).await?;

		Ok(())
	}

	/// Fetches the estimated value of the user's collection.
	pub async fn collection_value(
		&self,
		username: &str,
		cancel: &CancellationToken,
	) -> Result<CollectionValue> {
		let target = user_path(username, "collection/value");

		self.call(&COLLECTION_VALUE, &target, NO_BODY, &[], cancel).await?.json()
	}
}
