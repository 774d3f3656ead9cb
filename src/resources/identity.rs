//! Identity of the token holder.

// self
use crate::{
	_prelude::*,
	client::{Client, NO_BODY},
	http::HttpTransport,
	resources::Endpoint,
};

const IDENTITY: Endpoint = Endpoint::get("identity");

/// Account the configured credential belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
	/// Numeric user id.
	pub id: u64,
	/// API URL of the user's profile.
	pub resource_url: String,
	/// Login name.
	pub username: String,
	/// Application name registered for the credential, if any.
	pub consumer_name: String,
}

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Fetches the identity behind the configured credential (`GET oauth/identity`).
	///
	/// Unauthenticated clients receive the server's 401 as [`Error::UnexpectedStatus`].
	pub async fn identity(&self, cancel: &CancellationToken) -> Result<Identity> {
		self.call(&IDENTITY, "oauth/identity", NO_BODY, &[], cancel).await?.json()
	}
}
