//! Fetching the static per-entity resources.
//!
//! The core only sees the [`DataSource`] seam; the browser implementation
//! goes through `window.fetch` the same way the rest of the app talks to
//! the page.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::records::{CareerRecord, PlayerNameIndex, RosterRecord};
use crate::graph::types::{PlayerId, TeamSeasonKey};

/// Id → name index of every known player.
pub const PLAYER_NAMES_RESOURCE: &str = "player_names.json";

/// Career resource of one player.
pub fn player_resource(player_id: PlayerId) -> String {
	format!("players/{player_id}.json")
}

/// Roster resource of one team-season.
pub fn roster_resource(key: &TeamSeasonKey) -> String {
	format!("teams/{key}.json")
}

/// Why a resource could not be read.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
	/// The request never produced a response.
	#[error("request to {url} failed: {reason}")]
	Request {
		/// Requested URL.
		url: String,
		/// Browser error, as text.
		reason: String,
	},
	/// The server answered with a non-success status.
	#[error("{url} returned HTTP {status}")]
	Http {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// The body was not the expected JSON shape.
	#[error("could not decode {url}: {reason}")]
	Decode {
		/// Requested URL.
		url: String,
		/// Decoder error, as text.
		reason: String,
	},
	/// The source has no such resource.
	#[error("resource {resource} is unavailable")]
	Unavailable {
		/// Resource path relative to the data root.
		resource: String,
	},
}

/// Result of a resource read.
pub type FetchResult<T> = Result<T, FetchError>;

/// Keyed, read-only access to the data resources.
#[allow(async_fn_in_trait)]
pub trait DataSource {
	/// Career rows of a player, in file order.
	async fn player_career(&self, player_id: PlayerId) -> FetchResult<Vec<CareerRecord>>;

	/// Roster rows of a team-season.
	async fn team_roster(&self, key: &TeamSeasonKey) -> FetchResult<Vec<RosterRecord>>;

	/// The full player name index.
	async fn player_names(&self) -> FetchResult<PlayerNameIndex>;
}

/// Reads JSON resources relative to a base URL with the browser fetch API.
#[derive(Clone, Debug)]
pub struct StaticDataClient {
	base_url: String,
}

impl StaticDataClient {
	/// Client rooted at `base_url`; a trailing slash is ignored.
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Absolute URL of `resource`.
	pub fn url(&self, resource: &str) -> String {
		format!("{}/{}", self.base_url, resource)
	}

	async fn get<T: DeserializeOwned>(&self, resource: &str) -> FetchResult<T> {
		use wasm_bindgen::JsCast;
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestInit, RequestMode, Response};

		let url = self.url(resource);
		let request_err = |reason: String| FetchError::Request {
			url: url.clone(),
			reason,
		};

		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::SameOrigin);

		let request = Request::new_with_str_and_init(&url, &opts)
			.map_err(|e| request_err(format!("{e:?}")))?;
		let window = web_sys::window().ok_or_else(|| request_err("no window".into()))?;
		let resp_value = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(|e| request_err(format!("{e:?}")))?;
		let resp: Response = resp_value
			.dyn_into()
			.map_err(|_| request_err("response is not a Response".into()))?;

		if !resp.ok() {
			return Err(FetchError::Http {
				url,
				status: resp.status(),
			});
		}

		let decode_err = |reason: String| FetchError::Decode {
			url: url.clone(),
			reason,
		};
		let json = JsFuture::from(resp.json().map_err(|e| decode_err(format!("{e:?}")))?)
			.await
			.map_err(|e| decode_err(format!("{e:?}")))?;
		serde_wasm_bindgen::from_value(json).map_err(|e| decode_err(e.to_string()))
	}
}

impl DataSource for StaticDataClient {
	async fn player_career(&self, player_id: PlayerId) -> FetchResult<Vec<CareerRecord>> {
		self.get(&player_resource(player_id)).await
	}

	async fn team_roster(&self, key: &TeamSeasonKey) -> FetchResult<Vec<RosterRecord>> {
		self.get(&roster_resource(key)).await
	}

	async fn player_names(&self) -> FetchResult<PlayerNameIndex> {
		let raw: HashMap<String, String> = self.get(PLAYER_NAMES_RESOURCE).await?;
		Ok(PlayerNameIndex::from_raw(raw))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resource_paths() {
		assert_eq!(player_resource(2544), "players/2544.json");
		assert_eq!(
			roster_resource(&TeamSeasonKey::new(1610612747, "2018-19")),
			"teams/1610612747_2018-19.json"
		);
	}

	#[test]
	fn test_client_url_joins_base() {
		let client = StaticDataClient::new("/data/");
		assert_eq!(client.url("players/1.json"), "/data/players/1.json");
	}

	#[test]
	fn test_fetch_error_messages() {
		let err = FetchError::Http {
			url: "/data/players/1.json".into(),
			status: 404,
		};
		assert_eq!(err.to_string(), "/data/players/1.json returned HTTP 404");
	}
}
