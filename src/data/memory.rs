//! In-memory [`DataSource`] for driving the controller without a browser.

use std::cell::RefCell;
use std::collections::HashMap;

use super::client::{DataSource, FetchError, FetchResult, PLAYER_NAMES_RESOURCE, player_resource, roster_resource};
use super::records::{CareerRecord, PlayerNameIndex, RosterRecord};
use crate::graph::types::{PlayerId, TeamSeasonKey};

#[derive(Default)]
pub struct MemorySource {
	careers: HashMap<PlayerId, Vec<CareerRecord>>,
	rosters: HashMap<String, Vec<RosterRecord>>,
	names: Option<PlayerNameIndex>,
	requests: RefCell<Vec<String>>,
}

impl MemorySource {
	pub fn with_career(mut self, player_id: PlayerId, rows: &[(u64, &str, &str)]) -> Self {
		let rows = rows
			.iter()
			.map(|&(team_id, abbr, season)| CareerRecord {
				team_id,
				team_abbreviation: abbr.into(),
				season_id: season.into(),
			})
			.collect();
		self.careers.insert(player_id, rows);
		self
	}

	pub fn with_roster(mut self, key: TeamSeasonKey, rows: &[(PlayerId, &str)]) -> Self {
		let rows = rows
			.iter()
			.map(|&(player_id, name)| RosterRecord {
				player_id,
				player: Some(name.into()),
			})
			.collect();
		self.rosters.insert(key.to_string(), rows);
		self
	}

	pub fn with_names(mut self, names: PlayerNameIndex) -> Self {
		self.names = Some(names);
		self
	}

	/// Resources requested so far, in order.
	pub fn requests(&self) -> Vec<String> {
		self.requests.borrow().clone()
	}

	fn log(&self, resource: String) -> String {
		self.requests.borrow_mut().push(resource.clone());
		resource
	}
}

impl DataSource for MemorySource {
	async fn player_career(&self, player_id: PlayerId) -> FetchResult<Vec<CareerRecord>> {
		let resource = self.log(player_resource(player_id));
		self.careers
			.get(&player_id)
			.cloned()
			.ok_or(FetchError::Unavailable { resource })
	}

	async fn team_roster(&self, key: &TeamSeasonKey) -> FetchResult<Vec<RosterRecord>> {
		let resource = self.log(roster_resource(key));
		self.rosters
			.get(&key.to_string())
			.cloned()
			.ok_or(FetchError::Unavailable { resource })
	}

	async fn player_names(&self) -> FetchResult<PlayerNameIndex> {
		let resource = self.log(PLAYER_NAMES_RESOURCE.to_string());
		self.names.clone().ok_or(FetchError::Unavailable { resource })
	}
}
