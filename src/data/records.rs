//! Record shapes of the static data resources.

use std::collections::HashMap;

use serde::Deserialize;

use crate::graph::types::{PlayerId, TeamId};

/// Trade-summary rows aggregate several teams and name no real roster.
const TRADE_SUMMARY_ABBR: &str = "TOT";

/// One row of `players/{playerId}.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CareerRecord {
	/// Team the player was on, `0` for summary rows.
	#[serde(rename = "TEAM_ID")]
	pub team_id: TeamId,
	/// Team abbreviation, `TOT` for trade-summary rows.
	#[serde(rename = "TEAM_ABBREVIATION")]
	pub team_abbreviation: String,
	/// Season id, e.g. `2018-19`.
	#[serde(rename = "SEASON_ID")]
	pub season_id: String,
}

impl CareerRecord {
	/// Whether the row names an actual team-season roster.
	pub fn is_roster_row(&self) -> bool {
		self.team_id != 0 && self.team_abbreviation != TRADE_SUMMARY_ABBR
	}
}

/// One row of `teams/{teamId}_{season}.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RosterRecord {
	/// Rostered player.
	#[serde(rename = "PLAYER_ID")]
	pub player_id: PlayerId,
	/// Display name, when the roster carries one.
	#[serde(rename = "PLAYER", default)]
	pub player: Option<String>,
}

/// Player id → display name. The first name seen for an id wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerNameIndex {
	names: HashMap<PlayerId, String>,
}

impl PlayerNameIndex {
	/// Builds the index from the `player_names.json` object, whose keys are
	/// stringified ids. Unparsable keys are skipped.
	pub fn from_raw(raw: HashMap<String, String>) -> Self {
		let names = raw
			.into_iter()
			.filter_map(|(id, name)| id.trim().parse().ok().map(|id| (id, name)))
			.collect();
		Self { names }
	}

	/// Records the names carried by a roster.
	pub fn record_roster(&mut self, roster: &[RosterRecord]) {
		for entry in roster {
			let Some(name) = entry.player.as_deref().filter(|n| !n.is_empty()) else {
				continue;
			};
			self.names
				.entry(entry.player_id)
				.or_insert_with(|| name.to_owned());
		}
	}

	/// Adds names from `other` for ids not yet known.
	pub fn merge(&mut self, other: PlayerNameIndex) {
		for (id, name) in other.names {
			self.names.entry(id).or_insert(name);
		}
	}

	/// Name for `player_id`, if known.
	pub fn get(&self, player_id: PlayerId) -> Option<&str> {
		self.names.get(&player_id).map(String::as_str)
	}

	/// Number of named players.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Whether no names are known.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_career_rows_decode_and_filter() {
		let rows: Vec<CareerRecord> = serde_json::from_str(
			r#"[
				{"PLAYER_ID":2544,"SEASON_ID":"2017-18","TEAM_ID":1610612739,"TEAM_ABBREVIATION":"CLE","GP":82},
				{"PLAYER_ID":2544,"SEASON_ID":"2004-05","TEAM_ID":0,"TEAM_ABBREVIATION":"TOT","GP":80}
			]"#,
		)
		.unwrap();
		assert_eq!(rows.len(), 2);
		assert!(rows[0].is_roster_row());
		assert!(!rows[1].is_roster_row());
	}

	#[test]
	fn test_roster_rows_tolerate_missing_name() {
		let rows: Vec<RosterRecord> =
			serde_json::from_str(r#"[{"PLAYER_ID":1},{"PLAYER_ID":2,"PLAYER":"B"}]"#).unwrap();
		assert_eq!(rows[0].player, None);
		assert_eq!(rows[1].player.as_deref(), Some("B"));
	}

	#[test]
	fn test_name_index_first_wins() {
		let mut index = PlayerNameIndex::default();
		index.record_roster(&[RosterRecord {
			player_id: 2544,
			player: Some("LeBron James".into()),
		}]);
		index.record_roster(&[
			RosterRecord {
				player_id: 2544,
				player: Some("L. James".into()),
			},
			RosterRecord {
				player_id: 3,
				player: Some(String::new()),
			},
		]);
		assert_eq!(index.get(2544), Some("LeBron James"));
		assert_eq!(index.get(3), None);
		assert_eq!(index.len(), 1);
	}

	#[test]
	fn test_name_index_from_raw_object() {
		let raw: HashMap<String, String> =
			serde_json::from_str(r#"{"2544":"LeBron James","x":"bad"}"#).unwrap();
		let index = PlayerNameIndex::from_raw(raw);
		assert_eq!(index.get(2544), Some("LeBron James"));
		assert_eq!(index.len(), 1);
	}
}
