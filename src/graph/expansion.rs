//! Turning fetched records into node/link batches for the store.

use std::collections::HashMap;

use super::store::GraphState;
use super::types::{Link, Node, PlayerId, PlayerNode, TeamId, TeamSeasonKey, TeamSeasonNode};
use crate::data::{CareerRecord, PlayerNameIndex, RosterRecord};

/// Nodes and links produced by one expansion, merged as a unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expansion {
	/// Nodes to merge.
	pub nodes: Vec<Node>,
	/// Links to merge after the nodes.
	pub links: Vec<Link>,
}

impl Expansion {
	/// Merges nodes before links so every link finds its endpoints.
	/// Returns `(nodes_added, links_added)`.
	pub fn apply(self, state: &mut GraphState) -> (usize, usize) {
		let nodes = state.merge_nodes(self.nodes);
		let links = state.merge_links(self.links);
		(nodes, links)
	}
}

/// Groups career rows by `(teamId, seasonId)` keeping the last row of each
/// group, orders groups by season descending and keeps the first `limit`.
///
/// Season ids compare lexically, which matches chronology for the
/// `YYYY-YY` format.
pub fn select_team_seasons(records: &[CareerRecord], limit: Option<usize>) -> Vec<CareerRecord> {
	let mut slots: HashMap<(TeamId, &str), usize> = HashMap::new();
	let mut groups: Vec<CareerRecord> = Vec::new();
	for record in records.iter().filter(|r| r.is_roster_row()) {
		match slots.get(&(record.team_id, record.season_id.as_str())) {
			Some(&slot) => groups[slot] = record.clone(),
			None => {
				slots.insert((record.team_id, record.season_id.as_str()), groups.len());
				groups.push(record.clone());
			}
		}
	}
	groups.sort_by(|a, b| b.season_id.cmp(&a.season_id));
	if let Some(limit) = limit {
		groups.truncate(limit);
	}
	groups
}

/// One team-season node and one player→team link per selected group.
pub fn career_expansion(
	player_id: PlayerId,
	records: &[CareerRecord],
	limit: Option<usize>,
) -> Expansion {
	let mut expansion = Expansion::default();
	for group in select_team_seasons(records, limit) {
		let team = TeamSeasonNode::new(group.team_id, &group.team_abbreviation, &group.season_id);
		expansion
			.links
			.push(Link::membership(player_id, &team.key(), &group.team_abbreviation));
		expansion.nodes.push(Node::TeamSeason(team));
	}
	expansion
}

/// One player node and one player→team link per roster entry. Players
/// already in the graph are skipped at merge time.
///
/// A roster row without a name falls back to the name index.
pub fn roster_expansion(
	key: &TeamSeasonKey,
	team_abbr: &str,
	roster: &[RosterRecord],
	names: &PlayerNameIndex,
) -> Expansion {
	let mut expansion = Expansion::default();
	for entry in roster {
		let name = entry
			.player
			.clone()
			.filter(|n| !n.is_empty())
			.or_else(|| names.get(entry.player_id).map(str::to_owned));
		expansion
			.nodes
			.push(Node::Player(PlayerNode::new(entry.player_id, name)));
		expansion
			.links
			.push(Link::membership(entry.player_id, key, team_abbr));
	}
	expansion
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::NodeId;

	fn row(team_id: TeamId, abbr: &str, season: &str) -> CareerRecord {
		CareerRecord {
			team_id,
			team_abbreviation: abbr.into(),
			season_id: season.into(),
		}
	}

	#[test]
	fn test_bounded_selection_newest_first() {
		let records = vec![
			row(1610612739, "CLE", "2016-17"),
			row(1610612739, "CLE", "2017-18"),
			row(1610612747, "LAL", "2018-19"),
		];
		let selected = select_team_seasons(&records, Some(3));
		let seasons: Vec<_> = selected.iter().map(|r| r.season_id.as_str()).collect();
		assert_eq!(seasons, ["2018-19", "2017-18", "2016-17"]);
	}

	#[test]
	fn test_limit_keeps_most_recent() {
		let records = vec![
			row(1, "A", "2014-15"),
			row(1, "A", "2015-16"),
			row(2, "B", "2016-17"),
			row(2, "B", "2017-18"),
		];
		assert_eq!(select_team_seasons(&records, Some(3)).len(), 3);
		assert_eq!(select_team_seasons(&records, None).len(), 4);
		assert_eq!(select_team_seasons(&records, Some(1))[0].season_id, "2017-18");
	}

	#[test]
	fn test_duplicate_groups_last_write_wins() {
		let records = vec![row(5, "OLD", "2010-11"), row(5, "NEW", "2010-11")];
		let selected = select_team_seasons(&records, None);
		assert_eq!(selected.len(), 1);
		assert_eq!(selected[0].team_abbreviation, "NEW");
	}

	#[test]
	fn test_trade_summary_rows_ignored() {
		let records = vec![
			row(0, "TOT", "2019-20"),
			row(1, "A", "2019-20"),
			row(2, "B", "2019-20"),
		];
		let selected = select_team_seasons(&records, None);
		assert_eq!(selected.len(), 2);
		assert!(selected.iter().all(CareerRecord::is_roster_row));
	}

	#[test]
	fn test_career_expansion_shapes() {
		let records = vec![row(1610612747, "LAL", "2018-19")];
		let expansion = career_expansion(2544, &records, Some(3));
		assert_eq!(expansion.nodes.len(), 1);
		assert_eq!(expansion.nodes[0].id().as_str(), "team-1610612747-2018-19");
		assert_eq!(expansion.links[0].source_id(), &NodeId::player(2544));
		assert_eq!(expansion.links[0].team_abbr, "LAL");
	}

	#[test]
	fn test_roster_expansion_shapes() {
		let key = TeamSeasonKey::new(1610612747, "2018-19");
		let roster = vec![
			RosterRecord {
				player_id: 2544,
				player: Some("LeBron James".into()),
			},
			RosterRecord {
				player_id: 101108,
				player: None,
			},
		];
		let expansion = roster_expansion(&key, "LAL", &roster, &PlayerNameIndex::default());
		assert_eq!(expansion.nodes.len(), 2);
		assert!(expansion.links.iter().all(|l| l.target_id() == &key.node_id()));
		assert_eq!(expansion.nodes[1].label(), "Player 101108");
	}

	#[test]
	fn test_unnamed_roster_row_uses_name_index() {
		let key = TeamSeasonKey::new(1610612747, "2018-19");
		let names = PlayerNameIndex::from_raw(HashMap::from([
			("101108".to_string(), "Chris Paul".to_string()),
			("2544".to_string(), "Index Name".to_string()),
		]));
		let roster = vec![
			RosterRecord {
				player_id: 2544,
				player: Some("LeBron James".into()),
			},
			RosterRecord {
				player_id: 101108,
				player: None,
			},
		];
		let expansion = roster_expansion(&key, "LAL", &roster, &names);
		assert_eq!(expansion.nodes[0].label(), "LeBron James");
		assert_eq!(expansion.nodes[1].label(), "Chris Paul");
	}
}
