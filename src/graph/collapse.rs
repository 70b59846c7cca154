//! Subtractive graph updates: normal-mode roster collapse and path-mode
//! sibling pruning.

use std::collections::HashSet;

use log::debug;

use super::store::GraphState;
use super::types::{Link, Node, NodeId, NodeKind, TeamSeasonKey};

/// What a collapse took out of the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollapseOutcome {
	/// Ids of the nodes removed.
	pub removed_nodes: Vec<NodeId>,
	/// Number of links removed, dangling ones included.
	pub removed_links: usize,
}

impl CollapseOutcome {
	/// Whether nothing was removed.
	pub fn is_empty(&self) -> bool {
		self.removed_nodes.is_empty() && self.removed_links == 0
	}
}

/// Removes a loaded roster: every link into the team except the root's,
/// then every non-root player left without any team link. The team becomes
/// loadable again.
pub fn collapse_team_season(state: &mut GraphState, key: &TeamSeasonKey) -> CollapseOutcome {
	let team = key.node_id();
	let root = state.root_id().clone();
	let mut removed_links =
		state.remove_links(|l| l.touches(&team) && l.other_end(&team) != Some(&root));

	let removed_nodes = prune_orphan_players(state);
	removed_links += state.prune_dangling_links();

	state.loaded_team_seasons.remove(key);
	if state.last_active_team_season.as_ref() == Some(&team) {
		state.last_active_team_season = None;
	}
	sync_tracking(state);

	debug!(
		"collapsed {team}: {} nodes, {removed_links} links removed",
		removed_nodes.len()
	);
	CollapseOutcome {
		removed_nodes,
		removed_links,
	}
}

/// Path mode, team clicked: keeps only `keep` and team-seasons already on
/// the path. Players are all kept.
pub fn collapse_sibling_teams(state: &mut GraphState, keep: &NodeId) -> CollapseOutcome {
	let path = state.path.clone();
	let removed_nodes = state.remove_nodes(|n| {
		n.kind() == NodeKind::TeamSeason && n.id() != keep && !path.contains(n.id())
	});
	let removed_links = state.prune_dangling_links();
	sync_tracking(state);

	debug!("sibling teams of {keep}: {} removed", removed_nodes.len());
	CollapseOutcome {
		removed_nodes,
		removed_links,
	}
}

/// Path mode, player clicked: keeps `keep`, the root and path players, plus
/// the team-seasons linked to `keep` or on the path.
pub fn collapse_sibling_players(state: &mut GraphState, keep: &NodeId) -> CollapseOutcome {
	let linked_teams: HashSet<NodeId> = state
		.links_of(keep)
		.filter_map(|l| l.other_end(keep))
		.cloned()
		.collect();
	let root = state.root_id().clone();
	let path = state.path.clone();

	let removed_nodes = state.remove_nodes(|n| {
		let id = n.id();
		if path.contains(id) {
			return false;
		}
		match n.kind() {
			NodeKind::Player => id != keep && id != &root,
			NodeKind::TeamSeason => !linked_teams.contains(id),
		}
	});
	let removed_links = state.prune_dangling_links();
	sync_tracking(state);

	debug!("sibling players of {keep}: {} removed", removed_nodes.len());
	CollapseOutcome {
		removed_nodes,
		removed_links,
	}
}

fn prune_orphan_players(state: &mut GraphState) -> Vec<NodeId> {
	let root = state.root_id().clone();
	let linked: HashSet<NodeId> = state
		.links()
		.iter()
		.flat_map(|l: &Link| [l.source_id(), l.target_id()])
		.filter(|id| id.kind() == Some(NodeKind::Player))
		.cloned()
		.collect();
	state.remove_nodes(|n| {
		matches!(n, Node::Player(_)) && n.id() != &root && !linked.contains(n.id())
	})
}

/// Drops tracking entries for nodes that no longer exist.
fn sync_tracking(state: &mut GraphState) {
	let present: HashSet<NodeId> = state.nodes().iter().map(|n| n.id().clone()).collect();
	state
		.loaded_team_seasons
		.retain(|key| present.contains(&key.node_id()));
	state
		.expanded_players
		.retain(|&player_id| present.contains(&NodeId::player(player_id)));
	if let Some(last) = &state.last_active_team_season {
		if !present.contains(last) {
			state.last_active_team_season = None;
		}
	}
}
