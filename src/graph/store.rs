//! Canonical node/link storage with idempotent merges and filter removals.
//!
//! Nodes and links are kept in insertion order alongside a lookup index, so
//! iteration (layout, rendering) is deterministic while membership tests stay
//! O(1).

use std::collections::{HashMap, HashSet};

use log::warn;

use super::types::{Link, LinkKey, Node, NodeId, PlayerId, PlayerNode, Point, TeamSeasonKey};

/// Ordered, duplicate-free trail of node ids visited in path mode.
#[derive(Clone, Debug, Default)]
pub struct PathTrail {
	order: Vec<NodeId>,
	members: HashSet<NodeId>,
}

impl PathTrail {
	/// Appends `id` unless it is already on the trail.
	pub fn push(&mut self, id: NodeId) -> bool {
		if !self.members.insert(id.clone()) {
			return false;
		}
		self.order.push(id);
		true
	}

	/// Whether `id` is on the trail.
	pub fn contains(&self, id: &NodeId) -> bool {
		self.members.contains(id)
	}

	/// Trail in visiting order, root first.
	pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
		self.order.iter()
	}

	/// Number of ids on the trail.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether the trail is empty.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}
}

/// The explorable graph plus the bookkeeping needed to expand and collapse
/// it. Created fresh per root player; never shared between roots.
#[derive(Clone, Debug)]
pub struct GraphState {
	nodes: Vec<Node>,
	node_index: HashMap<NodeId, usize>,
	links: Vec<Link>,
	link_index: HashMap<LinkKey, usize>,
	root: NodeId,
	pub(crate) loaded_team_seasons: HashSet<TeamSeasonKey>,
	pub(crate) expanded_players: HashSet<PlayerId>,
	pub(crate) path: PathTrail,
	pub(crate) last_active_team_season: Option<NodeId>,
}

impl GraphState {
	/// Seeds a state holding only the root player. With `pin_root` the root
	/// is fixed at the origin.
	pub fn new(mut root: PlayerNode, pin_root: bool) -> Self {
		if pin_root {
			root.position = Some(Point::ORIGIN);
			root.fixed = true;
		}
		let root_id = root.id.clone();
		let mut path = PathTrail::default();
		path.push(root_id.clone());
		Self {
			nodes: vec![Node::Player(root)],
			node_index: HashMap::from([(root_id.clone(), 0)]),
			links: Vec::new(),
			link_index: HashMap::new(),
			root: root_id,
			loaded_team_seasons: HashSet::new(),
			expanded_players: HashSet::new(),
			path,
			last_active_team_season: None,
		}
	}

	/// Id of the root player.
	pub fn root_id(&self) -> &NodeId {
		&self.root
	}

	/// All nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All links in insertion order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with `id` is present.
	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.node_index.contains_key(id)
	}

	/// Whether a link with `key` is present.
	pub fn contains_link(&self, key: &LinkKey) -> bool {
		self.link_index.contains_key(key)
	}

	/// Links with `id` at either end.
	pub fn links_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Link> + 'a {
		self.links.iter().filter(move |l| l.touches(id))
	}

	/// Whether the roster for `key` has been loaded.
	pub fn is_team_loaded(&self, key: &TeamSeasonKey) -> bool {
		self.loaded_team_seasons.contains(key)
	}

	/// Whether the player's seasons have been added.
	pub fn is_player_expanded(&self, player_id: PlayerId) -> bool {
		self.expanded_players.contains(&player_id)
	}

	/// Nodes clicked in path mode, starting with the root.
	pub fn path(&self) -> &PathTrail {
		&self.path
	}

	/// The team-season whose roster loaded most recently.
	pub fn last_active_team_season(&self) -> Option<&NodeId> {
		self.last_active_team_season.as_ref()
	}

	/// Inserts candidates whose id is absent. Existing nodes are never
	/// overwritten. Returns the number inserted.
	pub fn merge_nodes(&mut self, candidates: impl IntoIterator<Item = Node>) -> usize {
		let mut inserted = 0;
		for node in candidates {
			if self.node_index.contains_key(node.id()) {
				continue;
			}
			self.node_index.insert(node.id().clone(), self.nodes.len());
			self.nodes.push(node);
			inserted += 1;
		}
		inserted
	}

	/// Sets a player's display name if it has none yet.
	pub fn enrich_player_name(&mut self, player_id: PlayerId, name: &str) -> bool {
		let id = NodeId::player(player_id);
		let Some(&i) = self.node_index.get(&id) else {
			return false;
		};
		match &mut self.nodes[i] {
			Node::Player(p) if p.player_name.is_none() => {
				p.player_name = Some(name.to_owned());
				true
			}
			_ => false,
		}
	}

	/// Inserts candidates whose normalized key is absent. Links that are not
	/// player↔team or that reference unknown nodes are rejected. Returns the
	/// number inserted.
	pub fn merge_links(&mut self, candidates: impl IntoIterator<Item = Link>) -> usize {
		let mut inserted = 0;
		for link in candidates {
			let key = link.key();
			if self.link_index.contains_key(&key) {
				continue;
			}
			if !link.is_bipartite() {
				warn!("rejecting non-bipartite link {} -> {}", key.source, key.target);
				continue;
			}
			if !self.contains_node(&key.source) || !self.contains_node(&key.target) {
				warn!("rejecting dangling link {} -> {}", key.source, key.target);
				continue;
			}
			self.link_index.insert(key, self.links.len());
			self.links.push(link);
			inserted += 1;
		}
		inserted
	}

	/// Removes every node matching `predicate`. Links are left untouched;
	/// callers pair this with [`GraphState::prune_dangling_links`].
	pub fn remove_nodes(&mut self, mut predicate: impl FnMut(&Node) -> bool) -> Vec<NodeId> {
		let mut removed = Vec::new();
		self.nodes.retain(|n| {
			if predicate(n) {
				removed.push(n.id().clone());
				false
			} else {
				true
			}
		});
		if !removed.is_empty() {
			self.reindex_nodes();
		}
		removed
	}

	/// Removes every link matching `predicate`. Returns the number removed.
	pub fn remove_links(&mut self, mut predicate: impl FnMut(&Link) -> bool) -> usize {
		let before = self.links.len();
		self.links.retain(|l| !predicate(l));
		let removed = before - self.links.len();
		if removed > 0 {
			self.reindex_links();
		}
		removed
	}

	/// Drops links whose endpoints no longer both exist.
	pub fn prune_dangling_links(&mut self) -> usize {
		let index = &self.node_index;
		let before = self.links.len();
		self.links
			.retain(|l| index.contains_key(l.source_id()) && index.contains_key(l.target_id()));
		let removed = before - self.links.len();
		if removed > 0 {
			self.reindex_links();
		}
		removed
	}

	/// Moves a free node. Fixed nodes keep their pinned coordinate.
	pub fn set_position(&mut self, id: &NodeId, position: Point) -> bool {
		let Some(&i) = self.node_index.get(id) else {
			return false;
		};
		let node = &mut self.nodes[i];
		if node.is_fixed() {
			return false;
		}
		*node.position_mut() = Some(position);
		true
	}

	fn reindex_nodes(&mut self) {
		self.node_index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id().clone(), i))
			.collect();
	}

	fn reindex_links(&mut self) {
		self.link_index = self
			.links
			.iter()
			.enumerate()
			.map(|(i, l)| (l.key(), i))
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::{Endpoint, TeamSeasonNode};

	fn lal() -> TeamSeasonNode {
		TeamSeasonNode::new(1610612747, "LAL", "2018-19")
	}

	fn seeded() -> GraphState {
		GraphState::new(PlayerNode::new(2544, None), true)
	}

	fn snapshot(state: &GraphState) -> (Vec<Node>, Vec<LinkKey>) {
		(
			state.nodes().to_vec(),
			state.links().iter().map(Link::key).collect(),
		)
	}

	#[test]
	fn test_new_state_holds_pinned_root() {
		let state = seeded();
		assert_eq!(state.nodes().len(), 1);
		assert!(state.links().is_empty());
		let root = state.node(state.root_id()).unwrap();
		assert!(root.is_fixed());
		assert_eq!(root.position(), Some(Point::ORIGIN));
		assert!(state.path().contains(state.root_id()));
	}

	#[test]
	fn test_merge_is_idempotent() {
		let mut state = seeded();
		let nodes = vec![
			Node::TeamSeason(lal()),
			Node::Player(PlayerNode::new(101108, Some("Chris Paul".into()))),
		];
		let links = vec![
			Link::membership(2544, &lal().key(), "LAL"),
			Link::membership(101108, &lal().key(), "LAL"),
		];
		assert_eq!(state.merge_nodes(nodes.clone()), 2);
		assert_eq!(state.merge_links(links.clone()), 2);
		let once = snapshot(&state);

		assert_eq!(state.merge_nodes(nodes), 0);
		assert_eq!(state.merge_links(links), 0);
		assert_eq!(snapshot(&state), once);
	}

	#[test]
	fn test_merge_never_overwrites() {
		let mut state = seeded();
		state.merge_nodes([Node::Player(PlayerNode::new(2544, Some("Other".into())))]);
		let Node::Player(root) = &state.nodes()[0] else {
			panic!("root is a player");
		};
		assert_eq!(root.player_name, None);
		assert!(root.fixed);
	}

	#[test]
	fn test_enrich_name_only_once() {
		let mut state = seeded();
		assert!(state.enrich_player_name(2544, "LeBron James"));
		assert!(!state.enrich_player_name(2544, "L. James"));
		assert_eq!(state.nodes()[0].label(), "LeBron James");
	}

	#[test]
	fn test_link_dedup_across_representations() {
		let mut state = seeded();
		state.merge_nodes([Node::TeamSeason(lal())]);
		let raw = Link::membership(2544, &lal().key(), "LAL");
		let enriched = Link {
			source: Endpoint::Node(Box::new(Node::Player(PlayerNode::new(2544, None)))),
			target: Endpoint::Node(Box::new(Node::TeamSeason(lal()))),
			season: "2018-19".into(),
			team_abbr: "LAL".into(),
		};
		assert_eq!(state.merge_links([raw, enriched]), 1);
		assert_eq!(state.links().len(), 1);
	}

	#[test]
	fn test_rejects_non_bipartite_and_dangling_links() {
		let mut state = seeded();
		state.merge_nodes([Node::Player(PlayerNode::new(1, None)), Node::TeamSeason(lal())]);
		let player_player = Link::new(NodeId::player(2544), NodeId::player(1), "2018-19", "LAL");
		let dangling = Link::membership(99, &lal().key(), "LAL");
		assert_eq!(state.merge_links([player_player, dangling]), 0);
		assert!(state.links().iter().all(Link::is_bipartite));
	}

	#[test]
	fn test_remove_nodes_and_prune_links() {
		let mut state = seeded();
		state.merge_nodes([Node::TeamSeason(lal()), Node::Player(PlayerNode::new(1, None))]);
		state.merge_links([
			Link::membership(2544, &lal().key(), "LAL"),
			Link::membership(1, &lal().key(), "LAL"),
		]);
		let removed = state.remove_nodes(|n| n.id() == &NodeId::player(1));
		assert_eq!(removed, vec![NodeId::player(1)]);
		assert_eq!(state.links().len(), 2);
		assert_eq!(state.prune_dangling_links(), 1);
		assert!(state.contains_node(&lal().id));
		assert!(state.node(&NodeId::player(1)).is_none());
		assert!(state.contains_link(&Link::membership(2544, &lal().key(), "LAL").key()));
	}

	#[test]
	fn test_set_position_ignores_fixed() {
		let mut state = seeded();
		state.merge_nodes([Node::TeamSeason(lal())]);
		let root = state.root_id().clone();
		assert!(!state.set_position(&root, Point::new(5.0, 5.0)));
		assert!(state.set_position(&lal().id, Point::new(5.0, 5.0)));
		assert_eq!(state.node(&root).unwrap().position(), Some(Point::ORIGIN));
		assert_eq!(state.node(&lal().id).unwrap().position(), Some(Point::new(5.0, 5.0)));
	}

	#[test]
	fn test_path_trail_keeps_order() {
		let mut trail = PathTrail::default();
		assert!(trail.push(NodeId::player(1)));
		assert!(trail.push(NodeId::team_season(2, "2001-02")));
		assert!(!trail.push(NodeId::player(1)));
		let order: Vec<_> = trail.iter().map(NodeId::as_str).collect();
		assert_eq!(order, ["player-1", "team-2-2001-02"]);
	}
}
