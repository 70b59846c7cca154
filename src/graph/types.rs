//! Identity types shared by the graph core: node ids, nodes, links and the
//! normalization that turns any link endpoint into a comparable id.

use std::fmt;

/// Numeric player id as served by the data resources.
pub type PlayerId = u64;
/// Numeric team id as served by the data resources.
pub type TeamId = u64;

const PLAYER_PREFIX: &str = "player-";
const TEAM_PREFIX: &str = "team-";

/// A point in graph space. The origin is the canonical root position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Where the root player sits.
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	/// Creates a point from its coordinates.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Which side of the bipartite graph a node id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// `player-{playerId}`.
	Player,
	/// `team-{teamId}-{season}`.
	TeamSeason,
}

/// Node identity, derived deterministically from the node's discriminant
/// fields: `player-{playerId}` or `team-{teamId}-{season}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
	/// Id of a player node.
	pub fn player(player_id: PlayerId) -> Self {
		Self(format!("{PLAYER_PREFIX}{player_id}"))
	}

	/// Id of a team-season node.
	pub fn team_season(team_id: TeamId, season: &str) -> Self {
		Self(format!("{TEAM_PREFIX}{team_id}-{season}"))
	}

	/// Wraps an id received from outside the core (e.g. a canvas click).
	pub fn from_raw(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	/// The raw id string.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Which side of the graph this id names, or `None` for foreign ids.
	pub fn kind(&self) -> Option<NodeKind> {
		if self.0.starts_with(PLAYER_PREFIX) {
			Some(NodeKind::Player)
		} else if self.0.starts_with(TEAM_PREFIX) {
			Some(NodeKind::TeamSeason)
		} else {
			None
		}
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Key of one team's roster for one season. Displays as `teamId_season`,
/// which is also the roster resource name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TeamSeasonKey {
	/// Numeric team id.
	pub team_id: TeamId,
	/// Season id, e.g. `2018-19`.
	pub season: String,
}

impl TeamSeasonKey {
	/// Creates a key for `team_id` in `season`.
	pub fn new(team_id: TeamId, season: impl Into<String>) -> Self {
		Self {
			team_id,
			season: season.into(),
		}
	}

	/// Id of the team-season node for this key.
	pub fn node_id(&self) -> NodeId {
		NodeId::team_season(self.team_id, &self.season)
	}
}

impl fmt::Display for TeamSeasonKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}_{}", self.team_id, self.season)
	}
}

/// A player vertex. Its name may be learned after it is first shown.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerNode {
	/// Always `player-{player_id}`.
	pub id: NodeId,
	/// Numeric player id.
	pub player_id: PlayerId,
	/// Display name, once known.
	pub player_name: Option<String>,
	/// Last layout position.
	pub position: Option<Point>,
	/// Pinned nodes are never moved by the layout.
	pub fixed: bool,
}

impl PlayerNode {
	/// An unplaced, free player node.
	pub fn new(player_id: PlayerId, player_name: Option<String>) -> Self {
		Self {
			id: NodeId::player(player_id),
			player_id,
			player_name,
			position: None,
			fixed: false,
		}
	}
}

/// A team's participation in one season.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamSeasonNode {
	/// Always `team-{team_id}-{season}`.
	pub id: NodeId,
	/// Numeric team id.
	pub team_id: TeamId,
	/// Team abbreviation, e.g. `LAL`.
	pub team_abbr: String,
	/// Season id, e.g. `2018-19`.
	pub season: String,
	/// Last layout position.
	pub position: Option<Point>,
	/// Pinned nodes are never moved by the layout.
	pub fixed: bool,
}

impl TeamSeasonNode {
	/// An unplaced, free team-season node.
	pub fn new(team_id: TeamId, team_abbr: impl Into<String>, season: impl Into<String>) -> Self {
		let season = season.into();
		Self {
			id: NodeId::team_season(team_id, &season),
			team_id,
			team_abbr: team_abbr.into(),
			season,
			position: None,
			fixed: false,
		}
	}

	/// Roster key for this team-season.
	pub fn key(&self) -> TeamSeasonKey {
		TeamSeasonKey::new(self.team_id, self.season.clone())
	}
}

/// A graph vertex: either a player or a team-season grouping.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
	/// A player.
	Player(PlayerNode),
	/// A team in one season.
	TeamSeason(TeamSeasonNode),
}

impl Node {
	/// Node identity.
	pub fn id(&self) -> &NodeId {
		match self {
			Node::Player(p) => &p.id,
			Node::TeamSeason(t) => &t.id,
		}
	}

	/// Which side of the graph this node is on.
	pub fn kind(&self) -> NodeKind {
		match self {
			Node::Player(_) => NodeKind::Player,
			Node::TeamSeason(_) => NodeKind::TeamSeason,
		}
	}

	/// Position assigned by the layout, if any.
	pub fn position(&self) -> Option<Point> {
		match self {
			Node::Player(p) => p.position,
			Node::TeamSeason(t) => t.position,
		}
	}

	/// Whether the layout must leave this node in place.
	pub fn is_fixed(&self) -> bool {
		match self {
			Node::Player(p) => p.fixed,
			Node::TeamSeason(t) => t.fixed,
		}
	}

	pub(crate) fn position_mut(&mut self) -> &mut Option<Point> {
		match self {
			Node::Player(p) => &mut p.position,
			Node::TeamSeason(t) => &mut t.position,
		}
	}

	/// Display label. Players without a known name get a synthetic one.
	pub fn label(&self) -> String {
		match self {
			Node::Player(p) => p
				.player_name
				.clone()
				.unwrap_or_else(|| format!("Player {}", p.player_id)),
			Node::TeamSeason(t) => format!("{} {}", t.team_abbr, t.season),
		}
	}
}

/// A link endpoint as it may arrive: a bare id, or an enriched node
/// reference carrying the whole node.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
	/// A bare node id.
	Id(NodeId),
	/// A node reference carried by value.
	Node(Box<Node>),
}

impl From<NodeId> for Endpoint {
	fn from(id: NodeId) -> Self {
		Endpoint::Id(id)
	}
}

impl From<Node> for Endpoint {
	fn from(node: Node) -> Self {
		Endpoint::Node(Box::new(node))
	}
}

/// One end of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	/// The player end.
	Source,
	/// The team-season end.
	Target,
}

/// Edge between a player (source) and a team-season (target).
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Player end.
	pub source: Endpoint,
	/// Team-season end.
	pub target: Endpoint,
	/// Season of the membership.
	pub season: String,
	/// Team abbreviation of the membership.
	pub team_abbr: String,
}

impl Link {
	/// Creates a link from any endpoint representation.
	pub fn new(
		source: impl Into<Endpoint>,
		target: impl Into<Endpoint>,
		season: impl Into<String>,
		team_abbr: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			season: season.into(),
			team_abbr: team_abbr.into(),
		}
	}

	/// Player → team-season link for a roster or career entry.
	pub fn membership(player_id: PlayerId, team: &TeamSeasonKey, team_abbr: &str) -> Self {
		Self::new(
			NodeId::player(player_id),
			team.node_id(),
			team.season.clone(),
			team_abbr,
		)
	}

	/// Normalized source id.
	pub fn source_id(&self) -> &NodeId {
		endpoint_id(self, Side::Source)
	}

	/// Normalized target id.
	pub fn target_id(&self) -> &NodeId {
		endpoint_id(self, Side::Target)
	}

	/// Identity used for deduplication.
	pub fn key(&self) -> LinkKey {
		LinkKey {
			source: self.source_id().clone(),
			target: self.target_id().clone(),
		}
	}

	/// Whether either end is `id`.
	pub fn touches(&self, id: &NodeId) -> bool {
		self.source_id() == id || self.target_id() == id
	}

	/// The endpoint opposite to `id`, if `id` is one of this link's ends.
	pub fn other_end(&self, id: &NodeId) -> Option<&NodeId> {
		if self.source_id() == id {
			Some(self.target_id())
		} else if self.target_id() == id {
			Some(self.source_id())
		} else {
			None
		}
	}

	/// One endpoint is a player id and the other a team-season id.
	pub fn is_bipartite(&self) -> bool {
		matches!(
			(self.source_id().kind(), self.target_id().kind()),
			(Some(NodeKind::Player), Some(NodeKind::TeamSeason))
				| (Some(NodeKind::TeamSeason), Some(NodeKind::Player))
		)
	}
}

/// Normalizes one side of a link to its node id. All link identity
/// comparisons go through here.
pub fn endpoint_id(link: &Link, side: Side) -> &NodeId {
	let endpoint = match side {
		Side::Source => &link.source,
		Side::Target => &link.target,
	};
	match endpoint {
		Endpoint::Id(id) => id,
		Endpoint::Node(node) => node.id(),
	}
}

/// Link identity: the normalized ordered `(source, target)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
	/// Normalized source id.
	pub source: NodeId,
	/// Normalized target id.
	pub target: NodeId,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ids_are_derived_from_fields() {
		assert_eq!(NodeId::player(2544).as_str(), "player-2544");
		assert_eq!(
			NodeId::team_season(1610612747, "2018-19").as_str(),
			"team-1610612747-2018-19"
		);
		assert_eq!(TeamSeasonKey::new(1610612747, "2018-19").to_string(), "1610612747_2018-19");
		assert_eq!(
			TeamSeasonNode::new(1610612747, "LAL", "2018-19").id,
			TeamSeasonKey::new(1610612747, "2018-19").node_id()
		);
	}

	#[test]
	fn test_node_id_kind() {
		assert_eq!(NodeId::player(1).kind(), Some(NodeKind::Player));
		assert_eq!(NodeId::team_season(1, "2000-01").kind(), Some(NodeKind::TeamSeason));
		assert_eq!(NodeId::from_raw("league-1").kind(), None);
	}

	#[test]
	fn test_endpoint_normalization() {
		let team = TeamSeasonNode::new(1610612747, "LAL", "2018-19");
		let raw = Link::new(NodeId::player(2544), team.id.clone(), "2018-19", "LAL");
		let enriched = Link::new(
			Node::Player(PlayerNode::new(2544, Some("LeBron James".into()))),
			Node::TeamSeason(team),
			"2018-19",
			"LAL",
		);
		assert_eq!(raw.key(), enriched.key());
		assert_eq!(endpoint_id(&enriched, Side::Source).as_str(), "player-2544");
	}

	#[test]
	fn test_bipartite_check() {
		let ok = Link::new(NodeId::player(1), NodeId::team_season(2, "2001-02"), "2001-02", "X");
		let bad = Link::new(NodeId::player(1), NodeId::player(2), "2001-02", "X");
		assert!(ok.is_bipartite());
		assert!(!bad.is_bipartite());
	}

	#[test]
	fn test_labels() {
		assert_eq!(Node::Player(PlayerNode::new(7, None)).label(), "Player 7");
		assert_eq!(
			Node::TeamSeason(TeamSeasonNode::new(3, "BOS", "2007-08")).label(),
			"BOS 2007-08"
		);
	}
}
