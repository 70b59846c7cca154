//! The single owner of the exploration graph.
//!
//! Every user-facing command (`click`, expansions, collapses, `reset`)
//! computes the next state in one step and publishes it by bumping
//! [`GraphController::revision`]. Fetches are split in two halves: a
//! `request_*` call that registers the work as in flight and hands back a
//! ticket, and a `complete_*` call that applies the response. Tickets from a
//! previous epoch (before a reset or root change) are discarded.

use std::collections::HashSet;

use log::{debug, info, warn};

use super::collapse::{self, CollapseOutcome};
use super::expansion::{career_expansion, roster_expansion};
use super::layout::LayoutEngine;
use super::store::GraphState;
use super::types::{Node, NodeId, PlayerId, PlayerNode, TeamSeasonKey};
use crate::config::{ExplorationMode, ExplorerConfig, LayoutBackend};
use crate::data::{CareerRecord, FetchResult, PlayerNameIndex, RosterRecord};

/// Identity of an outstanding fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequestKey {
	/// Career fetch for a player.
	Player(PlayerId),
	/// Roster fetch for a team-season.
	TeamSeason(TeamSeasonKey),
}

/// Ticket for an outstanding career fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRequest {
	/// Epoch the request was issued in.
	pub epoch: u64,
	/// Player whose seasons are fetched.
	pub player_id: PlayerId,
}

/// Ticket for an outstanding roster fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamSeasonRequest {
	/// Epoch the request was issued in.
	pub epoch: u64,
	/// Roster being fetched.
	pub key: TeamSeasonKey,
	/// Team abbreviation carried onto the roster links.
	pub team_abbr: String,
}

/// Fetch work a command asks the caller to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingFetch {
	/// Fetch a player's seasons.
	Player(PlayerRequest),
	/// Fetch a team-season roster.
	TeamSeason(TeamSeasonRequest),
}

/// Owns the graph state and applies every command to it.
pub struct GraphController {
	config: ExplorerConfig,
	state: GraphState,
	layout: LayoutEngine,
	names: PlayerNameIndex,
	in_flight: HashSet<RequestKey>,
	selected: Option<NodeId>,
	epoch: u64,
	revision: u64,
}

impl GraphController {
	/// Creates a controller whose graph holds only the configured root.
	pub fn new(config: ExplorerConfig) -> Self {
		let names = PlayerNameIndex::default();
		let mut controller = Self {
			state: fresh_state(&config, &names),
			layout: LayoutEngine::new(config.layout.clone()),
			config,
			names,
			in_flight: HashSet::new(),
			selected: None,
			epoch: 0,
			revision: 0,
		};
		controller.publish();
		controller
	}

	/// Active configuration.
	pub fn config(&self) -> &ExplorerConfig {
		&self.config
	}

	/// Current graph.
	pub fn state(&self) -> &GraphState {
		&self.state
	}

	/// Last clicked node still in the graph.
	pub fn selected(&self) -> Option<&NodeId> {
		self.selected.as_ref()
	}

	/// Bumped on every published change.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Player names learned so far.
	pub fn names(&self) -> &PlayerNameIndex {
		&self.names
	}

	/// Whether a fetch for `key` is outstanding.
	pub fn is_in_flight(&self, key: &RequestKey) -> bool {
		self.in_flight.contains(key)
	}

	/// Discards the graph and starts over from the configured root. Fetches
	/// still in flight will be ignored when they land.
	pub fn reset(&mut self) {
		self.epoch += 1;
		self.in_flight.clear();
		self.selected = None;
		self.layout = LayoutEngine::new(self.config.layout.clone());
		self.state = fresh_state(&self.config, &self.names);
		info!(
			"graph reset to root {} (epoch {})",
			self.config.root_player_id, self.epoch
		);
		self.publish();
	}

	/// Switches to a new root player and starts over.
	pub fn set_root(&mut self, player_id: PlayerId) {
		self.config.root_player_id = player_id;
		self.reset();
	}

	/// Adds display names and labels any unnamed players already shown.
	pub fn merge_names(&mut self, names: PlayerNameIndex) {
		self.names.merge(names);
		let unnamed: Vec<PlayerId> = self
			.state
			.nodes()
			.iter()
			.filter_map(|n| match n {
				Node::Player(p) if p.player_name.is_none() => Some(p.player_id),
				_ => None,
			})
			.collect();
		let mut changed = false;
		for player_id in unnamed {
			if let Some(name) = self.names.get(player_id) {
				changed |= self.state.enrich_player_name(player_id, name);
			}
		}
		if changed {
			self.publish();
		}
	}

	/// Handles a click on a node: selects it, then expands or collapses per
	/// the exploration mode. Returns the fetch to run, if any.
	pub fn click(&mut self, id: &NodeId) -> Option<PendingFetch> {
		let Some(node) = self.state.node(id).cloned() else {
			debug!("ignoring click on unknown node {id}");
			return None;
		};
		self.selected = Some(id.clone());

		match self.config.mode {
			ExplorationMode::Normal => {
				let pending = match node {
					Node::Player(p) => self.request_player(p.player_id).map(PendingFetch::Player),
					Node::TeamSeason(t) => {
						let key = t.key();
						if !self.state.is_team_loaded(&key) {
							self.request_team_season(key, &t.team_abbr)
								.map(PendingFetch::TeamSeason)
						} else {
							if self.state.last_active_team_season() == Some(id) {
								self.collapse_team_season(&key);
							} else {
								debug!("{id} is loaded but not the last active team, ignoring");
							}
							None
						}
					}
				};
				self.publish();
				pending
			}
			ExplorationMode::Path => {
				self.state.path.push(id.clone());
				let pending = match node {
					Node::Player(p) => {
						self.collapse_sibling_players(id);
						self.request_player(p.player_id).map(PendingFetch::Player)
					}
					Node::TeamSeason(t) => {
						self.collapse_sibling_teams(id);
						self.request_team_season(t.key(), &t.team_abbr)
							.map(PendingFetch::TeamSeason)
					}
				};
				self.publish();
				pending
			}
		}
	}

	/// Starts a player expansion unless it is done or already in flight.
	pub fn request_player(&mut self, player_id: PlayerId) -> Option<PlayerRequest> {
		if self.state.is_player_expanded(player_id) {
			debug!("player {player_id} already expanded");
			return None;
		}
		if !self.in_flight.insert(RequestKey::Player(player_id)) {
			debug!("player {player_id} expansion already in flight");
			return None;
		}
		info!("expanding player {player_id}");
		Some(PlayerRequest {
			epoch: self.epoch,
			player_id,
		})
	}

	/// Starts a roster load unless it is done or already in flight.
	pub fn request_team_season(
		&mut self,
		key: TeamSeasonKey,
		team_abbr: &str,
	) -> Option<TeamSeasonRequest> {
		if self.state.is_team_loaded(&key) {
			debug!("team-season {key} already loaded");
			return None;
		}
		if !self.in_flight.insert(RequestKey::TeamSeason(key.clone())) {
			debug!("team-season {key} load already in flight");
			return None;
		}
		info!("loading roster {key}");
		Some(TeamSeasonRequest {
			epoch: self.epoch,
			key,
			team_abbr: team_abbr.to_owned(),
		})
	}

	/// Applies a player's career records. Returns whether the response was
	/// applied (current epoch, successful fetch, player still shown).
	pub fn complete_player(
		&mut self,
		request: PlayerRequest,
		result: FetchResult<Vec<CareerRecord>>,
	) -> bool {
		if !self.accept(request.epoch, RequestKey::Player(request.player_id)) {
			return false;
		}
		let records = match result {
			Ok(records) => records,
			Err(err) => {
				warn!("expanding player {} failed: {err}", request.player_id);
				return false;
			}
		};
		if !self.state.contains_node(&NodeId::player(request.player_id)) {
			debug!("player {} left the graph before its seasons arrived", request.player_id);
			return false;
		}

		let limit = self.config.effective_season_limit();
		let (nodes, links) =
			career_expansion(request.player_id, &records, limit).apply(&mut self.state);
		self.state.expanded_players.insert(request.player_id);
		info!(
			"player {} expanded: {nodes} team-seasons, {links} links",
			request.player_id
		);
		self.publish();
		true
	}

	/// Applies a team-season roster and makes it the last active team.
	pub fn complete_team_season(
		&mut self,
		request: TeamSeasonRequest,
		result: FetchResult<Vec<RosterRecord>>,
	) -> bool {
		if !self.accept(request.epoch, RequestKey::TeamSeason(request.key.clone())) {
			return false;
		}
		let roster = match result {
			Ok(roster) => roster,
			Err(err) => {
				warn!("loading roster {} failed: {err}", request.key);
				return false;
			}
		};
		let team = request.key.node_id();
		if !self.state.contains_node(&team) {
			debug!("{team} left the graph before its roster arrived");
			return false;
		}

		self.names.record_roster(&roster);
		for entry in &roster {
			let name = entry
				.player
				.as_deref()
				.filter(|n| !n.is_empty())
				.or_else(|| self.names.get(entry.player_id));
			if let Some(name) = name {
				self.state.enrich_player_name(entry.player_id, name);
			}
		}
		let (nodes, links) = roster_expansion(&request.key, &request.team_abbr, &roster, &self.names)
			.apply(&mut self.state);
		self.state.loaded_team_seasons.insert(request.key.clone());
		self.state.last_active_team_season = Some(team);
		info!("roster {} loaded: {nodes} players, {links} links", request.key);
		self.publish();
		true
	}

	/// Normal mode: removes a loaded roster and orphaned players.
	pub fn collapse_team_season(&mut self, key: &TeamSeasonKey) -> CollapseOutcome {
		if self.config.mode != ExplorationMode::Normal || !self.state.is_team_loaded(key) {
			return CollapseOutcome::default();
		}
		let outcome = collapse::collapse_team_season(&mut self.state, key);
		self.after_collapse(&outcome);
		outcome
	}

	/// Path mode: prunes team-seasons off the path other than `keep`.
	pub fn collapse_sibling_teams(&mut self, keep: &NodeId) -> CollapseOutcome {
		if self.config.mode != ExplorationMode::Path {
			return CollapseOutcome::default();
		}
		let outcome = collapse::collapse_sibling_teams(&mut self.state, keep);
		self.after_collapse(&outcome);
		outcome
	}

	/// Path mode: prunes players off the path other than `keep` and the root.
	pub fn collapse_sibling_players(&mut self, keep: &NodeId) -> CollapseOutcome {
		if self.config.mode != ExplorationMode::Path {
			return CollapseOutcome::default();
		}
		let outcome = collapse::collapse_sibling_players(&mut self.state, keep);
		self.after_collapse(&outcome);
		outcome
	}

	/// Re-runs the layout over the current graph.
	pub fn apply_layout(&mut self) {
		self.layout.run(&mut self.state);
		self.revision += 1;
	}

	fn after_collapse(&mut self, outcome: &CollapseOutcome) {
		if outcome.is_empty() {
			return;
		}
		if let Some(selected) = &self.selected {
			if !self.state.contains_node(selected) {
				self.selected = None;
			}
		}
		self.publish();
	}

	/// Releases the in-flight slot of a landed fetch. Stale epochs are
	/// rejected without touching the current registry.
	fn accept(&mut self, epoch: u64, key: RequestKey) -> bool {
		if epoch != self.epoch {
			debug!("discarding {key:?} from epoch {epoch} (now {})", self.epoch);
			return false;
		}
		self.in_flight.remove(&key);
		true
	}

	/// Positions new nodes and announces the change to observers.
	fn publish(&mut self) {
		match self.config.layout_backend {
			LayoutBackend::Simulated => self.layout.run(&mut self.state),
			LayoutBackend::Live => {
				self.layout.place_unpositioned(&mut self.state);
			}
		}
		self.revision += 1;
	}
}

fn fresh_state(config: &ExplorerConfig, names: &PlayerNameIndex) -> GraphState {
	let name = names.get(config.root_player_id).map(str::to_owned);
	GraphState::new(PlayerNode::new(config.root_player_id, name), config.pin_root)
}
