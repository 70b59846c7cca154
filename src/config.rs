//! Explorer configuration: which player roots the graph, how clicks expand
//! and collapse it, and where the data lives.

use crate::graph::layout::LayoutConfig;
use crate::graph::types::PlayerId;

/// Seasons shown per player expansion in normal mode.
pub const DEFAULT_SEASON_LIMIT: usize = 3;

/// How clicks grow and shrink the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplorationMode {
	/// Every expansion stays visible; only the newest roster collapses on click.
	#[default]
	Normal,
	/// Only the current root-to-leaf branch stays visible.
	Path,
}

impl ExplorationMode {
	/// Parses a `mode` query value, case-insensitively.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"normal" => Some(Self::Normal),
			"path" => Some(Self::Path),
			_ => None,
		}
	}
}

/// Who positions the nodes on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutBackend {
	/// Positions come from the built-in layout engine and stay put.
	#[default]
	Simulated,
	/// The canvas keeps animating with its own force simulation.
	Live,
}

impl LayoutBackend {
	/// Parses a `layout` query value, case-insensitively.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"simulated" | "static" => Some(Self::Simulated),
			"live" => Some(Self::Live),
			_ => None,
		}
	}
}

/// How many team-seasons one player expansion may add.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeasonLimit {
	/// [`DEFAULT_SEASON_LIMIT`] in normal mode, every season in path mode.
	#[default]
	ModeDefault,
	/// The `n` most recent seasons.
	Limit(usize),
	/// Every season.
	All,
}

impl SeasonLimit {
	/// Parses a `limit` query value: a count or `all`.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim() {
			"all" => Some(Self::All),
			n => n.parse().ok().map(Self::Limit),
		}
	}
}

/// Everything the explorer needs to start a graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
	/// Player the graph starts from.
	pub root_player_id: PlayerId,
	/// Click policy.
	pub mode: ExplorationMode,
	/// Seasons per player expansion.
	pub season_limit: SeasonLimit,
	/// Fix the root at the origin.
	pub pin_root: bool,
	/// Prefix of every resource path.
	pub data_base_url: String,
	/// Layout engine constants.
	pub layout: LayoutConfig,
	/// Who positions the nodes on screen.
	pub layout_backend: LayoutBackend,
}

impl ExplorerConfig {
	/// Defaults for everything but the root.
	pub fn new(root_player_id: PlayerId) -> Self {
		Self {
			root_player_id,
			mode: ExplorationMode::default(),
			season_limit: SeasonLimit::ModeDefault,
			pin_root: true,
			data_base_url: "/data".into(),
			layout: LayoutConfig::default(),
			layout_backend: LayoutBackend::default(),
		}
	}

	/// Sets the click policy.
	pub fn with_mode(mut self, mode: ExplorationMode) -> Self {
		self.mode = mode;
		self
	}

	/// Sets how many seasons a player expansion adds.
	pub fn with_season_limit(mut self, limit: SeasonLimit) -> Self {
		self.season_limit = limit;
		self
	}

	/// Sets whether the root is fixed at the origin.
	pub fn with_pin_root(mut self, pin_root: bool) -> Self {
		self.pin_root = pin_root;
		self
	}

	/// Sets the prefix of every resource path.
	pub fn with_data_base_url(mut self, url: impl Into<String>) -> Self {
		self.data_base_url = url.into();
		self
	}

	/// Sets who positions the nodes on screen.
	pub fn with_layout_backend(mut self, backend: LayoutBackend) -> Self {
		self.layout_backend = backend;
		self
	}

	/// How many team-seasons one player expansion adds.
	pub fn effective_season_limit(&self) -> Option<usize> {
		match (self.season_limit, self.mode) {
			(SeasonLimit::Limit(n), _) => Some(n),
			(SeasonLimit::All, _) => None,
			(SeasonLimit::ModeDefault, ExplorationMode::Normal) => Some(DEFAULT_SEASON_LIMIT),
			(SeasonLimit::ModeDefault, ExplorationMode::Path) => None,
		}
	}

	/// Applies URL query parameters (`player`, `mode`, `limit`, `layout`,
	/// `pin`, `data`).
	/// Missing or unparsable values leave the current setting alone.
	pub fn apply_query(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(id) = get("player").and_then(|v| v.trim().parse().ok()) {
			self.root_player_id = id;
		}
		if let Some(mode) = get("mode").as_deref().and_then(ExplorationMode::parse) {
			self.mode = mode;
		}
		if let Some(limit) = get("limit").as_deref().and_then(SeasonLimit::parse) {
			self = self.with_season_limit(limit);
		}
		if let Some(backend) = get("layout").as_deref().and_then(LayoutBackend::parse) {
			self = self.with_layout_backend(backend);
		}
		if let Some(pin) = get("pin").as_deref().and_then(parse_flag) {
			self = self.with_pin_root(pin);
		}
		if let Some(url) = get("data").filter(|v| !v.trim().is_empty()) {
			self = self.with_data_base_url(url.trim());
		}
		self
	}
}

fn parse_flag(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self::new(2544)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	#[test]
	fn test_season_limit_follows_mode() {
		let normal = ExplorerConfig::new(1);
		assert_eq!(normal.effective_season_limit(), Some(3));
		let path = ExplorerConfig::new(1).with_mode(ExplorationMode::Path);
		assert_eq!(path.effective_season_limit(), None);
		let explicit = path.with_season_limit(SeasonLimit::Limit(5));
		assert_eq!(explicit.effective_season_limit(), Some(5));
		let all = ExplorerConfig::new(1).with_season_limit(SeasonLimit::All);
		assert_eq!(all.effective_season_limit(), None);
	}

	#[test]
	fn test_apply_query() {
		let query: HashMap<&str, &str> =
			HashMap::from([("player", "101108"), ("mode", "Path"), ("limit", "all"), ("layout", "live")]);
		let config = ExplorerConfig::default().apply_query(|k| query.get(k).map(|v| v.to_string()));
		assert_eq!(config.root_player_id, 101108);
		assert_eq!(config.mode, ExplorationMode::Path);
		assert_eq!(config.effective_season_limit(), None);
		assert_eq!(config.layout_backend, LayoutBackend::Live);
	}

	#[test]
	fn test_apply_query_pin_and_data() {
		let query: HashMap<&str, &str> =
			HashMap::from([("pin", "off"), ("data", "https://cdn.example.org/nba/"), ("limit", "7")]);
		let config = ExplorerConfig::default().apply_query(|k| query.get(k).map(|v| v.to_string()));
		assert!(!config.pin_root);
		assert_eq!(config.data_base_url, "https://cdn.example.org/nba/");
		assert_eq!(config.season_limit, SeasonLimit::Limit(7));
	}

	#[test]
	fn test_apply_query_ignores_garbage() {
		let query: HashMap<&str, &str> = HashMap::from([
			("player", "abc"),
			("mode", "x"),
			("limit", "-1"),
			("pin", "maybe"),
			("data", " "),
		]);
		let config = ExplorerConfig::default().apply_query(|k| query.get(k).map(|v| v.to_string()));
		assert_eq!(config, ExplorerConfig::default());
	}
}
