use crate::graph::{GraphController, Node, NodeKind};

const PLAYER_COLOR: &str = "#1f77b4";
const TEAM_COLOR: &str = "#ff7f0e";
const ROOT_COLOR: &str = "#d62728";
const PATH_COLOR: &str = "#2ca02c";

pub const PLAYER_RADIUS: f64 = 5.0;
pub const TEAM_RADIUS: f64 = 8.0;
pub const ROOT_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
	pub id: String,
	pub label: String,
	pub color: String,
	pub radius: f64,
	pub x: f64,
	pub y: f64,
	pub fixed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLink {
	pub source: String,
	pub target: String,
	/// Both ends are on the committed path.
	pub on_path: bool,
}

/// What the canvas draws: a read-only copy of the graph at one revision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasSnapshot {
	pub revision: u64,
	pub nodes: Vec<CanvasNode>,
	pub links: Vec<CanvasLink>,
	pub selected: Option<String>,
	pub selected_label: Option<String>,
}

impl CanvasSnapshot {
	pub fn from_controller(controller: &GraphController) -> Self {
		let state = controller.state();
		let root = state.root_id();
		let path = state.path();

		let nodes = state
			.nodes()
			.iter()
			.map(|node: &Node| {
				let id = node.id();
				let (color, radius) = if id == root {
					(ROOT_COLOR, ROOT_RADIUS)
				} else {
					match node.kind() {
						NodeKind::Player => (PLAYER_COLOR, PLAYER_RADIUS),
						NodeKind::TeamSeason => (TEAM_COLOR, TEAM_RADIUS),
					}
				};
				let color = if id != root && path.len() > 1 && path.contains(id) {
					PATH_COLOR
				} else {
					color
				};
				let position = node.position().unwrap_or_default();
				CanvasNode {
					id: id.to_string(),
					label: node.label(),
					color: color.into(),
					radius,
					x: position.x,
					y: position.y,
					fixed: node.is_fixed(),
				}
			})
			.collect();

		let links = state
			.links()
			.iter()
			.map(|link| CanvasLink {
				source: link.source_id().to_string(),
				target: link.target_id().to_string(),
				on_path: path.contains(link.source_id()) && path.contains(link.target_id()),
			})
			.collect();

		let selected = controller.selected();
		Self {
			revision: controller.revision(),
			nodes,
			links,
			selected: selected.map(ToString::to_string),
			selected_label: selected.and_then(|id| state.node(id)).map(Node::label),
		}
	}
}
