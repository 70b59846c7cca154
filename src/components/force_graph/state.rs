use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::CanvasSnapshot;

pub const HIT_RADIUS: f64 = 12.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	pub radius: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	/// Pinned nodes register the press for click detection but never move.
	pub locked: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Keep stepping the host simulation every frame.
	pub animation_running: bool,
	pub revision: u64,
	pub selected: Option<String>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	path_edges: HashSet<(DefaultNodeIdx, DefaultNodeIdx)>,
	fixed: HashSet<DefaultNodeIdx>,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(snapshot: &CanvasSnapshot, width: f64, height: f64, live: bool) -> Self {
		let mut state = Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: live,
			revision: 0,
			selected: None,
			edges: Vec::new(),
			path_edges: HashSet::new(),
			fixed: HashSet::new(),
		};
		state.load(snapshot);
		state
	}

	/// Replaces the drawn graph with a newer snapshot. In live mode nodes
	/// that survive keep their simulated positions instead of jumping back.
	pub fn load(&mut self, snapshot: &CanvasSnapshot) {
		let mut carried: HashMap<String, (f32, f32)> = HashMap::new();
		if self.animation_running {
			self.graph.visit_nodes(|node| {
				carried.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
			});
		}

		self.graph = simulation();
		self.edges.clear();
		self.path_edges.clear();
		self.fixed.clear();
		self.drag = DragState::default();
		self.hover = HoverState::default();

		let mut id_to_idx = HashMap::new();
		for node in &snapshot.nodes {
			let (x, y) = match carried.get(&node.id) {
				Some(&pos) if !node.fixed => pos,
				_ => (node.x as f32, node.y as f32),
			};
			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: node.fixed,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					radius: node.radius,
				},
			});
			if node.fixed {
				self.fixed.insert(idx);
			}
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for link in &snapshot.links {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) {
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push((src, tgt));
				if link.on_path {
					self.path_edges.insert((src, tgt));
				}
			}
		}

		self.revision = snapshot.revision;
		self.selected = snapshot.selected.clone();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			let hit = HIT_RADIUS.max(node.data.user_data.radius);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn is_fixed(&self, idx: DefaultNodeIdx) -> bool {
		self.fixed.contains(&idx)
	}

	pub fn is_path_edge(&self, src: DefaultNodeIdx, tgt: DefaultNodeIdx) -> bool {
		self.path_edges.contains(&(src, tgt))
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_deref() == Some(id)
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{CanvasLink, CanvasNode};

	fn snapshot() -> CanvasSnapshot {
		let node = |id: &str, x: f64, fixed: bool| CanvasNode {
			id: id.into(),
			label: id.into(),
			color: "#fff".into(),
			radius: 5.0,
			x,
			y: 0.0,
			fixed,
		};
		CanvasSnapshot {
			revision: 3,
			nodes: vec![node("player-1", 0.0, true), node("team-2-2001-02", 100.0, false)],
			links: vec![CanvasLink {
				source: "player-1".into(),
				target: "team-2-2001-02".into(),
				on_path: true,
			}],
			selected: Some("player-1".into()),
			selected_label: None,
		}
	}

	#[test]
	fn test_hit_testing_maps_to_node_ids() {
		let state = ForceGraphState::new(&snapshot(), 800.0, 600.0, false);
		let root = state.node_at_position(400.0, 300.0).unwrap();
		assert_eq!(state.node_id(root).as_deref(), Some("player-1"));
		assert!(state.is_fixed(root));
		let team = state.node_at_position(500.0, 300.0).unwrap();
		assert_eq!(state.node_id(team).as_deref(), Some("team-2-2001-02"));
		assert!(state.is_path_edge(root, team));
		assert!(state.node_at_position(10.0, 10.0).is_none());
		assert!(state.is_selected("player-1"));
		assert_eq!(state.revision, 3);
	}

	#[test]
	fn test_static_tick_keeps_positions() {
		let mut state = ForceGraphState::new(&snapshot(), 800.0, 600.0, false);
		state.tick(0.016);
		assert!(state.node_at_position(500.0, 300.0).is_some());
	}

	#[test]
	fn test_live_tick_keeps_anchor() {
		let mut state = ForceGraphState::new(&snapshot(), 800.0, 600.0, true);
		for _ in 0..30 {
			state.tick(0.016);
		}
		let root = state.node_at_position(400.0, 300.0).unwrap();
		assert_eq!(state.node_id(root).as_deref(), Some("player-1"));
	}
}
