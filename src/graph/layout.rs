//! Self-contained force-directed placement.
//!
//! Free nodes repel each other with an inverse-square force and are pulled
//! along their links by springs. Links touching the root use a longer rest
//! length and a stiffer spring so the root's direct neighbours fan out
//! further than nested ones. Fixed nodes are never moved.
//!
//! Each step moves a node by `force × step_size × damping`, clamped to
//! [`LayoutConfig::max_displacement`] so a near-coincident pair cannot fling
//! a node off screen. Set it to `f64::INFINITY` for the unclamped rule.
//!
//! This is a fixed-length simulation with no convergence check; reproducible
//! output needs a fixed [`LayoutConfig::seed`].

use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::store::GraphState;
use super::types::{NodeId, Point};

/// Constants of the layout simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Simulation steps per run.
	pub iterations: usize,
	/// Numerator of the inverse-square repulsion between free nodes.
	pub repulsion: f64,
	/// Distance floor used for force magnitudes.
	pub min_distance: f64,
	/// Spring rest length for links touching the root.
	pub root_edge_length: f64,
	/// Spring constant for links touching the root.
	pub root_stiffness: f64,
	/// Spring rest length for all other links.
	pub edge_length: f64,
	/// Spring constant for all other links.
	pub stiffness: f64,
	/// Scale from net force to displacement.
	pub step_size: f64,
	/// Velocity damping applied to every step.
	pub damping: f64,
	/// Cap on how far a node may move in one step. `f64::INFINITY` disables it.
	pub max_displacement: f64,
	/// Smallest distance from the origin for initial random placement.
	pub init_radius_min: f64,
	/// Largest distance from the origin for initial random placement.
	pub init_radius_max: f64,
	/// RNG seed; equal seeds give equal layouts.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			iterations: 150,
			repulsion: 6000.0,
			min_distance: 20.0,
			root_edge_length: 180.0,
			root_stiffness: 0.08,
			edge_length: 90.0,
			stiffness: 0.04,
			step_size: 0.5,
			damping: 0.85,
			max_displacement: 30.0,
			init_radius_min: 80.0,
			init_radius_max: 160.0,
			seed: 0x5eed,
		}
	}
}

struct Spring {
	a: usize,
	b: usize,
	length: f64,
	stiffness: f64,
}

/// Positions graph nodes. Holds the seeded RNG across runs.
pub struct LayoutEngine {
	config: LayoutConfig,
	rng: ChaCha8Rng,
}

impl LayoutEngine {
	/// Creates an engine seeded from `config.seed`.
	pub fn new(config: LayoutConfig) -> Self {
		let rng = ChaCha8Rng::seed_from_u64(config.seed);
		Self { config, rng }
	}

	/// Gives every node without a position a random spot around the origin.
	pub fn place_unpositioned(&mut self, state: &mut GraphState) -> usize {
		let missing: Vec<NodeId> = state
			.nodes()
			.iter()
			.filter(|n| n.position().is_none())
			.map(|n| n.id().clone())
			.collect();
		for id in &missing {
			let point = self.random_point();
			state.set_position(id, point);
		}
		missing.len()
	}

	/// Places unpositioned nodes, then runs the simulation and writes the
	/// free nodes' positions back. Topology is never touched.
	pub fn run(&mut self, state: &mut GraphState) {
		self.place_unpositioned(state);

		let ids: Vec<NodeId> = state.nodes().iter().map(|n| n.id().clone()).collect();
		let fixed: Vec<bool> = state.nodes().iter().map(|n| n.is_fixed()).collect();
		let mut positions: Vec<Point> = state
			.nodes()
			.iter()
			.map(|n| n.position().unwrap_or(Point::ORIGIN))
			.collect();
		if fixed.iter().all(|&f| f) {
			return;
		}

		let index: HashMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
		let root = state.root_id();
		let springs: Vec<Spring> = state
			.links()
			.iter()
			.filter_map(|l| {
				let a = *index.get(l.source_id())?;
				let b = *index.get(l.target_id())?;
				let (length, stiffness) = if l.touches(root) {
					(self.config.root_edge_length, self.config.root_stiffness)
				} else {
					(self.config.edge_length, self.config.stiffness)
				};
				Some(Spring {
					a,
					b,
					length,
					stiffness,
				})
			})
			.collect();

		let mut forces = vec![Point::ORIGIN; positions.len()];
		for _ in 0..self.config.iterations {
			forces.iter_mut().for_each(|f| *f = Point::ORIGIN);
			self.accumulate_repulsion(&positions, &fixed, &mut forces);
			self.accumulate_springs(&positions, &springs, &mut forces);
			self.integrate(&mut positions, &fixed, &forces);
		}

		for (i, id) in ids.iter().enumerate() {
			if !fixed[i] {
				state.set_position(id, positions[i]);
			}
		}
	}

	fn accumulate_repulsion(&mut self, positions: &[Point], fixed: &[bool], forces: &mut [Point]) {
		for i in 0..positions.len() {
			if fixed[i] {
				continue;
			}
			for j in (i + 1)..positions.len() {
				if fixed[j] {
					continue;
				}
				let (ux, uy, dist) = self.direction(positions[i], positions[j]);
				let dist = dist.max(self.config.min_distance);
				let magnitude = self.config.repulsion / (dist * dist);
				forces[i].x -= ux * magnitude;
				forces[i].y -= uy * magnitude;
				forces[j].x += ux * magnitude;
				forces[j].y += uy * magnitude;
			}
		}
	}

	fn accumulate_springs(&mut self, positions: &[Point], springs: &[Spring], forces: &mut [Point]) {
		for spring in springs {
			let (ux, uy, dist) = self.direction(positions[spring.a], positions[spring.b]);
			let magnitude = (dist - spring.length) * spring.stiffness;
			forces[spring.a].x += ux * magnitude;
			forces[spring.a].y += uy * magnitude;
			forces[spring.b].x -= ux * magnitude;
			forces[spring.b].y -= uy * magnitude;
		}
	}

	fn integrate(&self, positions: &mut [Point], fixed: &[bool], forces: &[Point]) {
		let scale = self.config.step_size * self.config.damping;
		for i in 0..positions.len() {
			if fixed[i] {
				continue;
			}
			let (mut dx, mut dy) = (forces[i].x * scale, forces[i].y * scale);
			let len = (dx * dx + dy * dy).sqrt();
			if len > self.config.max_displacement {
				dx *= self.config.max_displacement / len;
				dy *= self.config.max_displacement / len;
			}
			positions[i].x += dx;
			positions[i].y += dy;
		}
	}

	/// Unit vector from `from` to `to` and the distance between them.
	/// Coincident points get a random direction.
	fn direction(&mut self, from: Point, to: Point) -> (f64, f64, f64) {
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 1e-9 {
			let angle = self.rng.gen_range(0.0..TAU);
			return (angle.cos(), angle.sin(), 0.0);
		}
		(dx / dist, dy / dist, dist)
	}

	fn random_point(&mut self) -> Point {
		let angle = self.rng.gen_range(0.0..TAU);
		let radius = if self.config.init_radius_max > self.config.init_radius_min {
			self.rng
				.gen_range(self.config.init_radius_min..self.config.init_radius_max)
		} else {
			self.config.init_radius_min
		};
		Point::new(radius * angle.cos(), radius * angle.sin())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::{Link, Node, PlayerNode, TeamSeasonKey, TeamSeasonNode};

	fn distance(a: Point, b: Point) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn chain() -> GraphState {
		let mut state = GraphState::new(PlayerNode::new(1, None), true);
		let team = TeamSeasonNode::new(10, "AAA", "2010-11");
		let key = team.key();
		state.merge_nodes([
			Node::TeamSeason(team),
			Node::Player(PlayerNode::new(2, None)),
			Node::Player(PlayerNode::new(3, None)),
		]);
		state.merge_links([
			Link::membership(1, &key, "AAA"),
			Link::membership(2, &key, "AAA"),
			Link::membership(3, &key, "AAA"),
		]);
		state
	}

	fn position(state: &GraphState, id: &NodeId) -> Point {
		state.node(id).and_then(Node::position).unwrap()
	}

	#[test]
	fn test_root_stays_pinned() {
		let mut state = chain();
		LayoutEngine::new(LayoutConfig::default()).run(&mut state);
		assert_eq!(position(&state, state.root_id()), Point::ORIGIN);
	}

	#[test]
	fn test_every_node_gets_a_position() {
		let mut state = chain();
		let mut engine = LayoutEngine::new(LayoutConfig::default());
		assert_eq!(engine.place_unpositioned(&mut state), 3);
		for node in state.nodes() {
			let p = node.position().unwrap();
			assert!(p.x.is_finite() && p.y.is_finite());
		}
		assert_eq!(engine.place_unpositioned(&mut state), 0);
	}

	#[test]
	fn test_initial_placement_within_radius_range() {
		let mut state = chain();
		let config = LayoutConfig::default();
		LayoutEngine::new(config.clone()).place_unpositioned(&mut state);
		for node in state.nodes().iter().filter(|n| !n.is_fixed()) {
			let r = distance(node.position().unwrap(), Point::ORIGIN);
			assert!(r >= config.init_radius_min - 1e-9 && r <= config.init_radius_max + 1e-9);
		}
	}

	#[test]
	fn test_seeded_layout_is_reproducible() {
		let mut a = chain();
		let mut b = chain();
		LayoutEngine::new(LayoutConfig::default()).run(&mut a);
		LayoutEngine::new(LayoutConfig::default()).run(&mut b);
		for (na, nb) in a.nodes().iter().zip(b.nodes()) {
			assert_eq!(na.position(), nb.position());
		}
	}

	#[test]
	fn test_root_links_fan_out_further() {
		let mut state = chain();
		let config = LayoutConfig {
			iterations: 400,
			..LayoutConfig::default()
		};
		LayoutEngine::new(config).run(&mut state);
		let team = TeamSeasonKey::new(10, "2010-11").node_id();
		let root_to_team = distance(position(&state, state.root_id()), position(&state, &team));
		let team_to_player = distance(position(&state, &team), position(&state, &NodeId::player(2)));
		assert!(root_to_team > team_to_player);
	}

	#[test]
	fn test_step_displacement_is_capped() {
		let mut state = chain();
		LayoutEngine::new(LayoutConfig::default()).place_unpositioned(&mut state);
		let before: Vec<Point> = state.nodes().iter().filter_map(Node::position).collect();
		let config = LayoutConfig {
			iterations: 1,
			max_displacement: 2.0,
			..LayoutConfig::default()
		};
		LayoutEngine::new(config).run(&mut state);
		for (node, old) in state.nodes().iter().zip(before) {
			assert!(distance(node.position().unwrap(), old) <= 2.0 + 1e-9);
		}
	}

	#[test]
	fn test_free_nodes_repel() {
		let mut state = GraphState::new(PlayerNode::new(1, None), true);
		state.merge_nodes([
			Node::Player(PlayerNode::new(2, None)),
			Node::Player(PlayerNode::new(3, None)),
		]);
		state.set_position(&NodeId::player(2), Point::new(100.0, 0.0));
		state.set_position(&NodeId::player(3), Point::new(110.0, 0.0));
		LayoutEngine::new(LayoutConfig::default()).run(&mut state);
		let d = distance(position(&state, &NodeId::player(2)), position(&state, &NodeId::player(3)));
		assert!(d > 10.0);
	}
}
