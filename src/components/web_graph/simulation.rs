//! Force-directed layout simulation.
//!
//! Owns the working node arena and advances it one tick at a time:
//!
//! 1. Alpha (energy) moves towards its target with exponential decay.
//! 2. Link force pulls linked pairs towards the configured separation.
//! 3. Collision force pushes apart circles that overlap, using a spatial grid
//!    once the graph is large enough.
//! 4. Velocities decay and are integrated; pinned nodes snap to `(fx, fy)`.
//! 5. Every node is clamped inside the viewport.
//!
//! The simulation idles once alpha falls below its minimum with a zero target,
//! and is reheated when the graph is swapped or a drag begins.

use std::collections::HashMap;

use super::config::{LayoutConfig, Viewport};
use super::spatial::SpatialGrid;
use super::types::{GraphEdge, GraphNode, NormalizedGraph};

/// An edge resolved to arena indices.
#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	/// Share of the correction applied to the target (`1 - bias` goes to the source).
	bias: f64,
}

/// Live layout state for one graph.
pub struct Simulation {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	links: Vec<Link>,
	velocities: Vec<(f64, f64)>,
	index: HashMap<String, usize>,
	grid: SpatialGrid,
	viewport: Viewport,
	config: LayoutConfig,
	alpha: f64,
	alpha_target: f64,
	ticks: u64,
}

impl Simulation {
	pub fn new(graph: NormalizedGraph, viewport: Viewport, config: LayoutConfig) -> Self {
		let alpha = config.alpha.initial;
		let mut sim = Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			links: Vec::new(),
			velocities: Vec::new(),
			index: HashMap::new(),
			grid: SpatialGrid::new(1.0),
			viewport,
			config,
			alpha,
			alpha_target: 0.0,
			ticks: 0,
		};
		sim.load(graph);
		sim
	}

	/// Swaps in a new node/edge set and reheats so the layout adapts live.
	pub fn replace_graph(&mut self, graph: NormalizedGraph) {
		self.load(graph);
		self.reheat(self.config.alpha.reheat);
	}

	fn load(&mut self, graph: NormalizedGraph) {
		self.nodes = graph.nodes;
		self.edges = graph.edges;
		self.velocities = vec![(0.0, 0.0); self.nodes.len()];
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();

		let mut degree = vec![0usize; self.nodes.len()];
		let resolved: Vec<(usize, usize)> = self
			.edges
			.iter()
			.filter_map(|e| Some((*self.index.get(&e.source)?, *self.index.get(&e.target)?)))
			.collect();
		for &(s, t) in &resolved {
			degree[s] += 1;
			degree[t] += 1;
		}
		self.links = resolved
			.into_iter()
			.map(|(source, target)| Link {
				source,
				target,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();
	}

	/// Changes the boundary, re-clamping pins, and reheats.
	pub fn set_viewport(&mut self, viewport: Viewport) {
		if self.viewport == viewport {
			return;
		}
		self.viewport = viewport;
		for node in &mut self.nodes {
			if let Some(fx) = node.fx {
				node.fx = Some(contain(fx, node.size, viewport.width));
			}
			if let Some(fy) = node.fy {
				node.fy = Some(contain(fy, node.size, viewport.height));
			}
		}
		self.reheat(self.config.alpha.reheat);
	}

	/// Advances the layout by one step. Returns `false` without doing anything
	/// once the simulation has cooled.
	pub fn tick(&mut self) -> bool {
		if self.is_cooled() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha.decay;
		self.apply_links();
		self.apply_collisions();
		self.integrate();
		self.contain_all();
		self.ticks += 1;
		true
	}

	fn apply_links(&mut self) {
		let (distance, strength) = (self.config.link.distance, self.config.link.strength);
		let scale = self.alpha * strength;
		let seed = self.ticks as f64;

		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (link.source, link.target);
			if s == t {
				continue;
			}
			let (vs, vt) = (self.velocities[s], self.velocities[t]);
			let mut dx = self.nodes[t].x + vt.0 - self.nodes[s].x - vs.0;
			let mut dy = self.nodes[t].y + vt.1 - self.nodes[s].y - vs.1;
			if dx == 0.0 {
				dx = jiggle(seed + i as f64);
			}
			if dy == 0.0 {
				dy = jiggle(seed - i as f64 - 0.5);
			}
			let len = dx.hypot(dy);
			if len == 0.0 {
				continue;
			}

			let k = (len - distance) / len * scale;
			let (dx, dy) = (dx * k, dy * k);
			self.velocities[t].0 -= dx * link.bias;
			self.velocities[t].1 -= dy * link.bias;
			self.velocities[s].0 += dx * (1.0 - link.bias);
			self.velocities[s].1 += dy * (1.0 - link.bias);
		}
	}

	fn apply_collisions(&mut self) {
		let count = self.nodes.len();
		let use_grid = count > self.config.collision.grid_threshold;
		let strength = self.config.collision.strength;
		let seed = self.ticks as f64 * 0.37;
		let Self {
			nodes,
			velocities,
			grid,
			..
		} = self;

		if use_grid {
			let max_radius = nodes.iter().map(|n| n.size).fold(0.0, f64::max);
			grid.reset(max_radius * 2.0);
			for (i, (node, v)) in nodes.iter().zip(velocities.iter()).enumerate() {
				grid.insert(i, node.x + v.0, node.y + v.1);
			}
			for i in 0..count {
				let (xi, yi) = (nodes[i].x + velocities[i].0, nodes[i].y + velocities[i].1);
				grid.for_each_nearby(xi, yi, |j| {
					if j > i {
						collide_pair(nodes, velocities, i, j, xi, yi, strength, seed);
					}
				});
			}
		} else {
			for i in 0..count {
				let (xi, yi) = (nodes[i].x + velocities[i].0, nodes[i].y + velocities[i].1);
				for j in (i + 1)..count {
					collide_pair(nodes, velocities, i, j, xi, yi, strength, seed);
				}
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.alpha.velocity_decay;
		let (cx, cy) = (self.viewport.width / 2.0, self.viewport.height / 2.0);

		for (node, v) in self.nodes.iter_mut().zip(self.velocities.iter_mut()) {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					v.0 = 0.0;
				}
				None => {
					v.0 *= keep;
					node.x += v.0;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					v.1 = 0.0;
				}
				None => {
					v.1 *= keep;
					node.y += v.1;
				}
			}

			if !node.x.is_finite() || !v.0.is_finite() {
				node.x = cx;
				v.0 = 0.0;
			}
			if !node.y.is_finite() || !v.1.is_finite() {
				node.y = cy;
				v.1 = 0.0;
			}
		}
	}

	fn contain_all(&mut self) {
		let Viewport { width, height } = self.viewport;
		for node in &mut self.nodes {
			node.x = contain(node.x, node.size, width);
			node.y = contain(node.y, node.size, height);
		}
	}

	/// `true` once energy is below the minimum and nothing holds it up.
	pub fn is_cooled(&self) -> bool {
		let min = self.config.alpha.min;
		self.alpha < min && self.alpha_target < min
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Sets the current energy directly, restarting a cooled simulation.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = alpha.max(0.0);
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.max(0.0);
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn node(&self, index: usize) -> Option<&GraphNode> {
		self.nodes.get(index)
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Edges whose endpoints both exist, with the current endpoint records.
	pub fn resolved_edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode)> {
		self.links
			.iter()
			.map(|l| (&self.nodes[l.source], &self.nodes[l.target]))
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Topmost node whose hit circle contains `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let padding = self.config.interaction.hit_padding;
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| (n.x - x).hypot(n.y - y) <= n.size + padding)
			.map(|(i, _)| i)
	}

	/// Write access limited to pins and drag energy, for the interaction layer.
	pub fn pins(&mut self) -> PinHandle<'_> {
		PinHandle { sim: self }
	}
}

/// Capability handle over a [`Simulation`]: reads positions, writes only
/// `fx`/`fy` and the alpha target.
pub struct PinHandle<'a> {
	sim: &'a mut Simulation,
}

impl PinHandle<'_> {
	pub fn position(&self, index: usize) -> Option<(f64, f64)> {
		self.sim.nodes.get(index).map(|n| (n.x, n.y))
	}

	pub fn id(&self, index: usize) -> Option<&str> {
		self.sim.nodes.get(index).map(|n| n.id.as_str())
	}

	/// Fixes a node at `(x, y)`, clamped to the boundary.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		let Viewport { width, height } = self.sim.viewport;
		if let Some(node) = self.sim.nodes.get_mut(index) {
			node.fx = Some(contain(x, node.size, width));
			node.fy = Some(contain(y, node.size, height));
		}
	}

	/// Releases a node back to simulated motion.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.sim.nodes.get_mut(index) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Holds the simulation warm for the duration of a drag.
	pub fn warm(&mut self) {
		let target = self.sim.config.alpha.drag_target;
		self.sim.set_alpha_target(target);
		if self.sim.alpha < target {
			self.sim.reheat(target);
		}
	}

	/// Lets energy decay back to rest.
	pub fn settle(&mut self) {
		self.sim.set_alpha_target(0.0);
	}
}

/// Clamps a center coordinate so a circle of `radius` stays inside `[0, extent]`.
/// Circles wider than the extent sit at its middle.
fn contain(value: f64, radius: f64, extent: f64) -> f64 {
	let (lo, hi) = (radius, extent - radius);
	if lo > hi || !value.is_finite() {
		return extent / 2.0;
	}
	value.max(lo).min(hi)
}

#[allow(clippy::too_many_arguments)]
fn collide_pair(
	nodes: &[GraphNode],
	velocities: &mut [(f64, f64)],
	i: usize,
	j: usize,
	xi: f64,
	yi: f64,
	strength: f64,
	seed: f64,
) {
	let (ri, rj) = (nodes[i].size, nodes[j].size);
	let r = ri + rj;
	let mut dx = xi - (nodes[j].x + velocities[j].0);
	let mut dy = yi - (nodes[j].y + velocities[j].1);
	let mut l = dx * dx + dy * dy;
	if l >= r * r {
		return;
	}

	if dx == 0.0 {
		dx = jiggle(seed + (i * 31 + j) as f64);
		l += dx * dx;
	}
	if dy == 0.0 {
		dy = jiggle(seed - (j * 17 + i) as f64 - 0.5);
		l += dy * dy;
	}
	let l = l.sqrt();
	if l == 0.0 {
		return;
	}

	let k = (r - l) / l * strength;
	let (dx, dy) = (dx * k, dy * k);
	let (ri2, rj2) = (ri * ri, rj * rj);
	let share = rj2 / (ri2 + rj2);
	velocities[i].0 += dx * share;
	velocities[i].1 += dy * share;
	velocities[j].0 -= dx * (1.0 - share);
	velocities[j].1 -= dy * (1.0 - share);
}

/// Tiny deterministic nudge that separates exactly coincident coordinates.
fn jiggle(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	let r = x - x.floor() - 0.5;
	if r == 0.0 { 1e-7 } else { r * 1e-6 }
}
