//! Simulation lifecycle keyed by dataset identity.
//!
//! A [`GraphSource`] pairs a caller-chosen name with shared input data. The
//! session normalizes and creates a simulation for a new name, swaps refreshed
//! data into the running simulation when only the data changed, and leaves
//! everything untouched when handed the same source again.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use rand::Rng;

use super::config::{LayoutConfig, Viewport};
use super::normalize::normalize;
use super::simulation::Simulation;
use super::types::{GraphInput, NormalizedGraph};

/// Input data tagged with the identity it belongs to.
#[derive(Clone, Debug)]
pub struct GraphSource {
	pub name: String,
	pub input: Arc<GraphInput>,
}

impl GraphSource {
	pub fn new(name: impl Into<String>, input: GraphInput) -> Self {
		Self {
			name: name.into(),
			input: Arc::new(input),
		}
	}

	/// Same identity, updated data.
	pub fn refreshed(&self, input: GraphInput) -> Self {
		Self {
			name: self.name.clone(),
			input: Arc::new(input),
		}
	}
}

impl PartialEq for GraphSource {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && Arc::ptr_eq(&self.input, &other.input)
	}
}

/// What [`SimulationSession::sync`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionChange {
	/// A new identity: normalized from scratch into a fresh simulation.
	Created,
	/// Same identity with new data: swapped into the running simulation.
	Refreshed,
	/// Same source as before: nothing to do.
	Unchanged,
	/// No source: the previous simulation was dropped.
	Discarded,
}

struct ActiveGraph {
	source: GraphSource,
	simulation: Simulation,
}

/// Owns at most one live [`Simulation`] and decides when to rebuild it.
pub struct SimulationSession {
	config: LayoutConfig,
	viewport: Viewport,
	active: Option<ActiveGraph>,
}

impl SimulationSession {
	pub fn new(viewport: Viewport, config: LayoutConfig) -> Self {
		Self {
			config,
			viewport,
			active: None,
		}
	}

	/// Brings the session in line with `source`.
	pub fn sync<R: Rng>(&mut self, source: Option<&GraphSource>, rng: &mut R) -> SessionChange {
		let Some(source) = source else {
			return match self.active.take() {
				Some(old) => {
					info!("web-graph: discarded graph {:?}", old.source.name);
					SessionChange::Discarded
				}
				None => SessionChange::Unchanged,
			};
		};

		match &mut self.active {
			Some(active) if active.source == *source => SessionChange::Unchanged,
			Some(active) if active.source.name == source.name => {
				let mut graph = normalize(&source.input, self.viewport, &self.config.placement, rng);
				carry_positions(&mut graph, &active.simulation);
				info!(
					"web-graph: refreshed graph {:?} with {} nodes, {} edges",
					source.name,
					graph.nodes.len(),
					graph.edges.len()
				);
				active.simulation.replace_graph(graph);
				active.source = source.clone();
				SessionChange::Refreshed
			}
			_ => {
				let graph = normalize(&source.input, self.viewport, &self.config.placement, rng);
				info!(
					"web-graph: created graph {:?} with {} nodes, {} edges",
					source.name,
					graph.nodes.len(),
					graph.edges.len()
				);
				self.active = Some(ActiveGraph {
					source: source.clone(),
					simulation: Simulation::new(graph, self.viewport, self.config.clone()),
				});
				SessionChange::Created
			}
		}
	}

	/// `true` when [`sync`](Self::sync) with `source` would be a no-op.
	pub fn is_current(&self, source: Option<&GraphSource>) -> bool {
		match (&self.active, source) {
			(Some(active), Some(source)) => active.source == *source,
			(None, None) => true,
			_ => false,
		}
	}

	/// Drops the live simulation, if any.
	pub fn discard(&mut self) {
		self.active = None;
	}

	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		if let Some(active) = &mut self.active {
			active.simulation.set_viewport(viewport);
		}
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Advances the live simulation. `false` when there is none or it has cooled.
	pub fn tick(&mut self) -> bool {
		self.active
			.as_mut()
			.is_some_and(|active| active.simulation.tick())
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.active.as_ref().map(|a| &a.simulation)
	}

	pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
		self.active.as_mut().map(|a| &mut a.simulation)
	}

	pub fn source_name(&self) -> Option<&str> {
		self.active.as_ref().map(|a| a.source.name.as_str())
	}
}

/// Keeps positions and pins of nodes that survive a data refresh.
fn carry_positions(graph: &mut NormalizedGraph, previous: &Simulation) {
	let old: HashMap<&str, _> = previous
		.nodes()
		.iter()
		.map(|n| (n.id.as_str(), (n.x, n.y, n.fx, n.fy)))
		.collect();
	for node in &mut graph.nodes {
		if let Some(&(x, y, fx, fy)) = old.get(node.id.as_str()) {
			node.x = x;
			node.y = y;
			node.fx = fx;
			node.fy = fy;
		}
	}
}
