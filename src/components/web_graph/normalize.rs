//! Dataset normalization.
//!
//! Merges one or more raw datasets into a single [`NormalizedGraph`]:
//!
//! - In multi-dataset mode every dataset gets its own grid cell offset and its
//!   ids are namespaced as `"{index}-{id}"`, so datasets sharing ids never collide.
//! - Edges are translated through a per-dataset remap table; edges naming an id
//!   that is not in their own dataset are dropped.
//! - Nodes without coordinates are scattered uniformly over the viewport,
//!   shifted by their dataset's offset.
//!
//! Normalization never fails. Malformed datasets contribute nothing.

use std::collections::HashMap;

use log::debug;
use rand::Rng;

use super::config::{PlacementConfig, Viewport};
use super::types::{Dataset, GraphEdge, GraphInput, GraphNode, NormalizedGraph, RawNode};

/// Merges `input` into one positioned working graph.
pub fn normalize<R: Rng>(
	input: &GraphInput,
	viewport: Viewport,
	placement: &PlacementConfig,
	rng: &mut R,
) -> NormalizedGraph {
	let mut graph = NormalizedGraph::default();

	match input {
		GraphInput::Single(dataset) => {
			let scope = DatasetScope {
				index: 0,
				namespaced: false,
				offset: (0.0, 0.0),
			};
			merge_dataset(&mut graph, dataset, &scope, viewport, placement, rng);
		}
		GraphInput::Many(datasets) => {
			let columns = placement.grid_columns.max(1);
			for (index, dataset) in datasets.iter().enumerate() {
				let scope = DatasetScope {
					index,
					namespaced: true,
					offset: (
						(index % columns) as f64 * placement.dataset_spacing,
						(index / columns) as f64 * placement.dataset_spacing,
					),
				};
				merge_dataset(&mut graph, dataset, &scope, viewport, placement, rng);
			}
		}
	}

	graph
}

/// Where a dataset lands in the merged graph.
struct DatasetScope {
	index: usize,
	namespaced: bool,
	offset: (f64, f64),
}

impl DatasetScope {
	fn global_id(&self, id: &str) -> String {
		if self.namespaced {
			format!("{}-{}", self.index, id)
		} else {
			id.to_string()
		}
	}
}

fn merge_dataset<R: Rng>(
	graph: &mut NormalizedGraph,
	dataset: &Dataset,
	scope: &DatasetScope,
	viewport: Viewport,
	placement: &PlacementConfig,
	rng: &mut R,
) {
	let Some((nodes, edges)) = dataset.parts() else {
		debug!(
			"web-graph: dataset {} is missing nodes or edges, skipping",
			scope.index
		);
		return;
	};

	let mut remap: HashMap<&str, String> = HashMap::with_capacity(nodes.len());
	for raw in nodes {
		let Some(local_id) = raw.id.as_deref() else {
			debug!("web-graph: node without id in dataset {}", scope.index);
			continue;
		};
		if remap.contains_key(local_id) {
			debug!(
				"web-graph: duplicate node id {:?} in dataset {}",
				local_id, scope.index
			);
			continue;
		}

		let id = scope.global_id(local_id);
		remap.insert(local_id, id.clone());
		graph
			.nodes
			.push(build_node(raw, id, local_id, scope, viewport, placement, rng));
	}

	let mut dropped = 0usize;
	for edge in edges {
		let resolved = edge
			.source
			.as_deref()
			.and_then(|s| remap.get(s))
			.zip(edge.target.as_deref().and_then(|t| remap.get(t)));
		match resolved {
			Some((source, target)) => graph.edges.push(GraphEdge {
				source: source.clone(),
				target: target.clone(),
			}),
			None => dropped += 1,
		}
	}
	if dropped > 0 {
		debug!(
			"web-graph: dropped {} dangling edges in dataset {}",
			dropped, scope.index
		);
	}
}

fn build_node<R: Rng>(
	raw: &RawNode,
	id: String,
	local_id: &str,
	scope: &DatasetScope,
	viewport: Viewport,
	placement: &PlacementConfig,
	rng: &mut R,
) -> GraphNode {
	let (ox, oy) = scope.offset;
	let x = raw
		.x
		.unwrap_or_else(|| ox + rng.random::<f64>() * viewport.width);
	let y = raw
		.y
		.unwrap_or_else(|| oy + rng.random::<f64>() * viewport.height);

	let size = raw
		.size
		.filter(|s| *s > 0.0)
		.unwrap_or(placement.default_node_size);
	let score = raw
		.importance()
		.unwrap_or(placement.default_score)
		.clamp(0.0, 1.0);

	GraphNode {
		id,
		x,
		y,
		size,
		score,
		title: raw.title.clone().unwrap_or_else(|| local_id.to_string()),
		link: raw.link.clone().unwrap_or_default(),
		color: raw.color.clone(),
		fx: None,
		fy: None,
		extra: raw.extra.clone(),
	}
}
