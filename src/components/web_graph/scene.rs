//! Browser-independent description of one frame.
//!
//! [`Scene::build`] snapshots the live simulation into draw primitives in
//! paint order: edges first, then node circles, then labels on top.

use super::simulation::Simulation;
use super::theme::Theme;

/// A straight edge between two current node centers.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSegment {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeCircle {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	/// CSS fill color.
	pub fill: String,
	pub stroke_width: f64,
	pub selected: bool,
}

/// A title centered on `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
	pub x: f64,
	pub y: f64,
	pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub edges: Vec<EdgeSegment>,
	pub nodes: Vec<NodeCircle>,
	pub labels: Vec<Label>,
}

impl Scene {
	pub fn build(sim: &Simulation, selected: Option<&str>, theme: &Theme) -> Self {
		let edges = sim
			.resolved_edges()
			.map(|(s, t)| EdgeSegment {
				from: (s.x, s.y),
				to: (t.x, t.y),
			})
			.collect();

		let mut nodes = Vec::with_capacity(sim.nodes().len());
		let mut labels = Vec::with_capacity(sim.nodes().len());
		for node in sim.nodes() {
			let is_selected = selected == Some(node.id.as_str());
			nodes.push(NodeCircle {
				x: node.x,
				y: node.y,
				radius: node.size,
				fill: node.fill(),
				stroke_width: if is_selected {
					theme.node.selected_border_width
				} else {
					theme.node.border_width
				},
				selected: is_selected,
			});
			labels.push(Label {
				x: node.x,
				y: node.y + theme.label.offset_y,
				text: node.title.clone(),
			});
		}

		Self { edges, nodes, labels }
	}
}

#[cfg(test)]
mod tests {
	use serde_json::Map;

	use super::super::config::{LayoutConfig, Viewport};
	use super::super::types::{GraphEdge, GraphNode, NormalizedGraph};
	use super::*;

	fn node(id: &str, x: f64, y: f64, score: f64, color: Option<&str>) -> GraphNode {
		GraphNode {
			id: id.to_string(),
			x,
			y,
			size: 10.0,
			score,
			title: format!("Node{id}"),
			link: String::new(),
			color: color.map(str::to_string),
			fx: None,
			fy: None,
			extra: Map::new(),
		}
	}

	fn sim() -> Simulation {
		Simulation::new(
			NormalizedGraph {
				nodes: vec![
					node("1", 100.0, 120.0, 0.2, None),
					node("2", 300.0, 220.0, 0.6, Some("steelblue")),
				],
				edges: vec![
					GraphEdge {
						source: "1".into(),
						target: "2".into(),
					},
					GraphEdge {
						source: "1".into(),
						target: "missing".into(),
					},
				],
			},
			Viewport::default(),
			LayoutConfig::default(),
		)
	}

	#[test]
	fn test_scene_mirrors_simulation() {
		let scene = Scene::build(&sim(), None, &Theme::default());

		assert_eq!(
			scene.edges,
			vec![EdgeSegment {
				from: (100.0, 120.0),
				to: (300.0, 220.0)
			}]
		);
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.nodes[0].fill, "rgb(230, 102, 0)");
		assert_eq!(scene.nodes[1].fill, "steelblue");
		assert_eq!(
			scene.labels[0],
			Label {
				x: 100.0,
				y: 105.0,
				text: "Node1".into()
			}
		);
	}

	#[test]
	fn test_selected_node_gets_heavy_stroke() {
		let scene = Scene::build(&sim(), Some("2"), &Theme::default());
		assert_eq!(scene.nodes[0].stroke_width, 0.4);
		assert!(!scene.nodes[0].selected);
		assert_eq!(scene.nodes[1].stroke_width, 3.0);
		assert!(scene.nodes[1].selected);
	}

	#[test]
	fn test_empty_simulation_builds_empty_scene() {
		let sim = Simulation::new(NormalizedGraph::default(), Viewport::default(), LayoutConfig::default());
		assert_eq!(Scene::build(&sim, Some("x"), &Theme::default()), Scene::default());
	}
}
