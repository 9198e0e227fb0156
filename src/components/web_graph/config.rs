//! Layout tuning parameters.
//!
//! All simulation and placement constants live here so the simulator can be
//! exercised with alternate values. Every struct deserializes with
//! `#[serde(default)]`, letting a host page override any subset as JSON.
//!
//! # Alpha
//!
//! `alpha` is the simulation energy. It starts at [`AlphaConfig::initial`],
//! moves towards `alpha_target` by [`AlphaConfig::decay`] each tick, and the
//! simulation idles once it drops below [`AlphaConfig::min`] with a zero target.

use serde::Deserialize;

/// Canvas extent in graph units. Placement and boundary bounds both use it.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(800.0, 600.0)
	}
}

/// Spring between linked nodes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
	/// Target separation between linked node centers.
	pub distance: f64,
	/// Fraction of the length error corrected per tick at `alpha = 1`.
	pub strength: f64,
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self {
			distance: 100.0,
			strength: 0.1,
		}
	}
}

/// Overlap repulsion between node circles.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
	pub strength: f64,
	/// Node count above which candidate pairs come from a spatial grid
	/// instead of an all-pairs scan.
	pub grid_threshold: usize,
}

impl Default for CollisionConfig {
	fn default() -> Self {
		Self {
			strength: 0.9,
			grid_threshold: 256,
		}
	}
}

/// Simulation energy schedule.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
	pub initial: f64,
	pub min: f64,
	/// Per-tick fraction of the distance to the target covered.
	pub decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_target: f64,
	/// Alpha applied when the graph is swapped or the viewport changes.
	pub reheat: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl Default for AlphaConfig {
	fn default() -> Self {
		let min: f64 = 0.001;
		Self {
			initial: 1.0,
			min,
			// ~300 ticks from 1.0 down to `min`
			decay: 1.0 - min.powf(1.0 / 300.0),
			drag_target: 0.3,
			reheat: 0.3,
			velocity_decay: 0.4,
		}
	}
}

/// Initial placement and attribute defaults used by the normalizer.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
	/// Offset between grid cells when several datasets are merged.
	pub dataset_spacing: f64,
	/// Datasets per grid row.
	pub grid_columns: usize,
	/// Radius for nodes without a usable `size`.
	pub default_node_size: f64,
	/// Score for nodes without a usable `score`/`page_rank`.
	pub default_score: f64,
}

impl Default for PlacementConfig {
	fn default() -> Self {
		Self {
			dataset_spacing: 200.0,
			grid_columns: 3,
			default_node_size: 5.0,
			default_score: 0.0,
		}
	}
}

/// Pointer interpretation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Maximum pointer travel (canvas px) for a press to count as a click.
	pub click_tolerance: f64,
	/// Extra hit radius around each node circle.
	pub hit_padding: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			click_tolerance: 3.0,
			hit_padding: 2.0,
		}
	}
}

/// Complete layout configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub link: LinkConfig,
	pub collision: CollisionConfig,
	pub alpha: AlphaConfig,
	pub placement: PlacementConfig,
	pub interaction: InteractionConfig,
}

impl LayoutConfig {
	/// Parses a partial JSON override on top of the defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_alpha_decay_reaches_min_in_300_ticks() {
		let alpha = AlphaConfig::default();
		let mut a = alpha.initial;
		for _ in 0..300 {
			a += (0.0 - a) * alpha.decay;
		}
		assert!((a - alpha.min).abs() < 1e-9);
	}

	#[test]
	fn test_partial_json_override_keeps_defaults() {
		let config =
			LayoutConfig::from_json(r#"{ "link": { "distance": 60 }, "placement": { "grid_columns": 4 } }"#)
				.unwrap();
		assert_eq!(config.link.distance, 60.0);
		assert_eq!(config.link.strength, 0.1);
		assert_eq!(config.placement.grid_columns, 4);
		assert_eq!(config.placement.dataset_spacing, 200.0);
		assert_eq!(config.collision.strength, 0.9);
	}

	#[test]
	fn test_empty_json_is_default() {
		let config = LayoutConfig::from_json("{}").unwrap();
		assert_eq!(config.interaction.click_tolerance, 3.0);
		assert_eq!(Viewport::default(), Viewport::new(800.0, 600.0));
	}
}
