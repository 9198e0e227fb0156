//! Score-to-color encoding for nodes.
//!
//! Maps an importance score in `[0, 1]` onto a red → yellow → green ramp made of
//! two linear segments meeting at `0.5`.

use super::theme::Color;

const RED: Color = Color::rgb(230, 0, 0);
const YELLOW: Color = Color::rgb(230, 255, 0);
const GREEN: Color = Color::rgb(0, 230, 0);

/// Returns the fill color for a node score.
///
/// Out-of-range scores saturate at the ends of the ramp; `NaN` is treated as `0`.
pub fn color_for(score: f64) -> Color {
	let s = if score.is_nan() {
		0.0
	} else {
		score.clamp(0.0, 1.0)
	};

	if s <= 0.5 {
		lerp_color(RED, YELLOW, s * 2.0)
	} else {
		lerp_color(YELLOW, GREEN, (s - 0.5) * 2.0)
	}
}

fn lerp_color(from: Color, to: Color, t: f64) -> Color {
	Color::rgb(
		lerp_channel(from.r, to.r, t),
		lerp_channel(from.g, to.g, t),
		lerp_channel(from.b, to.b, t),
	)
}

// Halves round up, like `Math.round` on non-negative input.
fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
	let v = start as f64 + (end as f64 - start as f64) * t;
	(v + 0.5).floor().clamp(0.0, 255.0) as u8
}
