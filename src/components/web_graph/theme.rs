//! Visual theming for the web graph.
//!
//! Colors, stroke widths and label typography used when building a
//! [`Scene`](super::scene::Scene).

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Channel triple, ignoring alpha.
	pub const fn channels(self) -> (u8, u8, u8) {
		(self.r, self.g, self.b)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Functional notation, e.g. `rgb(230, 255, 0)`.
	pub fn to_css_rgb_fn(self) -> String {
		format!("rgb({}, {}, {})", self.r, self.g, self.b)
	}
}

/// Edge line appearance.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub width: f64,
}

/// Node circle appearance.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub border_color: Color,
	/// Stroke width of an unselected node.
	pub border_width: f64,
	/// Stroke width of the selected node.
	pub selected_border_width: f64,
}

/// Title label appearance.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	pub color: Color,
	pub font: String,
	/// Vertical offset from the node center (negative = above).
	pub offset_y: f64,
}

/// Background fill.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub label: LabelStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
			},
			edge: EdgeStyle {
				color: Color::rgb(153, 153, 153), // #999
				width: 1.5,
			},
			node: NodeStyle {
				border_color: Color::rgb(0, 0, 0),
				border_width: 0.4,
				selected_border_width: 3.0,
			},
			label: LabelStyle {
				color: Color::rgb(0, 0, 0),
				font: "12px sans-serif".to_string(),
				offset_y: -15.0,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_css_formats() {
		let c = Color::rgb(230, 255, 0);
		assert_eq!(c.to_css(), "#e6ff00");
		assert_eq!(c.to_css_rgb_fn(), "rgb(230, 255, 0)");
		assert_eq!(Color::rgba(0, 0, 0, 0.5).to_css(), "rgba(0, 0, 0, 0.5)");
	}
}
