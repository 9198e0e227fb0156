//! Canvas rendering for the web graph.
//!
//! Paints a [`Scene`] in three passes for correct z-ordering:
//! 1. Background
//! 2. Edge lines
//! 3. Node circles, then labels on top

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::Viewport;
use super::scene::{EdgeSegment, Label, NodeCircle, Scene};
use super::theme::Theme;

/// Renders the complete frame to the canvas.
pub fn draw_scene(scene: &Scene, ctx: &CanvasRenderingContext2d, viewport: Viewport, theme: &Theme) {
	draw_background(ctx, viewport, theme);
	draw_edges(ctx, &scene.edges, theme);
	draw_nodes(ctx, &scene.nodes, theme);
	draw_labels(ctx, &scene.labels, theme);
}

fn draw_background(ctx: &CanvasRenderingContext2d, viewport: Viewport, theme: &Theme) {
	ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);
}

fn draw_edges(ctx: &CanvasRenderingContext2d, edges: &[EdgeSegment], theme: &Theme) {
	if edges.is_empty() {
		return;
	}
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	ctx.set_line_width(theme.edge.width);

	// One path for all edges: they share a stroke style.
	ctx.begin_path();
	for edge in edges {
		ctx.move_to(edge.from.0, edge.from.1);
		ctx.line_to(edge.to.0, edge.to.1);
	}
	ctx.stroke();
}

fn draw_nodes(ctx: &CanvasRenderingContext2d, nodes: &[NodeCircle], theme: &Theme) {
	let border = theme.node.border_color.to_css();
	for node in nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.fill);
		ctx.fill();

		ctx.set_stroke_style_str(&border);
		ctx.set_line_width(node.stroke_width);
		ctx.stroke();
	}
}

fn draw_labels(ctx: &CanvasRenderingContext2d, labels: &[Label], theme: &Theme) {
	ctx.set_fill_style_str(&theme.label.color.to_css());
	ctx.set_font(&theme.label.font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for label in labels {
		let _ = ctx.fill_text(&label.text, label.x, label.y);
	}
}
