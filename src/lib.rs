//! web-graph: Interactive force-directed graph visualization for web link datasets.
//!
//! This crate provides a WASM-based canvas component that lays out one or more
//! node/edge datasets with a force simulation, colors nodes by score, and lets
//! users drag nodes and select them to show an info overlay.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement, Window};

pub mod components;

pub use components::web_graph::{
	GraphInput, GraphNode, GraphSource, InfoBox, LayoutConfig, WebGraph, color_for,
};

/// Name used when the data script carries no `data-name`.
const DEFAULT_GRAPH_NAME: &str = "graph";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("web-graph: logging initialized");
}

fn script_text(document: &Document, id: &str) -> Option<(HtmlScriptElement, String)> {
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let text = script.text().ok()?;
	Some((script, text))
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] } or an array of those.
/// The graph's identity comes from the element's `data-name` attribute.
fn load_graph_source(document: &Document) -> Option<GraphSource> {
	let (script, json_text) = script_text(document, "graph-data")?;
	let name = script
		.get_attribute("data-name")
		.unwrap_or_else(|| DEFAULT_GRAPH_NAME.to_string());

	match GraphInput::from_json(&json_text) {
		Ok(input) => {
			info!(
				"web-graph: loaded graph {:?} with {} nodes",
				name,
				input.node_count()
			);
			Some(GraphSource::new(name, input))
		}
		Err(e) => {
			warn!("web-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load layout overrides from a script element with id="graph-config".
fn load_layout_config(document: &Document) -> LayoutConfig {
	let Some((_, json_text)) = script_text(document, "graph-config") else {
		return LayoutConfig::default();
	};
	LayoutConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("web-graph: failed to parse graph config: {}", e);
		LayoutConfig::default()
	})
}

/// Main application component.
/// Loads graph data from DOM and renders the web graph, or a notice when there is none.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let document = web_sys::window().and_then(|w: Window| w.document());
	let source = document.as_ref().and_then(load_graph_source);
	let config = document
		.as_ref()
		.map(load_layout_config)
		.unwrap_or_default();
	let has_data = source.is_some();
	let data = Signal::stored(source);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="WebGraph Example" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div>
			<h1>"WebGraph Example"</h1>
			<Show
				when=move || has_data
				fallback=|| view! { <p>"No data found for this graph."</p> }
			>
				<WebGraph
					data=data
					width=800.0
					height=400.0
					config=config.clone()
					render_info_box=|node: GraphNode| view! { <InfoBox node=node /> }.into_any()
				/>
			</Show>
		</div>
	}
}
