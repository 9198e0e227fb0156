//! Default info overlay for a selected node.

use leptos::prelude::*;

use super::types::GraphNode;

const CARD_STYLE: &str = "background: white; border: 2px solid black; border-radius: 10px; padding: 10px; width: 200px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2); text-align: center; font-family: Arial, sans-serif;";
const TITLE_STYLE: &str = "font-size: 16px; font-weight: bold; border-bottom: 1px solid black; padding-bottom: 5px; margin-bottom: 10px;";

/// Sentence shown under the title.
pub fn describe(node: &GraphNode) -> String {
	format!("This is node {}, which has the color {}.", node.title, node.fill())
}

/// Card with the node's title, link and a short description.
#[component]
pub fn InfoBox(node: GraphNode) -> impl IntoView {
	let description = describe(&node);
	let href = node.link.clone();
	let link_text = node.link.clone();

	view! {
		<div style=CARD_STYLE>
			<div style=TITLE_STYLE>
				{node.title.clone()}
			</div>
			<a
				href=href
				target="_blank"
				rel="noopener noreferrer"
				style="display: block; color: blue; font-size: 14px; margin-bottom: 10px;"
			>
				{link_text}
			</a>
			<div style="font-size: 12px; text-align: left; line-height: 1.4;">{description}</div>
		</div>
	}
}
