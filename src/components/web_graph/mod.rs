//! Interactive force-directed web graph.
//!
//! Renders one or more node/edge datasets on an HTML canvas with:
//! - Dataset merging with per-dataset id namespacing and grid placement
//! - Link, collision and boundary forces with alpha cooling
//! - Node dragging (pin while held) and click-to-select
//! - Score-based node coloring (red → yellow → green)
//! - A caller-rendered info overlay for the selected node
//!
//! # Example
//!
//! ```ignore
//! use web_graph::{GraphInput, GraphSource, InfoBox, WebGraph};
//!
//! let input = GraphInput::from_json(r#"{"nodes":[{"id":"a"},{"id":"b"}],"edges":[{"source":"a","target":"b"}]}"#)?;
//! let data = Signal::stored(Some(GraphSource::new("demo", input)));
//!
//! view! {
//!     <WebGraph
//!         data=data
//!         width=800.0
//!         height=400.0
//!         render_info_box=|node| view! { <InfoBox node=node /> }.into_any()
//!     />
//! }
//! ```

pub mod color;
mod component;
pub mod config;
mod info_box;
pub mod interaction;
pub mod normalize;
mod render;
pub mod scene;
pub mod session;
pub mod simulation;
mod spatial;
pub mod theme;
mod types;

pub use color::color_for;
pub use component::WebGraph;
pub use config::{LayoutConfig, Viewport};
pub use info_box::InfoBox;
pub use session::{GraphSource, SessionChange, SimulationSession};
pub use theme::Theme;
pub use types::{Dataset, GraphEdge, GraphInput, GraphNode, NormalizedGraph, RawEdge, RawNode};
