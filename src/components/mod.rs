//! UI components.

pub mod web_graph;
