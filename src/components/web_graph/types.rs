//! Graph data structures: the raw JSON input and the normalized working records.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::color::color_for;

/// A node as it appears in upstream JSON. Ids are only unique within their dataset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawNode {
	/// Node id. Numbers are accepted and stringified; anything else leaves it unset
	/// and the node is skipped during normalization.
	#[serde(default, deserialize_with = "lenient_id")]
	pub id: Option<String>,
	#[serde(default, deserialize_with = "lenient_string")]
	pub title: Option<String>,
	#[serde(default, deserialize_with = "lenient_string")]
	pub link: Option<String>,
	/// Visual radius.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub size: Option<f64>,
	/// Importance score in `[0, 1]`.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub score: Option<f64>,
	/// Page-rank style score, used when `score` is absent.
	#[serde(default, deserialize_with = "lenient_f64")]
	pub page_rank: Option<f64>,
	/// Explicit CSS fill color; takes precedence over `score`.
	#[serde(default, deserialize_with = "lenient_string")]
	pub color: Option<String>,
	#[serde(default, deserialize_with = "lenient_f64")]
	pub x: Option<f64>,
	#[serde(default, deserialize_with = "lenient_f64")]
	pub y: Option<f64>,
	/// Every other field of the upstream record.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl RawNode {
	/// `score`, falling back to `page_rank`.
	pub fn importance(&self) -> Option<f64> {
		self.score.or(self.page_rank)
	}
}

/// An edge as it appears in upstream JSON, referencing ids of its own dataset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEdge {
	#[serde(default, deserialize_with = "lenient_id")]
	pub source: Option<String>,
	#[serde(default, deserialize_with = "lenient_id")]
	pub target: Option<String>,
}

/// One `{ nodes, edges }` object. Either list may be missing, in which case the
/// dataset is treated as empty. List entries that are not objects are dropped.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
	#[serde(default, deserialize_with = "lenient_list")]
	pub nodes: Option<Vec<RawNode>>,
	#[serde(default, alias = "links", deserialize_with = "lenient_list")]
	pub edges: Option<Vec<RawEdge>>,
}

impl Dataset {
	/// Both lists, or `None` when the dataset is missing either of them.
	pub fn parts(&self) -> Option<(&[RawNode], &[RawEdge])> {
		match (&self.nodes, &self.edges) {
			(Some(nodes), Some(edges)) => Some((nodes, edges)),
			_ => None,
		}
	}
}

/// Complete graph input: a single dataset, or several to be merged side by side.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum GraphInput {
	Many(Vec<Dataset>),
	Single(Dataset),
}

impl GraphInput {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Total raw node count across all datasets.
	pub fn node_count(&self) -> usize {
		match self {
			GraphInput::Single(d) => d.nodes.as_ref().map_or(0, Vec::len),
			GraphInput::Many(ds) => ds
				.iter()
				.map(|d| d.nodes.as_ref().map_or(0, Vec::len))
				.sum(),
		}
	}
}

impl Default for GraphInput {
	fn default() -> Self {
		GraphInput::Single(Dataset::default())
	}
}

/// A positioned node in the working graph. Ids are globally unique.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub x: f64,
	pub y: f64,
	/// Visual and collision radius.
	pub size: f64,
	/// Importance score, clamped to `[0, 1]`.
	pub score: f64,
	pub title: String,
	pub link: String,
	pub color: Option<String>,
	/// Pinned x coordinate; overrides simulated motion while set.
	pub fx: Option<f64>,
	/// Pinned y coordinate; overrides simulated motion while set.
	pub fy: Option<f64>,
	pub extra: Map<String, Value>,
}

impl GraphNode {
	/// CSS fill: the explicit `color` if present, else derived from `score`.
	pub fn fill(&self) -> String {
		self.color
			.clone()
			.unwrap_or_else(|| color_for(self.score).to_css_rgb_fn())
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// An undirected link between two node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
}

/// Output of normalization: one merged node list and one merged edge list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedGraph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl NormalizedGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	})
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::String(s) => Some(s),
		_ => None,
	})
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: serde::de::DeserializeOwned,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Array(items) => Some(
			items
				.into_iter()
				.filter_map(|item| serde_json::from_value(item).ok())
				.collect(),
		),
		_ => None,
	})
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
	Ok(Value::deserialize(deserializer)?
		.as_f64()
		.filter(|v| v.is_finite()))
}
