//! `node-types.json` metadata.
//!
//! tree-sitter emits a `node-types.json` next to every generated parser
//! describing the node kinds it can produce. Only the fields needed to
//! identify node kinds are deserialized.

use serde::Deserialize;

/// One entry of a grammar's `node-types.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeTypeInfo {
	/// Node kind as reported by the parser.
	#[serde(rename = "type")]
	pub kind: String,
	/// Whether the node is named (as opposed to an anonymous token).
	pub named: bool,
	/// Supertype nodes list the kinds they stand for.
	#[serde(default)]
	pub subtypes: Vec<NodeTypeRef>,
}

/// Reference to a node kind from inside another entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeTypeRef {
	#[serde(rename = "type")]
	pub kind: String,
	pub named: bool,
}

impl NodeTypeInfo {
	/// Returns true for supertype entries.
	pub fn is_supertype(&self) -> bool {
		!self.subtypes.is_empty()
	}
}

/// Parses the contents of a `node-types.json` file.
pub fn parse_node_types(json: &str) -> Result<Vec<NodeTypeInfo>, serde_json::Error> {
	serde_json::from_str(json)
}
