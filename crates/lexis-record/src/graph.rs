//! Visualization graph projection
//!
//! Turns a record into the node and edge lists a renderer draws. Positions are
//! left to the rendering layer; this module only decides which nodes exist and
//! how they connect.
//!
//! Every part yields two nodes: the word chunk itself and an `origin-<id>`
//! node carrying its etymology. Combinations draw their part sources from the
//! origin node, so the rendered DAG reads chunk → origin → combination.

use crate::record::DecompositionRecord;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

/// Id of the placeholder node emitted for records without parts
pub const NO_DATA_ID: &str = "no-data";

/// Placeholder text for records without parts
pub const NO_DATA_TEXT: &str = "No etymological data available";

/// What a projected node represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    /// A slice of the word
    WordChunk { text: String },
    /// Etymology of one word chunk
    #[serde(rename_all = "camelCase")]
    Origin {
        original_word: String,
        origin: String,
        meaning: String,
    },
    /// A combination node
    Combined {
        text: String,
        definition: String,
        layer: usize,
    },
    /// Shown in place of an empty decomposition
    NoData { text: String },
}

/// A node in the projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// A directed edge from `source` to `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("edge-{source}-{target}"),
            source,
            target,
        }
    }
}

/// Errors raised when ordering a projection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The projection contains a cycle through `node`
    #[error("cycle detected at node '{node}'")]
    CycleDetected { node: String },
}

/// Renderable node and edge lists for one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Id of the origin node paired with part `part_id`
#[inline]
#[must_use]
pub fn origin_id(part_id: &str) -> String {
    format!("origin-{part_id}")
}

impl GraphProjection {
    /// Project a record into nodes and edges
    ///
    /// Sources that do not resolve to a node created so far are skipped
    /// rather than drawn as dangling edges. Empty layers contribute nothing.
    #[must_use]
    pub fn from_record(record: &DecompositionRecord) -> Self {
        let mut projection = Self::default();

        if record.parts.is_empty() {
            projection.nodes.push(GraphNode {
                id: NO_DATA_ID.to_string(),
                kind: NodeKind::NoData {
                    text: NO_DATA_TEXT.to_string(),
                },
            });
            return projection;
        }

        for part in &record.parts {
            let origin = origin_id(&part.id);
            projection.nodes.push(GraphNode {
                id: part.id.clone(),
                kind: NodeKind::WordChunk {
                    text: part.text.clone(),
                },
            });
            projection.nodes.push(GraphNode {
                id: origin.clone(),
                kind: NodeKind::Origin {
                    original_word: part.original_word.clone(),
                    origin: part.origin.clone(),
                    meaning: part.meaning.clone(),
                },
            });
            projection.edges.push(GraphEdge::between(&part.id, origin));
        }

        for (layer, combos) in record.combinations.iter().enumerate() {
            for combo in combos {
                projection.nodes.push(GraphNode {
                    id: combo.id.clone(),
                    kind: NodeKind::Combined {
                        text: combo.text.clone(),
                        definition: combo.definition.clone(),
                        layer,
                    },
                });

                for source in combo.source_ids.iter().filter(|s| !s.is_empty()) {
                    let actual = if record.is_part(source) {
                        origin_id(source)
                    } else {
                        source.clone()
                    };
                    if projection.contains(&actual) {
                        projection.edges.push(GraphEdge::between(actual, &combo.id));
                    }
                }
            }
        }

        projection
    }

    /// Whether a node with `id` has been projected
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Node ids ordered so every edge points forward
    ///
    /// # Errors
    /// `GraphError::CycleDetected` if an edge closes a loop, e.g. a combination
    /// listing itself as a source.
    pub fn topological_order(&self) -> Result<Vec<&str>, GraphError> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        for node in &self.nodes {
            graph.add_node(node.id.as_str());
        }
        for edge in &self.edges {
            graph.add_edge(edge.source.as_str(), edge.target.as_str(), ());
        }

        toposort(&graph, None).map_err(|cycle| GraphError::CycleDetected {
            node: cycle.node_id().to_string(),
        })
    }
}
