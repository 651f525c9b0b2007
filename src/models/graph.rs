// file: src/models/graph.rs
// description: knowledge graph models and frontend transformation
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub content_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type: node_type.into(),
            entities: Vec::new(),
            summary: String::new(),
            key_terms: Vec::new(),
            content_preview: String::new(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Node shape the frontend visualization expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub size: u32,
    pub color: String,
    pub summary: String,
    pub key_terms: Vec<String>,
    pub content_preview: String,
}

/// Edge shape the frontend expects ("links", source/target with strength).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub strength: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendGraph {
    pub nodes: Vec<FrontendNode>,
    pub links: Vec<FrontendLink>,
}

const DEFAULT_NODE_COLOR: &str = "#888888";
const DEFAULT_LINK_STRENGTH: f32 = 0.7;

fn node_size(node_type: &str) -> u32 {
    match node_type {
        "department" => 15,
        "entity" => 12,
        _ => 10,
    }
}

impl KnowledgeGraph {
    /// Transform to the shape the frontend expects: "name" instead of
    /// "label", a size derived from the node type, and "links" with a
    /// default strength instead of labelled edges.
    pub fn to_frontend(&self) -> FrontendGraph {
        let nodes = self
            .nodes
            .iter()
            .map(|node| FrontendNode {
                id: node.id.clone(),
                name: node.label.clone(),
                node_type: node.node_type.clone(),
                size: node_size(&node.node_type),
                color: node
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
                summary: node.summary.clone(),
                key_terms: node.key_terms.clone(),
                content_preview: node.content_preview.clone(),
            })
            .collect();

        let links = self
            .edges
            .iter()
            .map(|edge| FrontendLink {
                source: edge.source.clone(),
                target: edge.target.clone(),
                link_type: edge.label.clone(),
                strength: DEFAULT_LINK_STRENGTH,
            })
            .collect();

        FrontendGraph { nodes, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_sizes_by_type() {
        assert_eq!(node_size("department"), 15);
        assert_eq!(node_size("entity"), 12);
        assert_eq!(node_size("document"), 10);
        assert_eq!(node_size("unknown"), 10);
    }

    #[test]
    fn test_to_frontend_transform() {
        let graph = KnowledgeGraph {
            nodes: vec![
                GraphNode::new("doc_0", "Policy Manual", "document"),
                GraphNode::new("entity_GDPR", "GDPR", "entity"),
            ],
            edges: vec![GraphEdge {
                source: "doc_0".to_string(),
                target: "entity_GDPR".to_string(),
                label: "contains".to_string(),
            }],
        };

        let frontend = graph.to_frontend();
        assert_eq!(frontend.nodes.len(), 2);
        assert_eq!(frontend.nodes[0].name, "Policy Manual");
        assert_eq!(frontend.nodes[0].size, 10);
        assert_eq!(frontend.nodes[1].size, 12);
        assert_eq!(frontend.links.len(), 1);
        assert_eq!(frontend.links[0].link_type, "contains");
        assert_eq!(frontend.links[0].strength, 0.7);
    }

    #[test]
    fn test_frontend_serialization_keys() {
        let graph = KnowledgeGraph {
            nodes: vec![GraphNode::new("n1", "Node", "entity")],
            edges: vec![],
        };
        let json = serde_json::to_value(graph.to_frontend()).unwrap();
        assert!(json["nodes"][0]["name"].is_string());
        assert!(json["nodes"][0]["type"].is_string());
        assert!(json["links"].is_array());
    }
}
