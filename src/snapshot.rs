use serde::{Deserialize, Serialize};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Opaque handle the platform assigns to a node when it builds a snapshot.
/// Passed back through `Navigator::activate` to act on the live element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// One element of a UI tree snapshot: a coarse widget role, optional text,
/// optional accessible description, and child nodes.
///
/// A snapshot is an owned value cloned out of the platform at fetch time.
/// The engine never mutates it and never keeps it past the tick that
/// fetched it; the live UI may have changed the instant after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticNode {
    pub id: NodeId,
    pub role: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub children: Vec<SemanticNode>,
}

impl SemanticNode {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: NodeId::default(),
            role: role.into(),
            text: None,
            description: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = NodeId(id);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SemanticNode>) -> Self {
        self.children = children;
        self
    }

    /// Missing text is treated as empty, never as an error.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Missing description is treated as empty, never as an error.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Pre-order walk. The visitor returns true to stop early.
    pub fn visit(&self, visitor: &mut impl FnMut(&SemanticNode) -> bool) -> bool {
        if visitor(self) {
            return true;
        }
        for child in &self.children {
            if child.visit(visitor) {
                return true;
            }
        }
        false
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SemanticNode::node_count).sum::<usize>()
    }
}

/// Dump the full hierarchy at debug level. Extremely noisy on real screens;
/// gated behind the module flag.
pub fn dump_hierarchy(node: &SemanticNode) {
    dump_hierarchy_inner(node, 0);
}

fn dump_hierarchy_inner(node: &SemanticNode, depth: usize) {
    log_debug!(
        "{}role={} text={:?} description={:?}",
        "  ".repeat(depth),
        node.role,
        node.text_or_empty(),
        node.description_or_empty()
    );
    for child in &node.children {
        dump_hierarchy_inner(child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_and_description_read_as_empty() {
        let node = SemanticNode::new("android.view.ViewGroup");
        assert_eq!(node.text_or_empty(), "");
        assert_eq!(node.description_or_empty(), "");
    }

    #[test]
    fn visit_walks_pre_order_and_stops_early() {
        let tree = SemanticNode::new("root").with_children(vec![
            SemanticNode::new("a").with_children(vec![SemanticNode::new("a1")]),
            SemanticNode::new("b"),
        ]);

        let mut seen = Vec::new();
        tree.visit(&mut |n| {
            seen.push(n.role.clone());
            false
        });
        assert_eq!(seen, vec!["root", "a", "a1", "b"]);

        let mut visited = 0;
        let stopped = tree.visit(&mut |n| {
            visited += 1;
            n.role == "a"
        });
        assert!(stopped);
        assert_eq!(visited, 2);
    }

    #[test]
    fn node_count_includes_all_descendants() {
        let tree = SemanticNode::new("root").with_children(vec![
            SemanticNode::new("a").with_children(vec![SemanticNode::new("a1")]),
            SemanticNode::new("b"),
        ]);
        assert_eq!(tree.node_count(), 4);
    }
}
