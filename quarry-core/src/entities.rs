//! Entities served by the remote knowledge API.
//!
//! Plain data structures as they come out of the transport collaborators
//! after wire-format decompaction. The cache layer treats them as opaque
//! values apart from key and dependency extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key identifying a cached entity: the entity IRI as issued by the
/// remote API. Unique within one cache's keyspace.
pub type ItemKey = String;

/// A node of a hierarchical list.
///
/// The node route returns a single node without children; the list route
/// returns the whole tree below the root. [`ListNode::flatten`] brings
/// the two shapes in line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    /// IRI of this node.
    pub id: ItemKey,
    /// Display label, if the projection carried one.
    pub label: Option<String>,
    /// Position among the node's siblings.
    pub position: Option<i32>,
    /// IRI of the list's root node. Absent on the root itself.
    pub has_root_node: Option<ItemKey>,
    /// Direct children. Populated only by the list route.
    pub children: Vec<ListNode>,
}

impl ListNode {
    /// Flattens the tree below `self` into a vec, root first.
    ///
    /// `children` is cleared on every returned node, so a node looks the
    /// same whether it came from the node route or out of a flattened
    /// list.
    pub fn flatten(self) -> Vec<ListNode> {
        let mut nodes = Vec::new();
        self.collect_into(&mut nodes);
        nodes
    }

    fn collect_into(mut self, nodes: &mut Vec<ListNode>) {
        let children = std::mem::take(&mut self.children);
        nodes.push(self);
        for child in children {
            child.collect_into(nodes);
        }
    }
}

/// An ontology definition with its direct imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ontology {
    /// IRI of the ontology.
    pub id: ItemKey,
    /// Display label, if the projection carried one.
    pub label: Option<String>,
    /// When the ontology was last changed on the server.
    pub last_modification_date: Option<DateTime<Utc>>,
    /// IRIs of the ontologies this one directly imports. Imports may be
    /// mutual; consumers must tolerate cycles.
    pub depends_on: Vec<ItemKey>,
}
