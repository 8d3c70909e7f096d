//! Tree traversal primitives
//!
//! Every rule, detector and metric in this crate locates plan nodes through
//! these functions. All of them walk the tree in pre-order (parent first,
//! then children left to right) and never fail.

use crate::explain::plan::PlanNode;
use std::collections::BTreeSet;

/// Returns every node in `root`'s subtree matching `predicate`, in pre-order
pub fn find_nodes<'a>(
    root: &'a PlanNode,
    predicate: impl Fn(&PlanNode) -> bool,
) -> Vec<&'a PlanNode> {
    root.iter_nodes().filter(|node| predicate(*node)).collect()
}

/// Returns every node in `root`'s subtree whose type tag equals `type_name`,
/// in pre-order.
pub fn find_nodes_by_type<'a>(root: &'a PlanNode, type_name: &str) -> Vec<&'a PlanNode> {
    find_nodes(root, |node| node.node_type == type_name)
}

/// Returns the set of type tags occurring anywhere in `root`'s subtree
pub fn collect_distinct_types(root: &PlanNode) -> BTreeSet<String> {
    root.iter_nodes().map(|node| node.node_type.clone()).collect()
}
