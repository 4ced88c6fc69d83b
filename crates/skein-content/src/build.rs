//! Prefix merging: flat leaf records into an arena of directories and leaves.

use skein_torrent_core::LeafRecord;

use crate::tree::{Node, NodeId, NodeKind};

/// Build the unaggregated arena for `leaves`.
///
/// Records are stable-sorted by their joined path so that files sharing a
/// directory prefix are adjacent. The builder then only needs to remember the
/// most recently opened chain of directories: at each depth it either reuses
/// the chain entry with the same name or cuts the chain there and opens a new
/// directory. Parents are always pushed before their children.
pub(crate) fn build_nodes(mut leaves: Vec<LeafRecord>) -> Vec<Node> {
    leaves.sort_by_cached_key(LeafRecord::joined_path);

    let mut nodes = Vec::with_capacity(leaves.len() * 2 + 1);
    nodes.push(Node::directory(String::new(), Vec::new(), None));
    let mut chain: Vec<NodeId> = Vec::new();

    for record in leaves {
        let dirs = record.path.len().saturating_sub(1);
        let mut parent = NodeId(0);
        for depth in 0..dirs {
            let segment = &record.path[depth];
            let reuse = chain
                .get(depth)
                .copied()
                .filter(|id| nodes[id.0].name == *segment);
            parent = if let Some(existing) = reuse {
                existing
            } else {
                chain.truncate(depth);
                let created = push_child(
                    &mut nodes,
                    parent,
                    Node::directory(
                        segment.clone(),
                        record.path[..=depth].to_vec(),
                        Some(parent),
                    ),
                );
                chain.push(created);
                created
            };
        }
        push_child(&mut nodes, parent, Node::leaf(record, parent));
    }
    nodes
}

fn push_child(nodes: &mut Vec<Node>, parent: NodeId, node: Node) -> NodeId {
    let id = NodeId(nodes.len());
    nodes.push(node);
    if let NodeKind::Directory { children } = &mut nodes[parent.0].kind {
        children.push(id);
    }
    id
}
