//! Size and progress rollup.

use skein_torrent_core::fraction;

use crate::tree::Node;

/// Roll leaf sizes and completed bytes up into every directory.
///
/// Relies on parents being stored before their children: one reverse scan
/// finishes every child before its parent is read.
pub(crate) fn aggregate(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        if node.is_directory() {
            node.size = 0;
            node.completed = 0;
        }
    }
    for index in (1..nodes.len()).rev() {
        let (size, completed, parent) = {
            let node = &mut nodes[index];
            node.progress = fraction(node.completed, node.size);
            (node.size, node.completed, node.parent)
        };
        if let Some(parent) = parent {
            let parent = &mut nodes[parent.0];
            parent.size = parent.size.saturating_add(size);
            parent.completed = parent.completed.saturating_add(completed);
        }
    }
    if let Some(root) = nodes.first_mut() {
        root.progress = fraction(root.completed, root.size);
    }
}
