//! Whole-book reading order.
//!
//! Previous/next links run across chapter boundaries: the page after the
//! last page of a section is the next top-level entry, not nothing.

use crate::tree::{BookTree, PageId};

/// Pages in document order: depth-first, parent before children, children in
/// manifest order.
#[must_use]
pub fn flatten(tree: &BookTree) -> Vec<PageId> {
    let mut order = Vec::with_capacity(tree.len());
    let mut stack: Vec<PageId> = tree.root().into_iter().collect();
    while let Some(id) = stack.pop() {
        order.push(id);
        stack.extend(tree.children(id).iter().rev().copied());
    }
    order
}

/// Thread prev/next links through the document order and return it.
pub fn link(tree: &mut BookTree) -> Vec<PageId> {
    let order = flatten(tree);
    for (i, &id) in order.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| order[p]);
        let next = order.get(i + 1).copied();
        tree.set_links(id, prev, next);
    }
    order
}
