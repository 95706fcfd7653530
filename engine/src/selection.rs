//! Tri-state selection over the levels of one group.
//!
//! A toggle flips the node, pushes the new state down to every descendant and
//! then re-derives each ancestor from its immediate children, following
//! `parent_key` one level up at a time. All traversals use explicit stacks or
//! loops so deep hierarchies cannot exhaust the call stack.

use crate::host::IdentityToken;
use crate::node::{Level, SelectionState, ValueNode};
use indexmap::IndexSet;

/// Flips the node at `levels[depth]`, index `index`. Returns its new state,
/// or `None` when the address does not exist.
pub(crate) fn toggle(levels: &mut [Level], depth: usize, index: usize) -> Option<SelectionState> {
    let node = levels.get_mut(depth)?.node_mut(index)?;
    let target = if node.is_selected() {
        SelectionState::Unselected
    } else {
        SelectionState::Selected
    };
    let parent_key = node.parent_key().map(str::to_string);

    cascade(levels, depth, index, target);
    recompute_ancestors(levels, depth, parent_key);
    Some(target)
}

/// Sets the node and its whole subtree to `state`.
fn cascade(levels: &mut [Level], depth: usize, index: usize, state: SelectionState) {
    let mut pending = vec![(depth, index)];
    while let Some((depth, index)) = pending.pop() {
        let Some(node) = levels.get_mut(depth).and_then(|level| level.node_mut(index)) else {
            continue;
        };
        node.set_state(state);
        pending.extend(node.children().iter().map(|&child| (depth + 1, child)));
    }
}

fn recompute_ancestors(levels: &mut [Level], mut depth: usize, mut parent_key: Option<String>) {
    while let Some(key) = parent_key.take() {
        if depth == 0 || depth >= levels.len() {
            break;
        }
        let (upper, lower) = levels.split_at_mut(depth);
        let parent_level = &mut upper[depth - 1];
        let child_level = &lower[0];

        let Some(parent_index) = parent_level.index_of(&key) else {
            log::warn!(
                "level '{}': parent '{}' not found, recomputation stopped",
                parent_level.name(),
                key
            );
            break;
        };
        let Some(parent) = parent_level.node_mut(parent_index) else {
            break;
        };

        let state = SelectionState::from_children(
            parent
                .children()
                .iter()
                .filter_map(|&child| child_level.node(child))
                .map(ValueNode::state),
        );
        parent.set_state(state);

        parent_key = parent.parent_key().map(str::to_string);
        depth -= 1;
    }
}

/// Resets every node of the group.
pub(crate) fn clear(levels: &mut [Level]) {
    for node in levels.iter_mut().flat_map(Level::nodes_mut) {
        node.set_state(SelectionState::Unselected);
    }
}

/// Appends the identities of selected nodes, level by level, in node order.
pub(crate) fn collect_selected(levels: &[Level], identities: &mut IndexSet<IdentityToken>) {
    identities.extend(
        levels
            .iter()
            .flat_map(Level::nodes)
            .filter(|node| node.is_selected())
            .map(|node| node.identity().clone()),
    );
}
