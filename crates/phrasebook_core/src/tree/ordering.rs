//! Sibling ordering shared by every hierarchy level.
//!
//! # Invariants
//! - Moves only ever swap two adjacent siblings.
//! - Boundary moves (first up, last down) leave the list untouched.
//! - Projected order is the dense sequence `0..n-1`.

use crate::model::template::OrderEntry;
use uuid::Uuid;

/// Direction of an adjacent-swap move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Swaps `id` with its neighbour in `direction`.
///
/// Returns `true` when a swap happened. Unknown ids and boundary moves are
/// no-ops that return `false`.
pub fn move_sibling<T: PartialEq>(list: &mut [T], id: &T, direction: MoveDirection) -> bool {
    let Some(index) = list.iter().position(|item| item == id) else {
        return false;
    };

    match direction {
        MoveDirection::Up if index > 0 => {
            list.swap(index, index - 1);
            true
        }
        MoveDirection::Down if index + 1 < list.len() => {
            list.swap(index, index + 1);
            true
        }
        _ => false,
    }
}

/// Projects sibling positions into persisted order entries.
pub fn dense_order(ids: &[Uuid]) -> Vec<OrderEntry> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| OrderEntry {
            id: *id,
            display_order: index as i64,
        })
        .collect()
}
