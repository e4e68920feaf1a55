//! Position bookkeeping for the visits of one day.
//!
//! Items carry a 1-based `order`. New items are appended, removals leave gaps,
//! and every drag rewrites the whole day to `1..=N` in display order.

use thiserror::Error;

use crate::models::itinerary::{OrderUpdate, ScheduleItem};

pub trait Sequenced {
    fn id(&self) -> &str;
    fn order(&self) -> i64;
}

impl Sequenced for ScheduleItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl Sequenced for OrderUpdate {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("position {index} is out of range for a day with {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// Order for an item appended to a day that currently holds `items`.
pub fn next_order<T: Sequenced>(items: &[T]) -> i64 {
    items.len() as i64 + 1
}

/// Sorts by `order`, ties broken by id so the rendering is stable.
pub fn sort_for_display<T: Sequenced>(items: &mut [T]) {
    items.sort_by(|a, b| a.order().cmp(&b.order()).then_with(|| a.id().cmp(b.id())));
}

/// Applies a drag from `source` to `destination` over the rendered list and
/// returns the full set of order updates to persist.
///
/// `None` as destination means the drop was cancelled: nothing changes.
pub fn reorder<T: Sequenced>(
    rendered: &[T],
    source: usize,
    destination: Option<usize>,
) -> Result<Option<Vec<OrderUpdate>>, OrderingError> {
    let Some(destination) = destination else {
        return Ok(None);
    };
    let len = rendered.len();
    if source >= len {
        return Err(OrderingError::OutOfRange { index: source, len });
    }
    if destination >= len {
        return Err(OrderingError::OutOfRange {
            index: destination,
            len,
        });
    }

    let mut ids: Vec<&str> = rendered.iter().map(Sequenced::id).collect();
    let moved = ids.remove(source);
    ids.insert(destination, moved);

    Ok(Some(
        ids.into_iter()
            .enumerate()
            .map(|(index, id)| OrderUpdate {
                id: id.to_string(),
                order: index as i64 + 1,
            })
            .collect(),
    ))
}

/// True when the orders are exactly `1..=N` in some arrangement.
pub fn is_contiguous<T: Sequenced>(items: &[T]) -> bool {
    let mut orders: Vec<i64> = items.iter().map(Sequenced::order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(index, order)| *order == index as i64 + 1)
}
