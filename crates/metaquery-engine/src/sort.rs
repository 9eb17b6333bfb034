//! In-memory ordering
//!
//! Orders compare type-dispatched values; a null on either side, or an
//! incomparable pair, compares equal and falls through to the next key. Such a
//! comparator is not a total order, so sorting uses a merge sort that stays
//! stable and well-defined for any comparator.

use std::cmp::Ordering;

use metaquery_criteria::Order;
use metaquery_schema::{Object, Value};

/// Sort `objects` by `orders`, keeping input order between equal rows
pub fn sort_objects(objects: Vec<Object>, orders: &[Order]) -> Vec<Object> {
    if orders.is_empty() {
        return objects;
    }
    let keyed: Vec<(Vec<Value>, Object)> = objects
        .into_iter()
        .map(|object| {
            let keys = orders.iter().map(|o| o.property().read(&object)).collect();
            (keys, object)
        })
        .collect();

    stable_sort_by(keyed, &|(a, _), (b, _)| compare_keys(orders, a, b))
        .into_iter()
        .map(|(_, object)| object)
        .collect()
}

/// Multi-key comparison; ties on one key fall through to the next
pub fn compare_keys(orders: &[Order], a: &[Value], b: &[Value]) -> Ordering {
    orders
        .iter()
        .zip(a.iter().zip(b))
        .map(|(order, (x, y))| order.compare(x, y))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Stable top-down merge sort
pub(crate) fn stable_sort_by<T>(mut items: Vec<T>, compare: &impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = stable_sort_by(items, compare);
    let right = stable_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Take from the right only when strictly smaller, so ties keep left first
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            _ => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
