use crate::content::{ContentItem, NavigationLink};
use std::collections::HashMap;

/// Links for every item of a collection, index-aligned with `items`.
///
/// Active items are chained by ascending `order`; equal orders keep their
/// position in `items`. Inactive items get empty links.
#[must_use]
pub fn compute_links(items: &[ContentItem]) -> Vec<NavigationLink> {
    let mut active: Vec<(usize, &ContentItem)> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_active)
        .collect();
    active.sort_by_key(|(_, item)| item.order);

    let mut links = vec![NavigationLink::default(); items.len()];
    for (pos, (index, _)) in active.iter().enumerate() {
        let prev = pos
            .checked_sub(1)
            .and_then(|p| active.get(p))
            .map(|(_, item)| item.key.as_str());
        let next = active
            .get(pos.saturating_add(1))
            .map(|(_, item)| item.key.as_str());
        if let Some(slot) = links.get_mut(*index) {
            *slot = NavigationLink::between(prev, next);
        }
    }
    links
}

/// Recompute links in place. Returns the keys whose links changed.
pub fn relink(items: &mut [ContentItem]) -> Vec<String> {
    let links = compute_links(items);
    let mut changed = Vec::new();
    for (item, link) in items.iter_mut().zip(links) {
        if item.links != link {
            item.links = link;
            changed.push(item.key.clone());
        }
    }
    changed
}

/// Keys visited by following `nextKey` from the head of the active chain.
///
/// Stops at a missing key or on revisiting a key, so a corrupt chain yields
/// a short walk rather than a loop.
#[must_use]
pub fn walk_chain(items: &[ContentItem]) -> Vec<String> {
    let by_key: HashMap<&str, &ContentItem> = items
        .iter()
        .filter(|item| item.is_active)
        .map(|item| (item.key.as_str(), item))
        .collect();
    let mut cursor = items
        .iter()
        .find(|item| item.is_active && item.prev_key().is_none());
    let mut visited = Vec::new();
    while let Some(item) = cursor {
        if visited.contains(&item.key) {
            break;
        }
        visited.push(item.key.clone());
        cursor = item.next_key().and_then(|next| by_key.get(next).copied());
    }
    visited
}
