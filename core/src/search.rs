//! Client-side name search over an accumulated list.

use crate::types::Resource;

/// Items whose name contains `query`, ignoring case, in list order.
/// An empty query returns every item.
pub fn filter_by_name<'a, T: Resource>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}
