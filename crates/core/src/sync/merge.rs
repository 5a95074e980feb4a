//! Merge a freshly fetched history window into the cached items.

use std::collections::HashSet;

use crate::VisitedItem;

/// Merge `fresh` (most recent first) with the items carried over from the
/// previous cache.
///
/// The first occurrence of a key or url in `fresh` wins, so a page visited
/// several times in the window keeps only its latest visit. Carried items
/// follow the fresh ones and are dropped when their key or url reappears in
/// `fresh`. Pass `None` for `carried` on a full resync.
pub fn merge_window<I>(fresh: I, carried: Option<&[VisitedItem]>) -> Vec<VisitedItem>
where
    I: IntoIterator<Item = VisitedItem>,
{
    let mut keys = HashSet::new();
    let mut urls = HashSet::new();
    let mut merged = Vec::new();

    for item in fresh {
        if keys.contains(&item.key) || urls.contains(&item.url) {
            continue;
        }
        keys.insert(item.key);
        urls.insert(item.url.clone());
        merged.push(item);
    }

    if let Some(previous) = carried {
        merged.extend(
            previous
                .iter()
                .filter(|item| !keys.contains(&item.key) && !urls.contains(&item.url))
                .cloned(),
        );
    }

    merged
}
