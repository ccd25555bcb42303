//! Keyed list diff
//!
//! Menus and panel lists are updated in place: entries whose key survives
//! are left alone, only vanished keys are removed and only new keys added.

/// Entries to remove and to add, each in list order
#[derive(Debug)]
pub struct Diff<'a, T> {
    pub removed: Vec<&'a T>,
    pub added: Vec<&'a T>,
}

impl<T> Diff<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

pub fn diff<'a, T, K, F>(prev: &'a [T], next: &'a [T], key: F) -> Diff<'a, T>
where
    K: PartialEq,
    F: Fn(&'a T) -> K,
{
    let prev_keys: Vec<K> = prev.iter().map(&key).collect();
    let next_keys: Vec<K> = next.iter().map(&key).collect();

    let removed = prev
        .iter()
        .zip(&prev_keys)
        .filter(|(_, k)| !next_keys.contains(k))
        .map(|(item, _)| item)
        .collect();
    let added = next
        .iter()
        .zip(&next_keys)
        .filter(|(_, k)| !prev_keys.contains(k))
        .map(|(item, _)| item)
        .collect();

    Diff { removed, added }
}
