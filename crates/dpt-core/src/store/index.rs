//! In-memory origin index: file name -> origin host.

use std::collections::{HashMap, HashSet};

/// Process-local mapping from downloaded file name to the host that supplied
/// it. Owned by the store behind a single mutex; every operation here is plain
/// map work so lock sections stay short.
#[derive(Debug, Default)]
pub(super) struct OriginIndex {
    entries: HashMap<String, String>,
}

impl OriginIndex {
    /// Insert only if `file_name` is not yet present (first write wins).
    /// Returns true when the entry was inserted.
    pub(super) fn insert_new(&mut self, file_name: &str, host: &str) -> bool {
        if self.entries.contains_key(file_name) {
            return false;
        }
        self.entries.insert(file_name.to_string(), host.to_string());
        true
    }

    /// Remove the entry for `file_name`. Returns true when one existed.
    pub(super) fn remove(&mut self, file_name: &str) -> bool {
        self.entries.remove(file_name).is_some()
    }

    /// Move the entry for `old` to `new`, keeping the host. Any entry already
    /// under `new` is overwritten. Returns true when `old` was known.
    pub(super) fn rename(&mut self, old: &str, new: &str) -> bool {
        match self.entries.remove(old) {
            Some(host) => {
                self.entries.insert(new.to_string(), host);
                true
            }
            None => false,
        }
    }

    pub(super) fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    pub(super) fn contains(&self, file_name: &str) -> bool {
        self.entries.contains_key(file_name)
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Replace the whole mapping (load path). Later duplicates win, so a
    /// persisted file with repeated keys resolves to its last occurrence.
    pub(super) fn replace(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.entries = entries.into_iter().collect();
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop every key without a matching name in `live`. Returns the number
    /// of entries removed.
    pub(super) fn prune_missing(&mut self, live: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, _| live.contains(name));
        before - self.entries.len()
    }

    /// Sorted point-in-time copy for serialization outside the lock.
    pub(super) fn snapshot(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(name, host)| (name.clone(), host.clone()))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_write_wins() {
        let mut index = OriginIndex::default();
        assert!(index.insert_new("report.pdf", "example.com"));
        assert!(!index.insert_new("report.pdf", "other.org"));
        assert_eq!(index.get("report.pdf"), Some("example.com"));
    }

    #[test]
    fn rename_preserves_host_and_overwrites_target() {
        let mut index = OriginIndex::default();
        index.insert_new("a.txt", "a.example");
        index.insert_new("b.txt", "b.example");
        assert!(index.rename("a.txt", "b.txt"));
        assert!(!index.contains("a.txt"));
        assert_eq!(index.get("b.txt"), Some("a.example"));
        assert!(!index.rename("a.txt", "c.txt"));
    }

    #[test]
    fn prune_missing_drops_only_stale_keys() {
        let mut index = OriginIndex::default();
        index.insert_new("keep.iso", "cdn.example.com");
        index.insert_new("gone.iso", "cdn.example.com");
        let live: HashSet<String> = ["keep.iso".to_string(), "unrelated.txt".to_string()]
            .into_iter()
            .collect();
        assert_eq!(index.prune_missing(&live), 1);
        assert!(index.contains("keep.iso"));
        assert!(!index.contains("gone.iso"));
    }

    #[test]
    fn replace_resolves_duplicates_to_last_occurrence() {
        let mut index = OriginIndex::default();
        index.insert_new("old.bin", "stale.example");
        index.replace(vec![
            ("x.txt".to_string(), "first.example".to_string()),
            ("x.txt".to_string(), "second.example".to_string()),
        ]);
        assert!(!index.contains("old.bin"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("x.txt"), Some("second.example"));
    }

    #[test]
    fn snapshot_is_sorted_by_file_name() {
        let mut index = OriginIndex::default();
        index.insert_new("b.txt", "b.example");
        index.insert_new("a.txt", "a.example");
        assert_eq!(
            index.snapshot(),
            vec![
                ("a.txt".to_string(), "a.example".to_string()),
                ("b.txt".to_string(), "b.example".to_string()),
            ]
        );
    }
}
