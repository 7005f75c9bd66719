//! Favorite channel ids.

/// Insertion-ordered set of favorited channel ids.
///
/// Ids that no longer exist in the catalog are kept (a later catalog may bring
/// them back) but never render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: Vec<String>,
}

impl FavoriteSet {
    /// Build from persisted ids, dropping repeats.
    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut set = Self::default();
        for id in ids {
            set.insert(&id);
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns `false` if the id was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|f| f != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_kept() {
        let mut set = FavoriteSet::default();
        set.insert("c");
        set.insert("a");
        set.insert("b");
        assert_eq!(set.ids(), &["c", "a", "b"]);
    }

    #[test]
    fn test_insert_twice_is_noop() {
        let mut set = FavoriteSet::default();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_ids_dedupes() {
        let set = FavoriteSet::from_ids(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(set.ids(), &["a", "b"]);
    }

    #[test]
    fn test_remove_missing() {
        let mut set = FavoriteSet::from_ids(vec!["a".into()]);
        assert!(!set.remove("z"));
        assert!(set.remove("a"));
        assert!(set.is_empty());
    }
}
