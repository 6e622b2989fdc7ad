use std::collections::HashMap;

use serde::Serialize;

/// Append-only string to index registry. Indexes are stable for the
/// lifetime of the registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamedIndex {
    names: Vec<String>,
    #[serde(skip)]
    lookup: HashMap<String, usize>,
}

impl NamedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `name`, adding it if not yet registered.
    pub fn add_name(&mut self, name: &str) -> usize {
        if let Some(index) = self.lookup.get(name) {
            return *index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), index);
        index
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First registered name starting with `prefix`.
    pub fn find_index_name_starts(&self, prefix: &str) -> Option<usize> {
        self.names.iter().position(|name| name.starts_with(prefix))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Named resources shared by one parse pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Named {
    pub colors: NamedIndex,
    pub chars: NamedIndex,
    pub fonts: NamedIndex,
    pub tile_anis: NamedIndex,
    pub images: NamedIndex,
    pub sounds: NamedIndex,
    pub animations: NamedIndex,
    pub widgets: NamedIndex,
}

impl Named {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_name_keeps_existing_index() {
        let mut index = NamedIndex::new();
        assert_eq!(index.add_name("GEM"), 0);
        assert_eq!(index.add_name("STAR"), 1);
        assert_eq!(index.add_name("GEM"), 0);
        assert_eq!(index.len(), 2);
        assert_eq!(index.index("STAR"), Some(1));
        assert_eq!(index.index("MOON"), None);
        assert_eq!(index.name(1), Some("STAR"));
        assert_eq!(index.name(2), None);
    }

    #[test]
    fn find_index_name_starts_returns_first_match() {
        let mut index = NamedIndex::new();
        index.add_name("alpha:one");
        index.add_name("beta:one");
        index.add_name("beta:two");
        assert_eq!(index.find_index_name_starts("beta"), Some(1));
        assert_eq!(index.find_index_name_starts("gamma"), None);
    }

    #[test]
    fn named_registries_are_independent() {
        let mut named = Named::new();
        named.colors.add_name("sky");
        assert_eq!(named.colors.index("sky"), Some(0));
        assert!(named.chars.is_empty());
    }
}
