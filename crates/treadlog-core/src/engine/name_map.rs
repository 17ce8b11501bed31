//! Label -> equipment name lookup that falls back to the label itself.

use indexmap::IndexMap;

/// Maps category labels such as `baseRoad` or `newXC` to equipment names.
///
/// [`NameMap::resolve`] is total: an unknown label comes back unchanged, so
/// anything mapped through it degrades to the label when no equipment is
/// known for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameMap {
    names: IndexMap<String, String>,
}

impl NameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, name: impl Into<String>) {
        self.names.insert(label.into(), name.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.get(label).unwrap_or(label)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label() {
        let mut names = NameMap::new();
        names.insert("baseRoad", "ASICS-GT1000-8");
        assert_eq!(names.resolve("baseRoad"), "ASICS-GT1000-8");
        assert_eq!(names.get("baseRoad"), Some("ASICS-GT1000-8"));
    }

    #[test]
    fn test_unknown_label_comes_back_unchanged() {
        let names = NameMap::new();
        assert_eq!(names.resolve("oldXC"), "oldXC");
        assert_eq!(names.get("oldXC"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut names = NameMap::new();
        names.insert("newRoad", "a");
        names.insert("newRoad", "b");
        assert_eq!(names.len(), 1);
        assert_eq!(names.resolve("newRoad"), "b");
    }
}
