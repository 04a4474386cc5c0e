//! Ambient, read-only data passed down the node tree.
//!
//! A [`Context`] never changes once built. Components that want to provide
//! values to their descendants produce a new, augmented context with
//! [`Context::extend`]; the parent's mapping is untouched and every descendant
//! of that component shares the augmented one.

use alloc::rc::Rc;
use core::fmt::{self, Debug};

use serde_json::{Map, Value};

/// Immutable key-value mapping shared by a subtree.
///
/// Cloning is cheap: the mapping is reference counted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Context(Rc<Map<String, Value>>);

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a context with `key` set to `value`, leaving `self` untouched.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = (*self.0).clone();
        map.insert(key.into(), value.into());
        Self(Rc::new(map))
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the subset of this context named by `keys`.
    ///
    /// Keys that are not present are skipped.
    #[must_use]
    pub fn restrict(&self, keys: &[&str]) -> Self {
        if keys.is_empty() {
            return Self::new();
        }
        let map = keys
            .iter()
            .filter_map(|&key| {
                self.0
                    .get(key)
                    .map(|value| (key.to_owned(), value.clone()))
            })
            .collect();
        Self(Rc::new(map))
    }

    /// Returns a context holding every entry of `self` overridden by `other`.
    ///
    /// Shares the existing allocation when `other` is empty.
    #[must_use]
    pub fn extend(&self, other: &Self) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut map = (*self.0).clone();
        for (key, value) in other.iter() {
            map.insert(key.clone(), value.clone());
        }
        Self(Rc::new(map))
    }

    /// Returns `true` if both handles share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl From<Map<String, Value>> for Context {
    fn from(value: Map<String, Value>) -> Self {
        Self(Rc::new(value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(Rc::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_does_not_mutate_parent() {
        let parent = Context::new().with("theme", "dark");
        let child = parent.with("user", "ada");
        assert_eq!(parent.len(), 1);
        assert_eq!(child.get("theme"), Some(&json!("dark")));
        assert_eq!(child.get("user"), Some(&json!("ada")));
    }

    #[test]
    fn test_restrict() {
        let ctx: Context = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let restricted = ctx.restrict(&["a", "c", "missing"]);
        assert_eq!(restricted.len(), 2);
        assert!(restricted.contains("a"));
        assert!(!restricted.contains("b"));
        assert!(ctx.restrict(&[]).is_empty());
    }

    #[test]
    fn test_extend_overrides_and_shares() {
        let base: Context = [("a", 1), ("b", 2)].into_iter().collect();
        let extra: Context = [("b", 20), ("c", 30)].into_iter().collect();

        let merged = base.extend(&extra);
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert_eq!(merged.get("b"), Some(&json!(20)));
        assert_eq!(merged.get("c"), Some(&json!(30)));
        assert_eq!(base.get("b"), Some(&json!(2)));

        assert!(base.extend(&Context::new()).ptr_eq(&base));
    }
}
