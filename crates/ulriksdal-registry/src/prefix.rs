#![forbid(unsafe_code)]

//! Preferred serialization prefixes for namespaces.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::PrefixConflict;

/// Namespace URI -> preferred prefix, consulted when serializing new
/// elements. Not security relevant.
///
/// A prefix may only be bound to one namespace at a time. Rebinding a
/// namespace to a different prefix replaces its previous prefix.
#[derive(Debug)]
pub struct NamespacePrefixTable {
    bindings: ArcSwap<BTreeMap<String, String>>,
}

impl NamespacePrefixTable {
    pub fn new() -> Self {
        Self {
            bindings: ArcSwap::from_pointee(BTreeMap::new()),
        }
    }

    /// Bind `namespace` to `prefix`.
    pub fn set_default_prefix(&self, namespace: &str, prefix: &str) -> Result<(), PrefixConflict> {
        let mut conflict = None;
        self.bindings.rcu(|current| {
            conflict = current
                .iter()
                .find(|(ns, p)| p.as_str() == prefix && ns.as_str() != namespace)
                .map(|(ns, _)| PrefixConflict {
                    prefix: prefix.to_owned(),
                    existing: ns.clone(),
                    requested: namespace.to_owned(),
                });
            if conflict.is_some() {
                return Arc::clone(current);
            }
            let mut next = (**current).clone();
            next.insert(namespace.to_owned(), prefix.to_owned());
            Arc::new(next)
        });

        match conflict {
            Some(c) => Err(c),
            None => {
                tracing::debug!(namespace, prefix, "bound namespace prefix");
                Ok(())
            }
        }
    }

    pub fn prefix_for(&self, namespace: &str) -> Option<String> {
        self.bindings.load().get(namespace).cloned()
    }

    pub fn namespace_for(&self, prefix: &str) -> Option<String> {
        self.bindings
            .load()
            .iter()
            .find(|(_, p)| p.as_str() == prefix)
            .map(|(ns, _)| ns.clone())
    }

    /// All bindings, sorted by namespace URI.
    pub fn bindings(&self) -> Vec<(String, String)> {
        self.bindings
            .load()
            .iter()
            .map(|(ns, p)| (ns.clone(), p.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.load().is_empty()
    }
}

impl Default for NamespacePrefixTable {
    fn default() -> Self {
        Self::new()
    }
}
