//! # Definition Registry
//!
//! Ordered storage of a representer's definitions, one sequence per [`Kind`].
//! Declaration order is rendering order. Derived representers get their own
//! copy through [`Definitions::duplicate`], so later declarations on either
//! side stay invisible to the other.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::definition::{Definition, Kind};
use crate::error::Result;

/// Per-representer registry of definitions.
pub struct Definitions<D> {
    by_kind: HashMap<Kind, Vec<Arc<Definition<D>>>>,
}

impl<D> Definitions<D> {
    pub fn new() -> Self {
        Self {
            by_kind: HashMap::new(),
        }
    }

    /// Validates and stores `definition`.
    ///
    /// A definition with the same kind and name as an existing one replaces
    /// it in place.
    pub fn register(&mut self, definition: Definition<D>) -> Result<Arc<Definition<D>>> {
        definition.validate()?;
        Ok(self.insert(definition))
    }

    /// Stores a definition that is valid by construction.
    pub(crate) fn insert(&mut self, definition: Definition<D>) -> Arc<Definition<D>> {
        let definition = Arc::new(definition);
        let entries = self.by_kind.entry(definition.kind()).or_default();

        match entries.iter_mut().find(|d| d.name() == definition.name()) {
            Some(slot) => *slot = Arc::clone(&definition),
            None => entries.push(Arc::clone(&definition)),
        }
        definition
    }

    /// Definitions of `kind` in declaration order.
    pub fn fetch(&self, kind: Kind) -> &[Arc<Definition<D>>] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, kind: Kind, name: &str) -> Option<&Arc<Definition<D>>> {
        self.fetch(kind).iter().find(|d| d.name() == name)
    }

    pub fn names(&self, kind: Kind) -> Vec<&str> {
        self.fetch(kind).iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Independent registry for a derived representer. Definitions are
    /// immutable once registered, so they are shared.
    pub fn duplicate(&self) -> Self {
        Self {
            by_kind: self.by_kind.clone(),
        }
    }
}

impl<D> Default for Definitions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Definitions<D> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<D> fmt::Debug for Definitions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definitions")
            .field("properties", &self.names(Kind::Property))
            .field("links", &self.names(Kind::Link))
            .field("embeds", &self.names(Kind::Embed))
            .finish()
    }
}
