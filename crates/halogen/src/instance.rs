//! # Rendering Context
//!
//! An [`Instance`] is built fresh for every render (and for every embedded
//! sub-render). It borrows the domain object and the [`Representer`] and owns
//! the render [`Options`]. The type-independent half of the context lives in a
//! [`Scope`], which is what nested renders point back to as their parent.

use std::cell::OnceCell;

use serde_json::{Map, Value};

use crate::error::{HalogenError, Result};
use crate::options::Options;
use crate::representer::{Representer, Shape};

/// The type-independent part of a rendering context.
///
/// Scopes form a chain through `parent` for the duration of one render tree.
#[derive(Debug)]
pub struct Scope<'a> {
    label: &'a str,
    options: Options,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(label: &'a str, options: Options, parent: Option<&'a Scope<'a>>) -> Self {
        Self {
            label,
            options,
            parent,
        }
    }

    /// Name of the representer rendering this scope.
    pub fn label(&self) -> &str {
        self.label
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    /// 0 for a root render, one more for every level of embedding.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Enclosing scopes, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Scope<'a>> {
        std::iter::successors(self.parent, |scope| scope.parent)
    }

    pub fn embed_options(&self) -> Map<String, Value> {
        self.options.embed_options()
    }
}

/// Rendering context handed to every procedure, guard and method.
pub struct Instance<'a, D> {
    representer: &'a Representer<D>,
    resource: Option<&'a D>,
    scope: Scope<'a>,
    serialized: OnceCell<Value>,
}

impl<'a, D> Instance<'a, D> {
    pub(crate) fn new(
        representer: &'a Representer<D>,
        resource: Option<&'a D>,
        scope: Scope<'a>,
    ) -> Self {
        Self {
            representer,
            resource,
            scope,
            serialized: OnceCell::new(),
        }
    }

    /// The wrapped domain object.
    pub fn resource(&self) -> Result<&'a D> {
        self.resource.ok_or_else(|| {
            HalogenError::MissingArgument(format!(
                "{} was rendered without a resource",
                self.representer.label()
            ))
        })
    }

    /// The resource as JSON, serialized on first use and reused by every
    /// field read of this instance.
    pub(crate) fn serialized(&self) -> Result<&Value> {
        if let Some(value) = self.serialized.get() {
            return Ok(value);
        }
        let value = match self.representer.shape() {
            Shape::Resource { serialize, .. } => serialize(self.resource()?)?,
            _ => {
                return Err(HalogenError::InvalidResource(format!(
                    "{} is not a resource",
                    self.representer.label()
                )))
            }
        };
        Ok(self.serialized.get_or_init(|| value))
    }

    pub fn representer(&self) -> &'a Representer<D> {
        self.representer
    }

    pub fn scope(&self) -> &Scope<'a> {
        &self.scope
    }

    pub fn options(&self) -> &Options {
        self.scope.options()
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.scope.parent()
    }

    pub fn depth(&self) -> usize {
        self.scope.depth()
    }

    pub fn embed_options(&self) -> Map<String, Value> {
        self.scope.embed_options()
    }

    /// Invokes the representer method registered under `name`.
    pub fn call(&self, name: &str) -> Result<Value> {
        match self.representer.method_named(name) {
            Some(method) => method(self),
            None => Err(HalogenError::UndefinedMethod {
                representer: self.representer.label().to_owned(),
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_follows_parent_chain() {
        let root = Scope::new("root", Options::new(), None);
        let child = Scope::new("child", Options::new(), Some(&root));
        let grandchild = Scope::new("grandchild", Options::new(), Some(&child));

        assert_eq!(root.depth(), 0);
        assert_eq!(child.depth(), 1);
        assert_eq!(grandchild.depth(), 2);

        let labels: Vec<&str> = grandchild.ancestors().map(Scope::label).collect();
        assert_eq!(labels, ["child", "root"]);
    }
}
