//! # Embeds
//!
//! Embed procedures return an [`Embedded`] value describing which resources
//! to nest and with which representer. The engine renders each target with
//! the current scope as parent, so the nested representer sees the right
//! depth and the narrowed embed options.
//!
//! Whether an embed is rendered at all is decided by [`requested`]: a
//! representer-level embed predicate wins when one is declared, otherwise the
//! `embed` render option must name the embed with a value other than `"0"` or
//! `"false"`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::instance::{Instance, Scope};
use crate::options::Options;
use crate::representer::Representer;

/// Something that can be rendered as an embedded child.
pub trait EmbedTarget {
    fn render_child(&self, options: Options, parent: &Scope<'_>) -> Result<Value>;
}

struct Child<U> {
    representer: Arc<Representer<U>>,
    resource: U,
}

impl<U: 'static> EmbedTarget for Child<U> {
    fn render_child(&self, options: Options, parent: &Scope<'_>) -> Result<Value> {
        self.representer
            .render_nested(&self.resource, options, Some(parent))
    }
}

/// Resources produced by an embed procedure.
pub enum Embedded {
    /// Nothing to embed; the embed is left out of the output.
    Nothing,
    /// Rendered as a single object.
    One(Box<dyn EmbedTarget>),
    /// Rendered as an array, even when empty.
    Many(Vec<Box<dyn EmbedTarget>>),
}

impl Embedded {
    pub fn nothing() -> Self {
        Embedded::Nothing
    }

    /// One resource rendered with `representer`.
    pub fn resource<U: 'static>(representer: &Arc<Representer<U>>, resource: U) -> Self {
        Embedded::One(Box::new(Child {
            representer: Arc::clone(representer),
            resource,
        }))
    }

    /// A resource if there is one, nothing otherwise.
    pub fn optional<U: 'static>(representer: &Arc<Representer<U>>, resource: Option<U>) -> Self {
        match resource {
            Some(resource) => Self::resource(representer, resource),
            None => Embedded::Nothing,
        }
    }

    /// Several resources rendered as an array with `representer`.
    pub fn resources<U, I>(representer: &Arc<Representer<U>>, resources: I) -> Self
    where
        U: 'static,
        I: IntoIterator<Item = U>,
    {
        Embedded::Many(
            resources
                .into_iter()
                .map(|resource| {
                    Box::new(Child {
                        representer: Arc::clone(representer),
                        resource,
                    }) as Box<dyn EmbedTarget>
                })
                .collect(),
        )
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Embedded::Nothing)
    }

    /// Renders the targets under `parent`, or `None` when there is nothing.
    pub(crate) fn render(self, options: Options, parent: &Scope<'_>) -> Result<Option<Value>> {
        match self {
            Embedded::Nothing => Ok(None),
            Embedded::One(target) => target.render_child(options, parent).map(Some),
            Embedded::Many(targets) => {
                let rendered = targets
                    .iter()
                    .map(|target| target.render_child(options.clone(), parent))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(Value::Array(rendered)))
            }
        }
    }
}

impl fmt::Debug for Embedded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Embedded::Nothing => f.write_str("Nothing"),
            Embedded::One(_) => f.write_str("One(..)"),
            Embedded::Many(targets) => write!(f, "Many({} targets)", targets.len()),
        }
    }
}

/// Whether the embed `name` was asked for by the render.
pub(crate) fn requested<D>(instance: &Instance<'_, D>, name: &str) -> Result<bool> {
    if let Some(predicate) = instance.representer().predicate() {
        return predicate(instance, name);
    }

    Ok(instance
        .embed_options()
        .get(name)
        .is_some_and(|value| !matches!(stringify(value).as_str(), "0" | "false")))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stringify_matches_option_semantics() {
        assert_eq!(stringify(&json!("0")), "0");
        assert_eq!(stringify(&json!(0)), "0");
        assert_eq!(stringify(&json!(false)), "false");
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(1)), "1");
    }
}
