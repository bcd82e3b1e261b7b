//! # Definitions
//!
//! A [`Definition`] is one declared rendering rule of a representer: a
//! property, a link or an embed. All three kinds share the same value and
//! guard resolution, so a single type covers them.
//!
//! ## Value resolution
//!
//! 1. the literal `value` option, if present;
//! 2. the procedure, invoked with the rendering [`Instance`];
//! 3. the representer method named like the definition.
//!
//! ## Guards
//!
//! A [`Condition`] wraps a [`Guard`], which is either a literal, a callable or
//! a reference to a named method. Guard results use loose truthiness: only
//! `null` and `false` exclude, so `0`, `""` and empty containers include.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::embed::{self, Embedded};
use crate::error::{HalogenError, Result};
use crate::instance::Instance;

/// Procedure computing a property or link value.
pub type ValueFn<D> = Arc<dyn Fn(&Instance<'_, D>) -> Result<Value> + Send + Sync>;

/// Procedure producing the resources of an embed.
pub type EmbedFn<D> = Arc<dyn Fn(&Instance<'_, D>) -> Result<Embedded> + Send + Sync>;

/// The three kinds of rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Property,
    Link,
    Embed,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Property => "property",
            Kind::Link => "link",
            Kind::Embed => "embed",
        };
        f.write_str(name)
    }
}

/// `true` unless the value is `null` or `false`.
pub fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Inclusion guard: a literal, a callable, or the name of a representer method.
pub enum Guard<D> {
    Literal(Value),
    Callable(ValueFn<D>),
    Method(String),
}

impl<D> Guard<D> {
    pub fn literal(value: impl Into<Value>) -> Self {
        Guard::Literal(value.into())
    }

    pub fn call<F>(f: F) -> Self
    where
        F: Fn(&Instance<'_, D>) -> Result<Value> + Send + Sync + 'static,
    {
        Guard::Callable(Arc::new(f))
    }

    pub fn method(name: impl Into<String>) -> Self {
        Guard::Method(name.into())
    }

    pub fn evaluate(&self, instance: &Instance<'_, D>) -> Result<Value> {
        match self {
            Guard::Literal(value) => Ok(value.clone()),
            Guard::Callable(f) => f(instance),
            Guard::Method(name) => instance.call(name),
        }
    }
}

impl<D> Clone for Guard<D> {
    fn clone(&self) -> Self {
        match self {
            Guard::Literal(value) => Guard::Literal(value.clone()),
            Guard::Callable(f) => Guard::Callable(Arc::clone(f)),
            Guard::Method(name) => Guard::Method(name.clone()),
        }
    }
}

impl<D> fmt::Debug for Guard<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Guard::Callable(_) => f.write_str("Callable(..)"),
            Guard::Method(name) => f.debug_tuple("Method").field(name).finish(),
        }
    }
}

impl<D> From<bool> for Guard<D> {
    fn from(value: bool) -> Self {
        Guard::Literal(Value::Bool(value))
    }
}

impl<D> From<Value> for Guard<D> {
    fn from(value: Value) -> Self {
        Guard::Literal(value)
    }
}

impl<D> From<&str> for Guard<D> {
    fn from(name: &str) -> Self {
        Guard::Method(name.to_owned())
    }
}

impl<D> From<String> for Guard<D> {
    fn from(name: String) -> Self {
        Guard::Method(name)
    }
}

/// The `if` / `unless` option of a definition.
pub enum Condition<D> {
    If(Guard<D>),
    Unless(Guard<D>),
}

impl<D> Clone for Condition<D> {
    fn clone(&self) -> Self {
        match self {
            Condition::If(guard) => Condition::If(guard.clone()),
            Condition::Unless(guard) => Condition::Unless(guard.clone()),
        }
    }
}

impl<D> fmt::Debug for Condition<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::If(guard) => f.debug_tuple("If").field(guard).finish(),
            Condition::Unless(guard) => f.debug_tuple("Unless").field(guard).finish(),
        }
    }
}

/// Options of a definition.
pub struct DefinitionOptions<D> {
    value: Option<Value>,
    condition: Option<Condition<D>>,
    attrs: Map<String, Value>,
    extra: Map<String, Value>,
}

impl<D> DefinitionOptions<D> {
    pub fn new() -> Self {
        Self {
            value: None,
            condition: None,
            attrs: Map::new(),
            extra: Map::new(),
        }
    }

    /// Sets a precomputed value. Cannot be combined with a procedure.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Includes the definition only when `guard` is truthy (the `if` option).
    pub fn when(mut self, guard: impl Into<Guard<D>>) -> Self {
        self.condition = Some(Condition::If(guard.into()));
        self
    }

    /// Excludes the definition when `guard` is truthy.
    pub fn unless(mut self, guard: impl Into<Guard<D>>) -> Self {
        self.condition = Some(Condition::Unless(guard.into()));
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Any other named option, kept for callers and extensions.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn literal(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn condition(&self) -> Option<&Condition<D>> {
        self.condition.as_ref()
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attrs
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Turns link flags into `attrs[flag] = true`, keeping explicit attrs.
    pub(crate) fn with_flags(mut self, flags: &[&str]) -> Self {
        let mut attrs: Map<String, Value> = flags
            .iter()
            .map(|flag| ((*flag).to_owned(), Value::Bool(true)))
            .collect();
        attrs.extend(std::mem::take(&mut self.attrs));
        self.attrs = attrs;
        self
    }
}

impl<D> Default for DefinitionOptions<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for DefinitionOptions<D> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            condition: self.condition.clone(),
            attrs: self.attrs.clone(),
            extra: self.extra.clone(),
        }
    }
}

impl<D> fmt::Debug for DefinitionOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionOptions")
            .field("value", &self.value)
            .field("condition", &self.condition)
            .field("attrs", &self.attrs)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Computation attached to a definition.
pub enum Procedure<D> {
    Value(ValueFn<D>),
    Embed(EmbedFn<D>),
}

impl<D> Clone for Procedure<D> {
    fn clone(&self) -> Self {
        match self {
            Procedure::Value(f) => Procedure::Value(Arc::clone(f)),
            Procedure::Embed(f) => Procedure::Embed(Arc::clone(f)),
        }
    }
}

impl<D> fmt::Debug for Procedure<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Procedure::Value(_) => f.write_str("Value(..)"),
            Procedure::Embed(_) => f.write_str("Embed(..)"),
        }
    }
}

/// A named rendering rule.
pub struct Definition<D> {
    name: String,
    kind: Kind,
    options: DefinitionOptions<D>,
    procedure: Option<Procedure<D>>,
}

impl<D> Definition<D> {
    pub fn new(
        kind: Kind,
        name: impl Into<String>,
        options: DefinitionOptions<D>,
        procedure: Option<Procedure<D>>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            options,
            procedure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn options(&self) -> &DefinitionOptions<D> {
        &self.options
    }

    pub fn procedure(&self) -> Option<&Procedure<D>> {
        self.procedure.as_ref()
    }

    pub fn set_procedure(&mut self, procedure: Option<Procedure<D>>) {
        self.procedure = procedure;
    }

    /// Checks the definition invariants.
    ///
    /// # Errors
    /// [`HalogenError::InvalidDefinition`] when both a literal value and a
    /// procedure are given, when an embed has no embed procedure, or when a
    /// property or link carries one.
    pub fn validate(&self) -> Result<()> {
        if self.options.value.is_some() && self.procedure.is_some() {
            return Err(HalogenError::InvalidDefinition(format!(
                "Cannot specify both value and procedure for {}",
                self.name
            )));
        }

        match (self.kind, &self.procedure) {
            (Kind::Embed, Some(Procedure::Embed(_))) => Ok(()),
            (Kind::Embed, _) => Err(HalogenError::InvalidDefinition(format!(
                "Embed {} must be defined with a procedure",
                self.name
            ))),
            (kind, Some(Procedure::Embed(_))) => Err(HalogenError::InvalidDefinition(format!(
                "{} {} cannot be defined with an embed procedure",
                kind, self.name
            ))),
            _ => Ok(()),
        }
    }

    pub fn value(&self, instance: &Instance<'_, D>) -> Result<Value> {
        if let Some(value) = &self.options.value {
            return Ok(value.clone());
        }

        match &self.procedure {
            Some(Procedure::Value(f)) => f(instance),
            Some(Procedure::Embed(_)) => Err(HalogenError::InvalidDefinition(format!(
                "{} {} has no value procedure",
                self.kind, self.name
            ))),
            None => instance.call(&self.name),
        }
    }

    /// Resources produced by an embed procedure.
    pub fn embedded(&self, instance: &Instance<'_, D>) -> Result<Embedded> {
        match &self.procedure {
            Some(Procedure::Embed(f)) => f(instance),
            _ => Err(HalogenError::InvalidDefinition(format!(
                "Embed {} must be defined with a procedure",
                self.name
            ))),
        }
    }

    /// Whether this definition is part of the output for `instance`.
    pub fn enabled(&self, instance: &Instance<'_, D>) -> Result<bool> {
        let guarded = match &self.options.condition {
            Some(Condition::If(guard)) => truthy(&guard.evaluate(instance)?),
            Some(Condition::Unless(guard)) => !truthy(&guard.evaluate(instance)?),
            None => true,
        };

        if !guarded {
            return Ok(false);
        }

        match self.kind {
            Kind::Embed => embed::requested(instance, &self.name),
            Kind::Property | Kind::Link => Ok(true),
        }
    }
}

impl<D> fmt::Debug for Definition<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("procedure", &self.procedure)
            .finish()
    }
}
