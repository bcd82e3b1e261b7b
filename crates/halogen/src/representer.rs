//! # Representers
//!
//! A [`Representer<D>`] describes how values of the domain type `D` render to
//! HAL. It owns the definition registry, the table of named methods, and the
//! shape capability: a plain representer, a *resource* wrapping one `D`, or a
//! *collection* wrapping a `Vec<T>` whose items render with another
//! representer. The two capabilities are mutually exclusive.
//!
//! Representers are declared once at setup and then shared (usually behind an
//! `Arc`) by any number of concurrent renders.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{self, Configuration, Extension, ScopeFn};
use crate::definition::{Definition, DefinitionOptions, Kind, Procedure, ValueFn};
use crate::definitions::Definitions;
use crate::embed::Embedded;
use crate::error::{HalogenError, Result};
use crate::instance::{Instance, Scope};
use crate::options::Options;

/// Representer-level `embed?` predicate. When declared, it alone decides
/// which embeds are rendered.
pub type EmbedPredicate<D> = Arc<dyn Fn(&Instance<'_, D>, &str) -> Result<bool> + Send + Sync>;

/// Serializes a resource for field access.
pub(crate) type SerializeFn<D> = Arc<dyn Fn(&D) -> Result<Value> + Send + Sync>;

/// Renders the items of a collection with the item representer.
pub(crate) trait ItemRenderer<D>: Send + Sync {
    fn render_items(
        &self,
        collection: &D,
        options: &Options,
        parent: Option<&Scope<'_>>,
    ) -> Result<Vec<Value>>;
}

struct Items<T> {
    representer: Arc<Representer<T>>,
}

impl<T: 'static> ItemRenderer<Vec<T>> for Items<T> {
    fn render_items(
        &self,
        collection: &Vec<T>,
        options: &Options,
        parent: Option<&Scope<'_>>,
    ) -> Result<Vec<Value>> {
        collection
            .iter()
            .map(|item| self.representer.render_nested(item, options.clone(), parent))
            .collect()
    }
}

pub(crate) enum Shape<D> {
    Plain,
    Resource {
        name: String,
        serialize: SerializeFn<D>,
    },
    Collection {
        name: String,
        items: Arc<dyn ItemRenderer<D>>,
    },
}

impl<D> Clone for Shape<D> {
    fn clone(&self) -> Self {
        match self {
            Shape::Plain => Shape::Plain,
            Shape::Resource { name, serialize } => Shape::Resource {
                name: name.clone(),
                serialize: Arc::clone(serialize),
            },
            Shape::Collection { name, items } => Shape::Collection {
                name: name.clone(),
                items: Arc::clone(items),
            },
        }
    }
}

/// Rendering rules for the domain type `D`.
pub struct Representer<D> {
    label: String,
    shape: Shape<D>,
    definitions: Definitions<D>,
    methods: HashMap<String, ValueFn<D>>,
    embed_predicate: Option<EmbedPredicate<D>>,
    extensions: Vec<String>,
    declares_rules: bool,
    max_depth: usize,
}

impl<D> Representer<D> {
    /// Name used in logs and errors: the resource or collection name once
    /// declared, the type name before that.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn definitions(&self) -> &Definitions<D> {
        &self.definitions
    }

    /// Names of the installed extensions, in installation order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether any definition was declared on this representer itself, as
    /// opposed to installed by an extension.
    pub fn declares_rules(&self) -> bool {
        self.declares_rules
    }

    pub fn is_resource(&self) -> bool {
        matches!(self.shape, Shape::Resource { .. })
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.shape, Shape::Collection { .. })
    }

    pub fn resource_name(&self) -> Option<&str> {
        match &self.shape {
            Shape::Resource { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn collection_name(&self) -> Option<&str> {
        match &self.shape {
            Shape::Collection { name, .. } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn shape(&self) -> &Shape<D> {
        &self.shape
    }

    pub(crate) fn method_named(&self, name: &str) -> Option<&ValueFn<D>> {
        self.methods.get(name)
    }

    pub(crate) fn predicate(&self) -> Option<&EmbedPredicate<D>> {
        self.embed_predicate.as_ref()
    }
}

impl<D: 'static> Representer<D> {
    /// Creates a representer using the global configuration.
    pub fn new() -> Self {
        Self::with_config(&config::config())
    }

    /// Creates a representer using `config`, installing its extensions.
    pub fn with_config(config: &Configuration) -> Self {
        let type_name = std::any::type_name::<D>();
        let label = type_name
            .split('<')
            .next()
            .unwrap_or(type_name)
            .split("::")
            .last()
            .unwrap_or("Representer")
            .to_owned();

        let mut representer = Self {
            label,
            shape: Shape::Plain,
            definitions: Definitions::new(),
            methods: HashMap::new(),
            embed_predicate: None,
            extensions: Vec::new(),
            declares_rules: false,
            max_depth: config.max_depth(),
        };
        for extension in config.extensions() {
            representer.install(extension.as_ref());
        }
        representer
    }

    fn install(&mut self, extension: &dyn Extension) {
        let mut capabilities = config::Capabilities::default();
        extension.install(&mut capabilities);

        for (name, method) in capabilities.methods {
            self.methods.insert(name, scoped(method));
        }
        for scoped_definition in capabilities.definitions {
            let options = DefinitionOptions::new().attrs(scoped_definition.attrs);
            self.definitions.insert(Definition::new(
                scoped_definition.kind,
                scoped_definition.name,
                options,
                Some(Procedure::Value(scoped(scoped_definition.procedure))),
            ));
        }

        debug!(representer = %self.label, extension = extension.name(), "Extension installed");
        self.extensions.push(extension.name().to_owned());
    }

    /// A new representer starting from a copy of this one's rules.
    /// Declarations made on either afterwards do not affect the other.
    pub fn derive(&self) -> Self {
        Self {
            label: self.label.clone(),
            shape: self.shape.clone(),
            definitions: self.definitions.duplicate(),
            methods: self.methods.clone(),
            embed_predicate: self.embed_predicate.clone(),
            extensions: self.extensions.clone(),
            declares_rules: self.declares_rules,
            max_depth: self.max_depth,
        }
    }

    /// Declares the representer as wrapping one resource called `name`.
    ///
    /// Properties declared afterwards without a value or procedure read the
    /// same-named field of the serialized resource, and a method `name`
    /// returns the whole serialized resource.
    ///
    /// # Errors
    /// [`HalogenError::InvalidResource`] if this representer is a collection.
    pub fn resource(&mut self, name: impl Into<String>) -> Result<&mut Self>
    where
        D: Serialize,
    {
        let name = name.into();
        if self.is_collection() {
            return Err(HalogenError::InvalidResource(format!(
                "{} has already defined a collection",
                self.label
            )));
        }

        let serialize: SerializeFn<D> = Arc::new(|resource: &D| -> Result<Value> {
            Ok(serde_json::to_value(resource)?)
        });
        let whole: ValueFn<D> = Arc::new(|instance: &Instance<'_, D>| -> Result<Value> {
            Ok(instance.serialized()?.clone())
        });

        self.methods.insert(name.clone(), whole);
        self.label = name.clone();
        self.shape = Shape::Resource { name, serialize };
        debug!(representer = %self.label, "Declared resource");
        Ok(self)
    }

    /// Declares a property computed by the literal value or the method named
    /// `name` (or the resource field, for resources).
    pub fn property(
        &mut self,
        name: impl Into<String>,
        options: DefinitionOptions<D>,
    ) -> Result<Arc<Definition<D>>> {
        let name = name.into();
        let procedure = if options.literal().is_none() {
            self.field_accessor(&name)
        } else {
            None
        };
        self.define(Definition::new(Kind::Property, name, options, procedure))
    }

    /// Declares a property computed by `f`.
    pub fn property_with<F>(
        &mut self,
        name: impl Into<String>,
        options: DefinitionOptions<D>,
        f: F,
    ) -> Result<Arc<Definition<D>>>
    where
        F: Fn(&Instance<'_, D>) -> Result<Value> + Send + Sync + 'static,
    {
        let procedure = Procedure::Value(Arc::new(f));
        self.define(Definition::new(Kind::Property, name, options, Some(procedure)))
    }

    /// Declares a link. Each flag (e.g. `"templated"`) becomes a `true`
    /// attribute; explicit attributes in `options` take precedence.
    pub fn link(
        &mut self,
        name: impl Into<String>,
        flags: &[&str],
        options: DefinitionOptions<D>,
    ) -> Result<Arc<Definition<D>>> {
        let options = options.with_flags(flags);
        self.define(Definition::new(Kind::Link, name, options, None))
    }

    /// Declares a link whose href (or list of hrefs) is computed by `f`.
    pub fn link_with<F>(
        &mut self,
        name: impl Into<String>,
        flags: &[&str],
        options: DefinitionOptions<D>,
        f: F,
    ) -> Result<Arc<Definition<D>>>
    where
        F: Fn(&Instance<'_, D>) -> Result<Value> + Send + Sync + 'static,
    {
        let options = options.with_flags(flags);
        let procedure = Procedure::Value(Arc::new(f));
        self.define(Definition::new(Kind::Link, name, options, Some(procedure)))
    }

    /// Declares an embed whose resources are produced by `f`.
    pub fn embed<F>(
        &mut self,
        name: impl Into<String>,
        options: DefinitionOptions<D>,
        f: F,
    ) -> Result<Arc<Definition<D>>>
    where
        F: Fn(&Instance<'_, D>) -> Result<Embedded> + Send + Sync + 'static,
    {
        let procedure = Procedure::Embed(Arc::new(f));
        self.define(Definition::new(Kind::Embed, name, options, Some(procedure)))
    }

    /// Registers a definition built by hand.
    pub fn define(&mut self, definition: Definition<D>) -> Result<Arc<Definition<D>>> {
        let kind = definition.kind();
        let definition = self.definitions.register(definition)?;
        self.declares_rules = true;
        debug!(
            representer = %self.label,
            %kind,
            definition = definition.name(),
            "Registered definition"
        );
        Ok(definition)
    }

    /// Registers a named method, replacing any previous one.
    pub fn method<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Instance<'_, D>) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Declares the predicate deciding which embeds to render, overriding the
    /// `embed` render option.
    pub fn embed_predicate<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Instance<'_, D>, &str) -> Result<bool> + Send + Sync + 'static,
    {
        self.embed_predicate = Some(Arc::new(f));
        self
    }

    /// Builds the rendering context for one render.
    ///
    /// # Errors
    /// [`HalogenError::MissingArgument`] when a resource or collection
    /// representer gets no domain object.
    pub fn instance<'a>(
        &'a self,
        resource: Option<&'a D>,
        options: Options,
        parent: Option<&'a Scope<'a>>,
    ) -> Result<Instance<'a, D>> {
        if resource.is_none() && !matches!(self.shape, Shape::Plain) {
            return Err(HalogenError::MissingArgument(format!(
                "{} requires a resource",
                self.label
            )));
        }
        let scope = Scope::new(&self.label, options, parent);
        Ok(Instance::new(self, resource, scope))
    }

    /// Accessor reading the resource field `name`; also registered as the
    /// method `name` unless one exists.
    fn field_accessor(&mut self, name: &str) -> Option<Procedure<D>> {
        if !self.is_resource() {
            return None;
        }

        let field = name.to_owned();
        let accessor: ValueFn<D> = Arc::new(move |instance: &Instance<'_, D>| -> Result<Value> {
            instance
                .serialized()?
                .get(&field)
                .cloned()
                .ok_or_else(|| HalogenError::UndefinedMethod {
                    representer: instance.representer().label().to_owned(),
                    name: field.clone(),
                })
        });

        self.methods
            .entry(name.to_owned())
            .or_insert_with(|| Arc::clone(&accessor));
        Some(Procedure::Value(accessor))
    }
}

impl<T: 'static> Representer<Vec<T>> {
    /// Declares the representer as wrapping a collection called `name` whose
    /// items render with `items`.
    ///
    /// # Errors
    /// [`HalogenError::InvalidResource`] if this representer is a resource.
    pub fn collection(
        &mut self,
        name: impl Into<String>,
        items: Arc<Representer<T>>,
    ) -> Result<&mut Self> {
        let name = name.into();
        if self.is_resource() {
            return Err(HalogenError::InvalidResource(format!(
                "{} has already defined a resource",
                self.label
            )));
        }

        self.label = name.clone();
        self.shape = Shape::Collection {
            name,
            items: Arc::new(Items { representer: items }),
        };
        debug!(representer = %self.label, "Declared collection");
        Ok(self)
    }
}

impl<D: 'static> Default for Representer<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for Representer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.shape {
            Shape::Plain => "plain",
            Shape::Resource { .. } => "resource",
            Shape::Collection { .. } => "collection",
        };
        f.debug_struct("Representer")
            .field("label", &self.label)
            .field("shape", &shape)
            .field("definitions", &self.definitions)
            .field("extensions", &self.extensions)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

fn scoped<D: 'static>(f: ScopeFn) -> ValueFn<D> {
    Arc::new(move |instance: &Instance<'_, D>| -> Result<Value> { f(instance.scope()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Post {
        title: String,
    }

    fn post() -> Post {
        Post {
            title: "Hello".into(),
        }
    }

    #[test]
    fn test_resource_defines_name_and_method() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());
        representer.resource("post").unwrap();

        assert_eq!(representer.resource_name(), Some("post"));
        assert_eq!(representer.label(), "post");
        assert!(representer.has_method("post"));
        assert!(!representer.is_collection());

        let post = post();
        let instance = representer.instance(Some(&post), Options::new(), None).unwrap();
        assert_eq!(instance.call("post").unwrap(), json!({ "title": "Hello" }));
    }

    #[test]
    fn test_property_gets_accessor_procedure_on_resource() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());
        representer.resource("post").unwrap();

        let bare = representer.property("title", DefinitionOptions::new()).unwrap();
        let literal = representer
            .property("kind", DefinitionOptions::new().value("article"))
            .unwrap();
        let computed = representer
            .property_with("shout", DefinitionOptions::new(), |_| Ok(json!("HELLO")))
            .unwrap();

        assert!(matches!(bare.procedure(), Some(Procedure::Value(_))));
        assert!(literal.procedure().is_none());
        assert!(matches!(computed.procedure(), Some(Procedure::Value(_))));
        assert!(representer.has_method("title"));
    }

    #[test]
    fn test_property_keeps_existing_method() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());
        representer.resource("post").unwrap();
        representer.method("title", |_| Ok(json!("from method")));
        representer.property("title", DefinitionOptions::new()).unwrap();

        let post = post();
        let instance = representer.instance(Some(&post), Options::new(), None).unwrap();
        assert_eq!(instance.call("title").unwrap(), json!("from method"));
    }

    #[test]
    fn test_plain_property_has_no_procedure() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());

        let definition = representer.property("title", DefinitionOptions::new()).unwrap();

        assert!(definition.procedure().is_none());
        assert!(!representer.has_method("title"));
    }

    #[test]
    fn test_link_options_normalize_flags() {
        let mut representer = Representer::<()>::with_config(&Configuration::new());

        let simple = representer
            .link_with("self", &[], DefinitionOptions::new(), |_| Ok(json!("path")))
            .unwrap();
        let complex = representer
            .link_with(
                "search",
                &["templated"],
                DefinitionOptions::new().option("foo", "foo").attr("bar", "bar"),
                |_| Ok(json!("path{?q}")),
            )
            .unwrap();

        assert_eq!(simple.name(), "self");
        assert!(simple.options().attributes().is_empty());
        assert_eq!(
            Value::Object(complex.options().attributes().clone()),
            json!({ "templated": true, "bar": "bar" })
        );
        assert_eq!(Value::Object(complex.options().extra().clone()), json!({ "foo": "foo" }));
    }

    #[test]
    fn test_instance_requires_resource_for_shaped_representers() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());
        assert!(representer.instance(None, Options::new(), None).is_ok());

        representer.resource("post").unwrap();
        assert!(matches!(
            representer.instance(None, Options::new(), None),
            Err(HalogenError::MissingArgument(_))
        ));
    }

    #[test]
    fn test_resource_and_collection_are_exclusive() {
        let items = Arc::new(Representer::<Post>::with_config(&Configuration::new()));

        let mut collection = Representer::<Vec<Post>>::with_config(&Configuration::new());
        collection.collection("posts", Arc::clone(&items)).unwrap();
        let err = collection.resource("posts").unwrap_err();
        assert!(matches!(err, HalogenError::InvalidResource(_)));
        assert!(err.to_string().contains("has already defined a collection"));

        let mut resource = Representer::<Vec<Post>>::with_config(&Configuration::new());
        resource.resource("list").unwrap();
        assert!(matches!(
            resource.collection("posts", items),
            Err(HalogenError::InvalidResource(_))
        ));
    }

    #[test]
    fn test_derive_copies_without_sharing() {
        let mut base = Representer::<()>::with_config(&Configuration::new());
        base.property("id", DefinitionOptions::new().value(1)).unwrap();

        let mut derived = base.derive();
        derived.property("name", DefinitionOptions::new().value("x")).unwrap();
        derived.method("helper", |_| Ok(json!(true)));

        assert_eq!(base.definitions().names(Kind::Property), ["id"]);
        assert_eq!(derived.definitions().names(Kind::Property), ["id", "name"]);
        assert!(!base.has_method("helper"));
    }

    #[test]
    fn test_resource_serialized_once_per_render() {
        use serde::ser::SerializeMap;
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counted(Arc<AtomicUsize>);

        impl Serialize for Counted {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.fetch_add(1, Ordering::SeqCst);
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("a", &1)?;
                map.serialize_entry("b", &2)?;
                map.serialize_entry("c", &3)?;
                map.end()
            }
        }

        let mut representer = Representer::<Counted>::with_config(&Configuration::new());
        representer.resource("counted").unwrap();
        for field in ["a", "b", "c"] {
            representer.property(field, DefinitionOptions::new()).unwrap();
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let rendered = representer
            .render(&Counted(Arc::clone(&calls)), Options::new())
            .unwrap();

        assert_eq!(rendered, json!({ "a": 1, "b": 2, "c": 3 }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_field_is_undefined_method() {
        let mut representer = Representer::<Post>::with_config(&Configuration::new());
        representer.resource("post").unwrap();
        representer.property("subtitle", DefinitionOptions::new()).unwrap();

        let err = representer.render(&post(), Options::new()).unwrap_err();

        assert!(matches!(
            err,
            HalogenError::UndefinedMethod { ref representer, ref name }
                if representer == "post" && name == "subtitle"
        ));
    }

    #[test]
    fn test_declares_rules_ignores_extension_definitions() {
        struct Version;

        impl Extension for Version {
            fn name(&self) -> &str {
                "version"
            }

            fn install(&self, capabilities: &mut config::Capabilities) {
                capabilities.property("v", |_| Ok(json!(1)));
            }
        }

        let mut with_version = Configuration::new();
        with_version.extension(Version);

        let mut representer = Representer::<()>::with_config(&with_version);
        assert_eq!(representer.definitions().len(), 1);
        assert!(!representer.declares_rules());

        representer.property("id", DefinitionOptions::new().value(1)).unwrap();
        assert!(representer.declares_rules());
        assert!(representer.derive().declares_rules());
    }
}
