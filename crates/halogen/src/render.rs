//! # Render Engine
//!
//! Turns one [`Instance`] into a JSON value:
//!
//! 1. enabled properties, in declaration order, become top-level keys;
//! 2. enabled links are collected under `_links`;
//! 3. enabled embeds are rendered with their own representers under
//!    `_embedded`.
//!
//! `_links` and `_embedded` only appear when they have entries, so a
//! representer without definitions renders `{}`.
//!
//! Collections render their items with the item representer. A collection
//! without definitions of its own renders as a bare array; otherwise the items
//! go first under `_embedded`, keyed by the collection name.

use serde_json::{Map, Value};
use tracing::{debug, instrument, trace, warn};

use crate::definition::Kind;
use crate::error::{HalogenError, Result};
use crate::instance::{Instance, Scope};
use crate::options::Options;
use crate::representer::{Representer, Shape};

/// Reserved key for links.
pub const LINKS_KEY: &str = "_links";

/// Reserved key for embedded resources.
pub const EMBEDDED_KEY: &str = "_embedded";

impl<D: 'static> Representer<D> {
    /// Renders `resource` to a JSON value.
    pub fn render(&self, resource: &D, options: Options) -> Result<Value> {
        self.render_optional(Some(resource), options)
    }

    /// Renders without requiring a domain object. Only plain representers
    /// accept `None`.
    #[instrument(skip_all, fields(representer = %self.label()))]
    pub fn render_optional(&self, resource: Option<&D>, options: Options) -> Result<Value> {
        let instance = self.instance(resource, options, None)?;
        render_instance(&instance)
    }

    /// Renders `resource` as JSON text.
    pub fn to_json(&self, resource: &D, options: Options) -> Result<String> {
        Ok(serde_json::to_string(&self.render(resource, options)?)?)
    }

    pub fn to_json_pretty(&self, resource: &D, options: Options) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.render(resource, options)?)?)
    }

    /// Renders `resource` below `parent`, enforcing the depth limit.
    pub(crate) fn render_nested(
        &self,
        resource: &D,
        options: Options,
        parent: Option<&Scope<'_>>,
    ) -> Result<Value> {
        let instance = self.instance(Some(resource), options, parent)?;
        let depth = instance.depth();
        if depth > self.max_depth() {
            warn!(
                representer = %self.label(),
                depth,
                max_depth = self.max_depth(),
                "Embed depth exceeded"
            );
            return Err(HalogenError::RecursiveEmbed {
                representer: self.label().to_owned(),
                depth,
                max_depth: self.max_depth(),
            });
        }
        render_instance(&instance)
    }
}

fn render_instance<D: 'static>(instance: &Instance<'_, D>) -> Result<Value> {
    let representer = instance.representer();
    let definitions = representer.definitions();

    let mut result = Map::new();
    for definition in definitions.fetch(Kind::Property) {
        if !definition.enabled(instance)? {
            trace!(definition = definition.name(), "Property disabled");
            continue;
        }
        result.insert(definition.name().to_owned(), definition.value(instance)?);
    }

    let links = render_links(instance)?;
    let mut embedded = Map::new();

    if let Shape::Collection { name, items } = representer.shape() {
        let rendered = items.render_items(instance.resource()?, instance.options(), instance.parent())?;
        if !representer.declares_rules() {
            debug!(representer = %representer.label(), items = rendered.len(), "Rendered collection");
            return Ok(Value::Array(rendered));
        }
        embedded.insert(name.clone(), Value::Array(rendered));
    }

    render_embeds(instance, &mut embedded)?;

    debug!(
        representer = %representer.label(),
        depth = instance.depth(),
        properties = result.len(),
        links = links.len(),
        embedded = embedded.len(),
        "Rendered"
    );

    if !links.is_empty() {
        result.insert(LINKS_KEY.to_owned(), Value::Object(links));
    }
    if !embedded.is_empty() {
        result.insert(EMBEDDED_KEY.to_owned(), Value::Object(embedded));
    }
    Ok(Value::Object(result))
}

fn render_links<D: 'static>(instance: &Instance<'_, D>) -> Result<Map<String, Value>> {
    let mut links = Map::new();

    for definition in instance.representer().definitions().fetch(Kind::Link) {
        if !definition.enabled(instance)? {
            trace!(definition = definition.name(), "Link disabled");
            continue;
        }

        let attrs = definition.options().attributes();
        let link = match definition.value(instance)? {
            Value::Null => continue,
            Value::Array(hrefs) => Value::Array(
                hrefs
                    .into_iter()
                    .filter(|href| !href.is_null())
                    .map(|href| link_object(href, attrs))
                    .collect(),
            ),
            href => link_object(href, attrs),
        };
        links.insert(definition.name().to_owned(), link);
    }

    Ok(links)
}

fn link_object(href: Value, attrs: &Map<String, Value>) -> Value {
    let mut link = Map::new();
    link.insert("href".to_owned(), href);
    for (key, value) in attrs {
        if key != "href" {
            link.insert(key.clone(), value.clone());
        }
    }
    Value::Object(link)
}

fn render_embeds<D: 'static>(
    instance: &Instance<'_, D>,
    embedded: &mut Map<String, Value>,
) -> Result<()> {
    for definition in instance.representer().definitions().fetch(Kind::Embed) {
        if !definition.enabled(instance)? {
            trace!(definition = definition.name(), "Embed not requested");
            continue;
        }

        let child_options = instance.options().for_child(definition.name());
        let children = definition.embedded(instance)?;
        if let Some(rendered) = children.render(child_options, instance.scope())? {
            embedded.insert(definition.name().to_owned(), rendered);
        }
    }
    Ok(())
}
