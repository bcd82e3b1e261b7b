//! # HAL Curies
//!
//! [`Curies`] is an [`Extension`] adding the HAL `curies` link to the root of
//! every document, so compact relation names like `blog:comments` can be
//! expanded to their documentation URL. Nested documents skip it: the link
//! procedure returns `null` below depth 0, and null links are omitted.

use halogen::{Capabilities, Extension};
use serde_json::{json, Map, Value};

pub struct Curies {
    name: String,
    href: String,
}

impl Curies {
    /// `href` is a URI template with a `{rel}` placeholder.
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

impl Extension for Curies {
    fn name(&self) -> &str {
        "curies"
    }

    fn install(&self, capabilities: &mut Capabilities) {
        let mut attrs = Map::new();
        attrs.insert("name".to_owned(), Value::String(self.name.clone()));
        attrs.insert("templated".to_owned(), Value::Bool(true));

        let href = self.href.clone();
        capabilities.link_with_attrs("curies", attrs, move |scope| {
            if scope.depth() == 0 {
                Ok(json!([href]))
            } else {
                Ok(Value::Null)
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halogen::{Configuration, Options, Representer};

    #[test]
    fn test_curies_on_root_document() {
        let mut config = Configuration::new();
        config.extension(Curies::new("blog", "/docs/rels/{rel}"));

        let representer = Representer::<()>::with_config(&config);
        let rendered = representer.render(&(), Options::new()).unwrap();

        assert_eq!(
            rendered,
            json!({
                "_links": {
                    "curies": [{ "href": "/docs/rels/{rel}", "name": "blog", "templated": true }]
                }
            })
        );
    }
}
