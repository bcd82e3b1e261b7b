//! # Configuration & Extensions
//!
//! Process-wide settings applied when a [`Representer`](crate::Representer) is
//! created. The global instance is created lazily on first access; configure
//! it before declaring representers, since nothing is applied retroactively.
//! Tests and embedders can skip the global entirely and pass their own
//! [`Configuration`] to [`Representer::with_config`](crate::Representer::with_config).
//!
//! ```rust
//! use halogen::{configure, Capabilities, Extension};
//!
//! struct ApiVersion;
//!
//! impl Extension for ApiVersion {
//!     fn name(&self) -> &str {
//!         "api_version"
//!     }
//!
//!     fn install(&self, capabilities: &mut Capabilities) {
//!         capabilities.property("api_version", |_| Ok("v2".into()));
//!     }
//! }
//!
//! configure(|config| {
//!     config.extension(ApiVersion);
//! });
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde_json::{Map, Value};
use tracing::info;

use crate::definition::Kind;
use crate::error::Result;
use crate::instance::Scope;

/// Default cap on embed nesting.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Type-independent procedure contributed by an extension.
pub type ScopeFn = Arc<dyn Fn(&Scope<'_>) -> Result<Value> + Send + Sync>;

/// A capability module attached to every representer created after it was
/// configured.
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    /// Declares the methods and definitions this extension contributes.
    fn install(&self, capabilities: &mut Capabilities);
}

pub(crate) struct ScopedDefinition {
    pub(crate) kind: Kind,
    pub(crate) name: String,
    pub(crate) attrs: Map<String, Value>,
    pub(crate) procedure: ScopeFn,
}

/// Collects what an [`Extension`] contributes. Procedures only see the
/// [`Scope`], so they work for any domain type.
#[derive(Default)]
pub struct Capabilities {
    pub(crate) methods: Vec<(String, ScopeFn)>,
    pub(crate) definitions: Vec<ScopedDefinition>,
}

impl Capabilities {
    /// A named method usable by guards and as a value fallback.
    pub fn method<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Scope<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.push((name.into(), Arc::new(f)));
        self
    }

    pub fn property<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&Scope<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.definitions.push(ScopedDefinition {
            kind: Kind::Property,
            name: name.into(),
            attrs: Map::new(),
            procedure: Arc::new(f),
        });
        self
    }

    pub fn link<F>(&mut self, name: impl Into<String>, flags: &[&str], f: F) -> &mut Self
    where
        F: Fn(&Scope<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        let attrs = flags
            .iter()
            .map(|flag| ((*flag).to_owned(), Value::Bool(true)))
            .collect();
        self.link_with_attrs(name, attrs, f)
    }

    /// A link carrying arbitrary attributes next to its href.
    pub fn link_with_attrs<F>(
        &mut self,
        name: impl Into<String>,
        attrs: Map<String, Value>,
        f: F,
    ) -> &mut Self
    where
        F: Fn(&Scope<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.definitions.push(ScopedDefinition {
            kind: Kind::Link,
            name: name.into(),
            attrs,
            procedure: Arc::new(f),
        });
        self
    }
}

/// Settings read when a representer is created.
#[derive(Clone)]
pub struct Configuration {
    extensions: Vec<Arc<dyn Extension>>,
    max_depth: usize,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Appends an extension; extensions are installed in the order added.
    pub fn extension(&mut self, extension: impl Extension + 'static) -> &mut Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    pub fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.extensions.iter().map(|e| e.name()).collect();
        f.debug_struct("Configuration")
            .field("extensions", &names)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

static GLOBAL: OnceLock<RwLock<Configuration>> = OnceLock::new();

fn global() -> &'static RwLock<Configuration> {
    GLOBAL.get_or_init(|| RwLock::new(Configuration::new()))
}

/// Snapshot of the global configuration.
pub fn config() -> Configuration {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Modifies the global configuration.
pub fn configure<F>(f: F)
where
    F: FnOnce(&mut Configuration),
{
    let mut config = global().write().unwrap_or_else(PoisonError::into_inner);
    f(&mut config);
    info!(
        extensions = config.extensions.len(),
        max_depth = config.max_depth,
        "Configuration updated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Extension for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn install(&self, _capabilities: &mut Capabilities) {}
    }

    #[test]
    fn test_isolated_configuration() {
        let mut config = Configuration::new();
        config.extension(Noop).set_max_depth(4);

        assert_eq!(config.max_depth(), 4);
        assert_eq!(config.extensions().len(), 1);
        assert_eq!(format!("{config:?}"), r#"Configuration { extensions: ["noop"], max_depth: 4 }"#);
        assert_eq!(Configuration::default().max_depth(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_link_flags_become_attrs() {
        let mut capabilities = Capabilities::default();
        capabilities.link("curies", &["templated"], |_| Ok(Value::Null));

        let definition = &capabilities.definitions[0];
        assert_eq!(definition.kind, Kind::Link);
        assert_eq!(definition.attrs.get("templated"), Some(&Value::Bool(true)));
    }
}
