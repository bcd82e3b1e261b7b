//! # Render Options
//!
//! Per-render options passed to [`Representer::render`](crate::Representer::render).
//! Keys are arbitrary; the only key the engine itself reads is `embed`, which
//! selects the embeds to include (see [`Options::embed_options`]).

use serde_json::{Map, Value};

use crate::error::HalogenError;

/// Option key holding the requested embeds.
pub const EMBED_KEY: &str = "embed";

/// String-keyed options for one render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: Map<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the options with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }

    /// Requests the given embeds. Dotted paths request nested embeds, so
    /// `"author.posts"` embeds `author` and, inside it, `posts`.
    pub fn embed<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut requested = self.embed_options();
        for path in paths {
            insert_path(&mut requested, path.as_ref());
        }
        self.entries
            .insert(EMBED_KEY.to_owned(), Value::Object(requested));
        self
    }

    /// Requests embeds from a comma-separated parameter such as the
    /// `?embed=comments,author.posts` query string value.
    pub fn embed_param(self, param: &str) -> Self {
        self.embed(param.split(','))
    }

    /// The embed selection as a mapping of embed name to value.
    ///
    /// An object is used as is, a string is read as a comma-separated
    /// parameter and an array as a list of paths. Anything else selects nothing.
    pub fn embed_options(&self) -> Map<String, Value> {
        match self.entries.get(EMBED_KEY) {
            Some(Value::Object(requested)) => requested.clone(),
            Some(Value::String(param)) => parse_paths(param.split(',')),
            Some(Value::Array(paths)) => parse_paths(paths.iter().filter_map(Value::as_str)),
            _ => Map::new(),
        }
    }

    /// Options handed to the representer of embed `name`: everything is kept
    /// except `embed`, which narrows to the selection nested under `name`.
    pub(crate) fn for_child(&self, name: &str) -> Options {
        let nested = match self.embed_options().remove(name) {
            Some(Value::Object(nested)) => nested,
            _ => Map::new(),
        };
        let mut child = self.clone();
        child
            .entries
            .insert(EMBED_KEY.to_owned(), Value::Object(nested));
        child
    }
}

impl From<Map<String, Value>> for Options {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl TryFrom<Value> for Options {
    type Error = HalogenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Ok(Self::default()),
            other => Err(HalogenError::InvalidOptions(format!(
                "expected an object, got {other}"
            ))),
        }
    }
}

fn parse_paths<'a>(paths: impl Iterator<Item = &'a str>) -> Map<String, Value> {
    let mut requested = Map::new();
    for path in paths {
        insert_path(&mut requested, path);
    }
    requested
}

fn insert_path(target: &mut Map<String, Value>, path: &str) {
    let mut segments = path.split('.').map(str::trim).filter(|s| !s.is_empty());
    let Some(first) = segments.next() else {
        return;
    };
    let rest: Vec<&str> = segments.collect();

    if rest.is_empty() {
        target.entry(first).or_insert(Value::Bool(true));
        return;
    }

    let entry = target
        .entry(first)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(nested) = entry {
        insert_path(nested, &rest.join("."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embed_paths_nest() {
        let options = Options::new().embed(["comments", "author.posts", "author"]);

        assert_eq!(
            options.get(EMBED_KEY),
            Some(&json!({ "comments": true, "author": { "posts": true } }))
        );
    }

    #[test]
    fn test_embed_param_ignores_blank_segments() {
        let options = Options::new().embed_param("comments, ,author.posts,");

        assert_eq!(
            Value::Object(options.embed_options()),
            json!({ "comments": true, "author": { "posts": true } })
        );
    }

    #[test]
    fn test_embed_options_accepts_string_and_array() {
        let from_string = Options::new().with(EMBED_KEY, "a,b.c");
        let from_array = Options::new().with(EMBED_KEY, json!(["a", "b.c"]));

        assert_eq!(from_string.embed_options(), from_array.embed_options());
        assert_eq!(
            Value::Object(from_array.embed_options()),
            json!({ "a": true, "b": { "c": true } })
        );
        assert!(Options::new().with(EMBED_KEY, 1).embed_options().is_empty());
    }

    #[test]
    fn test_child_options_narrow_embed_selection() {
        let options = Options::new()
            .with("locale", "en")
            .with(EMBED_KEY, json!({ "author": { "posts": "1" }, "comments": true }));

        let author = options.for_child("author");
        let comments = options.for_child("comments");

        assert_eq!(author.get("locale"), Some(&json!("en")));
        assert_eq!(author.get(EMBED_KEY), Some(&json!({ "posts": "1" })));
        assert_eq!(comments.get(EMBED_KEY), Some(&json!({})));
    }

    #[test]
    fn test_try_from_value() {
        let options = Options::try_from(json!({ "embed": { "foo": true } })).unwrap();
        assert!(options.contains_key("embed"));

        assert!(Options::try_from(Value::Null).unwrap().as_map().is_empty());
        assert!(matches!(
            Options::try_from(json!([1, 2])),
            Err(HalogenError::InvalidOptions(_))
        ));
    }
}
