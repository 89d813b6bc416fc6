use std::fmt;

use serde_json::{Map, Value};

use crate::{resolve::resolve, structs::Entry};

/// Title used when neither an entry nor its staging item has one
pub const UNNAMED_TITLE: &str = "未命名";

/// The shapes a secondary document is known to come in
///
/// Classification order matters: `zhubo` wins over `pingtai`, which wins over a bare object.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    List(&'a [Value]),
    WithZhubo(&'a [Value]),
    WithPingtai(&'a [Value]),
    Bare(&'a Map<String, Value>),
    /// A JSON number, string, boolean or null. Carries no entries.
    Scalar,
}

impl<'a> Document<'a> {
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            Value::Object(map) => {
                if let Some(Value::Array(items)) = map.get("zhubo") {
                    Self::WithZhubo(items)
                } else if let Some(Value::Array(items)) = map.get("pingtai") {
                    Self::WithPingtai(items)
                } else {
                    Self::Bare(map)
                }
            }
            _ => Self::Scalar,
        }
    }

    /// Flattens the document into entries
    ///
    /// `fallback_title` is used for elements without a title of their own; pass the
    /// staging item's title (an empty one falls back to [`UNNAMED_TITLE`]).
    #[must_use]
    pub fn entries(&self, fallback_title: &str, prefix: &str) -> Vec<Entry> {
        let fallback_title = if fallback_title.is_empty() {
            UNNAMED_TITLE
        } else {
            fallback_title
        };

        match self {
            Self::List(items) | Self::WithZhubo(items) | Self::WithPingtai(items) => items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|item| extract_entry(item, fallback_title, prefix))
                .collect(),
            Self::Bare(map) => extract_entry(map, fallback_title, prefix)
                .into_iter()
                .collect(),
            Self::Scalar => Vec::new(),
        }
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(items) => write!(f, "list with {} elements", items.len()),
            Self::WithZhubo(items) => write!(f, "object with `zhubo` ({} elements)", items.len()),
            Self::WithPingtai(items) => {
                write!(f, "object with `pingtai` ({} elements)", items.len())
            }
            Self::Bare(_) => f.write_str("single object"),
            Self::Scalar => f.write_str("scalar"),
        }
    }
}

/// Shorthand for `Document::classify(value).entries(..)`
#[must_use]
pub fn normalize(value: &Value, fallback_title: &str, prefix: &str) -> Vec<Entry> {
    Document::classify(value).entries(fallback_title, prefix)
}

fn extract_entry(item: &Map<String, Value>, fallback_title: &str, prefix: &str) -> Option<Entry> {
    let address = item
        .get("address")
        .and_then(Value::as_str)
        .filter(|a| !a.is_empty())?;

    let title = match item.get("title") {
        None | Some(Value::Null) => fallback_title.to_string(),
        Some(Value::String(t)) => t.clone(),
        Some(other) => other.to_string(),
    };

    Some(Entry::new(title, resolve(address, prefix)))
}
