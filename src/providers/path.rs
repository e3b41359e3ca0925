use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::{explode, list, pairs, tuples, unsupported, Shape, Style};
use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::Result;

/// Values from already-matched URL path parameters.
///
/// Supports the `simple` (default), `label` and `matrix` styles. With
/// `explode`, lists and objects repeat the separator per item:
///
/// - simple: `5`, `3,4,5`, `a,1,b,2` or `a=1,b=2`
/// - label: `.5`, `.3,4,5` or `.3.4.5`, `.a,1,b,2` or `.a=1.b=2`
/// - matrix: `;id=5`, `;id=3,4,5` or `;id=3;id=4`, `;id=a,1,b,2` or `;a=1;b=2`
#[derive(Debug, Clone, Default)]
pub struct PathProvider {
    params: HashMap<String, String>,
}

impl PathProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Provider for PathProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        let name = ctx.tag.name.as_str();
        let Some(raw) = self.get(name) else {
            trace!(param = name, "path parameter missing");
            return Ok(None);
        };

        let shape = Shape::of(ctx.kind);
        let exploded = explode(ctx.tag);
        let value = match Style::of(ctx.tag, Style::Simple) {
            Style::Simple => match shape {
                Shape::Scalar => Value::String(raw.to_string()),
                Shape::List => list(raw, ','),
                Shape::Object if exploded => pairs(raw, ','),
                Shape::Object => tuples(raw, ','),
            },
            Style::Label => {
                let raw = raw.strip_prefix('.').unwrap_or(raw);
                match shape {
                    Shape::Scalar => Value::String(raw.to_string()),
                    Shape::List if exploded => list(raw, '.'),
                    Shape::List => list(raw, ','),
                    Shape::Object if exploded => pairs(raw, '.'),
                    Shape::Object => tuples(raw, ','),
                }
            }
            Style::Matrix => {
                let raw = raw.strip_prefix(';').unwrap_or(raw);
                match shape {
                    Shape::Object if exploded => pairs(raw, ';'),
                    Shape::List if exploded => Value::Array(
                        raw.split(';')
                            .filter_map(|pair| matrix_value(pair, name))
                            .map(|item| Value::String(item.to_string()))
                            .collect(),
                    ),
                    _ => {
                        let inner = matrix_value(raw, name).unwrap_or_default();
                        match shape {
                            Shape::Scalar => Value::String(inner.to_string()),
                            Shape::List => list(inner, ','),
                            Shape::Object => tuples(inner, ','),
                        }
                    }
                }
            }
            style => return Err(unsupported("path", ctx, style)),
        };
        Ok(Some(value))
    }
}

/// `id=5` -> `5` when the key is `id`.
fn matrix_value<'a>(pair: &'a str, name: &str) -> Option<&'a str> {
    pair.split_once('=')
        .filter(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
