use serde_json::{Map, Value};
use tracing::trace;
use url::form_urlencoded;

use super::{explode, list, tuples, unsupported, Shape, Style};
use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::Result;

/// Values from a URL query string.
///
/// Styles: `form` (default), `space-delimited`, `pipe-delimited` and
/// `deep-object`. An exploded `form` object takes every query pair as a
/// property; the converter ignores the ones a record does not declare.
#[derive(Debug, Clone, Default)]
pub struct QueryProvider {
    pairs: Vec<(String, String)>,
}

impl QueryProvider {
    /// Parse a raw query string; a leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// Every value given for `name`, in order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `name[prop]=value` pairs gathered into an object.
    fn deep_object(&self, name: &str) -> Option<Value> {
        let object: Map<String, Value> = self
            .pairs
            .iter()
            .filter_map(|(key, value)| {
                let prop = key.strip_prefix(name)?.strip_prefix('[')?.strip_suffix(']')?;
                Some((prop.to_string(), Value::String(value.clone())))
            })
            .collect();
        (!object.is_empty()).then_some(Value::Object(object))
    }

    /// All pairs as an object; the first value of a repeated key wins.
    fn all(&self) -> Option<Value> {
        let mut object = Map::new();
        for (key, value) in &self.pairs {
            object
                .entry(key.clone())
                .or_insert_with(|| Value::String(value.clone()));
        }
        (!object.is_empty()).then_some(Value::Object(object))
    }

    pub(crate) fn lookup(&self, source: &str, ctx: &Context<'_>) -> Result<Option<Value>> {
        let name = ctx.tag.name.as_str();
        let shape = Shape::of(ctx.kind);
        let exploded = explode(ctx.tag);

        let value = match (Style::of(ctx.tag, Style::Form), shape) {
            (Style::DeepObject, Shape::Object) => self.deep_object(name),
            (Style::Form, Shape::Object) if exploded => self.all(),
            (Style::Form, Shape::Object) => self.first(name).map(|raw| tuples(raw, ',')),
            (Style::Form, Shape::List) if exploded => {
                let items: Vec<Value> = self
                    .values(name)
                    .map(|item| Value::String(item.to_string()))
                    .collect();
                (!items.is_empty()).then_some(Value::Array(items))
            }
            (Style::Form, Shape::List) => self.first(name).map(|raw| list(raw, ',')),
            (Style::SpaceDelimited, Shape::List) => self.first(name).map(|raw| list(raw, ' ')),
            (Style::SpaceDelimited, Shape::Object) => self.first(name).map(|raw| tuples(raw, ' ')),
            (Style::PipeDelimited, Shape::List) => self.first(name).map(|raw| list(raw, '|')),
            (Style::PipeDelimited, Shape::Object) => self.first(name).map(|raw| tuples(raw, '|')),
            (Style::Form | Style::SpaceDelimited | Style::PipeDelimited, Shape::Scalar) => {
                self.first(name).map(|raw| Value::String(raw.to_string()))
            }
            (style, _) => return Err(unsupported(source, ctx, style)),
        };

        if value.is_none() {
            trace!(param = name, "{source} parameter missing");
        }
        Ok(value)
    }
}

impl Provider for QueryProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        self.lookup("query", ctx)
    }
}
