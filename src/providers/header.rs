use std::collections::HashMap;

use serde_json::Value;
use tracing::trace;

use super::{explode, list, pairs, tuples, unsupported, Shape, Style};
use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::Result;

/// Values from request headers. Names are matched case-insensitively and
/// repeated headers are joined with `,`. Only the `simple` style applies.
#[derive(Debug, Clone, Default)]
pub struct HeaderProvider {
    headers: HashMap<String, String>,
}

impl HeaderProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|joined| {
                joined.push(',');
                joined.push_str(&value);
            })
            .or_insert_with(|| value.clone());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut provider = HeaderProvider::new();
        for (name, value) in iter {
            provider.append(name.as_ref(), value);
        }
        provider
    }
}

impl Provider for HeaderProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        let style = Style::of(ctx.tag, Style::Simple);
        if style != Style::Simple {
            return Err(unsupported("header", ctx, style));
        }

        let Some(raw) = self.get(&ctx.tag.name) else {
            trace!(header = %ctx.tag.name, "header missing");
            return Ok(None);
        };

        let value = match Shape::of(ctx.kind) {
            Shape::Scalar => Value::String(raw.trim().to_string()),
            Shape::List => list(&raw.replace(", ", ","), ','),
            Shape::Object if explode(ctx.tag) => pairs(raw, ','),
            Shape::Object => tuples(raw, ','),
        };
        Ok(Some(value))
    }
}
