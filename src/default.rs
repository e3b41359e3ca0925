// src/default.rs
use serde_json::{Map, Value};
use tracing::trace;

use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::Result;
use crate::value::Kind;

/// Supplies the tag name as a default literal, but only for zero fields.
///
/// Records and maps read the literal as a JSON object, sequences as a JSON
/// array; everything else gets the raw text and leaves parsing to the
/// converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProvider;

impl Provider for DefaultProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        if !ctx.is_zero {
            return Ok(None);
        }

        let literal = ctx.tag.name.as_str();
        if literal.is_empty() {
            return Ok(None);
        }
        trace!(field = ctx.field, literal, "applying default");

        let value = match ctx.kind {
            Kind::Record | Kind::Map => {
                let object: Map<String, Value> = serde_json::from_str(literal)?;
                Value::Object(object)
            }
            Kind::Seq => {
                let items: Vec<Value> = serde_json::from_str(literal)?;
                Value::Array(items)
            }
            _ => Value::String(literal.to_string()),
        };
        Ok(Some(value))
    }
}
