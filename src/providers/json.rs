use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::{DecodeError, Result};

/// Values looked up by tag name in a JSON object, e.g. a parsed request
/// body. Values are handed over as-is; nested objects bind to records.
#[derive(Debug, Clone, Default)]
pub struct JsonProvider {
    document: Map<String, Value>,
}

impl JsonProvider {
    pub fn new(document: Map<String, Value>) -> Self {
        Self { document }
    }

    /// Parse JSON text, which must hold an object.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map(Self::new)
            .map_err(|e| DecodeError::Provider(format!("invalid json source: {e}")))
    }

    /// Serialize any value into the lookup document; it must serialize to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| DecodeError::Provider(format!("invalid json source: {e}")))?;
        match value {
            Value::Object(document) => Ok(Self::new(document)),
            other => Err(DecodeError::Provider(format!(
                "json source must be an object, got {other}"
            ))),
        }
    }
}

impl Provider for JsonProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        Ok(self.document.get(&ctx.tag.name).cloned())
    }
}
