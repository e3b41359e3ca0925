use serde_json::Value;

use super::QueryProvider;
use crate::context::Context;
use crate::decoder::Provider;
use crate::errors::Result;

/// Values from an `application/x-www-form-urlencoded` body.
/// Field lookup follows the same style rules as [`QueryProvider`].
#[derive(Debug, Clone, Default)]
pub struct FormProvider {
    body: QueryProvider,
}

impl FormProvider {
    pub fn parse(body: &str) -> Self {
        Self {
            body: QueryProvider::parse(body),
        }
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.body.first(name)
    }
}

impl Provider for FormProvider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        self.body.lookup("form", ctx)
    }
}
