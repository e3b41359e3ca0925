//! Value providers for common external sources.
//!
//! Parameter styles follow the OpenAPI serialization vocabulary and are
//! selected through tag options, e.g. `query:"ids,pipe-delimited"` or
//! `path:"point,matrix,explode"`. A provider answers with a string for
//! scalar fields, an array of strings for sequences and an object of
//! strings for maps and records; the converter does the rest.

mod form;
mod header;
mod json;
mod path;
mod query;

pub use form::FormProvider;
pub use header::HeaderProvider;
pub use json::JsonProvider;
pub use path::PathProvider;
pub use query::QueryProvider;

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::context::Context;
use crate::errors::DecodeError;
use crate::tag::{options, Tag};
use crate::value::Kind;

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Simple,
    Form,
    Label,
    Matrix,
    DeepObject,
    SpaceDelimited,
    PipeDelimited,
}

impl Style {
    /// First style option on the tag, or `fallback` when there is none.
    pub fn of(tag: &Tag, fallback: Style) -> Style {
        tag.options
            .iter()
            .find_map(|opt| Style::from_option(opt))
            .unwrap_or(fallback)
    }

    pub fn from_option(option: &str) -> Option<Style> {
        match option {
            options::SIMPLE => Some(Style::Simple),
            options::FORM => Some(Style::Form),
            options::LABEL => Some(Style::Label),
            options::MATRIX => Some(Style::Matrix),
            options::DEEP_OBJECT => Some(Style::DeepObject),
            options::SPACE_DELIMITED => Some(Style::SpaceDelimited),
            options::PIPE_DELIMITED => Some(Style::PipeDelimited),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::Simple => options::SIMPLE,
            Style::Form => options::FORM,
            Style::Label => options::LABEL,
            Style::Matrix => options::MATRIX,
            Style::DeepObject => options::DEEP_OBJECT,
            Style::SpaceDelimited => options::SPACE_DELIMITED,
            Style::PipeDelimited => options::PIPE_DELIMITED,
        }
    }
}

/// How a field wants its raw value shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Scalar,
    List,
    Object,
}

impl Shape {
    pub(crate) fn of(kind: Kind) -> Shape {
        match kind {
            Kind::Seq => Shape::List,
            Kind::Map | Kind::Record => Shape::Object,
            _ => Shape::Scalar,
        }
    }
}

pub(crate) fn explode(tag: &Tag) -> bool {
    tag.has_option(options::EXPLODE)
}

pub(crate) fn unsupported(source: &str, ctx: &Context<'_>, style: Style) -> DecodeError {
    DecodeError::Provider(format!(
        "{source} parameter `{}` (field `{}`) does not support the {} style",
        ctx.tag.name,
        ctx.field,
        style.as_str()
    ))
}

/// `3,4,5` -> `["3","4","5"]`
pub(crate) fn list(raw: &str, sep: char) -> Value {
    Value::Array(
        raw.split(sep)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    )
}

/// `role=admin,name=Alex` -> `{"role":"admin","name":"Alex"}`
pub(crate) fn pairs(raw: &str, sep: char) -> Value {
    let object: Map<String, Value> = raw
        .split(sep)
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Value::Object(object)
}

/// `role,admin,name,Alex` -> `{"role":"admin","name":"Alex"}`
/// A trailing key without a value is dropped.
pub(crate) fn tuples(raw: &str, sep: char) -> Value {
    let object: Map<String, Value> = raw
        .split(sep)
        .tuples()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Value::Object(object)
}
