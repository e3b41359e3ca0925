// src/decoder.rs
use serde_json::Value;
use tracing::{debug, trace};

use crate::context::Context;
use crate::errors::{DecodeError, Result};
use crate::record::Record;
use crate::value::FieldValue;
use crate::walker::{walk, Field};

/// Source of raw values, one leaf field at a time.
///
/// `Ok(None)` means "nothing to supply": the field is left as it is.
/// An error aborts the whole decode.
pub trait Provider {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>>;
}

/// Coerces a raw value into a typed field. `None` must leave `target` alone.
pub trait Converter {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> Result<()>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        (**self).value(ctx)
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn value(&self, ctx: &Context<'_>) -> Result<Option<Value>> {
        (**self).value(ctx)
    }
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> Result<()> {
        (**self).convert(source, target)
    }
}

impl<C: Converter + ?Sized> Converter for Box<C> {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> Result<()> {
        (**self).convert(source, target)
    }
}

/// Structural converter: scalars are coerced weakly, objects are matched
/// against record fields by their tag names under `tag_name`.
#[derive(Debug, Clone)]
pub struct StructConverter {
    pub tag_name: String,
}

impl StructConverter {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self { tag_name: tag_name.into() }
    }
}

impl Converter for StructConverter {
    fn convert(&self, source: Option<&Value>, target: &mut dyn FieldValue) -> Result<()> {
        match source {
            Some(source) => target.assign(source, &self.tag_name),
            None => Ok(()),
        }
    }
}

/// What to do with a flatten-tagged field that holds no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlattenPolicy {
    /// Overwrite the field with its zero value.
    #[default]
    Reset,
    /// Leave the field untouched.
    Skip,
    /// Fail with [`DecodeError::Flatten`].
    Reject,
}

/// Where a flatten-tagged record field is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlattenTarget {
    /// Decode the nested record as it stands, so its zero checks see the
    /// caller's values and fields without the tag key survive.
    #[default]
    InPlace,
    /// Decode into a fresh zero record and store it only on success.
    Fresh,
}

/// Walks a record depth-first and fills every tagged leaf field from
/// `provider`, converting through `converter`.
#[derive(Debug, Clone)]
pub struct Decoder<P, C> {
    tag_name: String,
    provider: P,
    converter: C,
    flatten: FlattenPolicy,
    nested: FlattenTarget,
}

impl<P: Provider, C: Converter> Decoder<P, C> {
    pub fn new(tag_name: impl Into<String>, provider: P, converter: C) -> Self {
        Self {
            tag_name: tag_name.into(),
            provider,
            converter,
            flatten: FlattenPolicy::default(),
            nested: FlattenTarget::default(),
        }
    }

    pub fn with_flatten_policy(mut self, policy: FlattenPolicy) -> Self {
        self.flatten = policy;
        self
    }

    pub fn with_flatten_target(mut self, target: FlattenTarget) -> Self {
        self.nested = target;
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Decode into `target`, which must be a record.
    ///
    /// Fields are written in traversal order and nothing is rolled back: on
    /// error the fields visited so far keep their new values.
    pub fn decode(&self, target: &mut dyn FieldValue) -> Result<()> {
        let type_name = target.type_name();
        let record = target
            .as_record_mut()
            .ok_or(DecodeError::InvalidTarget(type_name))?;
        debug!(tag = %self.tag_name, target = type_name, "decoding");
        self.decode_record(record)
    }

    fn decode_record(&self, record: &mut dyn Record) -> Result<()> {
        for field in walk(&self.tag_name, record) {
            if field.tag.is_flatten() {
                self.flatten(field)?;
                continue;
            }

            let ctx = Context {
                field: field.name,
                kind: field.value.kind(),
                type_name: field.value.type_name(),
                is_zero: field.value.is_zero(),
                tag: &field.tag,
            };
            trace!(field = ctx.field, tag = %ctx.tag.name, is_zero = ctx.is_zero, "visiting");

            let source = match self.provider.value(&ctx)? {
                Some(Value::Null) | None => {
                    // the converter sees the absent marker but nothing is stored
                    self.converter.convert(None, &mut *field.value)?;
                    continue;
                }
                Some(source) => source,
            };

            let converter = &self.converter;
            field
                .value
                .fill(&mut |target| converter.convert(Some(&source), target))?;
        }
        Ok(())
    }

    fn flatten(&self, field: Field<'_>) -> Result<()> {
        if field.value.as_record_mut().is_some() {
            trace!(field = field.name, target = ?self.nested, "entering nested record");
            return match self.nested {
                FlattenTarget::InPlace => match field.value.as_record_mut() {
                    Some(nested) => self.decode_record(nested),
                    None => Ok(()),
                },
                FlattenTarget::Fresh => field.value.fill(&mut |fresh| match fresh.as_record_mut() {
                    Some(nested) => self.decode_record(nested),
                    None => Ok(()),
                }),
            };
        }

        let type_name = field.value.type_name();
        debug!(field = field.name, target = type_name, policy = ?self.flatten, "flatten marker on a non-record field");
        match self.flatten {
            FlattenPolicy::Reset => {
                field.value.reset();
                Ok(())
            }
            FlattenPolicy::Skip => Ok(()),
            FlattenPolicy::Reject => Err(DecodeError::Flatten {
                field: field.name.to_string(),
                type_name,
            }),
        }
    }
}
