// src/value.rs
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::errors::{DecodeError, Result};
use crate::record::Record;

/// Coarse classification of a field's static type. Providers branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Seq,
    Map,
    Record,
    /// Untyped storage (`serde_json::Value`).
    Any,
}

/// A settable handle to one field's storage.
///
/// `key` is the tag key in use; it only matters for records, which use it
/// to match object keys against their tagged fields.
pub trait FieldValue {
    fn kind(&self) -> Kind;

    fn type_name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// True when the value equals its type's zero (`Default`) value.
    fn is_zero(&self) -> bool;

    fn to_json(&self, key: &str) -> Value;

    /// Coerce `source` into this value. `null` leaves it unchanged.
    fn assign(&mut self, source: &Value, key: &str) -> Result<()>;

    /// Hand a fresh zero value of this type to `write`, then store it.
    /// Nothing is stored when `write` fails.
    fn fill(&mut self, write: &mut dyn FnMut(&mut dyn FieldValue) -> Result<()>) -> Result<()>;

    /// Overwrite with the type's zero value.
    fn reset(&mut self);

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

/// Shared `fill` body for every `FieldValue + Default` type.
pub fn fill<T: FieldValue + Default>(
    slot: &mut T,
    write: &mut dyn FnMut(&mut dyn FieldValue) -> Result<()>,
) -> Result<()> {
    let mut fresh = T::default();
    write(&mut fresh)?;
    *slot = fresh;
    Ok(())
}

macro_rules! zero_slot {
    () => {
        fn fill(
            &mut self,
            write: &mut dyn FnMut(&mut dyn FieldValue) -> Result<()>,
        ) -> Result<()> {
            fill(self, write)
        }

        fn reset(&mut self) {
            *self = Default::default();
        }
    };
}

macro_rules! signed_value {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn kind(&self) -> Kind {
                Kind::Int
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn to_json(&self, _key: &str) -> Value {
                Value::from(*self)
            }

            fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
                if source.is_null() {
                    return Ok(());
                }
                let wide = coerce_i64(source)
                    .map_err(|reason| DecodeError::conversion(type_name::<$t>(), source, reason))?;
                *self = <$t>::try_from(wide)
                    .map_err(|e| DecodeError::conversion(type_name::<$t>(), source, e))?;
                Ok(())
            }

            zero_slot!();
        }
    )*};
}

macro_rules! unsigned_value {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn kind(&self) -> Kind {
                Kind::Uint
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn to_json(&self, _key: &str) -> Value {
                Value::from(*self)
            }

            fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
                if source.is_null() {
                    return Ok(());
                }
                let wide = coerce_u64(source)
                    .map_err(|reason| DecodeError::conversion(type_name::<$t>(), source, reason))?;
                *self = <$t>::try_from(wide)
                    .map_err(|e| DecodeError::conversion(type_name::<$t>(), source, e))?;
                Ok(())
            }

            zero_slot!();
        }
    )*};
}

macro_rules! float_value {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn kind(&self) -> Kind {
                Kind::Float
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn to_json(&self, _key: &str) -> Value {
                Value::from(*self)
            }

            fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
                if source.is_null() {
                    return Ok(());
                }
                let wide = coerce_f64(source)
                    .map_err(|reason| DecodeError::conversion(type_name::<$t>(), source, reason))?;
                *self = wide as $t;
                Ok(())
            }

            zero_slot!();
        }
    )*};
}

signed_value!(i8, i16, i32, i64, isize);
unsigned_value!(u8, u16, u32, u64, usize);
float_value!(f32, f64);

impl FieldValue for bool {
    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn to_json(&self, _key: &str) -> Value {
        Value::Bool(*self)
    }

    fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
        if source.is_null() {
            return Ok(());
        }
        *self = coerce_bool(source)
            .map_err(|reason| DecodeError::conversion(type_name::<bool>(), source, reason))?;
        Ok(())
    }

    zero_slot!();
}

impl FieldValue for String {
    fn kind(&self) -> Kind {
        Kind::String
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_json(&self, _key: &str) -> Value {
        Value::String(self.clone())
    }

    fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
        if source.is_null() {
            return Ok(());
        }
        *self = coerce_string(source)
            .map_err(|reason| DecodeError::conversion(type_name::<String>(), source, reason))?;
        Ok(())
    }

    zero_slot!();
}

impl FieldValue for Value {
    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }

    fn to_json(&self, _key: &str) -> Value {
        self.clone()
    }

    fn assign(&mut self, source: &Value, _key: &str) -> Result<()> {
        if !source.is_null() {
            *self = source.clone();
        }
        Ok(())
    }

    zero_slot!();
}

/// `None` is the zero value; the kind is the inner type's kind.
impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn kind(&self) -> Kind {
        match self {
            Some(inner) => inner.kind(),
            None => T::default().kind(),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn to_json(&self, key: &str) -> Value {
        self.as_ref().map_or(Value::Null, |inner| inner.to_json(key))
    }

    fn assign(&mut self, source: &Value, key: &str) -> Result<()> {
        if source.is_null() {
            return Ok(());
        }
        match self {
            Some(inner) => inner.assign(source, key),
            None => {
                let mut inner = T::default();
                inner.assign(source, key)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().and_then(|inner| inner.as_record_mut())
    }

    zero_slot!();
}

impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Seq
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_json(&self, key: &str) -> Value {
        Value::Array(self.iter().map(|item| item.to_json(key)).collect())
    }

    fn assign(&mut self, source: &Value, key: &str) -> Result<()> {
        match source {
            Value::Null => Ok(()),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let mut element = T::default();
                    element.assign(item, key)?;
                    out.push(element);
                }
                *self = out;
                Ok(())
            }
            Value::Object(_) => Err(DecodeError::conversion(
                type_name::<Self>(),
                source,
                "expected an array",
            )),
            // a lone scalar becomes a one-element sequence
            scalar => {
                let mut element = T::default();
                element.assign(scalar, key)?;
                *self = vec![element];
                Ok(())
            }
        }
    }

    zero_slot!();
}

macro_rules! map_value {
    ($($map:ident),*) => {$(
        impl<T: FieldValue + Default> FieldValue for $map<String, T> {
            fn kind(&self) -> Kind {
                Kind::Map
            }

            fn is_zero(&self) -> bool {
                self.is_empty()
            }

            fn to_json(&self, key: &str) -> Value {
                let object: Map<String, Value> = self
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json(key)))
                    .collect();
                Value::Object(object)
            }

            fn assign(&mut self, source: &Value, key: &str) -> Result<()> {
                let entries = match source {
                    Value::Null => return Ok(()),
                    Value::Object(entries) => entries,
                    other => {
                        return Err(DecodeError::conversion(
                            type_name::<Self>(),
                            other,
                            "expected an object",
                        ))
                    }
                };
                let mut out = $map::new();
                for (k, v) in entries {
                    let mut element = T::default();
                    element.assign(v, key)?;
                    out.insert(k.clone(), element);
                }
                *self = out;
                Ok(())
            }

            zero_slot!();
        }
    )*};
}

map_value!(HashMap, BTreeMap);

fn coerce_i64(source: &Value) -> std::result::Result<i64, String> {
    match source {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| format!("{n} does not fit a signed integer")),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse::<i64>().map_err(|e| e.to_string()),
        Value::Bool(b) => Ok(i64::from(*b)),
        _ => Err("expected a number".into()),
    }
}

fn coerce_u64(source: &Value) -> std::result::Result<u64, String> {
    match source {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| format!("{n} does not fit an unsigned integer")),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse::<u64>().map_err(|e| e.to_string()),
        Value::Bool(b) => Ok(u64::from(*b)),
        _ => Err("expected a number".into()),
    }
}

fn coerce_f64(source: &Value) -> std::result::Result<f64, String> {
    match source {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("{n} is not a float")),
        Value::String(s) if s.trim().is_empty() => Ok(0.0),
        Value::String(s) => s.trim().parse::<f64>().map_err(|e| e.to_string()),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        _ => Err("expected a number".into()),
    }
}

fn coerce_bool(source: &Value) -> std::result::Result<bool, String> {
    match source {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim() {
            "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            other => Err(format!("`{other}` is not a boolean")),
        },
        _ => Err("expected a boolean".into()),
    }
}

fn coerce_string(source: &Value) -> std::result::Result<String, String> {
    match source {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err("expected a scalar".into()),
    }
}
