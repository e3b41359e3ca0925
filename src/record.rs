// src/record.rs
use std::any::type_name;

use serde_json::{Map, Value};

use crate::errors::{DecodeError, Result};
use crate::tag::Tag;
use crate::value::FieldValue;

/// One registered field: its name and its raw tags, keyed by tag key.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldSpec {
    pub const fn new(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, tags }
    }

    /// Raw tag text under `key`, if the field declares one.
    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, raw)| *raw)
    }

    pub fn tag(&self, key: &str) -> Option<Tag> {
        self.lookup(key).map(Tag::parse)
    }
}

/// A structured value whose fields can be enumerated and written.
///
/// `fields`, `values` and `values_mut` must list the same fields in the same
/// (declaration) order. Usually generated with [`record!`](crate::record!).
pub trait Record {
    fn fields(&self) -> &'static [FieldSpec];
    fn values(&self) -> Vec<&dyn FieldValue>;
    fn values_mut(&mut self) -> Vec<&mut dyn FieldValue>;
}

/// A record is zero when every registered field is.
pub fn is_zero<R: Record + ?Sized>(record: &R) -> bool {
    record.values().iter().all(|value| value.is_zero())
}

/// Object keyed by each field's tag name under `key` (field name when
/// untagged). Flattened fields contribute their own keys.
pub fn to_json<R: Record + ?Sized>(record: &R, key: &str) -> Value {
    let mut object = Map::new();
    for (spec, value) in record.fields().iter().zip(record.values()) {
        match spec.tag(key) {
            Some(tag) if tag.is_flatten() => {
                if let Value::Object(inner) = value.to_json(key) {
                    object.extend(inner);
                }
            }
            Some(tag) => {
                object.insert(tag.name, value.to_json(key));
            }
            None => {
                object.insert(spec.name.to_string(), value.to_json(key));
            }
        }
    }
    Value::Object(object)
}

/// Write matching entries of a JSON object into the record's fields.
/// Keys are matched by tag name, then by field name ignoring ASCII case;
/// unmatched keys and fields are left alone.
pub fn assign<R: Record + ?Sized>(record: &mut R, source: &Value, key: &str) -> Result<()> {
    let object = match source {
        Value::Null => return Ok(()),
        Value::Object(object) => object,
        other => {
            return Err(DecodeError::conversion(
                type_name::<R>(),
                other,
                "expected an object",
            ))
        }
    };

    let specs = record.fields();
    for (spec, value) in specs.iter().zip(record.values_mut()) {
        let entry = match spec.tag(key) {
            Some(tag) if tag.is_flatten() => {
                if value.as_record_mut().is_some() {
                    value.assign(source, key)?;
                }
                continue;
            }
            Some(tag) => object.get(&tag.name).or_else(|| by_name(object, spec.name)),
            None => by_name(object, spec.name),
        };
        if let Some(entry) = entry {
            value.assign(entry, key)?;
        }
    }
    Ok(())
}

fn by_name<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

/// Implement [`Record`] and [`FieldValue`] for a `Default` struct.
///
/// ```
/// #[derive(Debug, Default)]
/// struct Member {
///     id: String,
///     age: u32,
///     note: String,
/// }
///
/// inflate::record!(Member {
///     id => { "path": "id", "default": "anonymous" },
///     age => { "query": "age" },
///     note,
/// });
///
/// let mut member = Member::default();
/// inflate::set_default(&mut member).unwrap();
/// assert_eq!(member.id, "anonymous");
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $( $field:ident $( => { $( $key:literal : $raw:literal ),* $(,)? } )? ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $( $crate::FieldSpec::new(stringify!($field), &[ $( $( ($key, $raw) ),* )? ]) ),*
                ];
                FIELDS
            }

            fn values(&self) -> ::std::vec::Vec<&dyn $crate::FieldValue> {
                ::std::vec![ $( &self.$field as &dyn $crate::FieldValue ),* ]
            }

            fn values_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::FieldValue> {
                ::std::vec![ $( &mut self.$field as &mut dyn $crate::FieldValue ),* ]
            }
        }

        $crate::record_value!($ty);
    };
}

/// Implement [`FieldValue`] for a `Default` type that already implements
/// [`Record`] by hand.
#[macro_export]
macro_rules! record_value {
    ($ty:ty) => {
        impl $crate::FieldValue for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Record
            }

            fn is_zero(&self) -> bool {
                $crate::record::is_zero(self)
            }

            fn to_json(&self, key: &str) -> $crate::serde_json::Value {
                $crate::record::to_json(self, key)
            }

            fn assign(&mut self, source: &$crate::serde_json::Value, key: &str) -> $crate::Result<()> {
                $crate::record::assign(self, source, key)
            }

            fn fill(
                &mut self,
                write: &mut dyn FnMut(&mut dyn $crate::FieldValue) -> $crate::Result<()>,
            ) -> $crate::Result<()> {
                $crate::value::fill(self, write)
            }

            fn reset(&mut self) {
                *self = <$ty as ::std::default::Default>::default();
            }

            fn as_record_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Record> {
                ::std::option::Option::Some(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct Address {
        city: String,
        zip: u32,
    }

    crate::record!(Address {
        city => { "field": "city" },
        zip => { "field": "zip_code" },
    });

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        name: String,
        address: Address,
        nickname: String,
    }

    crate::record!(Person {
        name => { "field": "name,required" },
        address => { "field": "~" },
        nickname,
    });

    #[test]
    fn specs_follow_declaration_order() {
        let person = Person::default();
        let names: Vec<_> = person.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "address", "nickname"]);
        assert_eq!(person.fields()[0].lookup("field"), Some("name,required"));
        assert_eq!(person.fields()[2].lookup("field"), None);
    }

    #[test]
    fn to_json_flattens_and_uses_tag_names() {
        let person = Person {
            name: "Ada".into(),
            address: Address { city: "London".into(), zip: 1815 },
            nickname: "countess".into(),
        };
        assert_eq!(
            person.to_json("field"),
            json!({"name": "Ada", "city": "London", "zip_code": 1815, "nickname": "countess"})
        );
    }

    #[test]
    fn assign_matches_tag_then_field_name() {
        let mut person = Person::default();
        person
            .assign(
                &json!({"name": "Ada", "city": "London", "ZIP": "1815", "NickName": "c", "extra": 1}),
                "field",
            )
            .unwrap();
        assert_eq!(person.name, "Ada");
        assert_eq!(person.address, Address { city: "London".into(), zip: 1815 });
        assert_eq!(person.nickname, "c");
    }

    #[test]
    fn assign_rejects_non_objects() {
        let mut person = Person::default();
        let err = person.assign(&json!([1]), "field").unwrap_err();
        assert!(matches!(err, DecodeError::Conversion { .. }));
    }

    #[test]
    fn zero_means_every_field_is_zero() {
        let mut person = Person::default();
        assert!(person.is_zero());
        person.address.zip = 1;
        assert!(!person.is_zero());
    }
}
