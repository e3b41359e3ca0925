// src/walker.rs
use crate::record::Record;
use crate::tag::Tag;
use crate::value::FieldValue;

/// A field that declares the active tag key, with a writable handle to it.
pub struct Field<'a> {
    pub name: &'static str,
    pub tag: Tag,
    pub value: &'a mut dyn FieldValue,
}

/// The tagged fields of one record, in declaration order.
pub struct Struct<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> Struct<'a> {
    pub fn fields(&self) -> &[Field<'a>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for Struct<'a> {
    type Item = Field<'a>;
    type IntoIter = std::vec::IntoIter<Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Enumerate the direct fields of `record` tagged under `key`.
/// Untagged fields are skipped; nested records are not entered.
pub fn walk<'a>(key: &str, record: &'a mut dyn Record) -> Struct<'a> {
    let specs = record.fields();
    let values = record.values_mut();
    debug_assert_eq!(specs.len(), values.len(), "record field table out of sync");

    let fields = specs
        .iter()
        .zip(values)
        .filter_map(|(spec, value)| {
            spec.tag(key).map(|tag| Field {
                name: spec.name,
                tag,
                value,
            })
        })
        .collect();
    Struct { fields }
}
