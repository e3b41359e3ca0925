use crate::tag::Tag;
use crate::value::Kind;

/// What a provider gets to see about the leaf field being decoded.
/// Built right before the provider call and dropped right after it.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Field name as registered by the record.
    pub field: &'a str,
    pub kind: Kind,
    /// Rust type of the field, for diagnostics.
    pub type_name: &'static str,
    /// Whether the field currently holds its type's zero value.
    pub is_zero: bool,
    pub tag: &'a Tag,
}
