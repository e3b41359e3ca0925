//! Tag-driven decoding of loosely typed values into typed records.
//!
//! A record lists its fields once, each with per-key tags such as
//! `"path": "id"` or `"default": "8080"`. A [`Decoder`] walks the fields
//! carrying its tag key, asks a [`Provider`] for a raw value per field and
//! writes it through a [`Converter`]. Fields tagged `~` are not assigned
//! but recursed into.
//!
//! ```
//! #[derive(Debug, Default)]
//! struct Member {
//!     id: String,
//! }
//!
//! inflate::record!(Member {
//!     id => { "path": "id" },
//! });
//!
//! let params: inflate::PathProvider = [("id", "123456")].into_iter().collect();
//! let mut member = Member::default();
//! inflate::path_decoder(params).decode(&mut member).unwrap();
//! assert_eq!(member.id, "123456");
//! ```

pub mod context;
pub mod decoder;
pub mod default;
pub mod errors;
pub mod providers;
pub mod record;
pub mod tag;
pub mod value;
pub mod walker;

#[doc(hidden)]
pub use serde_json;

pub use context::Context;
pub use decoder::{Converter, Decoder, FlattenPolicy, FlattenTarget, Provider, StructConverter};
pub use default::DefaultProvider;
pub use errors::{DecodeError, Result};
pub use providers::{FormProvider, HeaderProvider, JsonProvider, PathProvider, QueryProvider};
pub use record::{FieldSpec, Record};
pub use tag::{options, Tag, FLATTEN};
pub use value::{FieldValue, Kind};
pub use walker::{walk, Field, Struct};

/// Tag key used by [`set`].
pub const FIELD_TAG: &str = "field";
/// Tag key used by [`set_default`].
pub const DEFAULT_TAG: &str = "default";
pub const PATH_TAG: &str = "path";
pub const QUERY_TAG: &str = "query";
pub const HEADER_TAG: &str = "header";
pub const FORM_TAG: &str = "form";
pub const JSON_TAG: &str = "json";

/// Copy `source` into `target` field by field, matching tag names under
/// `field` (or field names when untagged). No defaulting: matched fields
/// are overwritten whatever they held.
pub fn set(source: &dyn FieldValue, target: &mut dyn FieldValue) -> Result<()> {
    let converter = StructConverter::new(FIELD_TAG);
    converter.convert(Some(&source.to_json(FIELD_TAG)), target)
}

/// Fill every zero field of `target` from its `default` tag literal.
pub fn set_default(target: &mut dyn FieldValue) -> Result<()> {
    Decoder::new(DEFAULT_TAG, DefaultProvider, StructConverter::new(DEFAULT_TAG)).decode(target)
}

/// Decoder over URL path parameters, keyed by `path` tags.
pub fn path_decoder(params: PathProvider) -> Decoder<PathProvider, StructConverter> {
    Decoder::new(PATH_TAG, params, StructConverter::new(PATH_TAG))
}

/// Decoder over a raw query string, keyed by `query` tags.
pub fn query_decoder(query: &str) -> Decoder<QueryProvider, StructConverter> {
    Decoder::new(QUERY_TAG, QueryProvider::parse(query), StructConverter::new(QUERY_TAG))
}

/// Decoder over request headers, keyed by `header` tags.
pub fn header_decoder(headers: HeaderProvider) -> Decoder<HeaderProvider, StructConverter> {
    Decoder::new(HEADER_TAG, headers, StructConverter::new(HEADER_TAG))
}

/// Decoder over a url-encoded form body, keyed by `form` tags.
pub fn form_decoder(body: &str) -> Decoder<FormProvider, StructConverter> {
    Decoder::new(FORM_TAG, FormProvider::parse(body), StructConverter::new(FORM_TAG))
}

/// Decoder over a JSON object, keyed by `json` tags.
pub fn json_decoder(document: JsonProvider) -> Decoder<JsonProvider, StructConverter> {
    Decoder::new(JSON_TAG, document, StructConverter::new(JSON_TAG))
}
