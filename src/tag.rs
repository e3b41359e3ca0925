// src/tag.rs
use itertools::Itertools;

/// Reserved tag name: recurse into the field instead of assigning it.
pub const FLATTEN: &str = "~";

/// Option vocabulary understood by the bundled providers.
/// The core keeps whatever tokens it finds; only providers read them.
pub mod options {
    pub const SIMPLE: &str = "simple";
    pub const FORM: &str = "form";
    pub const LABEL: &str = "label";
    pub const MATRIX: &str = "matrix";
    pub const EXPLODE: &str = "explode";
    pub const DEEP_OBJECT: &str = "deep-object";
    pub const SPACE_DELIMITED: &str = "space-delimited";
    pub const PIPE_DELIMITED: &str = "pipe-delimited";
}

/// A parsed field tag: `name[,opt1[,opt2...]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Distinct option tokens in first-seen order.
    pub options: Vec<String>,
}

impl Tag {
    pub fn parse(raw: &str) -> Self {
        let end = name_end(raw);
        let name = raw[..end].trim().to_string();
        let options = raw[end..]
            .split(',')
            .map(str::trim)
            .filter(|opt| !opt.is_empty())
            .unique()
            .map(str::to_string)
            .collect();
        Self { name, options }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    pub fn is_flatten(&self) -> bool {
        self.name == FLATTEN
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Tag::parse(raw)
    }
}

/// Byte offset of the first comma outside JSON brackets and string quotes.
/// Plain names have neither, so for them this is just the first comma.
fn name_end(raw: &str) -> usize {
    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in raw.char_indices() {
        if quoted {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '{' | '[' => depth += 1,
            '}' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return i,
            _ => {}
        }
    }
    raw.len()
}
