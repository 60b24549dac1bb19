//! Post model

use serde::Serialize;

use crate::error::FormatError;

/// Suffix of post sources in the raw store
pub const SOURCE_SUFFIX: &str = ".md";

/// Suffix of rendered artifacts in the build store
pub const OUTPUT_SUFFIX: &str = ".html";

/// A single post: its metadata fields and the raw, un-rendered body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Post {
    pub title: String,
    pub author: String,
    /// Free-form, never parsed as a calendar date
    pub date: String,
    /// Raw markdown body
    pub content: String,
}

/// One metadata key and how it maps onto a [`Post`] field
pub struct Field {
    pub key: &'static str,
    pub get: fn(&Post) -> &str,
    pub set: fn(&mut Post, String),
}

/// Metadata fields in encode order. Keys are matched case-sensitively.
pub const FIELDS: [Field; 3] = [
    Field {
        key: "Title",
        get: |post| post.title.as_str(),
        set: |post, value| post.title = value,
    },
    Field {
        key: "Author",
        get: |post| post.author.as_str(),
        set: |post, value| post.author = value,
    },
    Field {
        key: "Date",
        get: |post| post.date.as_str(),
        set: |post, value| post.date = value,
    },
];

impl Post {
    /// A fresh post with an empty body
    pub fn new(title: impl Into<String>, author: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date: date.into(),
            content: String::new(),
        }
    }

    /// Trim metadata values and check that every one of them can be encoded.
    ///
    /// The metadata format has no quoting, so a value holding `=` or a line
    /// break would come back as a malformed line.
    pub fn normalized(mut self) -> Result<Self, FormatError> {
        for field in &FIELDS {
            let value = (field.get)(&self).trim().to_string();
            if value.contains('=') || value.contains(['\n', '\r']) {
                return Err(FormatError::InvalidValue { key: field.key });
            }
            (field.set)(&mut self, value);
        }
        Ok(self)
    }
}

/// Derive a filesystem-safe post name from a title: every character outside
/// `[A-Za-z0-9_-]` is replaced by exactly one `-`.
pub fn derive_name(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if is_name_char(c) {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Whether `name` could have come out of [`derive_name`]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// `hello` -> `hello.md`
pub fn source_file(name: &str) -> String {
    format!("{}{}", name, SOURCE_SUFFIX)
}

/// `hello` -> `hello.html`
pub fn output_file(name: &str) -> String {
    format!("{}{}", name, OUTPUT_SUFFIX)
}

/// `hello.md` -> `hello`, or `None` for anything that is not a post source
pub fn name_of_source(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(SOURCE_SUFFIX)
        .filter(|name| !name.is_empty())
}
