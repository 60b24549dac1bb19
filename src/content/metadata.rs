//! Metadata block codec
//!
//! A post file starts with a `+++`-delimited block of `key = value` lines,
//! followed by the raw markdown body:
//!
//! ```text
//! +++
//! Title = Hello
//! Author = Ana
//! Date = 2024-01-01
//! +++
//! # Body
//! ```

use std::borrow::Cow;

use super::post::{Post, FIELDS};
use crate::error::FormatError;

/// Marker opening and closing the metadata block
pub const DELIMITER: &str = "+++";

/// Decode a stored post file.
///
/// Line endings are normalized to `\n` first. Everything after the newline
/// that ends the closing delimiter becomes the body, verbatim.
pub fn decode(raw: &[u8]) -> Result<Post, FormatError> {
    let text = std::str::from_utf8(raw).map_err(|_| FormatError::InvalidUtf8)?;
    let text: Cow<'_, str> = if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    };

    // Leading blank lines and indentation before the opening marker are allowed
    let trimmed = text.trim_start();
    let skipped_lines = text[..text.len() - trimmed.len()].matches('\n').count();

    let mut lines = trimmed.split_inclusive('\n');
    let first_len = match lines.next() {
        Some(first) if first.trim() == DELIMITER => first.len(),
        _ => return Err(FormatError::MissingOpeningDelimiter),
    };

    // Locate the closing marker before interpreting anything as metadata
    let mut block = Vec::new();
    let mut body_start = None;
    let mut offset = first_len;
    for line in lines {
        offset += line.len();
        if line.trim() == DELIMITER {
            body_start = Some(offset);
            break;
        }
        block.push(line);
    }
    let body_start = body_start.ok_or(FormatError::MissingClosingDelimiter)?;

    let mut post = Post::default();
    for (index, line) in block.into_iter().enumerate() {
        let content = line.trim();
        if content.is_empty() {
            continue;
        }

        let (key, value) = match content.split_once('=') {
            Some((key, value)) if !value.contains('=') => (key.trim(), value.trim()),
            _ => {
                return Err(FormatError::MalformedLine {
                    line: skipped_lines + index + 2,
                    text: content.to_string(),
                })
            }
        };

        // Unknown keys are ignored
        if let Some(field) = FIELDS.iter().find(|f| f.key == key) {
            (field.set)(&mut post, value.to_string());
        }
    }

    post.content = trimmed[body_start..].to_string();

    Ok(post)
}

/// Encode a post into the format [`decode`] accepts, fields in fixed order
pub fn encode(post: &Post) -> Vec<u8> {
    let mut out = String::with_capacity(post.content.len() + 64);
    out.push_str(DELIMITER);
    out.push('\n');
    for field in &FIELDS {
        out.push_str(field.key);
        out.push_str(" = ");
        out.push_str((field.get)(post));
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&post.content);
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            title: "Hi".to_string(),
            author: "Ana".to_string(),
            date: "2024-01-01".to_string(),
            content: "# Hi there\n\nSome *text*.\n".to_string(),
        }
    }

    #[test]
    fn test_encode_layout() {
        let encoded = String::from_utf8(encode(&sample())).unwrap();
        assert_eq!(
            encoded,
            "+++\nTitle = Hi\nAuthor = Ana\nDate = 2024-01-01\n+++\n# Hi there\n\nSome *text*.\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let posts = [
            sample(),
            Post::default(),
            Post {
                content: "no trailing newline".to_string(),
                ..sample()
            },
            Post {
                content: "\n\nleading blank lines\n".to_string(),
                ..sample()
            },
            Post {
                title: "Ünïcödé, punctuation!".to_string(),
                content: "a +++ inline marker is fine\n+++\nand so is a later line".to_string(),
                ..sample()
            },
        ];

        for post in posts {
            assert_eq!(decode(&encode(&post)).unwrap(), post);
        }
    }

    #[test]
    fn test_encode_decode_encode_is_stable() {
        let raw = b"+++\r\nDate=2024-01-01\r\nTitle =  Hi \r\nExtra = ignored\r\n+++\r\nbody\r\n";
        let once = encode(&decode(raw).unwrap());
        let twice = encode(&decode(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_decode_field_order_and_unknown_keys() {
        let raw = b"+++\nDate = 2024-01-01\nTags = rust\nTitle = Hi\n+++\nbody";
        let post = decode(raw).unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.author, "");
        assert_eq!(post.date, "2024-01-01");
        assert_eq!(post.content, "body");
    }

    #[test]
    fn test_decode_keys_are_case_sensitive() {
        let post = decode(b"+++\ntitle = Hi\n+++\n").unwrap();
        assert_eq!(post.title, "");
    }

    #[test]
    fn test_decode_normalizes_crlf() {
        let post = decode(b"+++\r\nTitle = Hi\r\n+++\r\nline one\r\nline two\r\n").unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "line one\nline two\n");
    }

    #[test]
    fn test_decode_allows_leading_whitespace() {
        let post = decode(b"\n  +++\nTitle = Hi\n+++\nbody").unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "body");
    }

    #[test]
    fn test_decode_skips_blank_metadata_lines() {
        let post = decode(b"+++\n\nTitle = Hi\n   \n+++\n").unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "");
    }

    #[test]
    fn test_decode_closing_delimiter_at_eof() {
        let post = decode(b"+++\nTitle = Hi\n+++").unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.content, "");
    }

    #[test]
    fn test_missing_opening_delimiter() {
        assert_eq!(
            decode(b"Title = Hi\n+++\nbody"),
            Err(FormatError::MissingOpeningDelimiter)
        );
        assert_eq!(decode(b""), Err(FormatError::MissingOpeningDelimiter));
        assert_eq!(
            decode(b"---\ntitle: Hi\n---\n"),
            Err(FormatError::MissingOpeningDelimiter)
        );
    }

    #[test]
    fn test_missing_closing_delimiter() {
        assert_eq!(
            decode(b"+++\nTitle = Hi\nbody"),
            Err(FormatError::MissingClosingDelimiter)
        );
        assert_eq!(decode(b"+++"), Err(FormatError::MissingClosingDelimiter));
        // A line that would be malformed metadata does not hide the missing marker
        assert_eq!(
            decode(b"+++\nTitle = Hi\nAuthor Ana\n\nsome body text\n"),
            Err(FormatError::MissingClosingDelimiter)
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            decode(b"+++\nTitle = Hi\nAuthor Ana\n+++\n"),
            Err(FormatError::MalformedLine {
                line: 3,
                text: "Author Ana".to_string()
            })
        );
        assert_eq!(
            decode(b"\n+++\nTitle = a = b\n+++\n"),
            Err(FormatError::MalformedLine {
                line: 3,
                text: "Title = a = b".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(
            decode(b"+++\nTitle = \xff\n+++\n"),
            Err(FormatError::InvalidUtf8)
        );
    }
}
