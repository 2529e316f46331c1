//! Splits a source document into its YAML frontmatter and its body. See
//! [`split`] for the exact rules.

use serde_yaml::{Mapping, Value};
use std::fmt;

/// The literal that opens and closes a frontmatter block.
pub const FENCE: &str = "---";

/// The outcome of looking for a frontmatter block at the start of a
/// document.
#[derive(Debug)]
pub enum Frontmatter {
    /// The document doesn't begin with a complete fenced block.
    Absent,

    /// The block decoded into a mapping (possibly empty).
    Decoded(Mapping),

    /// A fenced block was found but isn't valid YAML. The document is treated
    /// as if it had no frontmatter.
    Malformed(Error),

    /// The block is valid YAML but holds a non-empty value that isn't a
    /// mapping, such as a list or a string. The document can't be collected.
    Rejected(Error),
}

/// A document split into frontmatter and body.
#[derive(Debug)]
pub struct Document<'a> {
    pub frontmatter: Frontmatter,
    pub body: &'a str,
}

impl Document<'_> {
    /// Returns the decoded metadata, or an empty mapping for any other
    /// outcome.
    pub fn metadata(&self) -> Mapping {
        match &self.frontmatter {
            Frontmatter::Decoded(mapping) => mapping.clone(),
            _ => Mapping::new(),
        }
    }
}

/// Splits `input` into frontmatter and body.
///
/// If `input` starts with [`FENCE`], the text between that fence and the next
/// occurrence of [`FENCE`] is decoded as YAML and the text after the second
/// fence, trimmed, becomes the body. The second fence may appear anywhere,
/// not only at the start of a line. When there is no second fence, or when
/// the block isn't valid YAML, the whole untrimmed `input` is the body.
///
/// A block holding an empty value (`null`, `false`, `0`, `''` or `[]`)
/// decodes to an empty mapping. Any other value that isn't a mapping is
/// [`Frontmatter::Rejected`].
pub fn split(input: &str) -> Document<'_> {
    if !input.starts_with(FENCE) {
        return Document {
            frontmatter: Frontmatter::Absent,
            body: input,
        };
    }

    let rest = &input[FENCE.len()..];
    let yaml_stop = match rest.find(FENCE) {
        Some(offset) => offset,
        None => {
            return Document {
                frontmatter: Frontmatter::Absent,
                body: input,
            }
        }
    };

    let body = rest[yaml_stop + FENCE.len()..].trim();
    match decode(&rest[..yaml_stop]) {
        Ok(mapping) => Document {
            frontmatter: Frontmatter::Decoded(mapping),
            body,
        },
        Err(err @ Error::NotAMapping(_)) => Document {
            frontmatter: Frontmatter::Rejected(err),
            body,
        },
        Err(err) => Document {
            frontmatter: Frontmatter::Malformed(err),
            body: input,
        },
    }
}

fn decode(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        other if is_empty(&other) => Ok(Mapping::new()),
        other => Err(Error::NotAMapping(kind(&other))),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(mapping) => mapping.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
    }
}

/// Represents the result of decoding a frontmatter block.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a frontmatter block that couldn't be decoded.
#[derive(Debug)]
pub enum Error {
    /// Returned when the block isn't valid YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the block is valid YAML but not a mapping.
    NotAMapping(&'static str),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::NotAMapping(kind) => {
                write!(f, "frontmatter must be a mapping, found {}", kind)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::NotAMapping(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn get<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
        mapping.get(&Value::String(key.to_owned()))
    }

    #[test]
    fn test_split_decodes_frontmatter() {
        let doc = split("---\ntitle: Hello\ntags: [a, b]\n---\n\n# Body\n\ntext\n");
        let metadata = doc.metadata();
        assert_eq!(
            get(&metadata, "title"),
            Some(&Value::String("Hello".to_owned()))
        );
        assert!(matches!(doc.frontmatter, Frontmatter::Decoded(_)));
        assert_eq!(doc.body, "# Body\n\ntext");
    }

    #[test]
    fn test_split_without_fence_keeps_whole_text() {
        let input = "  just a body\n";
        let doc = split(input);
        assert!(matches!(doc.frontmatter, Frontmatter::Absent));
        assert_eq!(doc.body, input);
        assert!(doc.metadata().is_empty());
    }

    #[test]
    fn test_split_missing_closing_fence() {
        let input = "---\ntitle: Hello\n\nno closing fence";
        let doc = split(input);
        assert!(matches!(doc.frontmatter, Frontmatter::Absent));
        assert_eq!(doc.body, input);
    }

    #[test]
    fn test_split_malformed_yaml_falls_back_to_raw_text() {
        let input = "---\ntitle: [unclosed\n---\nbody";
        let doc = split(input);
        assert!(matches!(
            doc.frontmatter,
            Frontmatter::Malformed(Error::DeserializeYaml(_))
        ));
        assert_eq!(doc.body, input);
        assert!(doc.metadata().is_empty());
    }

    #[test]
    fn test_split_rejects_non_mapping() {
        let cases = [
            ("---\n- a\n- b\n---\nbody", "a sequence"),
            ("---\njust words\n---\nbody", "a string"),
            ("---\ntrue\n---\nbody", "a boolean"),
            ("---\n42\n---\nbody", "a number"),
        ];
        for (input, wanted) in cases.iter() {
            match split(input).frontmatter {
                Frontmatter::Rejected(Error::NotAMapping(kind)) => assert_eq!(kind, *wanted),
                other => panic!("`{}`: wanted rejection, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_split_empty_values_decode_to_empty_mapping() {
        for block in ["false", "0", "''", "[]", "~"].iter() {
            let input = format!("---\n{}\n---\nbody text\n", block);
            let doc = split(&input);
            assert!(
                matches!(&doc.frontmatter, Frontmatter::Decoded(m) if m.is_empty()),
                "for `{}`",
                block
            );
            assert_eq!(doc.body, "body text");
        }
    }

    #[test]
    fn test_split_empty_block() {
        let doc = split("---\n---\nbody\n");
        assert!(matches!(doc.frontmatter, Frontmatter::Decoded(_)));
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_split_closing_fence_mid_line() {
        // The second fence doesn't need to start a line.
        let doc = split("---\ntitle: a---b\n---\nbody");
        assert_eq!(
            get(&doc.metadata(), "title"),
            Some(&Value::String("a".to_owned()))
        );
        assert_eq!(doc.body, "b\n---\nbody");
    }
}
