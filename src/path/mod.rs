mod error;
mod parser;

use std::fmt;

pub use error::PathError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Represents a field in the object, or an index in an array.
    Field(String),

    /// Represents a filter for array elements.
    /// Key is the field name to filter on, and value is the expected value.
    Filter(Vec<(String, String)>),
}

/// A path into a JSON document.
///
/// Plain segments behave like RFC 6901 reference tokens. A segment written as
/// `[key=value, ...]` selects the first array element whose fields match all
/// conditions, which keeps rules stable when list items are reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Spath {
    segments: Vec<Segment>,
}

impl Spath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Spath { segments }
    }

    /// A path made of plain fields, e.g. `["metadata", "name"]`.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Spath {
            segments: fields
                .into_iter()
                .map(|field| Segment::Field(field.into()))
                .collect(),
        }
    }

    /// Whether the path points at the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path without its last segment, `None` for the root.
    pub fn parent(&self) -> Option<Spath> {
        let (_, rest) = self.segments.split_last()?;
        Some(Spath {
            segments: rest.to_vec(),
        })
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The final token when it is a plain field.
    pub fn field(&self) -> Option<String> {
        match self.segments.last()? {
            Segment::Field(field) => Some(field.clone()),
            Segment::Filter(_) => None,
        }
    }

    pub fn push_field(&mut self, field: impl Into<String>) {
        self.segments.push(Segment::Field(field.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Field(index.to_string()));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// True when `self` is a proper prefix of `other`.
    pub fn is_parent_of(&self, other: &Spath) -> bool {
        self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl<'a> IntoIterator for &'a Spath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl TryFrom<&str> for Spath {
    type Error = PathError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        match parser::parse_path(input) {
            Ok(("", path)) => Ok(path),
            Ok((rest, _)) => Err(error::trailing_input_error(input, rest)),
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                Err(error::convert_verbose_error(input, e))
            }
            Err(nom::Err::Incomplete(_)) => {
                Err(PathError::invalid_syntax(input.len(), "unexpected end of input"))
            }
        }
    }
}

impl TryFrom<String> for Spath {
    type Error = PathError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        Spath::try_from(input.as_str())
    }
}

impl std::str::FromStr for Spath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Spath::try_from(s)
    }
}

impl From<Spath> for String {
    fn from(path: Spath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for Spath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str("/")?;
            match segment {
                Segment::Field(field) => f.write_str(&escape_token(field))?,
                Segment::Filter(conditions) => {
                    let conditions = conditions
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "[{conditions}]")?;
                }
            }
        }
        Ok(())
    }
}

/// RFC 6901 escaping, plus `~2` for a leading `[` that would otherwise read
/// back as a filter.
fn escape_token(token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    match escaped.strip_prefix('[') {
        Some(rest) => format!("~2{rest}"),
        None => escaped,
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn path(raw: &str) -> Spath {
        raw.try_into().unwrap()
    }

    #[test]
    fn display_escapes_json_pointer_characters() {
        let mut spath = Spath::default();
        spath.push_field("metadata");
        spath.push_field("annotations");
        spath.push_field("app.kubernetes.io/name");
        spath.push_field("a~b");

        check!(spath.to_string() == "/metadata/annotations/app.kubernetes.io~1name/a~0b");
        check!(path(&spath.to_string()) == spath);
    }

    #[test]
    fn fields_that_look_like_filters_survive_display() {
        let spath = Spath::from_fields(["data", "[name=x]", "key[0]"]);

        check!(spath.to_string() == "/data/~2name=x]/key[0]");
        check!(path(&spath.to_string()) == spath);
    }

    #[test]
    fn display_renders_filters() {
        let spath = path("/spec/containers/[name=querier, image=nginx]/args");

        check!(spath.to_string() == "/spec/containers/[name=querier, image=nginx]/args");
    }

    #[test]
    fn from_fields_matches_parsed_path() {
        check!(Spath::from_fields(["metadata", "name"]) == path("/metadata/name"));
        check!(Spath::from_fields(Vec::<String>::new()) == path(""));
    }

    #[test]
    fn parent_and_field_of_nested_path() {
        let spath = path("/metadata/labels/name");

        check!(spath.parent() == Some(path("/metadata/labels")));
        check!(spath.field() == Some("name".to_string()));
        check!(Spath::default().parent() == None);
    }

    #[test]
    fn field_of_filter_segment_is_none() {
        check!(path("/items/[id=foo]").field() == None);
    }

    #[test]
    fn is_parent_of_requires_proper_prefix() {
        check!(path("/a").is_parent_of(&path("/a/b")));
        check!(path("").is_parent_of(&path("/a")));
        check!(!path("/a").is_parent_of(&path("/a")));
        check!(!path("/a/b").is_parent_of(&path("/a")));
        check!(!path("/ab").is_parent_of(&path("/a/b")));
    }

    #[test]
    fn invalid_path_reports_position() {
        let_assert!(
            Err(PathError::InvalidSyntax { position, .. }) = Spath::try_from("/spec/[name=querier")
        );
        check!(position == 6);
    }

    #[test]
    fn missing_leading_slash_is_rejected() {
        check!(Spath::try_from("metadata/name").is_err());
    }

    #[test]
    fn deserializes_from_string() {
        let spath: Spath = serde_json::from_value(serde_json::json!("/metadata/name")).unwrap();

        check!(spath == path("/metadata/name"));
        check!(serde_json::to_value(&spath).unwrap() == serde_json::json!("/metadata/name"));
    }
}
