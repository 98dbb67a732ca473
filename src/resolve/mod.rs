use std::{ops::Deref, str::FromStr};

use serde_json::Value;

use crate::path::{Segment, Spath};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Field or item not found")]
    NotFound,

    #[error("Type mismatch encountered during resolution, expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl ResolveError {
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        ResolveError::TypeMismatch {
            expected: expected.to_string(),
            actual: found.to_string(),
        }
    }
}

/// Uniform access over `&Value` and `&mut Value` so that resolution is
/// written once for both.
pub trait ValueAccess<'a> {
    type Out: Deref<Target = Value> + 'a;
    type ArrayIter: Iterator<Item = Self::Out> + 'a;

    fn is_object(&self) -> bool;
    fn is_array(&self) -> bool;

    fn get_key(self, key: &str) -> Option<Self::Out>;
    fn get_index(self, index: usize) -> Option<Self::Out>;

    fn array_iter(self) -> Option<Self::ArrayIter>;
}

impl<'a> ValueAccess<'a> for &'a Value {
    type Out = &'a Value;
    type ArrayIter = std::slice::Iter<'a, Value>;

    fn is_object(&self) -> bool {
        Value::is_object(self)
    }
    fn is_array(&self) -> bool {
        Value::is_array(self)
    }
    fn get_key(self, key: &str) -> Option<Self::Out> {
        self.get(key)
    }
    fn get_index(self, index: usize) -> Option<Self::Out> {
        self.get(index)
    }
    fn array_iter(self) -> Option<Self::ArrayIter> {
        self.as_array().map(|v| v.iter())
    }
}

impl<'a> ValueAccess<'a> for &'a mut Value {
    type Out = &'a mut Value;
    type ArrayIter = std::slice::IterMut<'a, Value>;

    fn is_object(&self) -> bool {
        Value::is_object(self)
    }
    fn is_array(&self) -> bool {
        Value::is_array(self)
    }
    fn get_key(self, key: &str) -> Option<Self::Out> {
        self.get_mut(key)
    }
    fn get_index(self, index: usize) -> Option<Self::Out> {
        self.get_mut(index)
    }
    fn array_iter(self) -> Option<Self::ArrayIter> {
        self.as_array_mut().map(|v| v.iter_mut())
    }
}

/// Resolves `path` against `doc`, failing when any segment is missing.
pub fn resolve_ref<'a>(
    doc: &'a Value,
    path: &Spath,
) -> Result<&'a Value, ResolveError> {
    resolve_inner(doc, path)
}

pub fn resolve_mut<'a>(
    doc: &'a mut Value,
    path: &Spath,
) -> Result<&'a mut Value, ResolveError> {
    resolve_inner(doc, path)
}

fn resolve_inner<'a, A>(doc: A, path: &Spath) -> Result<A, ResolveError>
where
    A: ValueAccess<'a, Out = A> + Deref<Target = Value>,
{
    path.into_iter().try_fold(doc, |current, segment| match segment {
        Segment::Field(token) => step_into(current, token),
        Segment::Filter(conditions) => select_element(current, conditions),
    })
}

/// Follows one reference token: a member name in an object, a decimal
/// index in an array.
fn step_into<'a, A>(doc: A, token: &str) -> Result<A::Out, ResolveError>
where
    A: ValueAccess<'a> + Deref<Target = Value>,
{
    if doc.is_object() {
        return doc.get_key(token).ok_or(ResolveError::NotFound);
    }
    if !doc.is_array() {
        return Err(ResolveError::type_mismatch("object or array", &value_type_desc(&doc)));
    }
    match array_index(token) {
        Some(index) => doc.get_index(index).ok_or(ResolveError::NotFound),
        None => Err(ResolveError::type_mismatch("array index", &format!("string({token:?})"))),
    }
}

/// Parses an RFC 6901 array index: `0` or digits without a leading zero.
pub(crate) fn array_index(token: &str) -> Option<usize> {
    let digits_only = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    token.parse().ok()
}

/// First array element whose members satisfy every `key=value` condition.
fn select_element<'a, A>(doc: A, conditions: &[(String, String)]) -> Result<A::Out, ResolveError>
where
    A: ValueAccess<'a> + Deref<Target = Value>,
{
    let found = value_type_desc(&doc);
    let mut elements = doc
        .array_iter()
        .ok_or_else(|| ResolveError::type_mismatch("array", &found))?;

    elements
        .find(|element| element_matches(element, conditions))
        .ok_or(ResolveError::NotFound)
}

pub(crate) fn element_matches(element: &Value, conditions: &[(String, String)]) -> bool {
    conditions.iter().all(|(key, expected)| {
        element
            .get(key)
            .is_some_and(|actual| scalar_matches(actual, expected))
    })
}

/// Filters compare scalars only. Numbers compare by value, booleans ignore
/// case.
fn scalar_matches(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::String(s) => s == expected,
        Value::Number(n) => serde_json::Number::from_str(expected).is_ok_and(|e| numbers_equal(n, &e)),
        Value::Bool(b) => expected.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => a.as_f64() == b.as_f64(),
    }
}

pub(crate) fn value_type_desc(val: &Value) -> String {
    match val {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean({b})"),
        Value::Number(n) => format!("number({n})"),
        Value::String(s) => format!("string({s:?})"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
