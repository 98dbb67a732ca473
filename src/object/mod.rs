//! Kubernetes objects as schema-less JSON trees, and the key used to
//! correlate them between the two sides of a comparison.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ObjectError {
    #[error("object must be a JSON object, found {0}")]
    NotAnObject(String),

    #[error("object has no string field {0}")]
    MissingField(&'static str),
}

/// Identity of an object: group, version, kind and name.
///
/// The namespace is not part of the key: the same workload rendered into
/// differently scoped deployments must correlate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(api_version: &str, kind: &str, name: &str) -> Self {
        let (group, version) = match api_version.rsplit_once('/') {
            Some((group, version)) => (group, version),
            None => ("", api_version),
        };
        ResourceKey {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Reads `apiVersion`, `kind` and `metadata.name` from `value`.
    pub fn from_value(value: &Value) -> Result<Self, ObjectError> {
        if !value.is_object() {
            return Err(ObjectError::NotAnObject(
                crate::resolve::value_type_desc(value),
            ));
        }
        let api_version = string_field(value, "apiVersion", &["apiVersion"])?;
        let kind = string_field(value, "kind", &["kind"])?;
        let name = string_field(value, "metadata.name", &["metadata", "name"])?;

        Ok(ResourceKey::new(api_version, kind, name))
    }
}

fn string_field<'a>(
    value: &'a Value,
    label: &'static str,
    path: &[&str],
) -> Result<&'a str, ObjectError> {
    path.iter()
        .try_fold(value, |current, key| current.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(ObjectError::MissingField(label))
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}.{}-{}", self.version, self.kind, self.name)
        } else {
            write!(f, "{}-{}.{}-{}", self.group, self.version, self.kind, self.name)
        }
    }
}

/// A single manifest. The key is derived from the content on construction,
/// so an `Object` always carries a valid identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    key: ResourceKey,
    value: Value,
}

impl Object {
    pub fn new(value: Value) -> Result<Self, ObjectError> {
        let key = ResourceKey::from_value(&value)?;
        Ok(Object { key, value })
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    pub fn namespace(&self) -> Option<&str> {
        self.value
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
            .filter(|ns| !ns.is_empty())
    }

    /// Sets `metadata.namespace`, removing it for `None`.
    pub fn set_namespace(&mut self, namespace: Option<&str>) {
        let Some(metadata) = self
            .value
            .get_mut("metadata")
            .and_then(Value::as_object_mut)
        else {
            return;
        };
        match namespace {
            Some(ns) => {
                metadata.insert("namespace".to_string(), Value::String(ns.to_string()));
            }
            None => {
                metadata.remove("namespace");
            }
        }
    }
}

impl Object {
    /// Removes the given `metadata` members where present.
    pub fn remove_metadata_fields(&mut self, fields: &[&str]) {
        if let Some(metadata) = self
            .value
            .get_mut("metadata")
            .and_then(Value::as_object_mut)
        {
            for field in fields {
                metadata.remove(*field);
            }
        }
    }
}

impl TryFrom<Value> for Object {
    type Error = ObjectError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Object::new(value)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}
