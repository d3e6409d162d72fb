//! Tree-shaped resource representations.
//!
//! A [`ResourceNode`] is an ordered mapping from field name to [`FieldValue`].
//! The order of the fields is the canonical field order of the entity type that
//! produced the node; it is kept through resolution and serialization so that
//! responses always list fields the same way, whatever order a client asked for
//! them in.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

/// A scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating point number.
    Number(Number),
    /// A string.
    Text(String),
}

impl Scalar {
    /// Returns true for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Returns the string content, if this is a text scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the scalar the way it would appear in a query string.
    ///
    /// `null` renders as the empty string.
    pub fn to_query_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<u16> for Scalar {
    fn from(value: u16) -> Self {
        Scalar::Number(value.into())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// The value of a single field in a [`ResourceNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A plain scalar.
    Scalar(Scalar),
    /// A list of scalars (keyword lists, value sets).
    List(Vec<Scalar>),
    /// A reference to a related resource or collection that is not embedded.
    Link(String),
    /// A related resource embedded inline.
    EmbeddedSingle(ResourceNode),
    /// A related collection embedded inline, in fetch order.
    EmbeddedMany(Vec<ResourceNode>),
}

impl FieldValue {
    /// Creates a link value.
    pub fn link(url: impl Into<String>) -> Self {
        FieldValue::Link(url.into())
    }

    /// Creates a list value from anything yielding scalars.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns true when the value is an unexpanded link.
    pub fn is_link(&self) -> bool {
        matches!(self, FieldValue::Link(_))
    }

    /// Returns true when the value embeds one or more related resources.
    pub fn is_embedded(&self) -> bool {
        matches!(
            self,
            FieldValue::EmbeddedSingle(_) | FieldValue::EmbeddedMany(_)
        )
    }

    /// Returns the scalar, if this is a scalar value.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list value.
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the link target, if this is a link.
    pub fn as_link(&self) -> Option<&str> {
        match self {
            FieldValue::Link(url) => Some(url),
            _ => None,
        }
    }

    /// Returns the embedded node, if this is an embedded single resource.
    pub fn as_embedded_single(&self) -> Option<&ResourceNode> {
        match self {
            FieldValue::EmbeddedSingle(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the embedded nodes, if this is an embedded collection.
    pub fn as_embedded_many(&self) -> Option<&[ResourceNode]> {
        match self {
            FieldValue::EmbeddedMany(nodes) => Some(nodes),
            _ => None,
        }
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_field_value!(Scalar, &str, String, bool, i64, u64, u32, u16);

impl<T: Into<Scalar>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Scalar(scalar) => scalar.serialize(serializer),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Link(url) => serializer.serialize_str(url),
            FieldValue::EmbeddedSingle(node) => node.serialize(serializer),
            FieldValue::EmbeddedMany(nodes) => {
                let mut seq = serializer.serialize_seq(Some(nodes.len()))?;
                for node in nodes {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
        }
    }
}

/// An ordered mapping from field name to value.
///
/// Serializes as a JSON object whose keys appear in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceNode {
    fields: Vec<(String, FieldValue)>,
}

impl ResourceNode {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty node with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style variant of [`ResourceNode::insert`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field.
    ///
    /// Replacing an existing field keeps its position; a new field is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the value of a field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns true if the node has a field with this name.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }

    /// Iterates over field names in canonical order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the node has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the node into a `serde_json::Value`.
    ///
    /// Key order of the resulting map follows `serde_json`'s map type; use the
    /// `Serialize` impl directly when order matters.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl IntoIterator for ResourceNode {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, FieldValue)> for ResourceNode {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut node = ResourceNode::new();
        for (name, value) in iter {
            node.insert(name, value);
        }
        node
    }
}

impl Serialize for ResourceNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
