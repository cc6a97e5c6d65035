//! Schema nodes of a Discovery Document, and the raw json shape they are read from.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::discovery_method::MethodId;
use crate::error::{ConversionError, ErrorKind};

/// Index of a schema in the arena owned by the [`crate::discovery_document::Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaType {
    Any,
    Array,
    Boolean,
    Empty,
    Integer,
    Number,
    Object,
    String,
}

impl SchemaType {
    fn from_json(value: Option<&str>) -> Result<SchemaType, ConversionError> {
        match value {
            None | Some("") => Ok(SchemaType::Empty),
            Some("any") => Ok(SchemaType::Any),
            Some("array") => Ok(SchemaType::Array),
            Some("boolean") => Ok(SchemaType::Boolean),
            Some("integer") => Ok(SchemaType::Integer),
            Some("number") => Ok(SchemaType::Number),
            Some("object") => Ok(SchemaType::Object),
            Some("string") => Ok(SchemaType::String),
            Some(other) => Err(ConversionError::invalid_argument(&format!(
                "Unknown schema type '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
}

/// Who owns a schema, only used to answer questions about the context of a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaParent {
    Document,
    Schema(SchemaId),
    Method(MethodId),
}

#[derive(Clone, Debug)]
pub struct Schema {
    pub(crate) parent: SchemaParent,
    pub key: String,
    pub id: String,
    pub schema_type: SchemaType,
    pub format: String,
    pub reference: String,
    pub description: String,
    pub properties: BTreeMap<String, SchemaId>,
    pub items: Option<SchemaId>,
    pub additional_properties: Option<SchemaId>,
    pub enum_values: Vec<String>,
    pub enum_descriptions: Vec<String>,
    pub required: bool,
    pub repeated: bool,
    pub deprecated: bool,
    pub location: Option<Location>,
    /// Canonical json of the schema without any documentation text, two schemas with the same
    /// description describe the same structure.
    pub(crate) canonical: String,
}

impl Schema {
    /// The declared id, or the key in the parent when there is none.
    pub fn identifier(&self) -> &str {
        if self.id.is_empty() {
            &self.key
        } else {
            &self.id
        }
    }

    pub fn parent(&self) -> SchemaParent {
        self.parent
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn is_map(&self) -> bool {
        self.additional_properties.is_some()
    }

    pub fn canonical_description(&self) -> &str {
        &self.canonical
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RawSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<RawSchema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_descriptions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl RawSchema {
    pub(crate) fn schema_type(&self) -> Result<SchemaType, ConversionError> {
        SchemaType::from_json(self.schema_type.as_deref())
    }

    pub(crate) fn location(&self) -> Result<Option<Location>, ConversionError> {
        match self.location.as_deref() {
            None => Ok(None),
            Some("path") => Ok(Some(Location::Path)),
            Some("query") => Ok(Some(Location::Query)),
            Some(other) => Err(ConversionError::invalid_argument(&format!(
                "Unknown parameter location '{}'",
                other
            ))),
        }
    }

    /// Serialises the schema with sorted keys and without documentation.
    pub(crate) fn canonical(&self) -> Result<String, ConversionError> {
        let mut schema = self.clone();
        schema.strip_documentation();
        let value = match serde_json::to_value(&schema) {
            Ok(v) => v,
            Err(e) => {
                return Err(ConversionError::with_cause(
                    ErrorKind::InvalidArgument,
                    e,
                    "could not serialise schema",
                ))
            }
        };
        Ok(value.to_string())
    }

    /// Clears descriptions on this schema and every nested one. Property keys are left alone, a
    /// property may well be called `description`.
    fn strip_documentation(&mut self) {
        self.description = None;
        self.enum_descriptions = None;
        for property in self.properties.iter_mut().flat_map(|p| p.values_mut()) {
            property.strip_documentation();
        }
        if let Some(items) = self.items.as_mut() {
            items.strip_documentation();
        }
        if let Some(additional) = self.additional_properties.as_mut() {
            additional.strip_documentation();
        }
    }
}
