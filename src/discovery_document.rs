//! The root of a Discovery Document. The document owns every schema and method in two arenas,
//! the nodes refer to each other, and to their parent, by index.
use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::discovery_method::{normalize_path, Method, MethodId, RawMethod};
use crate::discovery_schema::{Location, RawSchema, Schema, SchemaId, SchemaParent, SchemaType};
use crate::error::{ConversionError, ErrorKind};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: Option<String>,
    version: Option<String>,
    revision: Option<String>,
    title: Option<String>,
    description: Option<String>,
    root_url: Option<String>,
    service_path: Option<String>,
    schemas: Option<BTreeMap<String, RawSchema>>,
    resources: Option<BTreeMap<String, RawResource>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResource {
    methods: Option<BTreeMap<String, RawMethod>>,
    resources: Option<BTreeMap<String, RawResource>>,
}

#[derive(Debug)]
pub struct Document {
    pub name: String,
    pub version: String,
    pub revision: String,
    pub title: String,
    pub description: String,
    pub root_url: String,
    pub service_path: String,
    schema_arena: Vec<Schema>,
    method_arena: Vec<Method>,
    schemas: BTreeMap<String, SchemaId>,
    resources: BTreeMap<String, Vec<MethodId>>,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Document, ConversionError> {
        let raw: RawDocument = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                return Err(ConversionError::with_cause(
                    ErrorKind::InvalidArgument,
                    e,
                    "could not read discovery document",
                ))
            }
        };
        Document::from_raw(raw)
    }

    fn from_raw(raw: RawDocument) -> Result<Document, ConversionError> {
        let mut document = Document {
            name: raw.name.unwrap_or_default(),
            version: raw.version.unwrap_or_default(),
            revision: raw.revision.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            root_url: raw.root_url.unwrap_or_default(),
            service_path: raw.service_path.unwrap_or_default(),
            schema_arena: Vec::new(),
            method_arena: Vec::new(),
            schemas: BTreeMap::new(),
            resources: BTreeMap::new(),
        };
        if document.name.is_empty() || document.version.is_empty() {
            return Err(ConversionError::invalid_argument(
                "discovery document needs both a name and a version",
            ));
        }
        for (key, raw_schema) in raw.schemas.unwrap_or_default() {
            let id = document.add_schema(key.clone(), &raw_schema, SchemaParent::Document)?;
            document.schemas.insert(key, id);
        }
        for (key, raw_resource) in raw.resources.unwrap_or_default() {
            document.add_resource(key, raw_resource)?;
        }
        debug!(
            "read discovery document {}.{} with {} schemas and {} resources",
            document.name,
            document.version,
            document.schemas.len(),
            document.resources.len()
        );
        Ok(document)
    }

    fn add_schema(
        &mut self,
        key: String,
        raw: &RawSchema,
        parent: SchemaParent,
    ) -> Result<SchemaId, ConversionError> {
        let id = SchemaId(self.schema_arena.len());
        self.schema_arena.push(Schema {
            parent,
            key: key.clone(),
            id: raw.id.clone().unwrap_or_default(),
            schema_type: raw.schema_type()?,
            format: raw.format.clone().unwrap_or_default(),
            reference: raw.reference.clone().unwrap_or_default(),
            description: raw.description.clone().unwrap_or_default(),
            properties: BTreeMap::new(),
            items: None,
            additional_properties: None,
            enum_values: raw.enum_values.clone().unwrap_or_default(),
            enum_descriptions: raw.enum_descriptions.clone().unwrap_or_default(),
            required: raw.required.unwrap_or(false),
            repeated: raw.repeated.unwrap_or(false),
            deprecated: raw.deprecated.unwrap_or(false),
            location: raw.location()?,
            canonical: raw.canonical()?,
        });
        let mut properties = BTreeMap::new();
        for (name, child) in raw.properties.iter().flatten() {
            let child_id = self.add_schema(name.clone(), child, SchemaParent::Schema(id))?;
            properties.insert(name.clone(), child_id);
        }
        // Items and values take the key of their owner, an inline object in an array is named
        // after the array.
        let items = match &raw.items {
            Some(child) => Some(self.add_schema(key.clone(), child, SchemaParent::Schema(id))?),
            None => None,
        };
        let additional_properties = match &raw.additional_properties {
            Some(child) => Some(self.add_schema(key, child, SchemaParent::Schema(id))?),
            None => None,
        };
        let schema = &mut self.schema_arena[id.0];
        schema.properties = properties;
        schema.items = items;
        schema.additional_properties = additional_properties;
        Ok(id)
    }

    fn add_resource(&mut self, key: String, raw: RawResource) -> Result<(), ConversionError> {
        let mut method_ids = Vec::new();
        for (method_key, raw_method) in raw.methods.unwrap_or_default() {
            method_ids.push(self.add_method(&key, &method_key, raw_method)?);
        }
        if !method_ids.is_empty() {
            self.resources.insert(key.clone(), method_ids);
        }
        for (child_key, child) in raw.resources.unwrap_or_default() {
            self.add_resource(format!("{}.{}", key, child_key), child)?;
        }
        Ok(())
    }

    fn add_method(
        &mut self,
        resource: &str,
        key: &str,
        raw: RawMethod,
    ) -> Result<MethodId, ConversionError> {
        let method_id = MethodId(self.method_arena.len());
        let id = raw
            .id
            .clone()
            .unwrap_or_else(|| format!("{}.{}.{}", self.name, resource, key));
        let path = match raw.path.clone() {
            Some(p) => p,
            None => {
                return Err(ConversionError::invalid_argument(&format!(
                    "method {} has no path",
                    id
                )))
            }
        };
        let flat_path = match &raw.flat_path {
            Some(flat) => normalize_path(&path, flat)?,
            None => path.replace("{+", "{"),
        };
        let mut parameters = BTreeMap::new();
        let mut path_params = BTreeMap::new();
        let mut query_params = BTreeMap::new();
        for (name, raw_param) in raw.parameters.iter().flatten() {
            let param_id = self.add_schema(
                name.clone(),
                raw_param,
                SchemaParent::Method(method_id),
            )?;
            parameters.insert(name.clone(), param_id);
            match self.schema_arena[param_id.0].location {
                Some(Location::Path) => path_params.insert(name.clone(), param_id),
                _ => query_params.insert(name.clone(), param_id),
            };
        }
        let parameter_order = raw.parameter_order.clone().unwrap_or_default();
        let mut required_param_names: Vec<String> = parameter_order
            .iter()
            .filter(|n| {
                parameters
                    .get(*n)
                    .is_some_and(|p| self.schema_arena[p.0].required)
            })
            .cloned()
            .collect();
        for (name, param_id) in &parameters {
            if self.schema_arena[param_id.0].required && !required_param_names.contains(name) {
                required_param_names.push(name.clone());
            }
        }
        let request = match &raw.request {
            Some(r) => Some(self.add_schema(
                String::from("request"),
                r,
                SchemaParent::Method(method_id),
            )?),
            None => None,
        };
        let response = match &raw.response {
            Some(r) => Some(self.add_schema(
                String::from("response"),
                r,
                SchemaParent::Method(method_id),
            )?),
            None => None,
        };
        self.method_arena.push(Method {
            id,
            resource: resource.to_owned(),
            description: raw.description.unwrap_or_default(),
            http_method: raw.http_method.unwrap_or_else(|| String::from("GET")),
            path,
            flat_path,
            parameters,
            path_params,
            query_params,
            parameter_order,
            required_param_names,
            request,
            response,
            scopes: raw.scopes.unwrap_or_default(),
            api_version: raw.api_version.unwrap_or_default(),
        });
        Ok(method_id)
    }

    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schema_arena[id.0]
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.method_arena[id.0]
    }

    /// Top level schemas by name.
    pub fn schemas(&self) -> &BTreeMap<String, SchemaId> {
        &self.schemas
    }

    /// Methods by the dotted key path of the resource they're declared in.
    pub fn resources(&self) -> &BTreeMap<String, Vec<MethodId>> {
        &self.resources
    }

    /// The top level schema a reference points to.
    pub fn dereference(&self, id: SchemaId) -> Option<SchemaId> {
        let schema = self.schema(id);
        if schema.reference.is_empty() {
            Some(id)
        } else {
            self.schemas.get(&schema.reference).copied()
        }
    }

    /// Structural path of a schema, like `schemas.Lake.info`. Array items and map values share the
    /// path of their owner.
    pub fn schema_path(&self, id: SchemaId) -> String {
        let schema = self.schema(id);
        match schema.parent {
            SchemaParent::Document => format!("schemas.{}", schema.key),
            SchemaParent::Method(method_id) => {
                format!("methods.{}.{}", self.method(method_id).id, schema.key)
            }
            SchemaParent::Schema(parent_id) => {
                let parent = self.schema(parent_id);
                let parent_path = self.schema_path(parent_id);
                if parent.items == Some(id) || parent.additional_properties == Some(id) {
                    parent_path
                } else {
                    format!("{}.{}", parent_path, schema.key)
                }
            }
        }
    }

    /// The top level schema a schema is nested in, if any.
    pub fn root_schema(&self, id: SchemaId) -> Option<SchemaId> {
        match self.schema(id).parent {
            SchemaParent::Document => Some(id),
            SchemaParent::Schema(parent) => self.root_schema(parent),
            SchemaParent::Method(_) => None,
        }
    }

    /// Host the api is served from, like `compute.googleapis.com`.
    pub fn default_host(&self) -> String {
        let without_scheme = self
            .root_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.root_url);
        without_scheme.trim_end_matches('/').to_owned()
    }

    pub fn is_object(&self, id: SchemaId) -> bool {
        let schema = self.schema(id);
        schema.schema_type == SchemaType::Object && schema.additional_properties.is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::discovery_document::Document;
    use crate::discovery_schema::{SchemaParent, SchemaType};

    fn get_document() -> &'static str {
        r#"{
          "name": "lakes", "version": "v1", "revision": "20240101",
          "rootUrl": "https://lakes.googleapis.com/", "servicePath": "",
          "schemas": {
            "Lake": {"id": "Lake", "type": "object", "properties": {
              "name": {"type": "string"},
              "info": {"type": "object", "properties": {"size": {"type": "integer", "format": "int32"}}},
              "tags": {"type": "array", "items": {"type": "object", "properties": {"key": {"type": "string"}}}},
              "labels": {"type": "object", "additionalProperties": {"type": "string"}}
            }}
          },
          "resources": {"projects": {"resources": {"lakes": {"methods": {
            "get": {
              "id": "lakes.projects.lakes.get", "path": "v1/{+name}", "httpMethod": "GET",
              "flatPath": "v1/projects/{projectsId}/lakes/{lakesId}",
              "parameters": {
                "name": {"type": "string", "location": "path", "required": true},
                "maxResults": {"type": "integer", "location": "query"}
              },
              "parameterOrder": ["name"],
              "response": {"$ref": "Lake"}
            }
          }}}}}
        }"#
    }

    #[test]
    fn builds_schema_tree_with_parents() {
        let document = Document::from_json(get_document()).unwrap();
        let lake_id = document.schemas()["Lake"];
        let lake = document.schema(lake_id);
        assert_eq!(lake.identifier(), "Lake");
        assert_eq!(lake.parent(), SchemaParent::Document);
        let info_id = lake.properties["info"];
        assert_eq!(document.schema(info_id).identifier(), "info");
        assert_eq!(document.schema(info_id).parent(), SchemaParent::Schema(lake_id));
        assert_eq!(document.schema_path(info_id), "schemas.Lake.info");
        let tags = document.schema(lake.properties["tags"]);
        let tag_item = tags.items.unwrap();
        assert_eq!(document.schema(tag_item).key, "tags");
        assert_eq!(document.schema_path(tag_item), "schemas.Lake.tags");
        assert_eq!(document.root_schema(tag_item), Some(lake_id));
        let labels = document.schema(lake.properties["labels"]);
        assert!(labels.is_map());
        assert_eq!(labels.schema_type, SchemaType::Object);
    }

    #[test]
    fn flattens_nested_resources() {
        let document = Document::from_json(get_document()).unwrap();
        let methods = &document.resources()["projects.lakes"];
        let method = document.method(methods[0]);
        assert_eq!(method.flat_path, "v1/{name=projects/*/lakes/*}");
        assert!(method.is_plural_method());
        assert!(method.has_expansion());
        assert_eq!(method.verb(), "get");
        assert_eq!(method.collection(), "lakes");
        assert_eq!(method.required_param_names, vec!["name"]);
        assert_eq!(method.path_params.len(), 1);
        assert_eq!(method.query_params.len(), 1);
        let response = method.response.unwrap();
        assert_eq!(
            document.dereference(response),
            Some(document.schemas()["Lake"])
        );
        assert_eq!(document.default_host(), "lakes.googleapis.com");
    }

    #[test]
    fn missing_name_is_invalid() {
        assert!(Document::from_json(r#"{"version": "v1"}"#).is_err());
        assert!(Document::from_json("not json").is_err());
    }
}
