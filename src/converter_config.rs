//! Contains the persisted configuration that keeps the names of inline schemas stable between
//! runs, and the registry that checks a run against it. The configuration maps the structural path
//! of every inline schema to the message name it got, grouped by the schema itself.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConversionError, ErrorKind};

/// Version written into every exported configuration.
pub const CONVERTER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One inline schema, with the message names it's known by and where it's used.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InlineSchema {
    pub schema: String,
    pub locations: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterConfig {
    #[serde(default)]
    pub converter_version: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub discovery_revision: String,
    #[serde(default)]
    pub inline_schemas: Vec<InlineSchema>,
}

/// Order of schemas, names and paths doesn't matter.
impl PartialEq for ConverterConfig {
    fn eq(&self, other: &Self) -> bool {
        let a = self.clone().normalized();
        let b = other.clone().normalized();
        a.converter_version == b.converter_version
            && a.api_version == b.api_version
            && a.discovery_revision == b.discovery_revision
            && a.inline_schemas == b.inline_schemas
    }
}

impl ConverterConfig {
    pub fn from_json(json: &str) -> Result<ConverterConfig, ConversionError> {
        match serde_json::from_str::<ConverterConfig>(json) {
            Ok(config) => Ok(config),
            Err(e) => Err(ConversionError::with_cause(
                ErrorKind::InvalidArgument,
                e,
                "could not read converter configuration",
            )),
        }
    }

    /// Pretty printed json of the normalized configuration, equal configurations give the same
    /// bytes.
    pub fn to_json(&self) -> Result<String, ConversionError> {
        match serde_json::to_string_pretty(&self.clone().normalized()) {
            Ok(json) => Ok(json),
            Err(e) => Err(ConversionError::with_cause(
                ErrorKind::InvalidArgument,
                e,
                "could not write converter configuration",
            )),
        }
    }

    pub fn read_from(path: &Path) -> Result<ConverterConfig, ConversionError> {
        match fs::read_to_string(path) {
            Ok(json) => ConverterConfig::from_json(&json),
            Err(e) => Err(ConversionError::with_cause(
                ErrorKind::InvalidArgument,
                e,
                &format!("could not read {}", path.display()),
            )),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ConversionError> {
        let json = self.to_json()?;
        match fs::write(path, json + "\n") {
            Ok(()) => Ok(()),
            Err(e) => Err(ConversionError::with_cause(
                ErrorKind::InvalidArgument,
                e,
                &format!("could not write {}", path.display()),
            )),
        }
    }

    /// Sorts everything and merges entries of the same schema.
    pub fn normalized(self) -> ConverterConfig {
        let mut by_schema: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
        for inline_schema in self.inline_schemas {
            let locations = by_schema.entry(inline_schema.schema).or_default();
            for (name, paths) in inline_schema.locations {
                locations.entry(name).or_default().extend(paths);
            }
        }
        let inline_schemas = by_schema
            .into_iter()
            .map(|(schema, locations)| InlineSchema {
                schema,
                locations: locations
                    .into_iter()
                    .filter(|(_, paths)| !paths.is_empty())
                    .map(|(name, paths)| (name, paths.into_iter().collect()))
                    .collect(),
            })
            .filter(|s| !s.locations.is_empty())
            .collect();
        ConverterConfig {
            converter_version: self.converter_version,
            api_version: self.api_version,
            discovery_revision: self.discovery_revision,
            inline_schemas,
        }
    }
}

/// Collects every problem of a pass, so they can be reported together.
#[derive(Clone, Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, error: String) {
        self.errors.push(error)
    }

    pub(crate) fn into_result(self, kind: ErrorKind, summary: &str) -> Result<(), ConversionError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::aggregate(kind, summary, self.errors))
        }
    }
}

#[derive(Clone, Debug)]
struct Registration {
    message_name: String,
    schema: String,
}

/// Keeps track of the inline schemas of one run. The name of an inline schema is the one from the
/// loaded configuration, or the one already given to the same schema in this run, or the default.
#[derive(Debug, Default)]
pub struct InlineSchemaRegistry {
    previous: BTreeMap<String, String>,
    registrations: BTreeMap<String, Registration>,
    names_by_schema: HashMap<String, String>,
    diagnostics: Diagnostics,
}

impl InlineSchemaRegistry {
    pub fn new() -> InlineSchemaRegistry {
        InlineSchemaRegistry::default()
    }

    /// Starts a run from a configuration of an earlier run. A location listed twice makes the
    /// configuration ambiguous.
    pub fn from_config(config: &ConverterConfig) -> Result<InlineSchemaRegistry, ConversionError> {
        let mut registry = InlineSchemaRegistry::new();
        let mut diagnostics = Diagnostics::default();
        for inline_schema in &config.inline_schemas {
            for (name, paths) in &inline_schema.locations {
                for path in paths {
                    if let Some(existing) = registry.previous.insert(path.clone(), name.clone()) {
                        diagnostics.report(format!(
                            "location {} is configured for both {} and {}",
                            path, existing, name
                        ));
                    }
                }
            }
        }
        diagnostics.into_result(
            ErrorKind::ConfigurationDrift,
            "loaded inline schema configuration is ambiguous",
        )?;
        debug!(
            "loaded {} inline schema locations from configuration",
            registry.previous.len()
        );
        Ok(registry)
    }

    /// The message name to use for the inline schema at path.
    pub fn message_name(&self, path: &str, schema: &str, default_name: &str) -> String {
        if let Some(name) = self.previous.get(path) {
            return name.clone();
        }
        if let Some(name) = self.names_by_schema.get(schema) {
            return name.clone();
        }
        default_name.to_owned()
    }

    /// Records that the inline schema at path is emitted as message_name.
    pub fn add_inline_field(&mut self, path: &str, message_name: &str, schema: &str) {
        if let Some(existing) = self.registrations.get(path) {
            self.diagnostics.report(format!(
                "location {} is registered twice, as {} and as {}",
                path, existing.message_name, message_name
            ));
            return;
        }
        self.registrations.insert(
            path.to_owned(),
            Registration {
                message_name: message_name.to_owned(),
                schema: schema.to_owned(),
            },
        );
        self.names_by_schema
            .entry(schema.to_owned())
            .or_insert_with(|| message_name.to_owned());
    }

    /// Checks the run against the loaded configuration and gives the configuration for the next
    /// run. Every inconsistency found ends up in one error.
    pub fn export(
        &self,
        api_version: &str,
        discovery_revision: &str,
    ) -> Result<ConverterConfig, ConversionError> {
        let mut diagnostics = self.diagnostics.clone();
        for (path, name) in &self.previous {
            if !self.registrations.contains_key(path) {
                diagnostics.report(format!(
                    "location {} configured for {} is not used anymore",
                    path, name
                ));
            }
        }
        let mut schemas_by_name: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut names_by_schema: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();
        for (path, registration) in &self.registrations {
            schemas_by_name
                .entry(&registration.message_name)
                .or_default()
                .insert(&registration.schema);
            names_by_schema
                .entry(&registration.schema)
                .or_default()
                .entry(&registration.message_name)
                .or_default()
                .push(path);
        }
        for (name, schemas) in &schemas_by_name {
            if schemas.len() > 1 {
                diagnostics.report(format!(
                    "message {} is used for {} different inline schemas",
                    name,
                    schemas.len()
                ));
            }
        }
        for locations in names_by_schema.values() {
            if locations.len() > 1 {
                let described: Vec<String> = locations
                    .iter()
                    .map(|(name, paths)| format!("{} at {}", name, paths.join(", ")))
                    .collect();
                diagnostics.report(format!(
                    "one inline schema has different message names: {}",
                    described.join("; ")
                ));
            }
        }
        diagnostics.into_result(
            ErrorKind::ConfigurationDrift,
            "inline schema configuration is inconsistent with the document",
        )?;
        let inline_schemas = names_by_schema
            .into_iter()
            .map(|(schema, locations)| InlineSchema {
                schema: schema.to_owned(),
                locations: locations
                    .into_iter()
                    .map(|(name, paths)| {
                        (
                            name.to_owned(),
                            paths.into_iter().map(String::from).collect(),
                        )
                    })
                    .collect(),
            })
            .collect();
        Ok(ConverterConfig {
            converter_version: String::from(CONVERTER_VERSION),
            api_version: api_version.to_owned(),
            discovery_revision: discovery_revision.to_owned(),
            inline_schemas,
        }
        .normalized())
    }
}
