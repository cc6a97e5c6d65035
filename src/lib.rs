//! Compiles Discovery Documents into proto3 definitions that stay stable between runs.
//!
//! The [`convert`] function runs the whole pipeline. The pieces are public as well, to convert a
//! [`discovery_document::Document`] directly, or to parse and merge proto files on their own.
pub mod converter_config;
pub mod discovery_document;
pub mod discovery_method;
pub mod discovery_schema;
pub mod document_converter;
pub mod error;
pub mod name;
pub mod proto_file;
pub mod proto_merger;
pub mod proto_message;
#[cfg(feature = "proto_parser")]
pub mod proto_parser;
pub mod proto_service;
pub mod proto_writer;

use crate::converter_config::{ConverterConfig, InlineSchemaRegistry};
use crate::discovery_document::Document;
use crate::document_converter::{ConverterOptions, DocumentToProtoConverter};
use crate::error::ConversionError;
use crate::proto_file::ProtoFile;

/// Result of a successful run, the proto model and the configuration for the next run.
#[derive(Debug)]
pub struct ConversionOutput {
    pub proto_file: ProtoFile,
    pub config: ConverterConfig,
}

impl ConversionOutput {
    /// The proto model as proto3 text.
    pub fn proto_text(&self) -> Result<String, ConversionError> {
        proto_writer::write_proto(&self.proto_file)
    }
}

/// Converts a Discovery Document. With a previous configuration inline schemas keep the names they
/// had, with a previous proto file the fields and signatures it had are kept.
pub fn convert(
    discovery_json: &str,
    options: &ConverterOptions,
    previous_config: Option<&ConverterConfig>,
    previous_proto: Option<&str>,
) -> Result<ConversionOutput, ConversionError> {
    let document = Document::from_json(discovery_json)?;
    let mut registry = match previous_config {
        Some(config) => InlineSchemaRegistry::from_config(config)?,
        None => InlineSchemaRegistry::new(),
    };
    let mut proto_file = DocumentToProtoConverter::new(&document, options, &mut registry).convert()?;
    if let Some(previous_proto) = previous_proto {
        merge_previous(&mut proto_file, previous_proto)?;
    }
    let config = registry.export(&document.version, &document.revision)?;
    Ok(ConversionOutput { proto_file, config })
}

#[cfg(feature = "proto_parser")]
fn merge_previous(proto_file: &mut ProtoFile, previous_proto: &str) -> Result<(), ConversionError> {
    let previous = proto_parser::parse_proto(previous_proto)?;
    tracing::debug!(
        "merging previous proto with {} messages and {} services",
        previous.messages.len(),
        previous.services.len()
    );
    proto_merger::merge(proto_file, &previous);
    Ok(())
}

#[cfg(not(feature = "proto_parser"))]
fn merge_previous(_proto_file: &mut ProtoFile, _previous_proto: &str) -> Result<(), ConversionError> {
    Err(ConversionError::invalid_argument(
        "merging a previous proto needs the proto_parser feature",
    ))
}
