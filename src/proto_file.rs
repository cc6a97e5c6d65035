use std::collections::BTreeMap;

use crate::proto_message::Message;
use crate::proto_service::{GrpcService, ProtoOption};

/// Where a proto file came from, only used for the header of the written file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceInfo {
    pub filename: String,
    pub name: String,
    pub version: String,
    pub revision: String,
}

/// Everything that ends up in one proto file. Equality compares the content, not the source.
#[derive(Clone, Debug, Default)]
pub struct ProtoFile {
    pub package: String,
    pub messages: BTreeMap<String, Message>,
    pub services: BTreeMap<String, GrpcService>,
    pub resource_options: Vec<ProtoOption>,
    pub source: SourceInfo,
}

impl PartialEq for ProtoFile {
    fn eq(&self, other: &Self) -> bool {
        self.package == other.package
            && self.messages == other.messages
            && self.services == other.services
            && self.resource_options == other.resource_options
    }
}
