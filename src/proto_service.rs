//! Services, rpc methods and the options that can be put on them.
use std::collections::BTreeMap;

pub const HTTP_OPTION: &str = "google.api.http";
pub const METHOD_SIGNATURE_OPTION: &str = "google.api.method_signature";
pub const DEFAULT_HOST_OPTION: &str = "google.api.default_host";
pub const OAUTH_SCOPES_OPTION: &str = "google.api.oauth_scopes";
pub const API_VERSION_OPTION: &str = "google.api.api_version";
pub const FIELD_BEHAVIOR_OPTION: &str = "google.api.field_behavior";
pub const RESOURCE_DEFINITION_OPTION: &str = "google.api.resource_definition";
pub const OPERATION_SERVICE_OPTION: &str = "google.cloud.operation_service";
pub const OPERATION_POLLING_OPTION: &str = "google.cloud.operation_polling_method";
pub const DEPRECATED_OPTION: &str = "deprecated";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionValue {
    String(String),
    Bool(bool),
    Int(i64),
    /// Bare enum like literal, like `REQUIRED`.
    Literal(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionBody {
    Scalar(OptionValue),
    /// Key value pairs between braces, in the order they're written.
    Fields(Vec<(String, OptionValue)>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtoOption {
    pub name: String,
    pub body: OptionBody,
}

impl ProtoOption {
    pub fn scalar(name: &str, value: OptionValue) -> ProtoOption {
        ProtoOption {
            name: name.to_owned(),
            body: OptionBody::Scalar(value),
        }
    }

    pub fn string(name: &str, value: &str) -> ProtoOption {
        ProtoOption::scalar(name, OptionValue::String(value.to_owned()))
    }

    pub fn fields(name: &str, fields: Vec<(String, OptionValue)>) -> ProtoOption {
        ProtoOption {
            name: name.to_owned(),
            body: OptionBody::Fields(fields),
        }
    }

    pub fn value(&self) -> Option<&OptionValue> {
        match &self.body {
            OptionBody::Scalar(v) => Some(v),
            OptionBody::Fields(_) => None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&OptionValue> {
        match &self.body {
            OptionBody::Scalar(_) => None,
            OptionBody::Fields(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
        }
    }

    /// Custom options have a dotted name and are written between parentheses.
    pub fn is_custom(&self) -> bool {
        self.name.contains('.')
    }
}

#[derive(Clone, Debug)]
pub struct GrpcMethod {
    pub name: String,
    pub description: String,
    pub input: String,
    pub output: String,
    pub options: Vec<ProtoOption>,
}

impl PartialEq for GrpcMethod {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.input == other.input
            && self.output == other.output
            && self.options == other.options
    }
}

impl GrpcMethod {
    pub fn new(name: &str, input: &str, output: &str, description: &str) -> GrpcMethod {
        GrpcMethod {
            name: name.to_owned(),
            description: description.to_owned(),
            input: input.to_owned(),
            output: output.to_owned(),
            options: Vec::new(),
        }
    }

    pub fn options_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ProtoOption> {
        self.options.iter().filter(move |o| o.name == name)
    }
}

#[derive(Clone, Debug)]
pub struct GrpcService {
    pub name: String,
    pub description: String,
    pub options: Vec<ProtoOption>,
    pub methods: BTreeMap<String, GrpcMethod>,
}

impl PartialEq for GrpcService {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.options == other.options && self.methods == other.methods
    }
}

impl GrpcService {
    pub fn new(name: &str, description: &str) -> GrpcService {
        GrpcService {
            name: name.to_owned(),
            description: description.to_owned(),
            options: Vec::new(),
            methods: BTreeMap::new(),
        }
    }
}
