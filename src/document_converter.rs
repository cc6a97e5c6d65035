//! Turns a [`Document`] into a [`ProtoFile`]. Schemas become messages, resources become services
//! and every method becomes an rpc with a request message of its own.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::converter_config::InlineSchemaRegistry;
use crate::discovery_document::Document;
use crate::discovery_method::Method;
use crate::discovery_schema::{Schema, SchemaId, SchemaType};
use crate::error::{ConversionError, ErrorKind};
use crate::name::{identifier_fragments, singular, Name};
use crate::proto_file::{ProtoFile, SourceInfo};
use crate::proto_message::{Field, Message, Primitive, TypeRef};
use crate::proto_service::{
    GrpcMethod, GrpcService, OptionValue, ProtoOption, API_VERSION_OPTION, DEFAULT_HOST_OPTION,
    DEPRECATED_OPTION, FIELD_BEHAVIOR_OPTION, HTTP_OPTION, METHOD_SIGNATURE_OPTION,
    OAUTH_SCOPES_OPTION, OPERATION_POLLING_OPTION, OPERATION_SERVICE_OPTION,
    RESOURCE_DEFINITION_OPTION,
};

static PATH_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").unwrap());
static PATH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z0-9_]+)=([^}]+)\}").unwrap());

/// The one message allowed to collide, a self referencing `Errors` inside an `Errors`.
const ERRORS_PASSTHROUGH: &str = "Errors";
const OPERATION_MESSAGE: &str = "Operation";
const UNDEFINED_DESCRIPTION: &str = "A value indicating that the enum field is not set.";

#[derive(Clone, Debug)]
pub struct ConverterOptions {
    /// The package is the prefix followed by the api name and version.
    pub package_prefix: String,
    /// Resource keys, or service names, to leave out.
    pub ignored_services: BTreeSet<String>,
    /// Top level schema names to leave out, with every field and method using them.
    pub ignored_messages: BTreeSet<String>,
    /// Keeps the enums, but types the fields using them as string.
    pub enums_as_strings: bool,
}

impl Default for ConverterOptions {
    fn default() -> ConverterOptions {
        ConverterOptions {
            package_prefix: String::from("google.cloud"),
            ignored_services: BTreeSet::new(),
            ignored_messages: BTreeSet::new(),
            enums_as_strings: false,
        }
    }
}

pub struct DocumentToProtoConverter<'a> {
    document: &'a Document,
    options: &'a ConverterOptions,
    inline_schemas: &'a mut InlineSchemaRegistry,
    ignored_message_names: BTreeSet<String>,
    messages: BTreeMap<String, Message>,
    services: BTreeMap<String, GrpcService>,
    resource_options: Vec<ProtoOption>,
}

impl<'a> DocumentToProtoConverter<'a> {
    pub fn new(
        document: &'a Document,
        options: &'a ConverterOptions,
        inline_schemas: &'a mut InlineSchemaRegistry,
    ) -> DocumentToProtoConverter<'a> {
        let ignored_message_names = options
            .ignored_messages
            .iter()
            .map(|m| message_name(m).unwrap_or_else(|_| m.clone()))
            .collect();
        DocumentToProtoConverter {
            document,
            options,
            inline_schemas,
            ignored_message_names,
            messages: BTreeMap::new(),
            services: BTreeMap::new(),
            resource_options: Vec::new(),
        }
    }

    /// Runs the conversion, nothing is returned unless every step succeeded.
    pub fn convert(mut self) -> Result<ProtoFile, ConversionError> {
        self.read_messages()?;
        self.read_services()?;
        self.resolve_references()?;
        self.remove_conflicting_enums();
        self.add_operation_options();
        let document = self.document;
        info!(
            "converted {}.{} into {} messages and {} services",
            document.name,
            document.version,
            self.messages.len(),
            self.services.len()
        );
        Ok(ProtoFile {
            package: package_name(&self.options.package_prefix, document),
            messages: self.messages,
            services: self.services,
            resource_options: self.resource_options,
            source: SourceInfo {
                filename: format!("{}.{}.json", document.name, document.version),
                name: document.name.clone(),
                version: document.version.clone(),
                revision: document.revision.clone(),
            },
        })
    }

    fn read_messages(&mut self) -> Result<(), ConversionError> {
        let document = self.document;
        for (key, id) in document.schemas() {
            if self.options.ignored_messages.contains(key) {
                debug!("ignoring schema {}", key);
                continue;
            }
            if !document.is_object(*id) {
                debug!("skipping top level schema {} that is not an object", key);
                continue;
            }
            let name = message_name(document.schema(*id).identifier())?;
            let message = self.schema_to_message(*id, &name)?;
            self.register_message(message)?;
        }
        Ok(())
    }

    fn schema_to_message(&mut self, id: SchemaId, name: &str) -> Result<Message, ConversionError> {
        let document = self.document;
        let schema = document.schema(id);
        let mut message = Message::new(name, false, &schema.description);
        for property_id in schema.properties.values() {
            let field = self.schema_to_field(*property_id, &mut message)?;
            add_unique_field(&mut message, field)?;
        }
        Ok(message)
    }

    /// Creates the field for a property or parameter. Enums it needs are nested in the owner.
    fn schema_to_field(
        &mut self,
        id: SchemaId,
        owner: &mut Message,
    ) -> Result<Field, ConversionError> {
        let document = self.document;
        let schema = document.schema(id);
        let (value_type, repeated, key_type) = match schema.schema_type {
            SchemaType::Array => {
                let items = element_schema(document, id, schema.items, "items")?;
                (self.value_type(items, owner)?, true, None)
            }
            SchemaType::Object if schema.is_map() => {
                let values = element_schema(
                    document,
                    id,
                    schema.additional_properties,
                    "additionalProperties",
                )?;
                (
                    self.value_type(values, owner)?,
                    true,
                    Some(TypeRef::Primitive(Primitive::String)),
                )
            }
            _ => (self.value_type(id, owner)?, schema.repeated, None),
        };
        let mut field = Field::new(&field_name(&schema.key)?, value_type);
        field.repeated = repeated;
        field.key_type = key_type;
        field.optional = !repeated && !schema.required;
        field.description = schema.description.clone();
        if schema.required {
            field.options.push(required_option());
        }
        if schema.deprecated {
            field
                .options
                .push(ProtoOption::scalar(DEPRECATED_OPTION, OptionValue::Bool(true)));
        }
        Ok(field)
    }

    fn value_type(&mut self, id: SchemaId, owner: &mut Message) -> Result<TypeRef, ConversionError> {
        let document = self.document;
        let schema = document.schema(id);
        if !schema.reference.is_empty() {
            return Ok(TypeRef::Reference(message_name(&schema.reference)?));
        }
        match schema.schema_type {
            SchemaType::String if schema.is_enum() => self.enum_type(schema, owner),
            SchemaType::Boolean | SchemaType::Integer | SchemaType::Number | SchemaType::String => {
                Ok(TypeRef::Primitive(primitive_type(schema)))
            }
            SchemaType::Any => match Primitive::well_known(&schema.format) {
                Some(well_known) => Ok(TypeRef::Primitive(well_known)),
                None => Err(ConversionError::unsupported(&format!(
                    "schema {} has type any, which proto3 can't express",
                    document.schema_path(id)
                ))),
            },
            SchemaType::Object => self.inline_message(id),
            SchemaType::Array => Err(ConversionError::unsupported(&format!(
                "schema {} is an array directly inside an array or map",
                document.schema_path(id)
            ))),
            SchemaType::Empty => Err(ConversionError::unsupported(&format!(
                "schema {} has neither a type nor a reference",
                document.schema_path(id)
            ))),
        }
    }

    fn enum_type(&mut self, schema: &Schema, owner: &mut Message) -> Result<TypeRef, ConversionError> {
        let name = message_name(schema.identifier())?;
        let mut enum_message = Message::new(&name, true, &schema.description);
        let mut undefined = Field::new(
            &format!("UNDEFINED_{}", to_name(&name)?.to_upper_underscore()),
            TypeRef::Primitive(Primitive::Unformatted),
        );
        undefined.first_in_order = true;
        undefined.description = String::from(UNDEFINED_DESCRIPTION);
        enum_message.add_field(undefined);
        for (i, value) in schema.enum_values.iter().enumerate() {
            let mut field = Field::new(
                &enum_value_name(value)?,
                TypeRef::Primitive(Primitive::Unformatted),
            );
            field.description = schema.enum_descriptions.get(i).cloned().unwrap_or_default();
            if !enum_message.add_field(field) {
                debug!("enum {} has value {} twice", name, value);
            }
        }
        if !owner.enums().contains_key(&name) {
            owner.add_enum(enum_message);
        } else if owner.enums()[&name] != enum_message {
            return Err(ConversionError::new(
                ErrorKind::NameCollision,
                &format!("message {} has two different enums named {}", owner.name, name),
                None,
            ));
        }
        if self.options.enums_as_strings {
            Ok(TypeRef::Primitive(Primitive::String))
        } else {
            Ok(TypeRef::Enum(name))
        }
    }

    fn inline_message(&mut self, id: SchemaId) -> Result<TypeRef, ConversionError> {
        let document = self.document;
        let schema = document.schema(id);
        let default_name = message_name(schema.identifier())?;
        let inline = schema.id.is_empty();
        let path = document.schema_path(id);
        let name = if inline {
            self.inline_schemas
                .message_name(&path, schema.canonical_description(), &default_name)
        } else {
            default_name
        };
        let message = self.schema_to_message(id, &name)?;
        if self.register_message(message)? && inline {
            self.inline_schemas
                .add_inline_field(&path, &name, schema.canonical_description());
        }
        Ok(TypeRef::Message(name))
    }

    /// Adds the message, unless an equal one is there. Returns false when the message was passed
    /// through as the allowed `Errors` collision.
    fn register_message(&mut self, message: Message) -> Result<bool, ConversionError> {
        if let Some(existing) = self.messages.get(&message.name) {
            if *existing == message {
                return Ok(true);
            }
            if is_errors_passthrough(&message) {
                debug!("keeping the first {} message", message.name);
                return Ok(false);
            }
            return Err(ConversionError::new(
                ErrorKind::NameCollision,
                &format!(
                    "message {} is generated from two different schemas",
                    message.name
                ),
                None,
            ));
        }
        self.messages.insert(message.name.clone(), message);
        Ok(true)
    }

    fn read_services(&mut self) -> Result<(), ConversionError> {
        let document = self.document;
        for (resource, method_ids) in document.resources() {
            let service_name = service_name(resource)?;
            if self.options.ignored_services.contains(resource)
                || self.options.ignored_services.contains(&service_name)
            {
                debug!("ignoring service {}", service_name);
                continue;
            }
            let methods: Vec<&Method> = method_ids.iter().map(|id| document.method(*id)).collect();
            let api_version = consistent_api_version(&service_name, &methods)?;
            let mut service = GrpcService::new(&service_name, "");
            let mut scopes = BTreeSet::new();
            for method in methods {
                if let Some(ignored) = self.ignored_reference(method) {
                    warn!("skipping method {} using ignored message {}", method.id, ignored);
                    continue;
                }
                let grpc_method = self.method_to_grpc(&service_name, method)?;
                scopes.extend(method.scopes.iter().cloned());
                service.methods.insert(grpc_method.name.clone(), grpc_method);
            }
            if service.methods.is_empty() {
                continue;
            }
            let host = document.default_host();
            if !host.is_empty() {
                service.options.push(ProtoOption::string(DEFAULT_HOST_OPTION, &host));
            }
            if !scopes.is_empty() {
                let scopes: Vec<String> = scopes.into_iter().collect();
                service
                    .options
                    .push(ProtoOption::string(OAUTH_SCOPES_OPTION, &scopes.join(",")));
            }
            if !api_version.is_empty() {
                service
                    .options
                    .push(ProtoOption::string(API_VERSION_OPTION, &api_version));
            }
            self.services.insert(service_name, service);
        }
        Ok(())
    }

    fn ignored_reference(&self, method: &Method) -> Option<String> {
        let document = self.document;
        [method.request, method.response]
            .into_iter()
            .flatten()
            .map(|id| document.schema(id))
            .filter(|s| !s.reference.is_empty())
            .filter_map(|s| message_name(&s.reference).ok())
            .find(|name| self.ignored_message_names.contains(name))
    }

    fn method_to_grpc(
        &mut self,
        service_name: &str,
        method: &Method,
    ) -> Result<GrpcMethod, ConversionError> {
        let document = self.document;
        let verb = to_name(method.verb())?;
        let collection = if method.is_plural_method() {
            method.collection().to_owned()
        } else {
            singular(method.collection())
        };
        let base = verb.join(&to_name(&collection)?);
        let request_name = base.join(&Name::from(&["request"])?).to_upper_camel();
        let mut request = Message::new(
            &request_name,
            false,
            &format!(
                "A request message for {}.{}. See the method description for details.",
                service_name,
                verb.to_upper_camel()
            ),
        );
        for param_id in method.parameters.values() {
            let field = self.schema_to_field(*param_id, &mut request)?;
            add_unique_field(&mut request, field)?;
        }
        let mut body_field = None;
        if let Some(request_id) = method.request {
            let body = document.schema(request_id);
            let type_name = if body.reference.is_empty() {
                message_name(body.identifier())?
            } else {
                message_name(&body.reference)?
            };
            let field_name = to_name(&type_name)?
                .join(&Name::from(&["resource"])?)
                .to_lower_underscore();
            let mut field = Field::new(&field_name, TypeRef::Reference(type_name));
            field.description = String::from("The body resource for this request");
            field.options.push(required_option());
            add_unique_field(&mut request, field)?;
            body_field = Some(field_name);
        }
        self.register_message(request)?;
        let output = match method.response {
            Some(response_id) => {
                let response = document.schema(response_id);
                if response.reference.is_empty() {
                    message_name(response.identifier())?
                } else {
                    message_name(&response.reference)?
                }
            }
            None => {
                let response_name = base.join(&Name::from(&["response"])?).to_upper_camel();
                self.register_message(Message::new(
                    &response_name,
                    false,
                    &format!("A response message for {}.{}.", service_name, verb.to_upper_camel()),
                ))?;
                response_name
            }
        };
        let mut grpc_method = GrpcMethod::new(
            &verb.to_upper_camel(),
            &request_name,
            &output,
            &method.description,
        );
        grpc_method.options.push(self.http_option(method, body_field.as_deref())?);
        let mut signature = Vec::new();
        for param in &method.required_param_names {
            signature.push(field_name(param)?);
        }
        signature.extend(body_field);
        if !signature.is_empty() {
            grpc_method
                .options
                .push(ProtoOption::string(METHOD_SIGNATURE_OPTION, &signature.join(",")));
        }
        if method.has_expansion() {
            self.add_resource_definition(method)?;
        }
        Ok(grpc_method)
    }

    fn http_option(&self, method: &Method, body: Option<&str>) -> Result<ProtoOption, ConversionError> {
        let verb = method.http_method.to_ascii_lowercase();
        if !matches!(verb.as_str(), "get" | "put" | "post" | "delete" | "patch") {
            return Err(ConversionError::format(&format!(
                "method {} uses unsupported http method {}",
                method.id, method.http_method
            )));
        }
        let template = format!("/{}{}", self.document.service_path, method.flat_path);
        let mut fields = vec![(verb, OptionValue::String(substitute_path_variables(&template)?))];
        if let Some(body) = body {
            fields.push((String::from("body"), OptionValue::String(body.to_owned())));
        }
        Ok(ProtoOption::fields(HTTP_OPTION, fields))
    }

    /// A path like `v1/{name=projects/*/lakes/*}` defines the `Lake` resource with pattern
    /// `projects/{project}/lakes/{lake}`.
    fn add_resource_definition(&mut self, method: &Method) -> Result<(), ConversionError> {
        let pattern = match PATH_PATTERN.captures(&method.flat_path) {
            Some(caps) => caps.get(2).map_or("", |m| m.as_str()).to_owned(),
            None => return Ok(()),
        };
        let segments: Vec<&str> = pattern.split('/').collect();
        if segments.len() % 2 != 0
            || segments
                .chunks(2)
                .any(|pair| pair[1] != "*" || pair[0] == "*" || pair[0].contains('{'))
        {
            debug!("no resource definition for pattern {}", pattern);
            return Ok(());
        }
        let mut named = Vec::new();
        let mut last = String::new();
        for pair in segments.chunks(2) {
            last = singular(pair[0]);
            named.push(format!("{}/{{{}}}", pair[0], to_name(&last)?.to_lower_underscore()));
        }
        let resource_type = format!(
            "{}.googleapis.com/{}",
            self.document.name,
            to_name(&last)?.to_upper_camel()
        );
        let type_value = OptionValue::String(resource_type);
        if self
            .resource_options
            .iter()
            .any(|o| o.property("type") == Some(&type_value))
        {
            return Ok(());
        }
        self.resource_options.push(ProtoOption::fields(
            RESOURCE_DEFINITION_OPTION,
            vec![
                (String::from("type"), type_value),
                (String::from("pattern"), OptionValue::String(named.join("/"))),
            ],
        ));
        Ok(())
    }

    /// Turns every reference into the message it names. Fields using ignored messages go, any
    /// other reference left is an error.
    fn resolve_references(&mut self) -> Result<(), ConversionError> {
        let known: BTreeSet<String> = self.messages.keys().cloned().collect();
        let ignored = &self.ignored_message_names;
        let mut unresolved = Vec::new();
        for message in self.messages.values_mut() {
            let message_name = message.name.clone();
            message.retain_fields(|f| {
                let dropped = match &f.value_type {
                    TypeRef::Reference(name) => !known.contains(name) && ignored.contains(name),
                    _ => false,
                };
                if dropped {
                    debug!("dropping field {}.{} of ignored type", message_name, f.name);
                }
                !dropped
            });
            message.update_fields(|f| {
                resolve_type(&mut f.value_type, &known);
                if let Some(key_type) = f.key_type.as_mut() {
                    resolve_type(key_type, &known);
                }
            });
            for field in message.fields() {
                if field.value_type.is_reference() {
                    unresolved.push(format!(
                        "field {}.{} refers to unknown message {}",
                        message_name,
                        field.name,
                        field.value_type.name()
                    ));
                }
            }
        }
        for service in self.services.values() {
            for method in service.methods.values() {
                for name in [&method.input, &method.output] {
                    if !known.contains(name) {
                        unresolved.push(format!(
                            "method {}.{} refers to unknown message {}",
                            service.name, method.name, name
                        ));
                    }
                }
            }
        }
        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(ConversionError::aggregate(
                ErrorKind::InvalidArgument,
                "references could not be resolved",
                unresolved,
            ))
        }
    }

    /// Enum values share the scope of the message the enums are in, enums with a common value
    /// can't both be there. They are removed and their fields become strings.
    fn remove_conflicting_enums(&mut self) {
        for message in self.messages.values_mut() {
            let conflicting = conflicting_enums(message);
            if conflicting.is_empty() {
                continue;
            }
            debug!(
                "removing enums {:?} from {} because their values collide",
                conflicting, message.name
            );
            for name in &conflicting {
                message.remove_enum(name);
            }
            message.update_fields(|f| {
                if let TypeRef::Enum(name) = &f.value_type {
                    if conflicting.contains(name) {
                        f.value_type = TypeRef::Primitive(Primitive::String);
                    }
                }
            });
        }
    }

    fn add_operation_options(&mut self) {
        let operation_services: BTreeSet<String> = self
            .services
            .keys()
            .filter(|name| name.ends_with("Operations"))
            .cloned()
            .collect();
        if operation_services.is_empty() {
            return;
        }
        for service in self.services.values_mut() {
            let is_operation_service = operation_services.contains(&service.name);
            for method in service.methods.values_mut() {
                if is_operation_service {
                    if method.name == "Get" {
                        method.options.push(ProtoOption::scalar(
                            OPERATION_POLLING_OPTION,
                            OptionValue::Bool(true),
                        ));
                    }
                    continue;
                }
                if method.output != OPERATION_MESSAGE {
                    continue;
                }
                let request = self.messages.get(&method.input);
                let has = |name: &str| request.is_some_and(|r| r.field(name).is_some());
                let target = if has("zone") {
                    "ZoneOperations"
                } else if has("region") {
                    "RegionOperations"
                } else if has("parent_id") {
                    "GlobalOrganizationOperations"
                } else {
                    "GlobalOperations"
                };
                if operation_services.contains(target) {
                    method
                        .options
                        .push(ProtoOption::string(OPERATION_SERVICE_OPTION, target));
                }
            }
        }
    }
}

fn resolve_type(type_ref: &mut TypeRef, known: &BTreeSet<String>) {
    if let TypeRef::Reference(name) = type_ref {
        if known.contains(name.as_str()) {
            *type_ref = TypeRef::Message(name.clone());
        }
    }
}

fn conflicting_enums(message: &Message) -> BTreeSet<String> {
    let mut owners: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for (enum_name, enum_message) in message.enums() {
        for value in enum_message.fields() {
            owners.entry(&value.name).or_default().insert(enum_name);
        }
    }
    owners
        .values()
        .filter(|enums| enums.len() > 1)
        .flat_map(|enums| enums.iter().map(|e| e.to_string()))
        .collect()
}

fn is_errors_passthrough(message: &Message) -> bool {
    message.name == ERRORS_PASSTHROUGH
        && message
            .fields()
            .iter()
            .any(|f| f.value_type == TypeRef::Message(String::from(ERRORS_PASSTHROUGH)))
}

fn consistent_api_version(service: &str, methods: &[&Method]) -> Result<String, ConversionError> {
    let versions: BTreeSet<&str> = methods.iter().map(|m| m.api_version.as_str()).collect();
    match versions.len() {
        0 => Ok(String::new()),
        1 => Ok(versions.into_iter().next().unwrap_or_default().to_owned()),
        _ => Err(ConversionError::new(
            ErrorKind::InconsistentApiVersions,
            &format!(
                "methods of service {} use different api versions: {:?}",
                service, versions
            ),
            None,
        )),
    }
}

fn element_schema(
    document: &Document,
    owner: SchemaId,
    element: Option<SchemaId>,
    kind: &str,
) -> Result<SchemaId, ConversionError> {
    let element = match element {
        Some(e) => e,
        None => {
            return Err(ConversionError::unsupported(&format!(
                "schema {} has no {}",
                document.schema_path(owner),
                kind
            )))
        }
    };
    let schema = document.schema(element);
    if schema.reference.is_empty()
        && (schema.schema_type == SchemaType::Array || schema.is_map())
    {
        return Err(ConversionError::unsupported(&format!(
            "schema {} nests an array or map in its {}",
            document.schema_path(owner),
            kind
        )));
    }
    Ok(element)
}

fn add_unique_field(message: &mut Message, field: Field) -> Result<(), ConversionError> {
    let name = field.name.clone();
    if message.add_field(field) {
        Ok(())
    } else {
        Err(ConversionError::new(
            ErrorKind::NameCollision,
            &format!("message {} has two fields named {}", message.name, name),
            None,
        ))
    }
}

fn required_option() -> ProtoOption {
    ProtoOption::scalar(
        FIELD_BEHAVIOR_OPTION,
        OptionValue::Literal(String::from("REQUIRED")),
    )
}

fn primitive_type(schema: &Schema) -> Primitive {
    match (schema.schema_type, schema.format.as_str()) {
        (SchemaType::Boolean, _) => Primitive::Bool,
        (SchemaType::Integer, "uint32") => Primitive::Uint32,
        (SchemaType::Integer, "int64") => Primitive::Int64,
        (SchemaType::Integer, "uint64") => Primitive::Uint64,
        (SchemaType::Integer, _) => Primitive::Int32,
        (SchemaType::Number, "float") => Primitive::Float,
        (SchemaType::Number, _) => Primitive::Double,
        (_, "int64") => Primitive::Int64,
        (_, "uint64") => Primitive::Uint64,
        (_, "byte") => Primitive::Bytes,
        _ => Primitive::String,
    }
}

fn to_name(identifier: &str) -> Result<Name, ConversionError> {
    let name = Name::any_camel(&identifier_fragments(identifier))?;
    if name.is_empty() {
        return Err(ConversionError::format(&format!(
            "'{}' is not a usable identifier",
            identifier
        )));
    }
    Ok(name)
}

/// Message name for a schema identifier, identifiers starting in lower case are camel cased.
pub fn message_name(identifier: &str) -> Result<String, ConversionError> {
    if identifier.starts_with(|c: char| c.is_ascii_uppercase())
        && identifier.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Ok(identifier.to_owned());
    }
    Ok(to_name(identifier)?.to_upper_camel_keep_acronyms())
}

/// Field name for a property key, keys starting in upper case keep their capital.
pub fn field_name(key: &str) -> Result<String, ConversionError> {
    let name = to_name(key)?;
    if key.starts_with(|c: char| c.is_ascii_uppercase()) {
        Ok(name.to_capitalized_lower_underscore())
    } else {
        Ok(name.to_lower_underscore())
    }
}

fn enum_value_name(value: &str) -> Result<String, ConversionError> {
    let name = to_name(value)?.to_upper_underscore();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        Ok(format!("_{}", name))
    } else {
        Ok(name)
    }
}

fn service_name(resource: &str) -> Result<String, ConversionError> {
    Ok(to_name(resource)?.to_upper_camel())
}

fn package_name(prefix: &str, document: &Document) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    };
    let api = format!("{}.{}", clean(&document.name), clean(&document.version));
    if prefix.is_empty() {
        api
    } else {
        format!("{}.{}", prefix, api)
    }
}

fn substitute_path_variables(template: &str) -> Result<String, ConversionError> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PATH_VARIABLE.captures_iter(template) {
        let (whole, variable) = match (caps.get(0), caps.get(1)) {
            (Some(w), Some(v)) => (w, v.as_str()),
            _ => continue,
        };
        result.push_str(&template[last..whole.start()]);
        result.push('{');
        result.push_str(&field_name(variable)?);
        result.push('}');
        last = whole.end();
    }
    result.push_str(&template[last..]);
    Ok(result)
}
