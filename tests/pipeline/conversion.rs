use std::collections::BTreeSet;

use discovery_proto_converter::document_converter::ConverterOptions;
use discovery_proto_converter::error::ErrorKind;
use discovery_proto_converter::proto_message::{Primitive, TypeRef};
use discovery_proto_converter::proto_service::{
    OptionValue, ProtoOption, DEFAULT_HOST_OPTION, DEPRECATED_OPTION, FIELD_BEHAVIOR_OPTION,
    HTTP_OPTION, METHOD_SIGNATURE_OPTION, OAUTH_SCOPES_OPTION, OPERATION_POLLING_OPTION,
    OPERATION_SERVICE_OPTION, RESOURCE_DEFINITION_OPTION,
};
use discovery_proto_converter::{convert, ConversionOutput};
use test_utils::{
    get_colliding_names_document, get_compute_document, get_description_property_document,
    get_inconsistent_versions_document, get_lakes_document, get_nested_errors_document,
    get_untyped_any_document,
};

fn convert_with(document: &str, options: &ConverterOptions) -> ConversionOutput {
    convert(document, options, None, None).unwrap()
}

fn required() -> ProtoOption {
    ProtoOption::scalar(
        FIELD_BEHAVIOR_OPTION,
        OptionValue::Literal(String::from("REQUIRED")),
    )
}

#[test]
fn compute_messages_are_generated() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let proto_file = &output.proto_file;
    assert_eq!(proto_file.package, "google.cloud.compute.v1");
    let names: Vec<&str> = proto_file.messages.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Address",
            "AddressList",
            "Error",
            "Errors",
            "GetAddressRequest",
            "GetRegionOperationRequest",
            "InsertAddressRequest",
            "ListAddressesRequest",
            "Operation",
            "Warning",
            "Warnings",
        ]
    );
}

#[test]
fn compute_fields_follow_schema_types() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let address = &output.proto_file.messages["Address"];

    let id = address.field("id").unwrap();
    assert_eq!(id.value_type, TypeRef::Primitive(Primitive::Uint64));
    assert!(id.optional);

    let labels = address.field("labels").unwrap();
    assert!(labels.repeated);
    assert!(!labels.optional);
    assert_eq!(labels.key_type, Some(TypeRef::Primitive(Primitive::String)));
    assert_eq!(labels.value_type, TypeRef::Primitive(Primitive::String));

    let users = address.field("users").unwrap();
    assert!(users.repeated);
    assert!(users.key_type.is_none());

    let protocol = address.field("Ip_protocol").unwrap();
    assert_eq!(
        protocol.options,
        vec![ProtoOption::scalar(DEPRECATED_OPTION, OptionValue::Bool(true))]
    );

    let list = &output.proto_file.messages["AddressList"];
    assert_eq!(
        list.field("items").unwrap().value_type,
        TypeRef::Message(String::from("Address"))
    );
    assert_eq!(
        list.field("warning").unwrap().value_type,
        TypeRef::Message(String::from("Warning"))
    );
    let operation = &output.proto_file.messages["Operation"];
    let warnings = operation.field("warnings").unwrap();
    assert!(warnings.repeated);
    assert_eq!(warnings.value_type, TypeRef::Message(String::from("Warnings")));
}

#[test]
fn enums_are_nested_with_zero_value() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let address = &output.proto_file.messages["Address"];
    assert_eq!(
        address.field("status").unwrap().value_type,
        TypeRef::Enum(String::from("Status"))
    );
    let status = &address.enums()["Status"];
    assert!(status.is_enum);
    let values: Vec<&str> = status.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(values, vec!["UNDEFINED_STATUS", "IN_USE", "RESERVED", "RESERVING"]);
    assert_eq!(status.get_fields_with_numbers()[&0].name, "UNDEFINED_STATUS");
    assert_eq!(status.field("IN_USE").unwrap().description, "Address is being used.");
}

#[test]
fn colliding_enums_become_strings() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let address = &output.proto_file.messages["Address"];
    let enums: Vec<&str> = address.enums().keys().map(|k| k.as_str()).collect();
    assert_eq!(enums, vec!["Status"]);
    for name in ["purpose", "sharing"] {
        assert_eq!(
            address.field(name).unwrap().value_type,
            TypeRef::Primitive(Primitive::String)
        );
    }
}

#[test]
fn request_messages_carry_parameters_and_body() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let get = &output.proto_file.messages["GetAddressRequest"];
    for name in ["address", "project", "region"] {
        let field = get.field(name).unwrap();
        assert!(!field.optional);
        assert_eq!(field.options, vec![required()]);
    }

    let list = &output.proto_file.messages["ListAddressesRequest"];
    let max_results = list.field("max_results").unwrap();
    assert!(max_results.optional);
    assert_eq!(max_results.value_type, TypeRef::Primitive(Primitive::Uint32));
    assert!(list.field("page_token").unwrap().optional);

    let insert = &output.proto_file.messages["InsertAddressRequest"];
    let body = insert.field("address_resource").unwrap();
    assert_eq!(body.value_type, TypeRef::Message(String::from("Address")));
    assert_eq!(body.options, vec![required()]);
    assert!(insert.field("request_id").unwrap().optional);
}

#[test]
fn services_get_http_bindings_and_signatures() {
    let output = convert_with(get_compute_document(), &ConverterOptions::default());
    let services: Vec<&str> = output.proto_file.services.keys().map(|k| k.as_str()).collect();
    assert_eq!(services, vec!["Addresses", "RegionOperations"]);

    let addresses = &output.proto_file.services["Addresses"];
    assert_eq!(
        addresses.options,
        vec![
            ProtoOption::string(DEFAULT_HOST_OPTION, "compute.googleapis.com"),
            ProtoOption::string(
                OAUTH_SCOPES_OPTION,
                "https://www.googleapis.com/auth/cloud-platform,https://www.googleapis.com/auth/compute,https://www.googleapis.com/auth/compute.readonly"
            ),
        ]
    );

    let insert = &addresses.methods["Insert"];
    assert_eq!(insert.input, "InsertAddressRequest");
    assert_eq!(insert.output, "Operation");
    assert_eq!(
        insert.options,
        vec![
            ProtoOption::fields(
                HTTP_OPTION,
                vec![
                    (
                        String::from("post"),
                        OptionValue::String(String::from(
                            "/compute/v1/projects/{project}/regions/{region}/addresses"
                        )),
                    ),
                    (
                        String::from("body"),
                        OptionValue::String(String::from("address_resource")),
                    ),
                ],
            ),
            ProtoOption::string(METHOD_SIGNATURE_OPTION, "project,region,address_resource"),
            ProtoOption::string(OPERATION_SERVICE_OPTION, "RegionOperations"),
        ]
    );

    let get = &addresses.methods["Get"];
    assert_eq!(get.output, "Address");
    assert_eq!(
        get.options_named(METHOD_SIGNATURE_OPTION).next().unwrap().value(),
        Some(&OptionValue::String(String::from("project,region,address")))
    );

    let polling = &output.proto_file.services["RegionOperations"].methods["Get"];
    assert_eq!(polling.input, "GetRegionOperationRequest");
    assert!(polling
        .options
        .contains(&ProtoOption::scalar(OPERATION_POLLING_OPTION, OptionValue::Bool(true))));
}

#[test]
fn nested_resources_and_expansions() {
    let output = convert_with(get_lakes_document(), &ConverterOptions::default());
    let proto_file = &output.proto_file;
    assert_eq!(proto_file.package, "google.cloud.dataplex.v1");
    let services: Vec<&str> = proto_file.services.keys().map(|k| k.as_str()).collect();
    assert_eq!(services, vec!["ProjectsLocationsLakes", "ProjectsLocationsLakesZones"]);

    let lakes = &proto_file.services["ProjectsLocationsLakes"];
    let get = &lakes.methods["Get"];
    assert_eq!(
        get.options_named(HTTP_OPTION).next().unwrap().property("get"),
        Some(&OptionValue::String(String::from(
            "/v1/{name=projects/*/locations/*/lakes/*}"
        )))
    );
    assert_eq!(lakes.methods["Delete"].output, "Empty");
    assert!(proto_file.messages["Empty"].fields().is_empty());

    let lake_resource = ProtoOption::fields(
        RESOURCE_DEFINITION_OPTION,
        vec![
            (
                String::from("type"),
                OptionValue::String(String::from("dataplex.googleapis.com/Lake")),
            ),
            (
                String::from("pattern"),
                OptionValue::String(String::from(
                    "projects/{project}/locations/{location}/lakes/{lake}",
                )),
            ),
        ],
    );
    assert!(proto_file.resource_options.contains(&lake_resource));
    let types: BTreeSet<&OptionValue> = proto_file
        .resource_options
        .iter()
        .filter_map(|o| o.property("type"))
        .collect();
    assert_eq!(types.len(), proto_file.resource_options.len());
    assert_eq!(types.len(), 3);
}

#[test]
fn shared_inline_schema_is_one_message() {
    let output = convert_with(get_lakes_document(), &ConverterOptions::default());
    let metastore = TypeRef::Message(String::from("Metastore"));
    for owner in ["Lake", "Zone"] {
        let field = output.proto_file.messages[owner].field("metastore").unwrap();
        assert_eq!(field.value_type, metastore);
    }
    assert_eq!(
        output.proto_file.messages["Lake"].field("options").unwrap().value_type,
        TypeRef::Primitive(Primitive::Struct)
    );
    let config = &output.config;
    assert_eq!(config.api_version, "v1");
    assert_eq!(config.discovery_revision, "20240101");
    assert_eq!(config.inline_schemas.len(), 2);
    let metastore_paths: Vec<&String> = config
        .inline_schemas
        .iter()
        .filter_map(|s| s.locations.get("Metastore"))
        .flatten()
        .collect();
    assert_eq!(
        metastore_paths,
        vec!["schemas.Lake.metastore", "schemas.Zone.metastore"]
    );
}

#[test]
fn ignored_messages_drop_their_methods() {
    let options = ConverterOptions {
        ignored_messages: BTreeSet::from([String::from("Operation")]),
        ..Default::default()
    };
    let output = convert_with(get_compute_document(), &options);
    let proto_file = &output.proto_file;
    assert!(!proto_file.messages.contains_key("Operation"));
    assert!(!proto_file.messages.contains_key("InsertAddressRequest"));
    assert!(!proto_file.services.contains_key("RegionOperations"));
    let methods: Vec<&str> = proto_file.services["Addresses"]
        .methods
        .keys()
        .map(|k| k.as_str())
        .collect();
    assert_eq!(methods, vec!["Get", "List"]);
}

#[test]
fn ignored_services_are_left_out() {
    let options = ConverterOptions {
        ignored_services: BTreeSet::from([String::from("regionOperations")]),
        ..Default::default()
    };
    let output = convert_with(get_compute_document(), &options);
    assert!(!output.proto_file.services.contains_key("RegionOperations"));
    let insert = &output.proto_file.services["Addresses"].methods["Insert"];
    assert_eq!(insert.options_named(OPERATION_SERVICE_OPTION).count(), 0);
}

#[test]
fn enums_as_strings_keeps_the_enum() {
    let options = ConverterOptions {
        enums_as_strings: true,
        ..Default::default()
    };
    let output = convert_with(get_compute_document(), &options);
    let address = &output.proto_file.messages["Address"];
    assert_eq!(
        address.field("status").unwrap().value_type,
        TypeRef::Primitive(Primitive::String)
    );
    assert!(address.enums().contains_key("Status"));
}

#[test]
fn package_prefix_is_configurable() {
    let options = ConverterOptions {
        package_prefix: String::from("example.apis"),
        ..Default::default()
    };
    let output = convert_with(get_compute_document(), &options);
    assert_eq!(output.proto_file.package, "example.apis.compute.v1");
}

#[test]
fn untyped_any_is_unsupported() {
    let err = convert(get_untyped_any_document(), &ConverterOptions::default(), None, None)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedSchema);
}

#[test]
fn inconsistent_api_versions_are_distinguished() {
    let err = convert(
        get_inconsistent_versions_document(),
        &ConverterOptions::default(),
        None,
        None,
    )
    .unwrap_err();
    assert!(err.is_inconsistent_api_versions());
}

#[test]
fn invalid_json_is_an_argument_error() {
    let err = convert("{not json", &ConverterOptions::default(), None, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn property_named_description_is_part_of_the_schema() {
    let output = convert_with(get_description_property_document(), &ConverterOptions::default());
    let messages = &output.proto_file.messages;
    assert!(messages["Info"].field("description").is_none());
    let details = &messages["Details"];
    assert!(details.field("size").is_some());
    assert!(details.field("description").is_some());
    assert_eq!(
        messages["Zone"].field("details").unwrap().value_type,
        TypeRef::Message(String::from("Details"))
    );
}

#[test]
fn different_schemas_with_one_name_collide() {
    let err = convert(
        get_colliding_names_document(),
        &ConverterOptions::default(),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameCollision);
    assert!(err.error.contains("Lake"));
}

#[test]
fn nested_errors_keep_the_first_message() {
    let output = convert_with(get_nested_errors_document(), &ConverterOptions::default());
    let messages = &output.proto_file.messages;
    let errors = &messages["Errors"];
    assert!(errors.field("code").is_some());
    assert!(errors.field("errors").is_none());
    assert_eq!(
        messages["Operation"].field("errors").unwrap().value_type,
        TypeRef::Message(String::from("Errors"))
    );
    let locations: Vec<&String> = output
        .config
        .inline_schemas
        .iter()
        .flat_map(|s| s.locations.values().flatten())
        .collect();
    assert_eq!(locations, vec!["schemas.Operation.errors.errors"]);
}
