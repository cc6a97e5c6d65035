use discovery_proto_converter::convert;
use discovery_proto_converter::document_converter::ConverterOptions;
use discovery_proto_converter::proto_service::{
    OptionValue, ProtoOption, DEPRECATED_OPTION, METHOD_SIGNATURE_OPTION,
};
use test_utils::get_compute_document;

fn previous_proto() -> String {
    convert(get_compute_document(), &ConverterOptions::default(), None, None)
        .unwrap()
        .proto_text()
        .unwrap()
}

#[test]
fn merging_the_same_proto_changes_nothing() {
    let options = ConverterOptions::default();
    let fresh = convert(get_compute_document(), &options, None, None).unwrap();
    let merged = convert(
        get_compute_document(),
        &options,
        None,
        Some(&fresh.proto_text().unwrap()),
    )
    .unwrap();
    assert_eq!(merged.proto_file, fresh.proto_file);
}

#[test]
fn removed_fields_come_back() {
    let previous = previous_proto().replace(
        "message Address {\n",
        "message Address {\n  optional string legacy_name = 12;\n  optional Gone gone = 13;\n",
    )
    .replace("//\n// Services\n//\n", "message Gone {\n}\n\n//\n// Services\n//\n");
    let merged = convert(
        get_compute_document(),
        &ConverterOptions::default(),
        None,
        Some(&previous),
    )
    .unwrap();
    let address = &merged.proto_file.messages["Address"];
    assert!(address.field("legacy_name").unwrap().optional);
    assert!(address.field("gone").is_none());
    assert!(!merged.proto_file.messages.contains_key("Gone"));
}

#[test]
fn old_field_options_are_kept() {
    let previous = previous_proto().replace(
        "optional string name = 3373707;",
        "optional string name = 3373707 [deprecated = true];",
    );
    let merged = convert(
        get_compute_document(),
        &ConverterOptions::default(),
        None,
        Some(&previous),
    )
    .unwrap();
    let name = merged.proto_file.messages["Address"].field("name").unwrap();
    assert_eq!(
        name.options,
        vec![ProtoOption::scalar(DEPRECATED_OPTION, OptionValue::Bool(true))]
    );
}

#[test]
fn old_method_signatures_go_first() {
    let previous = previous_proto().replace(
        "option (google.api.method_signature) = \"project,region,address\";",
        "option (google.api.method_signature) = \"project,region\";",
    );
    let merged = convert(
        get_compute_document(),
        &ConverterOptions::default(),
        None,
        Some(&previous),
    )
    .unwrap();
    let get = &merged.proto_file.services["Addresses"].methods["Get"];
    let signatures: Vec<&ProtoOption> = get.options_named(METHOD_SIGNATURE_OPTION).collect();
    assert_eq!(
        signatures,
        vec![
            &ProtoOption::string(METHOD_SIGNATURE_OPTION, "project,region"),
            &ProtoOption::string(METHOD_SIGNATURE_OPTION, "project,region,address"),
        ]
    );
}
