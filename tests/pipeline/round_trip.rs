use discovery_proto_converter::convert;
use discovery_proto_converter::document_converter::ConverterOptions;
use discovery_proto_converter::proto_parser::parse_proto;
use discovery_proto_converter::proto_writer::write_proto;
use test_utils::{get_compute_document, get_lakes_document};

#[test]
fn compute_survives_writing_and_parsing() {
    let output = convert(get_compute_document(), &ConverterOptions::default(), None, None).unwrap();
    let text = write_proto(&output.proto_file).unwrap();
    let parsed = parse_proto(&text).unwrap();
    assert_eq!(parsed, output.proto_file);
}

#[test]
fn lakes_survive_writing_and_parsing() {
    let output = convert(get_lakes_document(), &ConverterOptions::default(), None, None).unwrap();
    let parsed = parse_proto(&output.proto_text().unwrap()).unwrap();
    assert_eq!(parsed, output.proto_file);
    assert_eq!(parsed.resource_options.len(), 3);
}

#[test]
fn written_numbers_are_deterministic() {
    let options = ConverterOptions::default();
    let first = convert(get_compute_document(), &options, None, None)
        .unwrap()
        .proto_text()
        .unwrap();
    let second = convert(get_compute_document(), &options, None, None)
        .unwrap()
        .proto_text()
        .unwrap();
    assert_eq!(first, second);
    assert!(first.contains("  optional string name = 3373707;\n"));
    assert!(first.contains("    UNDEFINED_STATUS = 0;\n"));
    assert!(first.contains("    DONE = 2104194;\n"));
    assert!(first.contains("package google.cloud.compute.v1;"));
    assert!(first.contains("import \"google/cloud/extended_operations.proto\";"));
}
