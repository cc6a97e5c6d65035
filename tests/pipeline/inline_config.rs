use rand::seq::SliceRandom;

use discovery_proto_converter::converter_config::{ConverterConfig, InlineSchemaRegistry};
use discovery_proto_converter::convert;
use discovery_proto_converter::document_converter::ConverterOptions;
use discovery_proto_converter::error::ErrorKind;
use discovery_proto_converter::proto_message::TypeRef;
use test_utils::{get_lakes_document, get_stale_lakes_config};

fn first_run_config() -> ConverterConfig {
    convert(get_lakes_document(), &ConverterOptions::default(), None, None)
        .unwrap()
        .config
}

/// Moves the given paths of the metastore schema from `Metastore` to `name`.
fn rename_metastore(config: &mut ConverterConfig, name: &str, paths: &[&str]) {
    for inline_schema in &mut config.inline_schemas {
        let Some(current) = inline_schema.locations.get_mut("Metastore") else {
            continue;
        };
        current.retain(|p| !paths.contains(&p.as_str()));
        if current.is_empty() {
            inline_schema.locations.remove("Metastore");
        }
        inline_schema.locations.insert(
            name.to_owned(),
            paths.iter().map(|p| p.to_string()).collect(),
        );
    }
}

#[test]
fn regenerating_with_exported_config_is_stable() {
    let options = ConverterOptions::default();
    let first = convert(get_lakes_document(), &options, None, None).unwrap();
    let second = convert(get_lakes_document(), &options, Some(&first.config), None).unwrap();
    assert_eq!(first.proto_file, second.proto_file);
    assert_eq!(
        first.config.to_json().unwrap(),
        second.config.to_json().unwrap()
    );
}

#[test]
fn configured_names_are_used() {
    let mut config = first_run_config();
    rename_metastore(
        &mut config,
        "LakeMetastore",
        &["schemas.Lake.metastore", "schemas.Zone.metastore"],
    );
    let output = convert(
        get_lakes_document(),
        &ConverterOptions::default(),
        Some(&config),
        None,
    )
    .unwrap();
    let messages = &output.proto_file.messages;
    assert!(messages.contains_key("LakeMetastore"));
    assert!(!messages.contains_key("Metastore"));
    assert_eq!(
        messages["Zone"].field("metastore").unwrap().value_type,
        TypeRef::Message(String::from("LakeMetastore"))
    );
    assert_eq!(output.config, config);
}

#[test]
fn renaming_one_of_shared_locations_is_drift() {
    let mut config = first_run_config();
    rename_metastore(&mut config, "ZoneMetastore", &["schemas.Zone.metastore"]);
    let err = convert(
        get_lakes_document(),
        &ConverterOptions::default(),
        Some(&config),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConfigurationDrift);
    assert_eq!(err.details.len(), 1);
    assert!(err.details[0].contains("ZoneMetastore"));
}

#[test]
fn stale_locations_are_drift() {
    let config = ConverterConfig::from_json(get_stale_lakes_config()).unwrap();
    let err = convert(
        get_lakes_document(),
        &ConverterOptions::default(),
        Some(&config),
        None,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ConfigurationDrift);
    assert!(err.details.iter().any(|d| d.contains("schemas.Lake.retirement")));
}

#[test]
fn export_does_not_depend_on_registration_order() {
    let mut registrations = vec![
        ("schemas.Lake.metastore", "Metastore", "{\"a\":1}"),
        ("schemas.Zone.metastore", "Metastore", "{\"a\":1}"),
        ("schemas.Zone.discoverySpec", "DiscoverySpec", "{\"b\":2}"),
        ("schemas.Asset.discoverySpec", "DiscoverySpec", "{\"b\":2}"),
        ("schemas.Task.spark", "Spark", "{\"c\":3}"),
    ];
    let export = |registrations: &[(&str, &str, &str)]| {
        let mut registry = InlineSchemaRegistry::new();
        for (path, name, schema) in registrations {
            registry.add_inline_field(path, name, schema);
        }
        registry.export("v1", "20240101").unwrap().to_json().unwrap()
    };
    let expected = export(&registrations[..]);
    let mut rng = rand::rng();
    for _ in 0..10 {
        registrations.shuffle(&mut rng);
        assert_eq!(export(&registrations[..]), expected);
    }
}

#[test]
fn config_survives_a_file() {
    let config = first_run_config();
    let path = std::env::temp_dir().join(format!(
        "discovery_proto_converter_{}.json",
        std::process::id()
    ));
    config.write_to(&path).unwrap();
    let read = ConverterConfig::read_from(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(read, config);
}
