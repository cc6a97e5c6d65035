//! Renders a [`ProtoFile`] as proto3 text, in the shape the parser reads back.
use std::collections::BTreeSet;
use std::fmt::{self, Write};

use crate::converter_config::CONVERTER_VERSION;
use crate::error::{ConversionError, ErrorKind};
use crate::proto_file::ProtoFile;
use crate::proto_message::{Field, Message, Primitive, TypeRef};
use crate::proto_service::{
    GrpcMethod, GrpcService, OptionBody, OptionValue, ProtoOption, API_VERSION_OPTION,
    DEFAULT_HOST_OPTION, FIELD_BEHAVIOR_OPTION, HTTP_OPTION, METHOD_SIGNATURE_OPTION,
    OAUTH_SCOPES_OPTION, OPERATION_POLLING_OPTION, OPERATION_SERVICE_OPTION,
    RESOURCE_DEFINITION_OPTION,
};

const INDENT: &str = "  ";

pub fn write_proto(proto_file: &ProtoFile) -> Result<String, ConversionError> {
    let mut out = String::new();
    match write_file(&mut out, proto_file) {
        Ok(()) => Ok(out),
        Err(e) => Err(ConversionError::with_cause(
            ErrorKind::Format,
            e,
            &format!("could not write proto file for {}", proto_file.package),
        )),
    }
}

fn write_file(out: &mut String, proto_file: &ProtoFile) -> fmt::Result {
    write_header(out, proto_file)?;
    out.push_str("syntax = \"proto3\";\n\n");
    if !proto_file.package.is_empty() {
        writeln!(out, "package {};\n", proto_file.package)?;
    }
    let imports = imports(proto_file);
    for import in &imports {
        writeln!(out, "import \"{}\";", import)?;
    }
    if !imports.is_empty() {
        out.push('\n');
    }
    for option in &proto_file.resource_options {
        writeln!(out, "option {};", option_text(option, "")?)?;
    }
    if !proto_file.resource_options.is_empty() {
        out.push('\n');
    }
    if !proto_file.messages.is_empty() {
        out.push_str("//\n// Messages\n//\n");
        for message in proto_file.messages.values() {
            write_message(out, message)?;
        }
    }
    if !proto_file.services.is_empty() {
        out.push_str("//\n// Services\n//\n");
        for service in proto_file.services.values() {
            write_service(out, service)?;
        }
    }
    Ok(())
}

fn write_header(out: &mut String, proto_file: &ProtoFile) -> fmt::Result {
    writeln!(
        out,
        "// Generated by the discovery proto converter {}. DO NOT EDIT!",
        CONVERTER_VERSION
    )?;
    let source = &proto_file.source;
    for (label, value) in [
        ("Source file", &source.filename),
        ("Source API name", &source.name),
        ("Source API version", &source.version),
        ("Source API revision", &source.revision),
    ] {
        if !value.is_empty() {
            writeln!(out, "// {}: {}", label, value)?;
        }
    }
    out.push('\n');
    Ok(())
}

fn imports(proto_file: &ProtoFile) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::new();
    let mut option_names: Vec<&str> = proto_file
        .resource_options
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    for service in proto_file.services.values() {
        option_names.extend(service.options.iter().map(|o| o.name.as_str()));
        for method in service.methods.values() {
            option_names.extend(method.options.iter().map(|o| o.name.as_str()));
        }
    }
    let mut primitives = BTreeSet::new();
    for message in proto_file.messages.values() {
        for field in message.fields() {
            option_names.extend(field.options.iter().map(|o| o.name.as_str()));
            for type_ref in std::iter::once(&field.value_type).chain(field.key_type.as_ref()) {
                if let TypeRef::Primitive(p) = type_ref {
                    primitives.insert(*p);
                }
            }
        }
    }
    for name in option_names {
        let import = match name {
            HTTP_OPTION => "google/api/annotations.proto",
            METHOD_SIGNATURE_OPTION | DEFAULT_HOST_OPTION | OAUTH_SCOPES_OPTION
            | API_VERSION_OPTION => "google/api/client.proto",
            FIELD_BEHAVIOR_OPTION => "google/api/field_behavior.proto",
            RESOURCE_DEFINITION_OPTION => "google/api/resource.proto",
            OPERATION_SERVICE_OPTION | OPERATION_POLLING_OPTION => {
                "google/cloud/extended_operations.proto"
            }
            _ => continue,
        };
        imports.insert(import);
    }
    for primitive in primitives {
        match primitive {
            Primitive::Any => {
                imports.insert("google/protobuf/any.proto");
            }
            Primitive::Struct | Primitive::Value | Primitive::ListValue => {
                imports.insert("google/protobuf/struct.proto");
            }
            _ => (),
        }
    }
    imports
}

fn write_comment(out: &mut String, description: &str, indent: &str) -> fmt::Result {
    for line in description.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            writeln!(out, "{}//", indent)?;
        } else {
            writeln!(out, "{}// {}", indent, line)?;
        }
    }
    Ok(())
}

fn write_message(out: &mut String, message: &Message) -> fmt::Result {
    write_comment(out, &message.description, "")?;
    writeln!(out, "message {} {{", message.name)?;
    for enum_message in message.enums().values() {
        write_enum(out, enum_message, INDENT)?;
        out.push('\n');
    }
    let numbers = message.field_numbers();
    for (i, field) in message.fields().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_comment(out, &field.description, INDENT)?;
        let number = numbers.get(field.name.as_str()).copied().unwrap_or_default();
        writeln!(out, "{}{};", INDENT, field_text(field, number)?)?;
    }
    out.push_str("}\n\n");
    Ok(())
}

fn write_enum(out: &mut String, enum_message: &Message, indent: &str) -> fmt::Result {
    write_comment(out, &enum_message.description, indent)?;
    writeln!(out, "{}enum {} {{", indent, enum_message.name)?;
    let inner = format!("{}{}", indent, INDENT);
    for (number, value) in enum_message.get_fields_with_numbers() {
        write_comment(out, &value.description, &inner)?;
        writeln!(
            out,
            "{}{} = {}{};",
            inner,
            value.name,
            number,
            field_options_text(&value.options)?
        )?;
    }
    writeln!(out, "{}}}", indent)
}

fn field_text(field: &Field, number: u32) -> Result<String, fmt::Error> {
    let declaration = match &field.key_type {
        Some(key_type) => format!(
            "map<{}, {}> {}",
            key_type.name(),
            field.value_type.name(),
            field.name
        ),
        None => {
            let label = if field.repeated {
                "repeated "
            } else if field.optional {
                "optional "
            } else {
                ""
            };
            format!("{}{} {}", label, field.value_type.name(), field.name)
        }
    };
    Ok(format!(
        "{} = {}{}",
        declaration,
        number,
        field_options_text(&field.options)?
    ))
}

fn field_options_text(options: &[ProtoOption]) -> Result<String, fmt::Error> {
    if options.is_empty() {
        return Ok(String::new());
    }
    let options = options
        .iter()
        .map(|o| option_text(o, ""))
        .collect::<Result<Vec<String>, fmt::Error>>()?;
    Ok(format!(" [{}]", options.join(", ")))
}

fn write_service(out: &mut String, service: &GrpcService) -> fmt::Result {
    write_comment(out, &service.description, "")?;
    writeln!(out, "service {} {{", service.name)?;
    for option in &service.options {
        writeln!(out, "{}option {};", INDENT, option_text(option, INDENT)?)?;
    }
    for method in service.methods.values() {
        out.push('\n');
        write_method(out, method)?;
    }
    out.push_str("}\n\n");
    Ok(())
}

fn write_method(out: &mut String, method: &GrpcMethod) -> fmt::Result {
    write_comment(out, &method.description, INDENT)?;
    write!(
        out,
        "{}rpc {}({}) returns ({})",
        INDENT, method.name, method.input, method.output
    )?;
    if method.options.is_empty() {
        out.push_str(";\n");
        return Ok(());
    }
    out.push_str(" {\n");
    let inner = format!("{}{}", INDENT, INDENT);
    for option in &method.options {
        writeln!(out, "{}option {};", inner, option_text(option, &inner)?)?;
    }
    writeln!(out, "{}}}", INDENT)
}

/// `name = value`, with the name in parentheses for custom options. Brace bodies go on their own
/// lines, indented one level deeper than indent.
fn option_text(option: &ProtoOption, indent: &str) -> Result<String, fmt::Error> {
    let name = if option.is_custom() {
        format!("({})", option.name)
    } else {
        option.name.clone()
    };
    match &option.body {
        OptionBody::Scalar(value) => Ok(format!("{} = {}", name, value_text(value))),
        OptionBody::Fields(fields) => {
            let mut text = format!("{} = {{\n", name);
            for (key, value) in fields {
                writeln!(text, "{}{}{}: {}", indent, INDENT, key, value_text(value))?;
            }
            text.push_str(indent);
            text.push('}');
            Ok(text)
        }
    }
}

fn value_text(value: &OptionValue) -> String {
    match value {
        OptionValue::String(s) => format!("\"{}\"", escape(s)),
        OptionValue::Bool(b) => b.to_string(),
        OptionValue::Int(i) => i.to_string(),
        OptionValue::Literal(l) => l.clone(),
    }
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
