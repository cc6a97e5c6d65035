//! Brings what an earlier generated file had back into a fresh conversion, so regenerating does
//! not drop fields or signatures clients already depend on.
use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::proto_file::ProtoFile;
use crate::proto_message::{Field, Message, TypeRef};
use crate::proto_service::{GrpcMethod, ProtoOption, METHOD_SIGNATURE_OPTION};

/// Merges old into new. Old fields missing in new are copied when their types still exist, fields
/// that had more options or another optionality get their old shape back, old method signatures
/// go first. Everything new stays.
pub fn merge(new: &mut ProtoFile, old: &ProtoFile) {
    let message_names: BTreeSet<String> = new.messages.keys().cloned().collect();
    let mut restored = 0;
    for old_message in old.messages.values() {
        match new.messages.get_mut(&old_message.name) {
            Some(new_message) => restored += merge_message(new_message, old_message, &message_names),
            None => debug!("message {} is not generated anymore", old_message.name),
        }
    }
    for old_service in old.services.values() {
        let new_service = match new.services.get_mut(&old_service.name) {
            Some(service) => service,
            None => continue,
        };
        for old_method in old_service.methods.values() {
            if let Some(new_method) = new_service.methods.get_mut(&old_method.name) {
                merge_signatures(new_method, old_method);
            }
        }
    }
    info!("merged previous proto into {}, restored {} fields", new.package, restored);
}

fn merge_message(new: &mut Message, old: &Message, message_names: &BTreeSet<String>) -> usize {
    let mut restored = 0;
    for old_enum in old.enums().values() {
        if let Some(new_enum) = new.enums_mut().get_mut(&old_enum.name) {
            restored += merge_message(new_enum, old_enum, message_names);
        }
    }
    for old_field in old.fields() {
        let existing = new
            .field(&old_field.name)
            .map(|f| (f.options.len(), f.optional, f.description.clone()));
        match existing {
            None => match remap(old_field, new, message_names) {
                Some(field) => {
                    new.add_field(field);
                    restored += 1;
                }
                None => debug!(
                    "dropping old field {}.{}, its type is gone",
                    old.name, old_field.name
                ),
            },
            Some((options, optional, description))
                if old_field.options.len() > options || old_field.optional != optional =>
            {
                if let Some(mut field) = remap(old_field, new, message_names) {
                    field.description = description;
                    new.put_field(field);
                    restored += 1;
                }
            }
            Some(_) => (),
        }
    }
    restored
}

/// The old field with its types pointing into the new model, none when a type doesn't exist there.
fn remap(old_field: &Field, owner: &Message, message_names: &BTreeSet<String>) -> Option<Field> {
    let mut field = old_field.clone();
    field.value_type = remap_type(&old_field.value_type, owner, message_names)?;
    field.key_type = match &old_field.key_type {
        Some(key_type) => Some(remap_type(key_type, owner, message_names)?),
        None => None,
    };
    Some(field)
}

fn remap_type(type_ref: &TypeRef, owner: &Message, message_names: &BTreeSet<String>) -> Option<TypeRef> {
    match type_ref {
        TypeRef::Primitive(p) => Some(TypeRef::Primitive(*p)),
        TypeRef::Message(name) | TypeRef::Reference(name) => message_names
            .contains(name)
            .then(|| TypeRef::Message(name.clone())),
        TypeRef::Enum(name) => owner
            .enums()
            .contains_key(name)
            .then(|| TypeRef::Enum(name.clone())),
    }
}

/// Old signatures first, then the new ones the old method didn't have.
fn merge_signatures(new: &mut GrpcMethod, old: &GrpcMethod) {
    let mut signatures: Vec<ProtoOption> = old.options_named(METHOD_SIGNATURE_OPTION).cloned().collect();
    if signatures.is_empty() {
        return;
    }
    for signature in new.options_named(METHOD_SIGNATURE_OPTION) {
        if !signatures.contains(signature) {
            signatures.push(signature.clone());
        }
    }
    let position = new
        .options
        .iter()
        .position(|o| o.name == METHOD_SIGNATURE_OPTION)
        .unwrap_or(new.options.len());
    new.options.retain(|o| o.name != METHOD_SIGNATURE_OPTION);
    let tail = new.options.split_off(position);
    new.options.extend(signatures);
    new.options.extend(tail);
}
