//! Messages and fields of the proto model, and the numbering of fields.
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::proto_service::ProtoOption;

/// Field numbers are derived from a 29 bit hash of the field name.
const FIELD_NUMBER_MASK: u32 = 0x1FFF_FFFF;
/// Numbers protobuf keeps for itself.
const RESERVED_FIELD_NUMBERS: RangeInclusive<u32> = 19000..=19999;
const REMAP_OFFSET: u32 = 20000;
const REMAP_FACTOR: u32 = 536314;

/// The scalar and well known types, shared by every message using them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    /// Value type of enum members, they have no type of their own.
    Unformatted,
    Bool,
    String,
    Bytes,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
    Any,
    Struct,
    Value,
    ListValue,
}

/// Every primitive, in the order they are looked up.
pub static PRIMITIVES: [Primitive; 14] = [
    Primitive::Unformatted,
    Primitive::Bool,
    Primitive::String,
    Primitive::Bytes,
    Primitive::Int32,
    Primitive::Int64,
    Primitive::Uint32,
    Primitive::Uint64,
    Primitive::Float,
    Primitive::Double,
    Primitive::Any,
    Primitive::Struct,
    Primitive::Value,
    Primitive::ListValue,
];

impl Primitive {
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Unformatted => "",
            Primitive::Bool => "bool",
            Primitive::String => "string",
            Primitive::Bytes => "bytes",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Any => "google.protobuf.Any",
            Primitive::Struct => "google.protobuf.Struct",
            Primitive::Value => "google.protobuf.Value",
            Primitive::ListValue => "google.protobuf.ListValue",
        }
    }

    pub fn lookup(name: &str) -> Option<Primitive> {
        PRIMITIVES.iter().find(|p| p.name() == name).copied()
    }

    /// The well known type for a format like `google.protobuf.Struct` or just `Struct`.
    pub fn well_known(format: &str) -> Option<Primitive> {
        let short = format.strip_prefix("google.protobuf.").unwrap_or(format);
        match short {
            "Any" => Some(Primitive::Any),
            "Struct" => Some(Primitive::Struct),
            "Value" => Some(Primitive::Value),
            "ListValue" => Some(Primitive::ListValue),
            _ => None,
        }
    }

    pub fn is_well_known(&self) -> bool {
        matches!(
            self,
            Primitive::Any | Primitive::Struct | Primitive::Value | Primitive::ListValue
        )
    }
}

/// The type of a field. References are only there while building, after resolution a field
/// points to a top level message or to an enum nested in its own message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    Primitive(Primitive),
    Reference(String),
    Message(String),
    Enum(String),
}

impl TypeRef {
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Primitive(p) => p.name(),
            TypeRef::Reference(n) | TypeRef::Message(n) | TypeRef::Enum(n) => n,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Reference(_))
    }
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub value_type: TypeRef,
    pub repeated: bool,
    pub optional: bool,
    /// Set for map fields.
    pub key_type: Option<TypeRef>,
    pub options: Vec<ProtoOption>,
    pub description: String,
    /// The zero value of an enum.
    pub first_in_order: bool,
}

impl Field {
    pub fn new(name: &str, value_type: TypeRef) -> Field {
        Field {
            name: name.to_owned(),
            value_type,
            repeated: false,
            optional: false,
            key_type: None,
            options: Vec::new(),
            description: String::new(),
            first_in_order: false,
        }
    }

    pub fn is_map(&self) -> bool {
        self.key_type.is_some()
    }

    fn order_key(&self) -> (bool, &str) {
        (!self.first_in_order, &self.name)
    }
}

/// Documentation is left out, two fields are the same when they look the same on the wire.
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.value_type == other.value_type
            && self.repeated == other.repeated
            && self.optional == other.optional
            && self.key_type == other.key_type
            && self.options == other.options
            && self.first_in_order == other.first_in_order
    }
}

#[derive(Clone, Debug)]
pub struct Message {
    pub name: String,
    pub is_enum: bool,
    pub description: String,
    fields: Vec<Field>,
    enums: BTreeMap<String, Message>,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.is_enum == other.is_enum
            && self.fields == other.fields
            && self.enums == other.enums
    }
}

impl Message {
    pub fn new(name: &str, is_enum: bool, description: &str) -> Message {
        Message {
            name: name.to_owned(),
            is_enum,
            description: description.to_owned(),
            fields: Vec::new(),
            enums: BTreeMap::new(),
        }
    }

    /// Fields in order, the zero value of an enum first, then by name.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Adds the field unless one with the same name is already there.
    pub fn add_field(&mut self, field: Field) -> bool {
        if self.field(&field.name).is_some() {
            return false;
        }
        self.fields.push(field);
        self.sort_fields();
        true
    }

    /// Adds the field, replacing the one with the same name.
    pub fn put_field(&mut self, field: Field) {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self.sort_fields();
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index))
    }

    /// Changes fields in place, order is restored afterwards.
    pub fn update_fields<F: FnMut(&mut Field)>(&mut self, f: F) {
        self.fields.iter_mut().for_each(f);
        self.sort_fields();
    }

    pub fn retain_fields<F: FnMut(&Field) -> bool>(&mut self, f: F) {
        self.fields.retain(f);
    }

    fn sort_fields(&mut self) {
        self.fields.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
    }

    pub fn enums(&self) -> &BTreeMap<String, Message> {
        &self.enums
    }

    pub fn enums_mut(&mut self) -> &mut BTreeMap<String, Message> {
        &mut self.enums
    }

    pub fn add_enum(&mut self, enum_message: Message) {
        self.enums.insert(enum_message.name.clone(), enum_message);
    }

    pub fn remove_enum(&mut self, name: &str) -> Option<Message> {
        self.enums.remove(name)
    }

    /// Numbers the fields. The zero value of an enum gets 0, every other field a number derived
    /// from the hash of its name, moving up on collision. Numbers only change when names do.
    pub fn get_fields_with_numbers(&self) -> BTreeMap<u32, &Field> {
        let mut numbered = BTreeMap::new();
        for (i, field) in self.fields.iter().enumerate() {
            if self.is_enum && i == 0 {
                numbered.insert(0, field);
                continue;
            }
            let mut number = normalize_field_number(java_string_hash(&field.name) as u32);
            while numbered.contains_key(&number) {
                number = normalize_field_number(number + 1);
            }
            numbered.insert(number, field);
        }
        numbered
    }

    /// Field numbers by field name.
    pub fn field_numbers(&self) -> BTreeMap<&str, u32> {
        self.get_fields_with_numbers()
            .into_iter()
            .map(|(number, field)| (field.name.as_str(), number))
            .collect()
    }
}

/// Same hash as `String.hashCode()` in java, computed over utf-16 units.
fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

fn normalize_field_number(number: u32) -> u32 {
    let number = number & FIELD_NUMBER_MASK;
    if number == 0 || RESERVED_FIELD_NUMBERS.contains(&number) {
        REMAP_OFFSET + ((number % 19000) + 1) * REMAP_FACTOR
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use crate::proto_message::{
        java_string_hash, normalize_field_number, Field, Message, Primitive, TypeRef,
    };

    fn string_field(name: &str) -> Field {
        Field::new(name, TypeRef::Primitive(Primitive::String))
    }

    #[test]
    fn hash_is_java_compatible() {
        assert_eq!(java_string_hash(""), 0);
        assert_eq!(java_string_hash("a"), 97);
        assert_eq!(java_string_hash("name"), 3373707);
        assert_eq!(java_string_hash("status"), -892481550);
    }

    #[test]
    fn known_field_numbers() {
        let mut message = Message::new("Operation", false, "");
        message.add_field(string_field("creation_timestamp"));
        message.add_field(string_field("status"));
        let numbers = message.field_numbers();
        assert_eq!(numbers["creation_timestamp"], 30525366);
        assert_eq!(numbers["status"], 181260274);
    }

    #[test]
    fn numbers_avoid_zero_and_reserved() {
        assert_eq!(normalize_field_number(0), 20000 + 536314);
        assert_eq!(normalize_field_number(19000), 20000 + 536314);
        assert_eq!(normalize_field_number(19999), 20000 + 1000 * 536314);
        assert_eq!(normalize_field_number(18999), 18999);
        assert_eq!(normalize_field_number(0x2000_0000), 20000 + 536314);
        assert_eq!(normalize_field_number(0x2000_0005), 5);
    }

    #[test]
    fn numbers_are_stable_on_rename_of_other_field() {
        let mut message = Message::new("Instance", false, "");
        message.add_field(string_field("name"));
        message.add_field(string_field("zone"));
        let before = message.field_numbers()["name"];
        message.remove_field("zone");
        message.add_field(string_field("region"));
        assert_eq!(message.field_numbers()["name"], before);
        assert_eq!(before, 3373707);
    }

    #[test]
    fn enum_zero_value_goes_first() {
        let mut message = Message::new("Status", true, "");
        message.add_field(string_field("DONE"));
        let mut undefined = string_field("UNDEFINED_STATUS");
        undefined.first_in_order = true;
        message.add_field(undefined);
        message.add_field(string_field("ABORTED"));
        assert_eq!(message.fields()[0].name, "UNDEFINED_STATUS");
        let numbers = message.get_fields_with_numbers();
        assert_eq!(numbers[&0].name, "UNDEFINED_STATUS");
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn colliding_numbers_move_to_the_next_free_one() {
        // "Aa" and "BB" share a java hash.
        assert_eq!(java_string_hash("Aa"), java_string_hash("BB"));
        let mut message = Message::new("Collide", false, "");
        message.add_field(string_field("BB"));
        message.add_field(string_field("Aa"));
        let numbers = message.field_numbers();
        assert_eq!(numbers["Aa"], 2112);
        assert_eq!(numbers["BB"], 2113);
    }

    #[test]
    fn add_and_put_fields() {
        let mut message = Message::new("M", false, "");
        assert!(message.add_field(string_field("b")));
        assert!(message.add_field(string_field("a")));
        assert!(!message.add_field(string_field("a")));
        let mut repeated = string_field("b");
        repeated.repeated = true;
        message.put_field(repeated);
        assert_eq!(
            message.fields().iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(message.field("b").unwrap().repeated);
    }

    #[test]
    fn equality_ignores_descriptions() {
        let mut a = Message::new("M", false, "first");
        let mut b = Message::new("M", false, "second");
        let mut field = string_field("x");
        field.description = String::from("doc");
        a.add_field(field);
        b.add_field(string_field("x"));
        assert_eq!(a, b);
    }

    #[test]
    fn primitive_registry() {
        assert_eq!(Primitive::lookup("int64"), Some(Primitive::Int64));
        assert_eq!(
            Primitive::lookup("google.protobuf.Struct"),
            Some(Primitive::Struct)
        );
        assert_eq!(Primitive::lookup("Instance"), None);
        assert_eq!(Primitive::well_known("Value"), Some(Primitive::Value));
        assert_eq!(Primitive::well_known("int32"), None);
    }
}
