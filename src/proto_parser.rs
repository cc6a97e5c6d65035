//! Reads back the proto3 files this crate writes. It knows the subset of the language those files
//! use, not the whole grammar.
use std::collections::BTreeSet;

use logos::{Lexer, Logos};

use crate::error::ConversionError;
use crate::proto_file::ProtoFile;
use crate::proto_message::{Field, Message, Primitive, TypeRef};
use crate::proto_service::{GrpcMethod, GrpcService, OptionValue, ProtoOption};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum Token {
    #[token("{")]
    Open,

    #[token("}")]
    Close,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("<")]
    AngleOpen,

    #[token(">")]
    AngleClose,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Equals,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    Str(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*", |lex| lex.slice().to_owned())]
    Ident(String),
}

fn unescape(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next()? {
            'n' => result.push('\n'),
            't' => result.push('\t'),
            other => result.push(other),
        }
    }
    Some(result)
}

/// Parses proto3 text into a [`ProtoFile`]. Types are resolved after the whole file is read, a
/// field may use a message declared further down.
pub fn parse_proto(source: &str) -> Result<ProtoFile, ConversionError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        position: 0,
        proto_file: ProtoFile::default(),
    };
    parser.parse_file()?;
    let mut proto_file = parser.proto_file;
    resolve_types(&mut proto_file)?;
    Ok(proto_file)
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ConversionError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted = 0;
    while let Some(token) = lexer.next() {
        let start = lexer.span().start;
        line += source[counted..start].matches('\n').count();
        counted = start;
        match token {
            Ok(token) => tokens.push((token, line)),
            Err(()) => {
                return Err(ConversionError::parse(&format!(
                    "unexpected '{}' on line {}",
                    lexer.slice(),
                    line
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    position: usize,
    proto_file: ProtoFile,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.position.min(self.tokens.len().saturating_sub(1)))
            .map_or(0, |(_, line)| *line)
    }

    fn error(&self, message: &str) -> ConversionError {
        ConversionError::parse(&format!("{} on line {}", message, self.line()))
    }

    fn next(&mut self) -> Result<Token, ConversionError> {
        match self.tokens.get(self.position) {
            Some((token, _)) => {
                self.position += 1;
                Ok(token.clone())
            }
            None => Err(self.error("unexpected end of file")),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ConversionError> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            self.position -= 1;
            Err(self.error(&format!("expected {:?} but found {:?}", expected, token)))
        }
    }

    fn ident(&mut self) -> Result<String, ConversionError> {
        match self.next()? {
            Token::Ident(ident) => Ok(ident),
            token => {
                self.position -= 1;
                Err(self.error(&format!("expected an identifier but found {:?}", token)))
            }
        }
    }

    fn int(&mut self) -> Result<i64, ConversionError> {
        match self.next()? {
            Token::Int(i) => Ok(i),
            token => {
                self.position -= 1;
                Err(self.error(&format!("expected a number but found {:?}", token)))
            }
        }
    }

    /// Adjacent string literals are one string.
    fn string(&mut self) -> Result<String, ConversionError> {
        let mut result = match self.next()? {
            Token::Str(s) => s,
            token => {
                self.position -= 1;
                return Err(self.error(&format!("expected a string but found {:?}", token)));
            }
        };
        while let Some(Token::Str(s)) = self.peek() {
            result.push_str(s);
            self.position += 1;
        }
        Ok(result)
    }

    fn skip_statement(&mut self) -> Result<(), ConversionError> {
        while self.next()? != Token::Semicolon {}
        Ok(())
    }

    fn parse_file(&mut self) -> Result<(), ConversionError> {
        while self.peek().is_some() {
            let keyword = self.ident()?;
            match keyword.as_str() {
                "syntax" => {
                    self.expect(Token::Equals)?;
                    let syntax = self.string()?;
                    if syntax != "proto3" {
                        return Err(self.error(&format!("syntax {} is not supported", syntax)));
                    }
                    self.expect(Token::Semicolon)?;
                }
                "package" => {
                    self.proto_file.package = self.ident()?;
                    self.expect(Token::Semicolon)?;
                }
                "import" => self.skip_statement()?,
                "option" => {
                    let option = self.option()?;
                    self.expect(Token::Semicolon)?;
                    self.proto_file.resource_options.push(option);
                }
                "message" => {
                    let message = self.message()?;
                    self.proto_file.messages.insert(message.name.clone(), message);
                }
                "enum" => {
                    return Err(self.error("top level enums are not supported"));
                }
                "service" => {
                    let service = self.service()?;
                    self.proto_file.services.insert(service.name.clone(), service);
                }
                other => return Err(self.error(&format!("unexpected '{}'", other))),
            }
        }
        Ok(())
    }

    fn option_name(&mut self) -> Result<String, ConversionError> {
        if self.peek() == Some(&Token::ParenOpen) {
            self.position += 1;
            let name = self.ident()?;
            self.expect(Token::ParenClose)?;
            Ok(name)
        } else {
            self.ident()
        }
    }

    fn option_value(&mut self) -> Result<OptionValue, ConversionError> {
        match self.peek() {
            Some(Token::Str(_)) => Ok(OptionValue::String(self.string()?)),
            Some(Token::Int(_)) => Ok(OptionValue::Int(self.int()?)),
            Some(Token::Ident(_)) => {
                let ident = self.ident()?;
                Ok(match ident.as_str() {
                    "true" => OptionValue::Bool(true),
                    "false" => OptionValue::Bool(false),
                    _ => OptionValue::Literal(ident),
                })
            }
            other => {
                let message = format!("expected an option value but found {:?}", other);
                Err(self.error(&message))
            }
        }
    }

    /// `name = value` or `name = { key: value ... }`.
    fn option(&mut self) -> Result<ProtoOption, ConversionError> {
        let name = self.option_name()?;
        self.expect(Token::Equals)?;
        if self.peek() != Some(&Token::Open) {
            return Ok(ProtoOption::scalar(&name, self.option_value()?));
        }
        self.position += 1;
        let mut fields = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Close) => {
                    self.position += 1;
                    break;
                }
                Some(Token::Comma) | Some(Token::Semicolon) => self.position += 1,
                _ => {
                    let key = self.ident()?;
                    self.expect(Token::Colon)?;
                    fields.push((key, self.option_value()?));
                }
            }
        }
        Ok(ProtoOption::fields(&name, fields))
    }

    /// Options between brackets after a field or enum value.
    fn field_options(&mut self) -> Result<Vec<ProtoOption>, ConversionError> {
        let mut options = Vec::new();
        if self.peek() != Some(&Token::BracketOpen) {
            return Ok(options);
        }
        self.position += 1;
        loop {
            options.push(self.option()?);
            match self.next()? {
                Token::Comma => continue,
                Token::BracketClose => break,
                token => {
                    self.position -= 1;
                    return Err(self.error(&format!("unexpected {:?} in field options", token)));
                }
            }
        }
        Ok(options)
    }

    fn message(&mut self) -> Result<Message, ConversionError> {
        let name = self.ident()?;
        let mut message = Message::new(&name, false, "");
        self.expect(Token::Open)?;
        loop {
            let first = match self.next()? {
                Token::Close => break,
                Token::Semicolon => continue,
                Token::Ident(ident) => ident,
                token => {
                    self.position -= 1;
                    return Err(self.error(&format!("unexpected {:?} in message {}", token, name)));
                }
            };
            match first.as_str() {
                "enum" => {
                    let enum_message = self.enum_message()?;
                    message.add_enum(enum_message);
                }
                "message" => {
                    return Err(self.error(&format!("nested message in {} is not supported", name)))
                }
                "option" | "reserved" => self.skip_statement()?,
                _ => {
                    let field = self.field(first)?;
                    if !message.add_field(field) {
                        return Err(self.error(&format!("duplicate field in message {}", name)));
                    }
                }
            }
        }
        Ok(message)
    }

    /// A field, starting after its first word. The type is kept as a reference until resolution.
    fn field(&mut self, first: String) -> Result<Field, ConversionError> {
        let mut label = None;
        let mut type_name = first;
        if matches!(type_name.as_str(), "optional" | "repeated")
            && matches!(self.peek(), Some(Token::Ident(_)))
        {
            label = Some(type_name);
            type_name = self.ident()?;
        }
        let mut key_type = None;
        if type_name == "map" && self.peek() == Some(&Token::AngleOpen) {
            self.position += 1;
            key_type = Some(TypeRef::Reference(self.ident()?));
            self.expect(Token::Comma)?;
            type_name = self.ident()?;
            self.expect(Token::AngleClose)?;
        }
        let name = self.ident()?;
        self.expect(Token::Equals)?;
        self.int()?;
        let options = self.field_options()?;
        self.expect(Token::Semicolon)?;
        let mut field = Field::new(&name, TypeRef::Reference(type_name));
        field.repeated = key_type.is_some() || label.as_deref() == Some("repeated");
        field.optional = label.as_deref() == Some("optional");
        field.key_type = key_type;
        field.options = options;
        Ok(field)
    }

    fn enum_message(&mut self) -> Result<Message, ConversionError> {
        let name = self.ident()?;
        let mut enum_message = Message::new(&name, true, "");
        self.expect(Token::Open)?;
        loop {
            let value_name = match self.next()? {
                Token::Close => break,
                Token::Semicolon => continue,
                Token::Ident(ident) => ident,
                token => {
                    self.position -= 1;
                    return Err(self.error(&format!("unexpected {:?} in enum {}", token, name)));
                }
            };
            if value_name == "option" || value_name == "reserved" {
                self.skip_statement()?;
                continue;
            }
            self.expect(Token::Equals)?;
            let number = self.int()?;
            let options = self.field_options()?;
            self.expect(Token::Semicolon)?;
            let mut value = Field::new(&value_name, TypeRef::Primitive(Primitive::Unformatted));
            value.first_in_order = number == 0;
            value.options = options;
            enum_message.add_field(value);
        }
        Ok(enum_message)
    }

    fn service(&mut self) -> Result<GrpcService, ConversionError> {
        let name = self.ident()?;
        let mut service = GrpcService::new(&name, "");
        self.expect(Token::Open)?;
        loop {
            let keyword = match self.next()? {
                Token::Close => break,
                Token::Semicolon => continue,
                Token::Ident(ident) => ident,
                token => {
                    self.position -= 1;
                    return Err(self.error(&format!("unexpected {:?} in service {}", token, name)));
                }
            };
            match keyword.as_str() {
                "option" => {
                    let option = self.option()?;
                    self.expect(Token::Semicolon)?;
                    service.options.push(option);
                }
                "rpc" => {
                    let method = self.rpc()?;
                    service.methods.insert(method.name.clone(), method);
                }
                other => return Err(self.error(&format!("unexpected '{}' in service {}", other, name))),
            }
        }
        Ok(service)
    }

    fn rpc(&mut self) -> Result<GrpcMethod, ConversionError> {
        let name = self.ident()?;
        self.expect(Token::ParenOpen)?;
        let input = self.ident()?;
        self.expect(Token::ParenClose)?;
        if self.ident()? != "returns" {
            self.position -= 1;
            return Err(self.error(&format!("expected returns in rpc {}", name)));
        }
        self.expect(Token::ParenOpen)?;
        let output = self.ident()?;
        self.expect(Token::ParenClose)?;
        if input == "stream" || output == "stream" {
            return Err(self.error(&format!("streaming rpc {} is not supported", name)));
        }
        let mut method = GrpcMethod::new(&name, &input, &output, "");
        match self.next()? {
            Token::Semicolon => return Ok(method),
            Token::Open => (),
            token => {
                self.position -= 1;
                return Err(self.error(&format!("unexpected {:?} after rpc {}", token, name)));
            }
        }
        loop {
            match self.next()? {
                Token::Close => break,
                Token::Semicolon => continue,
                Token::Ident(ident) if ident == "option" => {
                    let option = self.option()?;
                    self.expect(Token::Semicolon)?;
                    method.options.push(option);
                }
                token => {
                    self.position -= 1;
                    return Err(self.error(&format!("unexpected {:?} in rpc {}", token, name)));
                }
            }
        }
        Ok(method)
    }
}

/// Turns the type names read into primitives, nested enums or top level messages.
fn resolve_types(proto_file: &mut ProtoFile) -> Result<(), ConversionError> {
    let package_prefix = format!("{}.", proto_file.package);
    let message_names: BTreeSet<String> = proto_file.messages.keys().cloned().collect();
    for message in proto_file.messages.values_mut() {
        let enum_names: Vec<String> = message.enums().keys().cloned().collect();
        let owner = message.name.clone();
        let mut failure = None;
        message.update_fields(|field| {
            for type_ref in std::iter::once(&mut field.value_type).chain(field.key_type.as_mut()) {
                let name = match type_ref {
                    TypeRef::Reference(name) => name.clone(),
                    _ => continue,
                };
                let local = name.strip_prefix(&package_prefix).unwrap_or(&name);
                let nested = local
                    .strip_prefix(&owner)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .unwrap_or(local);
                *type_ref = match Primitive::lookup(&name) {
                    Some(primitive) if primitive != Primitive::Unformatted => {
                        TypeRef::Primitive(primitive)
                    }
                    _ if enum_names.iter().any(|e| e == nested) => TypeRef::Enum(nested.to_owned()),
                    _ if message_names.contains(local) => TypeRef::Message(local.to_owned()),
                    _ => {
                        failure.get_or_insert_with(|| {
                            format!("field {}.{} has unknown type {}", owner, field.name, name)
                        });
                        continue;
                    }
                };
            }
        });
        if let Some(failure) = failure {
            return Err(ConversionError::parse(&failure));
        }
    }
    for service in proto_file.services.values_mut() {
        for method in service.methods.values_mut() {
            for type_name in [&mut method.input, &mut method.output] {
                if let Some(local) = type_name.strip_prefix(&package_prefix) {
                    *type_name = local.to_owned();
                }
                if !message_names.contains(type_name.as_str()) {
                    return Err(ConversionError::parse(&format!(
                        "rpc {}.{} uses unknown message {}",
                        service.name, method.name, type_name
                    )));
                }
            }
        }
    }
    Ok(())
}
