//! Recursive-descent parser for the schema DSL.

use super::tokenizer::Tokenizer;
use crate::error::{ErrorKind, ValidationError};
use crate::schema::{Item, Kind};

/// Parse one item: an optional name, a type expression, then an optional
/// tag list or struct body, closed by `;`.
pub(crate) fn parse_item(tokens: &mut Tokenizer) -> Result<Item, ValidationError> {
    let mut item = Item::default();
    parse_type(tokens, &mut item)?;

    match tokens.peek(0) {
        ";" => {
            tokens.next();
            Ok(item)
        }
        ":" => {
            tokens.next();
            let tag = collect_tag(tokens);
            item.parse_tag(&tag)?;
            Ok(item)
        }
        "{" => {
            tokens.next();
            parse_struct_body(tokens, &mut item)?;
            if tokens.peek(0) == ";" {
                tokens.next();
            }
            Ok(item)
        }
        "" => Ok(item),
        other => {
            let other = other.to_string();
            tokens.next();
            Err(ErrorKind::SyntaxError
                .err()
                .with_context(tokens.pos())
                .with_value(other)
                .with_expected(&[";", ":", "{"]))
        }
    }
}

/// Parse the `[ name ] type-expr` prefix of an item, with `*` marking a
/// pointer wrapper and `[]` an array wrapper.
fn parse_type(tokens: &mut Tokenizer, item: &mut Item) -> Result<(), ValidationError> {
    let mut pointer = false;
    let mut array = false;
    let mut token = tokens.next();

    if token == "*" {
        pointer = true;
        token = tokens.next();
    }

    if token == "[" && tokens.peek(0) == "]" {
        array = true;
        tokens.next();
        token = tokens.next();
    }

    if token == "{" {
        item.kind = Kind::Struct;
        tokens.push_back();
        return Ok(());
    }

    // A token that is not a reserved type word is the item name; the type
    // must follow it.
    if Kind::from_name(&token).is_none() {
        item.name = token;
        token = tokens.next();

        if token == ":" || token == ";" {
            return Err(ErrorKind::UnsupportedType
                .err()
                .with_context(tokens.pos())
                .with_value(&item.name));
        }
    }

    if token == "{" {
        item.kind = Kind::Struct;
        tokens.push_back();
        return Ok(());
    }

    match Kind::from_name(&token) {
        Some(kind) if array => {
            item.kind = Kind::Array;
            item.base = Some(Box::new(Item::new(kind)));
        }
        Some(kind) if pointer => {
            item.kind = Kind::Pointer;
            item.base = Some(Box::new(Item::new(kind)));
        }
        Some(kind) => {
            item.kind = kind;
        }
        None => {
            return Err(ErrorKind::UnsupportedType
                .err()
                .with_context(tokens.pos())
                .with_value(token));
        }
    }

    Ok(())
}

/// Parse the fields of a struct body up to the closing brace.
fn parse_struct_body(tokens: &mut Tokenizer, item: &mut Item) -> Result<(), ValidationError> {
    item.kind = Kind::Struct;

    loop {
        match tokens.peek(0) {
            "}" => {
                tokens.next();
                return Ok(());
            }
            "" => {
                return Err(ErrorKind::SyntaxError
                    .err()
                    .with_context(tokens.pos())
                    .with_value("end of input")
                    .with_expected(&["}"]));
            }
            _ => {
                let field = parse_item(tokens)?;
                item.fields.push(field);
            }
        }
    }
}

/// Collect the raw tag text following `:`, up to the statement terminator.
fn collect_tag(tokens: &mut Tokenizer) -> String {
    let mut text = String::new();

    loop {
        let token = tokens.next();
        if token.is_empty() || token == ";" {
            break;
        }
        text.push_str(&token);
        text.push(' ');
    }

    text
}
