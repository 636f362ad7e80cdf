//! The schema DSL compiler: a line-ending normalizer, a tokenizer, and a
//! recursive-descent parser producing an [`Item`] tree.
//!
//! One schema per source. Whitespace and `#`/`//` comments are ignored; a
//! preprocessing pass inserts `;` where a physical line ends a statement,
//! so multi-line struct bodies read naturally:
//!
//! ```
//! let schema = conform::compile(
//!     "person {
//!         age int: required, minvalue=18, maxvalue=65
//!         name string: required, minlength=1, maxlength=101
//!     }",
//! ).unwrap();
//! assert!(schema.validate(r#"{"age": 35, "name": "John"}"#).is_ok());
//! ```

mod parse;
mod tag;
mod tokenizer;

use crate::error::ValidationError;
use crate::schema::Item;
use parse::parse_item;
use tokenizer::Tokenizer;

/// Compile DSL source text into a schema.
pub fn compile(source: &str) -> Result<Item, ValidationError> {
    tracing::trace!(bytes = source.len(), "compiling schema source");

    let normalized = normalize_line_endings(source);
    let mut tokens = Tokenizer::new(&normalized);

    parse_item(&mut tokens)
}

/// Blank out comments and append `;` to every physical line that does not
/// already end a statement or open a block.
fn normalize_line_endings(source: &str) -> String {
    let mut lines = Vec::new();

    for line in source.split('\n') {
        let mut text = line;

        if let Some(start) = comment_start(text) {
            text = &text[..start];
        }

        let text = text.trim_end();
        let mut line = text.to_string();

        if let Some(last) = text.chars().last() {
            if !matches!(last, '{' | ',' | ';') {
                line.push(';');
            }
        }

        lines.push(line);
    }

    lines.join("\n")
}

fn comment_start(line: &str) -> Option<usize> {
    let hash = line.find('#');
    let slashes = line.find("//");

    match (hash, slashes) {
        (Some(h), Some(s)) => Some(h.min(s)),
        (Some(h), None) => Some(h),
        (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}
