//! The schema model: recursive [`Item`] nodes tagged with a [`Kind`], plus
//! the process-wide dictionary of named schemas and the canonical JSON
//! round-trip.

pub mod dictionary;
mod item;
mod json;
mod kind;

pub use dictionary::{define_item, ALIAS_PREFIX, MAX_DEPTH};
pub use item::Item;
pub use kind::Kind;
