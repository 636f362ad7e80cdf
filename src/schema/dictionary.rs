//! Process-wide registry of named schemas.
//!
//! The dictionary holds two kinds of entries: user entries registered with
//! [`define_item`] (or the reflection-level `define`), and alias shells
//! keyed with the reserved prefix, used to break recursion in derived
//! schemas. A single mutex guards the map; no operation holds the lock
//! across a recursive call.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::item::Item;
use crate::error::{ErrorKind, ValidationError};

/// Reserved key prefix for reflection alias entries. User names must not
/// start with it.
pub const ALIAS_PREFIX: &str = "_TYPE_ALIAS_";

/// Recursion budget shared by schema derivation and validation descent.
pub const MAX_DEPTH: usize = 10;

static DICTIONARY: Mutex<BTreeMap<String, Item>> = Mutex::new(BTreeMap::new());

/// Look up a schema by exact name, returning an owned copy.
pub(crate) fn find(name: &str) -> Option<Item> {
    DICTIONARY.lock().get(name).cloned()
}

/// Insert or replace an entry. Used internally for alias shells; user
/// registrations go through [`define_item`].
pub(crate) fn store(name: &str, item: Item) {
    tracing::trace!(name, "storing schema in dictionary");
    DICTIONARY.lock().insert(name.to_string(), item);
}

/// Register an already-built schema under a user-visible name.
///
/// The name must be non-empty, must not carry the reserved alias prefix,
/// and must not already be registered. The check and the insert happen
/// under one lock acquisition, so concurrent calls with the same name
/// admit exactly one winner.
pub fn define_item(name: &str, item: Item) -> Result<(), ValidationError> {
    if name.is_empty() || name.starts_with(ALIAS_PREFIX) {
        return Err(ErrorKind::InvalidName.err().with_value(name));
    }

    let mut dictionary = DICTIONARY.lock();
    if dictionary.contains_key(name) {
        return Err(ErrorKind::NameAlreadyExists.err().with_value(name));
    }

    tracing::debug!(name, "defining named schema");
    dictionary.insert(name.to_string(), item);

    Ok(())
}
