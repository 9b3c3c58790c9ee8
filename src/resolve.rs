//! Pairing the keys of an instance mapping with a mapping schema's key specs.
//!
//! Resolution looks at one mapping level only. Nested mappings are resolved
//! independently, when validation descends into them.

use crate::schema::{KeyMatcher, Mapping, Schema};
use serde_json::{Map, Value};

/// The outcome of resolving a single key.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// An instance key claimed by a spec. Its value must satisfy `schema`.
    Paired {
        key: &'a str,
        value: &'a Value,
        schema: &'a Schema,
        matcher: &'a KeyMatcher,
    },

    /// A required key which the instance lacks.
    Missing { key: &'a str },

    /// An instance key which nothing claims, in a closed mapping.
    Unexpected { key: &'a str },
}

/// Resolve the keys of `object` against `mapping`.
///
/// Resolutions come out in a fixed order. First, one entry per declared
/// required or optional key, in declaration order: `Paired` if the instance
/// has the key, `Missing` if it is required and absent, nothing if it is
/// optional and absent. Then, one entry per instance key which no name
/// claimed, in the instance's own order: `Paired` with the wildcard if there
/// is one, otherwise `Unexpected`, or nothing if the mapping is open.
///
/// A key that a required or optional spec names is never routed to the
/// wildcard.
pub fn resolve<'a>(mapping: &'a Mapping, object: &'a Map<String, Value>) -> Vec<Resolution<'a>> {
    let mut out = Vec::with_capacity(mapping.entries().len().max(object.len()));

    for entry in mapping.entries() {
        let name = match entry.matcher().name() {
            Some(name) => name,
            None => continue,
        };

        match object.get_key_value(name) {
            Some((key, value)) => out.push(Resolution::Paired {
                key,
                value,
                schema: entry.schema(),
                matcher: entry.matcher(),
            }),
            None if entry.is_required() => out.push(Resolution::Missing { key: name }),
            None => {}
        }
    }

    let wildcard = mapping
        .entries()
        .iter()
        .find(|entry| *entry.matcher() == KeyMatcher::Wildcard);

    for (key, value) in object {
        if mapping.declares(key) {
            continue;
        }

        match wildcard {
            Some(entry) => out.push(Resolution::Paired {
                key,
                value,
                schema: entry.schema(),
                matcher: entry.matcher(),
            }),
            None if mapping.is_open() => {}
            None => out.push(Resolution::Unexpected { key }),
        }
    }

    out
}
