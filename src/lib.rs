//! `schema_engine` describes the expected shape of parsed device output, and
//! checks parsed values against that description.
//!
//! Parsers for CLI commands and REST resources build nested values out of
//! mappings, sequences and scalars. Each parser also declares a schema: which
//! keys a mapping must have, which it may have, what every other key must look
//! like, and which scalar type every leaf holds. This crate validates the
//! former against the latter, and reports *every* mismatch it finds, each
//! located by its path from the root of the value.
//!
//! # Validating data
//!
//! ```
//! use serde_json::json;
//! use schema_engine::{Schema, SerdeSchema, PathError, Validator};
//! use failure::Error;
//!
//! fn main() -> Result<(), Error> {
//!     // Every interface has an MTU and counters, and may have IPv4
//!     // addresses, keyed by address.
//!     let schema_data = r#"
//!         {
//!             "values": {
//!                 "properties": {
//!                     "mtu": { "type": "int" },
//!                     "counters": {
//!                         "properties": { "rx_pkts": { "type": "int" } }
//!                     }
//!                 },
//!                 "optionalProperties": {
//!                     "ipv4": {
//!                         "values": {
//!                             "properties": { "netmask": { "type": "string" } }
//!                         }
//!                     }
//!                 }
//!             }
//!         }
//!     "#;
//!
//!     // The SerdeSchema type is a serde-friendly format for representing
//!     // schemas. The Schema type checks that the schema is unambiguous.
//!     let schema: SerdeSchema = serde_json::from_str(schema_data)?;
//!     let schema = Schema::from_serde(schema)?;
//!
//!     let validator = Validator::new();
//!     let input_ok = json!({
//!         "eth0": {
//!             "mtu": 1500,
//!             "counters": { "rx_pkts": 66766 },
//!             "ipv4": { "192.168.100.51": { "netmask": "255.255.255.0" } }
//!         },
//!         "lo": { "mtu": 65536, "counters": { "rx_pkts": 12 } }
//!     });
//!
//!     assert!(validator.validate(&schema, &input_ok)?.is_ok());
//!
//!     let input_bad = json!({
//!         "eth0": {
//!             "mtu": "1500",
//!             "ipv4": { "192.168.100.51": { "netmask": "255.255.255.0", "scope": 1 } }
//!         }
//!     });
//!
//!     // Errors come out in a fixed order, so there is no need to sort them.
//!     let result = validator.validate(&schema, &input_bad)?;
//!     let errors: Vec<String> = result.errors().iter().map(|e| e.to_string()).collect();
//!     assert_eq!(errors, vec![
//!         "type mismatch at `eth0.mtu`: expected int, found string",
//!         r#"missing required key "counters" at `eth0`"#,
//!         r#"unexpected key "scope" at `eth0.ipv4["192.168.100.51"]`"#,
//!     ]);
//!
//!     match &result.errors()[0] {
//!         PathError::TypeMismatch { path, .. } => {
//!             assert_eq!(path.to_pointer().to_string(), "/eth0/mtu");
//!         }
//!         _ => unreachable!(),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Building schemas in code
//!
//! Schemas can also be built directly, which is convenient for parsers that
//! declare their schema next to their parsing code:
//!
//! ```
//! use schema_engine::{validate, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::mapping()
//!     .required("mtu", Schema::int())
//!     .optional("mac", Schema::string())
//!     .build()
//!     .unwrap();
//!
//! assert!(validate(&schema, &json!({ "mtu": 1500 })).is_ok());
//! assert!(!validate(&schema, &json!({ "mtu": "bad" })).is_ok());
//! ```
//!
//! Ambiguous schemas, such as a mapping declaring the same key as both
//! required and optional, are rejected when they are built, never during
//! validation.

mod vm;

pub mod errors;
pub mod parser;
pub mod resolve;
pub mod schema;
pub mod serde;
pub mod validator;
pub mod value;

pub use crate::errors::SchemaError;
pub use crate::parser::Parser;
pub use crate::schema::{Form, KeyMatcher, KeySpec, Mapping, MappingBuilder, Schema, Type};
pub use crate::serde::SerdeSchema;
pub use crate::validator::{
    validate, Config, Path, PathError, PathSegment, Shape, ValidationFailure, ValidationResult,
    Validator,
};
pub use crate::value::ValueKind;
