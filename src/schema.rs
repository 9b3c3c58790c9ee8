//! Schema descriptor representations.
//!
//! A [`Schema`](struct.Schema.html) describes the expected shape of a parsed
//! value: which scalar type a leaf must have, what every element of a
//! sequence must look like, and which keys a mapping must, may, or may not
//! contain.
//!
//! Schemas are built either programmatically, with the constructors on
//! `Schema` and [`MappingBuilder`](struct.MappingBuilder.html), or from their
//! serialized form, [`SerdeSchema`](../serde/struct.SerdeSchema.html). Both
//! routes check that the schema is well-formed, so a `Schema` that exists is
//! always unambiguous.
//!
//! A `Schema` is an owned tree. It cannot refer to itself, cannot be mutated
//! once constructed, and can be shared freely between threads.

use crate::errors::SchemaError;
use crate::serde::SerdeSchema;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// An abstract representation of a schema descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    form: Form,
    extra: IndexMap<String, Value>,
}

impl Schema {
    fn new(form: Form) -> Self {
        Schema {
            form,
            extra: IndexMap::new(),
        }
    }

    /// A schema which accepts any value at all.
    pub fn any() -> Self {
        Self::new(Form::Any)
    }

    /// A schema which accepts only values of the given scalar type.
    pub fn scalar(typ: Type) -> Self {
        Self::new(Form::Type(typ))
    }

    /// Shorthand for `Schema::scalar(Type::String)`.
    pub fn string() -> Self {
        Self::scalar(Type::String)
    }

    /// Shorthand for `Schema::scalar(Type::Int)`.
    pub fn int() -> Self {
        Self::scalar(Type::Int)
    }

    /// Shorthand for `Schema::scalar(Type::Float)`.
    pub fn float() -> Self {
        Self::scalar(Type::Float)
    }

    /// Shorthand for `Schema::scalar(Type::Bool)`.
    pub fn boolean() -> Self {
        Self::scalar(Type::Bool)
    }

    /// A schema which accepts sequences whose every element satisfies
    /// `elements`.
    pub fn elements(elements: Schema) -> Self {
        Self::new(Form::Elements(Box::new(elements)))
    }

    /// Start building a mapping schema.
    ///
    /// ```
    /// use schema_engine::Schema;
    ///
    /// let schema = Schema::mapping()
    ///     .required("interface", Schema::string())
    ///     .required("mtu", Schema::int())
    ///     .optional("mac", Schema::string())
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(schema.depth(), 2);
    /// ```
    pub fn mapping() -> MappingBuilder {
        MappingBuilder::default()
    }

    /// Construct a schema from its serialized form.
    ///
    /// Serialized mappings are converted with every `properties` entry
    /// first, in document order, followed by every `optionalProperties`
    /// entry, followed by the `values` wildcard.
    pub fn from_serde(serde_schema: SerdeSchema) -> Result<Schema, SchemaError> {
        let SerdeSchema {
            typ,
            elems,
            props,
            opt_props,
            values,
            additional_props,
            extra,
        } = serde_schema;

        let is_mapping = props.is_some() || opt_props.is_some() || values.is_some();
        if additional_props.is_some() && !is_mapping {
            return Err(SchemaError::InvalidForm);
        }

        let form = match (typ, elems, is_mapping) {
            (None, None, false) => Form::Any,
            (Some(typ), None, false) => Form::Type(typ.parse()?),
            (None, Some(elems), false) => Form::Elements(Box::new(Schema::from_serde(*elems)?)),
            (None, None, true) => {
                let mut entries = Vec::new();
                for (name, sub_schema) in props.unwrap_or_default() {
                    entries.push(KeySpec::new(
                        KeyMatcher::Literal(name),
                        Schema::from_serde(sub_schema)?,
                    ));
                }

                for (name, sub_schema) in opt_props.unwrap_or_default() {
                    entries.push(KeySpec::new(
                        KeyMatcher::Optional(name),
                        Schema::from_serde(sub_schema)?,
                    ));
                }

                if let Some(values) = values {
                    entries.push(KeySpec::new(
                        KeyMatcher::Wildcard,
                        Schema::from_serde(*values)?,
                    ));
                }

                Form::Mapping(Mapping::new(entries, additional_props.unwrap_or(false))?)
            }
            _ => return Err(SchemaError::InvalidForm),
        };

        Ok(Schema { form, extra })
    }

    /// Convert this schema into its serialized form.
    ///
    /// Mapping keys come out grouped by kind, so a mapping built with
    /// required and optional keys interleaved will not keep that
    /// interleaving.
    pub fn to_serde(&self) -> SerdeSchema {
        let mut out = SerdeSchema {
            extra: self.extra.clone(),
            ..SerdeSchema::default()
        };

        match &self.form {
            Form::Any => {}
            Form::Type(typ) => out.typ = Some(typ.as_str().to_owned()),
            Form::Elements(sub_schema) => out.elems = Some(Box::new(sub_schema.to_serde())),
            Form::Mapping(mapping) => {
                for entry in mapping.entries() {
                    let sub_schema = entry.schema().to_serde();
                    match entry.matcher() {
                        KeyMatcher::Literal(name) => {
                            out.props
                                .get_or_insert_with(IndexMap::new)
                                .insert(name.clone(), sub_schema);
                        }
                        KeyMatcher::Optional(name) => {
                            out.opt_props
                                .get_or_insert_with(IndexMap::new)
                                .insert(name.clone(), sub_schema);
                        }
                        KeyMatcher::Wildcard => out.values = Some(Box::new(sub_schema)),
                    }
                }

                // An empty closed mapping still has to serialize as a mapping.
                if out.props.is_none() && out.opt_props.is_none() && out.values.is_none() {
                    out.props = Some(IndexMap::new());
                }

                if mapping.is_open() {
                    out.additional_props = Some(true);
                }
            }
        }

        out
    }

    /// Get the form of the schema.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Get the extra data on the schema.
    ///
    /// Extra data here refers to key-value pairs on a serialized schema whose
    /// keys were not any of the schema keywords. Validation ignores them.
    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// How many levels of nesting this schema has. A leaf is 1 deep.
    pub fn depth(&self) -> usize {
        match &self.form {
            Form::Any | Form::Type(_) => 1,
            Form::Elements(sub_schema) => 1 + sub_schema.depth(),
            Form::Mapping(mapping) => {
                1 + mapping
                    .entries()
                    .iter()
                    .map(|entry| entry.schema().depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl From<Type> for Schema {
    fn from(typ: Type) -> Self {
        Schema::scalar(typ)
    }
}

/// The various forms which a schema may take on, and their respective data.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// The any form. This schema accepts all data.
    Any,

    /// The type form.
    ///
    /// This schema asserts that the data is a scalar of exactly the given
    /// type.
    Type(Type),

    /// The elements form.
    ///
    /// This schema asserts that the instance is a sequence, and that every
    /// element of the sequence matches a given schema.
    Elements(Box<Schema>),

    /// The mapping form.
    ///
    /// This schema asserts that the instance is a mapping, and that its keys
    /// and values satisfy the mapping's key specs.
    Mapping(Mapping),
}

/// The scalar types that a leaf of a schema may require.
///
/// No coercion happens during validation: the string `"1500"` is not an
/// `Int`, and the number `1500` is not a `Float`. Converting captured text
/// into numbers is the job of whatever builds the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Int,
    Float,
    Bool,
}

impl Type {
    pub fn as_str(self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
        }
    }

    /// Does a value satisfy this type?
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Type::String, Value::String(_)) => true,
            (Type::Bool, Value::Bool(_)) => true,
            (Type::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Type::Float, Value::Number(n)) => n.is_f64(),
            _ => false,
        }
    }
}

impl FromStr for Type {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Type::String),
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            "bool" => Ok(Type::Bool),
            _ => Err(SchemaError::InvalidType { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a key spec claims keys of an instance mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyMatcher {
    /// Claims exactly the key with this name, which must be present.
    Literal(String),

    /// Claims the key with this name if it is present.
    Optional(String),

    /// Claims every key not claimed by a `Literal` or `Optional`.
    Wildcard,
}

impl KeyMatcher {
    /// The key name this matcher claims, if it claims a single name.
    pub fn name(&self) -> Option<&str> {
        match self {
            KeyMatcher::Literal(name) | KeyMatcher::Optional(name) => Some(name),
            KeyMatcher::Wildcard => None,
        }
    }
}

/// A key matcher paired with the schema that claimed values must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct KeySpec {
    matcher: KeyMatcher,
    schema: Schema,
}

impl KeySpec {
    pub fn new(matcher: KeyMatcher, schema: Schema) -> Self {
        KeySpec { matcher, schema }
    }

    pub fn matcher(&self) -> &KeyMatcher {
        &self.matcher
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Only `Literal` keys are required.
    pub fn is_required(&self) -> bool {
        match self.matcher {
            KeyMatcher::Literal(_) => true,
            KeyMatcher::Optional(_) | KeyMatcher::Wildcard => false,
        }
    }
}

/// The data of a mapping schema.
///
/// A `Mapping` holds its key specs in declaration order. It guarantees that
/// no two specs share a name and that there is at most one wildcard.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    entries: Vec<KeySpec>,
    open: bool,
    names: HashMap<String, usize>,
    wildcard: Option<usize>,
}

impl Mapping {
    /// Construct a mapping from its key specs.
    ///
    /// When `open` is true, instance keys which no spec claims are accepted
    /// instead of being reported as unexpected.
    pub fn new(entries: Vec<KeySpec>, open: bool) -> Result<Mapping, SchemaError> {
        let mut names = HashMap::with_capacity(entries.len());
        let mut wildcard = None;

        for (index, entry) in entries.iter().enumerate() {
            match entry.matcher.name() {
                Some(name) => {
                    if names.insert(name.to_owned(), index).is_some() {
                        debug!(property = name, "rejecting mapping with a duplicate key");
                        return Err(SchemaError::AmbiguousProperty {
                            property: name.to_owned(),
                        });
                    }
                }
                None => {
                    if wildcard.replace(index).is_some() {
                        debug!("rejecting mapping with more than one wildcard");
                        return Err(SchemaError::AmbiguousWildcard);
                    }
                }
            }
        }

        Ok(Mapping {
            entries,
            open,
            names,
            wildcard,
        })
    }

    /// The key specs, in declaration order.
    pub fn entries(&self) -> &[KeySpec] {
        &self.entries
    }

    /// Does this mapping accept keys which no spec claims?
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Does a required or optional spec claim this key name?
    pub fn declares(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// The schema that wildcard-claimed values must satisfy, if any.
    pub fn wildcard(&self) -> Option<&Schema> {
        self.wildcard.map(|index| &self.entries[index].schema)
    }
}

/// Builds a mapping schema one key spec at a time.
///
/// Checks for ambiguity are deferred to [`build`](#method.build).
#[derive(Debug, Clone, Default)]
pub struct MappingBuilder {
    entries: Vec<KeySpec>,
    open: bool,
}

impl MappingBuilder {
    /// Declare a key which must be present.
    pub fn required<S: Into<String>>(mut self, name: S, schema: Schema) -> Self {
        self.entries
            .push(KeySpec::new(KeyMatcher::Literal(name.into()), schema));
        self
    }

    /// Declare a key which may be present.
    pub fn optional<S: Into<String>>(mut self, name: S, schema: Schema) -> Self {
        self.entries
            .push(KeySpec::new(KeyMatcher::Optional(name.into()), schema));
        self
    }

    /// Declare the schema for every key not declared by name.
    pub fn wildcard(mut self, schema: Schema) -> Self {
        self.entries.push(KeySpec::new(KeyMatcher::Wildcard, schema));
        self
    }

    /// Accept undeclared keys without validating them.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        Ok(Schema::new(Form::Mapping(Mapping::new(
            self.entries,
            self.open,
        )?)))
    }
}
