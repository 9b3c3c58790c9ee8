//! Validate parsed values against schemas.
//!
//! This module contains logic related to *validation*, the process of taking a
//! piece of parsed data (called an "instance") and checking if it's valid
//! according to a schema.
//!
//! See the docs for [`Validator`](struct.Validator.html) for more.

use crate::errors::SchemaError;
use crate::schema::{Schema, Type};
use crate::value::ValueKind;
use crate::vm;
use failure::Fail;
use json_pointer::JsonPointer;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Validates instances against schemas.
///
/// A `Validator` holds only its configuration, so one validator may be shared
/// by any number of threads validating any number of instances.
#[derive(Debug, Default, Eq, PartialEq, Clone, Hash)]
pub struct Validator {
    config: Config,
}

impl Validator {
    /// Constructs a new validator using the default configuration.
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    /// Constructs a new validator using a configuration.
    pub fn new_with_config(config: Config) -> Self {
        Self { config }
    }

    /// Validate an instance against a schema.
    ///
    /// The produced errors borrow from the schema and the instance; use
    /// [`ValidationResult::into_owned`](struct.ValidationResult.html#method.into_owned)
    /// to detach them. An instance which does not satisfy the schema is *not*
    /// a Rust error: a result full of path errors is the successful output of
    /// this function.
    ///
    /// Returns an error only if the configured maximum depth is exceeded (see
    /// [`Config::max_depth`](struct.Config.html#method.max_depth)).
    pub fn validate<'a>(
        &self,
        schema: &'a Schema,
        instance: &'a Value,
    ) -> Result<ValidationResult<'a>, SchemaError> {
        let outcome = vm::validate(
            self.config.max_errors,
            self.config.max_depth,
            schema,
            instance,
        );

        if let Some(err) = outcome.aborted {
            debug!(%err, "validation aborted");
            return Err(err);
        }

        debug!(errors = outcome.errors.len(), "validation finished");
        Ok(ValidationResult {
            errors: outcome.errors,
        })
    }
}

/// Validate an instance against a schema, reporting every error.
///
/// This is the same as validating with a default `Validator`, which cannot
/// fail.
pub fn validate<'a>(schema: &'a Schema, instance: &'a Value) -> ValidationResult<'a> {
    // With no depth limit, evaluation never aborts.
    ValidationResult {
        errors: vm::validate(0, 0, schema, instance).errors,
    }
}

/// Configuration for how validation should proceed.
#[derive(Debug, Default, Eq, PartialEq, Clone, Hash)]
pub struct Config {
    max_errors: usize,
    max_depth: usize,
}

impl Config {
    /// Create a new, default `Config`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of errors to produce before stopping validation.
    /// 0, the default value, indicates that all errors should be produced.
    ///
    /// If your use-case doesn't care about errors, and you just want to abort
    /// on the first error, you should set this value to 1.
    pub fn max_errors(&mut self, max_errors: usize) -> &mut Self {
        self.max_errors = max_errors;
        self
    }

    /// Sets the maximum nesting depth to descend into before aborting
    /// evaluation. 0, the default value, means no limit.
    ///
    /// Schemas are finite trees, so validation always terminates; this limit
    /// exists for callers who want to bound the work done on schemas they did
    /// not author. When it is hit, validation *fails* and no validation errors
    /// are returned.
    pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth;
        self
    }
}

/// One step of a path from the root of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment<'a> {
    Key(Cow<'a, str>),
    Index(usize),
}

impl<'a> PathSegment<'a> {
    pub fn into_owned(self) -> PathSegment<'static> {
        match self {
            PathSegment::Key(key) => PathSegment::Key(Cow::Owned(key.into_owned())),
            PathSegment::Index(i) => PathSegment::Index(i),
        }
    }
}

/// The location of a value within an instance.
///
/// Paths display in dot/bracket notation, like `eth0.counters.rx_pkts` or
/// `flags[2]`. Keys which contain dots, brackets, quotes, backticks or
/// whitespace are
/// quoted, so the address `192.168.0.1` under `ipv4` displays as
/// `ipv4["192.168.0.1"]`. The root path displays as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path<'a> {
    segments: Vec<PathSegment<'a>>,
}

impl<'a> Path<'a> {
    pub fn new(segments: Vec<PathSegment<'a>>) -> Self {
        Path { segments }
    }

    /// The path to the root of an instance.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment<'a>] {
        &self.segments
    }

    /// This path as an RFC 6901 JSON pointer, such as `/eth0/mtu`.
    pub fn to_pointer(&self) -> JsonPointer<String, Vec<String>> {
        JsonPointer::new(
            self.segments
                .iter()
                .map(|segment| match segment {
                    PathSegment::Key(key) => key.to_string(),
                    PathSegment::Index(i) => i.to_string(),
                })
                .collect(),
        )
    }

    pub fn into_owned(self) -> Path<'static> {
        Path {
            segments: self
                .segments
                .into_iter()
                .map(PathSegment::into_owned)
                .collect(),
        }
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"' | '`') || c.is_whitespace())
}

impl<'a> fmt::Display for Path<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => {
                    let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                    write!(f, "[{}]", quoted)?;
                }
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }

        Ok(())
    }
}

/// The container shapes a schema may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Sequence,
    Mapping,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Shape::Sequence => "sequence",
            Shape::Mapping => "mapping",
        })
    }
}

/// A single problem with an instance when evaluated against a schema.
///
/// Note that, despite its name, `PathError` is not an error in the usual Rust
/// sense. It is an ordinary value, which happens to describe why some data
/// was unsatisfactory against a given schema.
///
/// `PathError` uses `Cow` to hold keys, because this crate avoids copying keys
/// out of schemas and instances unless asked to with
/// [`into_owned`](#method.into_owned).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathError<'a> {
    /// A leaf had the wrong kind of value.
    TypeMismatch {
        path: Path<'a>,
        expected: Type,
        actual: ValueKind,
    },

    /// A sequence or mapping was expected, but something else was found.
    ShapeMismatch {
        path: Path<'a>,
        expected: Shape,
        actual: ValueKind,
    },

    /// The mapping at `path` lacks the required key `key`.
    MissingRequiredKey { path: Path<'a>, key: Cow<'a, str> },

    /// The mapping at `path` has the key `key`, which nothing accounts for.
    UnexpectedKey { path: Path<'a>, key: Cow<'a, str> },
}

impl<'a> PathError<'a> {
    /// Where the problem was found.
    ///
    /// For `MissingRequiredKey` and `UnexpectedKey`, this is the path of the
    /// mapping holding (or lacking) the key.
    pub fn path(&self) -> &Path<'a> {
        match self {
            PathError::TypeMismatch { path, .. }
            | PathError::ShapeMismatch { path, .. }
            | PathError::MissingRequiredKey { path, .. }
            | PathError::UnexpectedKey { path, .. } => path,
        }
    }

    /// The offending key, for key-related errors.
    pub fn key(&self) -> Option<&str> {
        match self {
            PathError::MissingRequiredKey { key, .. } | PathError::UnexpectedKey { key, .. } => {
                Some(&**key)
            }
            PathError::TypeMismatch { .. } | PathError::ShapeMismatch { .. } => None,
        }
    }

    pub fn into_owned(self) -> PathError<'static> {
        match self {
            PathError::TypeMismatch {
                path,
                expected,
                actual,
            } => PathError::TypeMismatch {
                path: path.into_owned(),
                expected,
                actual,
            },
            PathError::ShapeMismatch {
                path,
                expected,
                actual,
            } => PathError::ShapeMismatch {
                path: path.into_owned(),
                expected,
                actual,
            },
            PathError::MissingRequiredKey { path, key } => PathError::MissingRequiredKey {
                path: path.into_owned(),
                key: Cow::Owned(key.into_owned()),
            },
            PathError::UnexpectedKey { path, key } => PathError::UnexpectedKey {
                path: path.into_owned(),
                key: Cow::Owned(key.into_owned()),
            },
        }
    }
}

struct Location<'p, 'a>(&'p Path<'a>);

impl<'p, 'a> fmt::Display for Location<'p, 'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_root() {
            f.write_str("root")
        } else {
            write!(f, "`{}`", self.0)
        }
    }
}

impl<'a> fmt::Display for PathError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathError::TypeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch at {}: expected {}, found {}",
                Location(path),
                expected,
                actual
            ),
            PathError::ShapeMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "shape mismatch at {}: expected {}, found {}",
                Location(path),
                expected,
                actual
            ),
            PathError::MissingRequiredKey { path, key } => {
                write!(f, "missing required key {:?} at {}", key, Location(path))
            }
            PathError::UnexpectedKey { path, key } => {
                write!(f, "unexpected key {:?} at {}", key, Location(path))
            }
        }
    }
}

/// Everything one validation found wrong with an instance.
///
/// The errors are in the order validation visited them: depth first, mapping
/// keys in the order the schema declares them, then keys the schema does not
/// declare in the order the instance holds them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationResult<'a> {
    errors: Vec<PathError<'a>>,
}

impl<'a> ValidationResult<'a> {
    /// True iff there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[PathError<'a>] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<PathError<'a>> {
        self.errors
    }

    pub fn into_owned(self) -> ValidationResult<'static> {
        ValidationResult {
            errors: self.errors.into_iter().map(PathError::into_owned).collect(),
        }
    }

    /// Turn this result into a Rust `Result`, so that callers can propagate a
    /// failed validation with `?`.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ValidationFailure {
                errors: self.into_owned().errors,
            })
        }
    }
}

/// A failed validation, as a Rust error.
///
/// Displays as a summary line followed by one line per error, so printing it
/// shows every path and what was wrong there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: Vec<PathError<'static>>,
}

impl ValidationFailure {
    pub fn errors(&self) -> &[PathError<'static>] {
        &self.errors
    }
}

impl Fail for ValidationFailure {}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "validation failed with {} error(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n  {}", err)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::Schema;
    use failure::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key(k: &str) -> PathSegment {
        PathSegment::Key(Cow::Borrowed(k))
    }

    #[test]
    fn max_depth() -> Result<(), Error> {
        let mut config = Config::new();
        config.max_depth(2);

        let validator = Validator::new_with_config(config.clone());
        let schema = Schema::elements(Schema::elements(Schema::int()));

        assert_eq!(
            validator.validate(&schema, &json!([[1]])).unwrap_err(),
            SchemaError::MaxDepthExceeded
        );

        // An empty sequence never descends.
        assert!(validator.validate(&schema, &json!([]))?.is_ok());

        config.max_depth(3);
        let validator = Validator::new_with_config(config);
        assert!(validator.validate(&schema, &json!([[1]]))?.is_ok());

        Ok(())
    }

    #[test]
    fn max_errors() -> Result<(), Error> {
        let mut config = Config::new();
        config.max_errors(3);

        let validator = Validator::new_with_config(config);
        assert_eq!(
            validator
                .validate(
                    &Schema::elements(Schema::string()),
                    &json!([null, null, null, null, null])
                )?
                .errors()
                .len(),
            3
        );

        Ok(())
    }

    #[test]
    fn path_display() {
        assert_eq!(Path::root().to_string(), "");
        assert_eq!(Path::new(vec![key("mtu")]).to_string(), "mtu");
        assert_eq!(
            Path::new(vec![key("eth0"), key("counters"), key("rx_pkts")]).to_string(),
            "eth0.counters.rx_pkts"
        );
        assert_eq!(Path::new(vec![PathSegment::Index(2)]).to_string(), "[2]");
        assert_eq!(
            Path::new(vec![key("flags"), PathSegment::Index(0)]).to_string(),
            "flags[0]"
        );
        assert_eq!(
            Path::new(vec![key("eth0"), key("ipv4"), key("192.168.0.1"), key("ip")]).to_string(),
            r#"eth0.ipv4["192.168.0.1"].ip"#
        );
        assert_eq!(Path::new(vec![key("")]).to_string(), r#"[""]"#);
        assert_eq!(Path::new(vec![key("a`b")]).to_string(), r#"["a`b"]"#);
    }

    #[test]
    fn backtick_keys_stay_unambiguous_in_messages() {
        let err = PathError::UnexpectedKey {
            path: Path::new(vec![key("a`b")]),
            key: "c".into(),
        };
        assert_eq!(err.to_string(), r#"unexpected key "c" at `["a`b"]`"#);
    }

    #[test]
    fn path_pointer() {
        let path = Path::new(vec![key("eth0"), key("flags"), PathSegment::Index(1)]);
        assert_eq!(path.to_pointer().to_string(), "/eth0/flags/1");
        assert_eq!(Path::root().to_pointer().to_string(), "");
    }

    #[test]
    fn error_display() {
        let err = PathError::TypeMismatch {
            path: Path::new(vec![key("mtu")]),
            expected: Type::Int,
            actual: ValueKind::String,
        };
        assert_eq!(
            err.to_string(),
            "type mismatch at `mtu`: expected int, found string"
        );

        let err = PathError::MissingRequiredKey {
            path: Path::root(),
            key: "a".into(),
        };
        assert_eq!(err.to_string(), r#"missing required key "a" at root"#);
        assert_eq!(err.key(), Some("a"));
    }

    #[test]
    fn failure_lists_every_error() {
        let schema = Schema::mapping()
            .required("mtu", Schema::int())
            .build()
            .unwrap();
        let instance = json!({ "mtu": "bad", "extra": 1 });

        let failure = validate(&schema, &instance).into_result().unwrap_err();
        assert_eq!(failure.errors().len(), 2);
        assert_eq!(
            failure.to_string(),
            "validation failed with 2 error(s)\n  \
             type mismatch at `mtu`: expected int, found string\n  \
             unexpected key \"extra\" at root"
        );
    }

    #[test]
    fn ok_result_converts_to_ok() {
        let schema = Schema::any();
        let instance = json!(null);
        let result = validate(&schema, &instance);
        assert!(result.is_ok());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<ValidationFailure>();
    }
}
