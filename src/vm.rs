use crate::errors::SchemaError;
use crate::resolve::{resolve, Resolution};
use crate::schema::{Form, Schema};
use crate::validator::{Path, PathError, PathSegment, Shape};
use crate::value::ValueKind;
use serde_json::Value;
use std::borrow::Cow;
use tracing::trace;

/// What one evaluation produced.
///
/// `aborted` is only ever set when a nonzero `max_depth` was exceeded; the
/// errors collected up to that point are still returned.
pub struct Outcome<'a> {
    pub errors: Vec<PathError<'a>>,
    pub aborted: Option<SchemaError>,
}

pub fn validate<'a>(
    max_errors: usize,
    max_depth: usize,
    schema: &'a Schema,
    instance: &'a Value,
) -> Outcome<'a> {
    let mut vm = Vm {
        max_errors,
        max_depth,
        depth: 0,
        instance_tokens: vec![],
        errors: vec![],
    };

    let aborted = match vm.eval(schema, instance) {
        Ok(()) | Err(EvalError::Internal) => None,
        Err(EvalError::Actual(error)) => Some(error),
    };

    Outcome {
        errors: vm.errors,
        aborted,
    }
}

enum EvalError {
    Internal,
    Actual(SchemaError),
}

struct Vm<'a> {
    max_errors: usize,
    max_depth: usize,
    depth: usize,
    instance_tokens: Vec<PathSegment<'a>>,
    errors: Vec<PathError<'a>>,
}

impl<'a> Vm<'a> {
    fn eval(&mut self, schema: &'a Schema, instance: &'a Value) -> Result<(), EvalError> {
        self.depth += 1;
        if self.max_depth != 0 && self.depth > self.max_depth {
            return Err(EvalError::Actual(SchemaError::MaxDepthExceeded));
        }

        match schema.form() {
            Form::Any => {}
            Form::Type(typ) => {
                if !typ.matches(instance) {
                    let err = PathError::TypeMismatch {
                        path: self.path(),
                        expected: *typ,
                        actual: ValueKind::of(instance),
                    };
                    self.push_err(err)?;
                }
            }
            Form::Elements(ref sub_schema) => {
                if let Some(arr) = instance.as_array() {
                    for (i, elem) in arr.iter().enumerate() {
                        self.instance_tokens.push(PathSegment::Index(i));
                        self.eval(sub_schema, elem)?;
                        self.instance_tokens.pop();
                    }
                } else {
                    self.push_shape_err(Shape::Sequence, instance)?;
                }
            }
            Form::Mapping(ref mapping) => {
                if let Some(obj) = instance.as_object() {
                    for resolution in resolve(mapping, obj) {
                        match resolution {
                            Resolution::Paired {
                                key,
                                value,
                                schema: sub_schema,
                                ..
                            } => {
                                self.instance_tokens
                                    .push(PathSegment::Key(Cow::Borrowed(key)));
                                self.eval(sub_schema, value)?;
                                self.instance_tokens.pop();
                            }
                            Resolution::Missing { key } => {
                                let err = PathError::MissingRequiredKey {
                                    path: self.path(),
                                    key: Cow::Borrowed(key),
                                };
                                self.push_err(err)?;
                            }
                            Resolution::Unexpected { key } => {
                                trace!(key, "unexpected key");
                                let err = PathError::UnexpectedKey {
                                    path: self.path(),
                                    key: Cow::Borrowed(key),
                                };
                                self.push_err(err)?;
                            }
                        }
                    }
                } else {
                    self.push_shape_err(Shape::Mapping, instance)?;
                }
            }
        }

        self.depth -= 1;
        Ok(())
    }

    fn path(&self) -> Path<'a> {
        Path::new(self.instance_tokens.clone())
    }

    fn push_shape_err(&mut self, expected: Shape, instance: &Value) -> Result<(), EvalError> {
        let err = PathError::ShapeMismatch {
            path: self.path(),
            expected,
            actual: ValueKind::of(instance),
        };
        self.push_err(err)
    }

    fn push_err(&mut self, err: PathError<'a>) -> Result<(), EvalError> {
        self.errors.push(err);

        if self.errors.len() == self.max_errors {
            Err(EvalError::Internal)
        } else {
            Ok(())
        }
    }
}
