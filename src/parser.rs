//! The boundary between command parsers and validation.
//!
//! A parser turns the raw output of a command, or the body of a REST response,
//! into a nested value, and owns the schema that value must satisfy. This
//! crate does not ship any parsers; it only fixes how they hand their output
//! to the validator.

use crate::schema::Schema;
use crate::validator;
use failure::Error;
use serde_json::Value;
use tracing::debug;

/// A parser whose output is checked against a schema.
///
/// Implementors build their schema once, typically when the parser itself is
/// constructed, and return it from [`schema`](#tymethod.schema) for every
/// parse.
pub trait Parser {
    /// The schema every successful parse must satisfy.
    fn schema(&self) -> &Schema;

    /// Turn raw output into a value, without validating it.
    fn parse_raw(&self, output: &str) -> Result<Value, Error>;

    /// Parse raw output, and validate the result.
    ///
    /// On success, the value is returned unchanged. If validation fails, the
    /// error is a [`ValidationFailure`](../validator/struct.ValidationFailure.html)
    /// listing every problem found.
    fn parse(&self, output: &str) -> Result<Value, Error> {
        let value = self.parse_raw(output)?;

        let result = validator::validate(self.schema(), &value);
        if !result.is_ok() {
            debug!(errors = result.errors().len(), "parsed output rejected by schema");
        }

        result.into_result()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::ValidationFailure;
    use failure::err_msg;

    struct Uptime {
        schema: Schema,
    }

    impl Uptime {
        fn new() -> Self {
            Uptime {
                schema: Schema::mapping()
                    .required("days", Schema::int())
                    .optional("users", Schema::int())
                    .build()
                    .unwrap(),
            }
        }
    }

    impl Parser for Uptime {
        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn parse_raw(&self, output: &str) -> Result<Value, Error> {
            let mut out = serde_json::Map::new();
            for word in output.split_whitespace() {
                let mut parts = word.splitn(2, '=');
                let key = parts.next().unwrap_or_default();
                let value = parts.next().ok_or_else(|| err_msg("expected key=value"))?;
                let value = match value.parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => Value::from(value),
                };
                out.insert(key.to_owned(), value);
            }

            Ok(Value::Object(out))
        }
    }

    #[test]
    fn valid_output_is_returned_unchanged() {
        let value = Uptime::new().parse("days=3 users=2").unwrap();
        assert_eq!(value, serde_json::json!({ "days": 3, "users": 2 }));
    }

    #[test]
    fn invalid_output_reports_every_error() {
        let err = Uptime::new().parse("users=two load=1").unwrap_err();
        let failure = err
            .downcast::<ValidationFailure>()
            .expect("expected a validation failure");

        let messages: Vec<_> = failure.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                r#"missing required key "days" at root"#,
                "type mismatch at `users`: expected int, found string",
                r#"unexpected key "load" at root"#,
            ]
        );
    }

    #[test]
    fn raw_errors_pass_through() {
        let err = Uptime::new().parse("days").unwrap_err();
        assert!(err.downcast::<ValidationFailure>().is_err());
    }

    /// Reads a REST resource body; an empty body means an empty mapping.
    struct ReportResults {
        schema: Schema,
    }

    impl Parser for ReportResults {
        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn parse_raw(&self, output: &str) -> Result<Value, Error> {
            if output.trim().is_empty() {
                return Ok(Value::Object(serde_json::Map::new()));
            }

            Ok(serde_json::from_str(output)?)
        }
    }

    #[test]
    fn empty_rest_body_satisfies_empty_mapping() {
        let parser = ReportResults {
            schema: Schema::mapping().build().unwrap(),
        };

        assert_eq!(parser.parse("{}").unwrap(), serde_json::json!({}));
        assert_eq!(parser.parse("").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn empty_rest_body_is_still_validated() {
        let parser = ReportResults {
            schema: Schema::mapping()
                .required("kind", Schema::string())
                .optional("items", Schema::elements(Schema::any()))
                .build()
                .unwrap(),
        };

        let failure = parser
            .parse("{}")
            .unwrap_err()
            .downcast::<ValidationFailure>()
            .expect("expected a validation failure");
        let messages: Vec<_> = failure.errors().iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec![r#"missing required key "kind" at root"#]);

        let value = parser
            .parse(r#"{"kind": "tm:analytics:asm-bypass:report-results", "items": []}"#)
            .unwrap();
        assert_eq!(value["items"], serde_json::json!([]));
    }

    #[test]
    fn malformed_rest_body_is_not_a_validation_failure() {
        let parser = ReportResults {
            schema: Schema::mapping().build().unwrap(),
        };

        let err = parser.parse(r#"{"kind": "#).unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
        assert!(err.downcast::<ValidationFailure>().is_err());
    }
}
