//! An error type for schema construction and validation.

use failure::Fail;

/// An enum of possible errors that can emerge from this crate.
///
/// Note that validation failures are *not* represented here. An instance
/// that does not satisfy a schema produces a
/// [`ValidationResult`](../validator/struct.ValidationResult.html), which is
/// an ordinary value describing every problem found.
#[derive(Debug, Fail, PartialEq, Clone, Eq, Hash)]
pub enum SchemaError {
    /// A schema-like object did not take on a valid form.
    ///
    /// Only certain combinations of keywords make for valid schemas. For
    /// example, a `SerdeSchema` may not have both `type` and `elements`.
    #[fail(display = "invalid schema form")]
    InvalidForm,

    /// A schema-like object named a scalar type which does not exist.
    ///
    /// The valid type names are `string`, `int`, `float` and `bool`.
    #[fail(display = "invalid type: {}", name)]
    InvalidType { name: String },

    /// A mapping declared the same key more than once.
    ///
    /// Within one mapping, every required or optional key name must be
    /// unique. Declaring `mtu` as both required and optional is ambiguous,
    /// and so is declaring it as required twice.
    #[fail(display = "ambiguous property: {}", property)]
    AmbiguousProperty { property: String },

    /// A mapping declared more than one wildcard key.
    ///
    /// A key that matches no declared name must be routed to exactly one
    /// schema, so each mapping level may have at most one wildcard.
    #[fail(display = "ambiguous wildcard: more than one wildcard key in a mapping")]
    AmbiguousWildcard,

    /// The maximum depth during evaluation was exceeded.
    ///
    /// This only happens when a `max_depth` is configured on the validator,
    /// and the schema nests deeper than that.
    #[fail(display = "maximum depth exceeded during validation")]
    MaxDepthExceeded,
}
