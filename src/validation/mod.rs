//! Declarative request validation.
//!
//! Routes declare a [`RequestSchema`] naming which fragments (body, path
//! params, query) to check. [`validate`] coerces a fragment to its schema or
//! reports every failing field; the `validate_request` middleware runs it at
//! the HTTP boundary so services only ever see coerced input.

pub mod engine;
pub mod schema;

pub use engine::{validate, FieldError, ValidationError};
pub use schema::{FieldRule, FieldType, RequestSchema, Schema, INT4_MAX};
