//! Sparse input to positional parameters.
//!
//! Stored update queries take `$1` = entity id followed by one placeholder per
//! whitelisted field, in whitelist order. Absent fields become
//! [`SqlParam::Keep`] so the query's `COALESCE` leaves the column alone.

use serde_json::{Map, Value};

use crate::database::executor::SqlParam;

/// Fixed, ordered set of field names a partial write may touch.
///
/// Duplicates are rejected at compile time when built in a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWhitelist {
    fields: &'static [&'static str],
}

impl FieldWhitelist {
    pub const fn new(fields: &'static [&'static str]) -> Self {
        let mut i = 0;
        while i < fields.len() {
            let mut j = i + 1;
            while j < fields.len() {
                if str_eq(fields[i], fields[j]) {
                    panic!("duplicate field in whitelist");
                }
                j += 1;
            }
            i += 1;
        }
        Self { fields }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().copied()
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// One value per whitelisted field, in whitelist order.
///
/// Keys outside the whitelist are ignored. An explicit `null` is kept as
/// `SqlParam::Value(Null)`, distinct from an absent key.
pub fn build_update_values(whitelist: &FieldWhitelist, input: &Map<String, Value>) -> Vec<SqlParam> {
    whitelist
        .iter()
        .map(|field| match input.get(field) {
            Some(value) => SqlParam::Value(value.clone()),
            None => SqlParam::Keep,
        })
        .collect()
}

/// Same as [`build_update_values`] with the entity id prepended as `$1`.
pub fn build_update_params(id: impl Into<Value>, whitelist: &FieldWhitelist, input: &Map<String, Value>) -> Vec<SqlParam> {
    let mut params = Vec::with_capacity(whitelist.len() + 1);
    params.push(SqlParam::Value(id.into()));
    params.extend(build_update_values(whitelist, input));
    params
}
