use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use uuid::Uuid;

use super::schema::{FieldRule, FieldType, Schema};

/// One failing field and why it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request fragment: `body`, `params` or `query`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'static str>,
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            location: None,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed for {} field(s)", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Tag every field error with the fragment it came from
    pub fn at(mut self, location: &'static str) -> Self {
        for err in self.errors.iter_mut() {
            err.location = Some(location);
        }
        self
    }
}

/// Validate and coerce `payload` against `schema`.
///
/// Every failing field is reported. On success the returned map holds only
/// declared fields, coerced to their declared types; unknown keys are dropped.
/// A `null` payload is treated as an empty object.
pub fn validate(schema: &Schema, payload: &Value) -> Result<Map<String, Value>, ValidationError> {
    let empty = Map::new();
    let input = match payload {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(ValidationError {
                errors: vec![FieldError::new("", "expected an object")],
            })
        }
    };

    let mut output = Map::new();
    let mut errors = Vec::new();

    for rule in schema.fields() {
        match input.get(rule.name) {
            None => {
                if rule.required {
                    errors.push(FieldError::new(rule.name, "is required"));
                }
            }
            Some(Value::Null) => {
                if rule.required {
                    errors.push(FieldError::new(rule.name, "is required"));
                } else {
                    output.insert(rule.name.to_string(), Value::Null);
                }
            }
            Some(raw) => match check_field(rule, raw) {
                Ok(value) => {
                    output.insert(rule.name.to_string(), value);
                }
                Err(reason) => errors.push(FieldError::new(rule.name, reason)),
            },
        }
    }

    if errors.is_empty() {
        Ok(output)
    } else {
        Err(ValidationError { errors })
    }
}

fn check_field(rule: &FieldRule, raw: &Value) -> Result<Value, String> {
    match rule.field_type {
        FieldType::String => check_string(rule, raw),
        FieldType::Integer => {
            let n = coerce_integer(raw).ok_or_else(|| "must be an integer".to_string())?;
            check_range(rule, n as f64)?;
            Ok(Value::from(n))
        }
        FieldType::Number => {
            let n = coerce_number(raw).ok_or_else(|| "must be a number".to_string())?;
            check_range(rule, n)?;
            Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| "must be a finite number".to_string())
        }
        FieldType::Boolean => coerce_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| "must be a boolean".to_string()),
        FieldType::Uuid => {
            let s = raw.as_str().ok_or_else(|| "must be a UUID string".to_string())?;
            Uuid::parse_str(s.trim())
                .map(|u| Value::String(u.to_string()))
                .map_err(|_| "must be a valid UUID".to_string())
        }
    }
}

fn check_string(rule: &FieldRule, raw: &Value) -> Result<Value, String> {
    let s = raw.as_str().ok_or_else(|| "must be a string".to_string())?;
    let s = if rule.trim { s.trim() } else { s };
    let len = s.chars().count();

    if let Some(min) = rule.min_length {
        if len < min {
            return Err(format!("must be at least {} characters", min));
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            return Err(format!("must be at most {} characters", max));
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(s) {
            return Err("has an invalid format".to_string());
        }
    }
    if let Some(allowed) = &rule.one_of {
        if !allowed.contains(&s) {
            return Err(format!("must be one of: {}", allowed.join(", ")));
        }
    }
    Ok(Value::String(s.to_string()))
}

fn check_range(rule: &FieldRule, n: f64) -> Result<(), String> {
    if let Some(min) = rule.min {
        if n < min {
            return Err(format!("must be greater than or equal to {}", min));
        }
    }
    if let Some(max) = rule.max {
        if n > max {
            return Err(format!("must be less than or equal to {}", max));
        }
    }
    Ok(())
}

fn coerce_integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_number(raw: &Value) -> Option<f64> {
    let n = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use serde_json::json;

    fn product_schema() -> Schema {
        Schema::new(vec![
            FieldRule::string("title").min_length(1).max_length(20),
            FieldRule::number("price").min(0.0),
            FieldRule::integer("stock").min(0.0).optional(),
            FieldRule::boolean("actif").optional(),
            FieldRule::uuid("categoryId"),
        ])
    }

    #[test]
    fn coerces_and_strips_unknown_keys() {
        let out = validate(
            &product_schema(),
            &json!({
                "title": "  Desk lamp ",
                "price": "12.50",
                "stock": "3",
                "actif": "false",
                "categoryId": "6F9619FF-8B86-D011-B42D-00CF4FC964FF",
                "sellerId": "not-yours"
            }),
        )
        .unwrap();

        assert_eq!(out.get("title"), Some(&json!("Desk lamp")));
        assert_eq!(out.get("price"), Some(&json!(12.5)));
        assert_eq!(out.get("stock"), Some(&json!(3)));
        assert_eq!(out.get("actif"), Some(&json!(false)));
        assert_eq!(out.get("categoryId"), Some(&json!("6f9619ff-8b86-d011-b42d-00cf4fc964ff")));
        assert!(!out.contains_key("sellerId"));
    }

    #[test]
    fn reports_every_failing_field() {
        let err = validate(
            &product_schema(),
            &json!({"title": "", "price": -1, "stock": 1.5, "categoryId": "nope"}),
        )
        .unwrap_err();

        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "price", "stock", "categoryId"]);
        assert_eq!(err.errors[0].reason, "must be at least 1 characters");
        assert_eq!(err.errors[1].reason, "must be greater than or equal to 0");
    }

    #[test]
    fn missing_and_null_required_fields_fail() {
        let err = validate(&product_schema(), &json!({"title": "Lamp", "price": null})).unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                FieldError::new("price", "is required"),
                FieldError::new("categoryId", "is required"),
            ]
        );
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let schema = Schema::new(vec![FieldRule::string("description").optional(), FieldRule::integer("stock").optional()]);
        let out = validate(&schema, &json!({"description": null})).unwrap();
        assert_eq!(out.get("description"), Some(&Value::Null));
        assert!(!out.contains_key("stock"));
    }

    #[test]
    fn null_payload_is_an_empty_object() {
        let schema = Schema::new(vec![FieldRule::string("q").optional()]);
        assert!(validate(&schema, &Value::Null).unwrap().is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = validate(&product_schema(), &json!([1, 2])).unwrap_err();
        assert_eq!(err.errors[0].reason, "expected an object");
    }

    #[test]
    fn pattern_and_enum_constraints() {
        let schema = Schema::new(vec![
            FieldRule::string("email").pattern(Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()),
            FieldRule::string("sort").one_of(&["price", "createdAt"]).optional(),
        ]);

        assert!(validate(&schema, &json!({"email": "a@b.io", "sort": "price"})).is_ok());

        let err = validate(&schema, &json!({"email": "nope", "sort": "stock"})).unwrap_err();
        assert_eq!(err.errors[0].reason, "has an invalid format");
        assert_eq!(err.errors[1].reason, "must be one of: price, createdAt");
    }

    #[test]
    fn integer_rejects_non_numeric_strings() {
        let schema = Schema::new(vec![FieldRule::integer("quantity").min(1.0)]);
        assert!(validate(&schema, &json!({"quantity": "two"})).is_err());
        assert!(validate(&schema, &json!({"quantity": 0})).is_err());
        assert_eq!(validate(&schema, &json!({"quantity": 2.0})).unwrap()["quantity"], json!(2));
    }

    #[test]
    fn location_tags_errors() {
        let err = ValidationError { errors: vec![FieldError::new("userId", "must be a valid UUID")] }.at("params");
        assert_eq!(err.errors[0].location, Some("params"));
    }
}
