use std::sync::Arc;

use regex::Regex;

/// Largest value a Postgres `int4` column holds
pub const INT4_MAX: f64 = i32::MAX as f64;

/// Scalar type a field is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Uuid,
}

/// Declarative rule for one field of a request fragment
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
    pub one_of: Option<Vec<&'static str>>,
    pub trim: bool,
}

impl FieldRule {
    fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            one_of: None,
            trim: true,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn uuid(name: &'static str) -> Self {
        Self::new(name, FieldType::Uuid)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.one_of = Some(values.to_vec());
        self
    }

    /// Keep surrounding whitespace on string input
    pub fn untrimmed(mut self) -> Self {
        self.trim = false;
        self
    }
}

/// Ordered set of field rules for one request fragment
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Which fragments of a request a route validates, and against what
#[derive(Debug, Clone, Default)]
pub struct RequestSchema {
    pub body: Option<Arc<Schema>>,
    pub params: Option<Arc<Schema>>,
    pub query: Option<Arc<Schema>>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, schema: Schema) -> Self {
        self.body = Some(Arc::new(schema));
        self
    }

    pub fn params(mut self, schema: Schema) -> Self {
        self.params = Some(Arc::new(schema));
        self
    }

    pub fn query(mut self, schema: Schema) -> Self {
        self.query = Some(Arc::new(schema));
        self
    }
}
