use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::{FieldRule, RequestSchema, Schema};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

fn user_id_params() -> Schema {
    Schema::new(vec![FieldRule::uuid("userId")])
}

pub fn get_user() -> RequestSchema {
    RequestSchema::new().params(user_id_params())
}

pub fn update_user() -> RequestSchema {
    RequestSchema::new().params(user_id_params()).body(Schema::new(vec![
        FieldRule::string("firstname").min_length(1).max_length(100).optional(),
        FieldRule::string("lastname").min_length(1).max_length(100).optional(),
        FieldRule::string("email").max_length(255).pattern(EMAIL.clone()).optional(),
    ]))
}
