use crate::validation::{FieldRule, RequestSchema, Schema, INT4_MAX};

fn item_id_params() -> Schema {
    Schema::new(vec![FieldRule::uuid("itemId")])
}

fn user_id_params() -> Schema {
    Schema::new(vec![FieldRule::uuid("userId")])
}

fn quantity() -> FieldRule {
    FieldRule::integer("quantity").min(1.0).max(INT4_MAX)
}

pub fn add_item() -> RequestSchema {
    RequestSchema::new().body(Schema::new(vec![FieldRule::uuid("productId"), quantity()]))
}

pub fn update_item() -> RequestSchema {
    RequestSchema::new()
        .params(item_id_params())
        .body(Schema::new(vec![quantity()]))
}

pub fn delete_item() -> RequestSchema {
    RequestSchema::new().params(item_id_params())
}

pub fn user_cart() -> RequestSchema {
    RequestSchema::new().params(user_id_params())
}
