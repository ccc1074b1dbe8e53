use crate::validation::{FieldRule, RequestSchema, Schema, INT4_MAX};

const TITLE_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 5000;

fn title() -> FieldRule {
    FieldRule::string("title").min_length(1).max_length(TITLE_MAX)
}

fn description() -> FieldRule {
    FieldRule::string("description").max_length(DESCRIPTION_MAX).optional()
}

fn price() -> FieldRule {
    FieldRule::number("price").min(0.0)
}

fn stock() -> FieldRule {
    FieldRule::integer("stock").min(0.0).max(INT4_MAX)
}

pub fn add_product() -> RequestSchema {
    RequestSchema::new().body(Schema::new(vec![
        title(),
        description(),
        price(),
        stock().optional(),
        FieldRule::uuid("categoryId"),
        FieldRule::uuid("subcategoryId").optional(),
        FieldRule::boolean("actif").optional(),
    ]))
}

/// Every field optional: a patch names only what changes
pub fn update_product() -> RequestSchema {
    RequestSchema::new()
        .params(Schema::new(vec![FieldRule::uuid("productId")]))
        .body(Schema::new(vec![
            title().optional(),
            description(),
            price().optional(),
            stock().optional(),
            FieldRule::uuid("categoryId").optional(),
            FieldRule::uuid("subcategoryId").optional(),
            FieldRule::boolean("actif").optional(),
        ]))
}

pub fn listing() -> RequestSchema {
    RequestSchema::new().query(Schema::new(vec![
        FieldRule::string("title").max_length(TITLE_MAX).optional(),
        FieldRule::uuid("categoryId").optional(),
        FieldRule::uuid("subcategoryId").optional(),
        FieldRule::uuid("sellerId").optional(),
        FieldRule::number("minPrice").min(0.0).optional(),
        FieldRule::number("maxPrice").min(0.0).optional(),
        FieldRule::boolean("actif").optional(),
        FieldRule::integer("limit").min(1.0).max(100.0).optional(),
        FieldRule::integer("offset").min(0.0).max(INT4_MAX).optional(),
    ]))
}

pub fn seller_products() -> RequestSchema {
    RequestSchema::new().params(Schema::new(vec![FieldRule::uuid("userId")]))
}
