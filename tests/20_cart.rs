mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use shop_api::database::{DatabaseError, SqlParam, FOREIGN_KEY_VIOLATION};
use uuid::Uuid;

use common::{cart_item_row, TestApp};

#[tokio::test]
async fn add_item_returns_201_with_camel_cased_item() -> Result<()> {
    let app = TestApp::new();
    let user = Uuid::new_v4();
    let product = Uuid::new_v4();
    let item = Uuid::new_v4();
    app.db.respond("cart/addItemCart", vec![cart_item_row(item, user, product, 2)]);

    let res = app
        .post("/cart", Some(user), json!({"productId": product, "quantity": "2"}))
        .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["success"], true);
    let data = &res.body["data"];
    assert_eq!(data["id"], json!(item));
    assert_eq!(data["userId"], json!(user));
    assert_eq!(data["productId"], json!(product));
    assert_eq!(data["quantity"], 2);
    assert!(data.get("user_id").is_none());

    let calls = app.db.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params[2], SqlParam::value(2));
    Ok(())
}

#[tokio::test]
async fn add_item_for_unknown_product_is_404() -> Result<()> {
    let app = TestApp::new();
    app.db.fail(
        "cart/addItemCart",
        DatabaseError::query(Some(FOREIGN_KEY_VIOLATION), "violates foreign key constraint"),
    );

    let res = app
        .post("/cart", Some(Uuid::new_v4()), json!({"productId": Uuid::new_v4(), "quantity": 1}))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "PRODUCT_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn non_owner_update_is_403_and_runs_no_update() -> Result<()> {
    let app = TestApp::new();
    let owner = Uuid::new_v4();
    let item = Uuid::new_v4();
    app.db
        .respond("cart/getItemCartById", vec![cart_item_row(item, owner, Uuid::new_v4(), 1)]);

    let res = app
        .patch(&format!("/cart/{}", item), Some(Uuid::new_v4()), json!({"quantity": 4}))
        .await?;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
    assert_eq!(app.db.call_ids(), vec!["cart/getItemCartById"]);
    Ok(())
}

#[tokio::test]
async fn missing_item_is_404_for_any_user() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .patch(&format!("/cart/{}", Uuid::new_v4()), Some(Uuid::new_v4()), json!({"quantity": 4}))
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "ITEM_NOT_FOUND");

    let res = app.delete(&format!("/cart/{}", Uuid::new_v4()), Some(Uuid::new_v4())).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "ITEM_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn owner_deletes_item_with_204() -> Result<()> {
    let app = TestApp::new();
    let owner = Uuid::new_v4();
    let item = Uuid::new_v4();
    app.db
        .respond("cart/getItemCartById", vec![cart_item_row(item, owner, Uuid::new_v4(), 1)])
        .respond("cart/deleteItemCart", vec![json!({"id": item})]);

    let res = app.delete(&format!("/cart/{}", item), Some(owner)).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_null());
    assert_eq!(app.db.call_ids(), vec!["cart/getItemCartById", "cart/deleteItemCart"]);
    Ok(())
}

#[tokio::test]
async fn non_owner_delete_is_403_and_runs_no_delete() -> Result<()> {
    let app = TestApp::new();
    let item = Uuid::new_v4();
    app.db
        .respond("cart/getItemCartById", vec![cart_item_row(item, Uuid::new_v4(), Uuid::new_v4(), 1)]);

    let res = app.delete(&format!("/cart/{}", item), Some(Uuid::new_v4())).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(app.db.call_ids(), vec!["cart/getItemCartById"]);
    Ok(())
}

#[tokio::test]
async fn empty_cart_summary_is_zero_valued() -> Result<()> {
    let app = TestApp::new();
    let user = Uuid::new_v4();

    let res = app.get(&format!("/cart/summary/{}", user), Some(user)).await?;
    assert_eq!(res.status, StatusCode::OK);
    let data = &res.body["data"];
    assert_eq!(data["userId"], json!(user));
    assert_eq!(data["cartId"], "");
    assert_eq!(data["itemCount"], 0);
    assert_eq!(data["totalPrice"].as_f64(), Some(0.0));
    Ok(())
}

#[tokio::test]
async fn cart_items_of_a_user_are_listed() -> Result<()> {
    let app = TestApp::new();
    let user = Uuid::new_v4();
    app.db.respond(
        "cart/getItemsCartByUserId",
        vec![
            cart_item_row(Uuid::new_v4(), user, Uuid::new_v4(), 1),
            cart_item_row(Uuid::new_v4(), user, Uuid::new_v4(), 3),
        ],
    );

    let res = app.get(&format!("/cart/user/{}", user), Some(user)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(res.body["data"][1]["quantity"], 3);
    Ok(())
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_the_service() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post("/cart", Some(Uuid::new_v4()), json!({"productId": Uuid::new_v4(), "quantity": 0}))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["field_errors"][0]["field"], "quantity");
    assert!(app.db.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn quantity_beyond_int4_is_rejected_before_any_query() -> Result<()> {
    let app = TestApp::new();

    let res = app
        .post(
            "/cart",
            Some(Uuid::new_v4()),
            json!({"productId": Uuid::new_v4(), "quantity": 3_000_000_000_i64}),
        )
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(res.body["field_errors"][0]["field"], "quantity");
    assert_eq!(res.body["field_errors"][0]["reason"], "must be less than or equal to 2147483647");
    assert!(app.db.calls().is_empty());
    Ok(())
}
