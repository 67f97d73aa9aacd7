mod common;

use common::TestApp;
use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::models::MenuItem;

async fn add_line(app: &TestApp, token: &str, email: &str, name: &str, price: f64) -> String {
    let (status, body) = app
        .post(
            "/carts",
            Some(token),
            json!({ "email": email, "menuItemId": name, "name": name, "price": price }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

fn menu_item(id: &str, category: &str, price: i64) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: id.into(),
        recipe: None,
        image: None,
        category: category.into(),
        price: Decimal::from(price),
    }
}

fn ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_payment_removes_only_settled_lines() {
    let app = TestApp::new();
    let token = app.token("a@x.io");
    let a = add_line(&app, &token, "a@x.io", "burger", 10.0).await;
    let b = add_line(&app, &token, "a@x.io", "soda", 5.0).await;
    let c = add_line(&app, &token, "a@x.io", "pie", 4.0).await;

    let other = app.token("b@x.io");
    let foreign = add_line(&app, &other, "b@x.io", "soup", 6.0).await;

    let (status, body) = app
        .post(
            "/payments",
            Some(&token),
            json!({
                "email": "a@x.io",
                "transactionId": "pi_1",
                "price": 15,
                "cartItems": [a, b, foreign],
                "menuItems": ["burger", "soda"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insertResult"]["acknowledged"], true);
    assert_eq!(body["deletedResult"]["deletedCount"], 2);

    let (_, remaining) = app.get("/carts?email=a@x.io", Some(&token)).await;
    assert_eq!(ids(&remaining), vec![c]);

    let (_, untouched) = app.get("/carts?email=b@x.io", Some(&other)).await;
    assert_eq!(ids(&untouched), vec![foreign.clone()]);

    let payments = app.state.stores.payments.find_all().await.unwrap();
    assert_eq!(payments.len(), 1);
    let mut settled = payments[0].cart_items.clone();
    settled.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(settled, expected);
    assert!(!payments[0].cart_items.contains(&foreign));
    assert_eq!(payments[0].quantity, 2);

    let admin = app.admin("root@x.io").await;
    let (_, unsettled) = app.get("/reconciliation/unsettled", Some(&admin)).await;
    assert_eq!(unsettled, json!([]));
}

#[tokio::test]
async fn test_payment_rejections() {
    let app = TestApp::new();
    let token = app.token("a@x.io");

    let (status, _) = app
        .post(
            "/payments",
            Some(&token),
            json!({ "email": "b@x.io", "transactionId": "pi_1", "price": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            "/payments",
            Some(&token),
            json!({ "email": "a@x.io", "transactionId": "pi_1", "price": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let (status, _) = app
        .post(
            "/payments",
            None,
            json!({ "email": "a@x.io", "transactionId": "pi_1", "price": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payment_intent_requires_gateway() {
    let app = TestApp::new();
    let token = app.token("a@x.io");

    let (status, body) = app
        .post("/create-payment-intent", Some(&token), json!({ "price": 12.5 }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 5004);
}

#[tokio::test]
async fn test_cart_listing_rules() {
    let app = TestApp::new();
    let token = app.token("a@x.io");
    add_line(&app, &token, "a@x.io", "burger", 10.0).await;

    let (status, body) = app.get("/carts", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.get("/carts?email=b@x.io", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/carts",
            Some(&token),
            json!({ "email": "b@x.io", "menuItemId": "m", "name": "m", "price": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_by_category() {
    let app = TestApp::new();
    let admin = app.admin("boss@x.io").await;

    let menus = &app.state.stores.menus;
    menus.insert(menu_item("burger", "mains", 10)).await.unwrap();
    menus.insert(menu_item("soda", "drinks", 5)).await.unwrap();

    let token = app.token("a@x.io");
    let (status, _) = app
        .post(
            "/payments",
            Some(&token),
            json!({
                "email": "a@x.io",
                "transactionId": "pi_9",
                "price": 15,
                "menuItems": ["burger", "soda", "deleted-item"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, stats) = app.get("/admin-stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"], 1);
    assert_eq!(stats["menus"], 2);
    assert_eq!(stats["orders"], 1);
    assert_eq!(stats["revenue"].as_f64(), Some(15.0));

    let (status, by_category) = app.get("/order-stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = by_category.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["category"], "drinks");
    assert_eq!(rows[0]["total"].as_f64(), Some(5.0));
    assert_eq!(rows[0]["itemCount"], 1);
    assert_eq!(rows[1]["category"], "mains");
    assert_eq!(rows[1]["total"].as_f64(), Some(10.0));

    let (status, _) = app.get("/order-stats", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reconciliation_endpoints_are_admin_only() {
    let app = TestApp::new();
    let admin = app.admin("boss@x.io").await;
    let token = app.token("a@x.io");

    let (status, _) = app.get("/reconciliation/unsettled", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/reconciliation/unsettled", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app
        .post("/reconciliation/sweep", Some(&admin), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 0);
}
