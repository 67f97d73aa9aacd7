mod common;

use common::TestApp;
use futures::future::join_all;
use http::StatusCode;
use serde_json::json;

const DATE: &str = "2030-06-01";

fn booking(email: &str, slot: &str, guests: u32) -> serde_json::Value {
    json!({ "email": email, "date": DATE, "guests": guests, "slot": slot })
}

#[tokio::test]
async fn test_slot_fills_then_disappears_from_availability() {
    let app = TestApp::new();
    app.capacity(4, &[("18:00", 2)]).await;

    let (status, body) = app
        .get(&format!("/booking-options?date={}&guests=4", DATE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "slot": "18:00", "capacity": 2, "left": 2 }]));

    for email in ["a@x.io", "b@x.io"] {
        let token = app.token(email);
        let (status, body) = app
            .post("/bookings", Some(&token), booking(email, "18:00", 4))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["email"], email);
    }

    let token = app.token("c@x.io");
    let (status, body) = app
        .post("/bookings", Some(&token), booking("c@x.io", "18:00", 4))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rejected"], true);
    assert_eq!(body["overBooking"], false);
    assert_eq!(body["reason"], "slot_full");
    assert_eq!(body["code"], 3003);

    let (status, body) = app
        .get(&format!("/booking-options?date={}&guests=4", DATE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_concurrent_requests_never_overbook() {
    let app = TestApp::new();
    app.capacity(2, &[("19:00", 3)]).await;

    let requests = (0..12).map(|i| {
        let email = format!("guest{}@x.io", i);
        let token = app.token(&email);
        let app = &app;
        async move {
            app.post("/bookings", Some(&token), booking(&email, "19:00", 2))
                .await
        }
    });
    let results = join_all(requests).await;

    let accepted = results
        .iter()
        .filter(|(status, body)| *status == StatusCode::OK && body.get("id").is_some())
        .count();
    let full = results
        .iter()
        .filter(|(_, body)| body["reason"] == "slot_full")
        .count();
    assert_eq!(accepted, 3);
    assert_eq!(full, 9);
}

#[tokio::test]
async fn test_daily_limit_counts_bookings_made_today() {
    let app = TestApp::new();
    app.capacity(2, &[("12:00", 10), ("14:00", 10), ("16:00", 10)]).await;
    let token = app.token("a@x.io");

    for slot in ["12:00", "14:00"] {
        let (_, body) = app
            .post("/bookings", Some(&token), booking("a@x.io", slot, 2))
            .await;
        assert_eq!(body["status"], "pending");
    }

    let (status, body) = app
        .post("/bookings", Some(&token), booking("a@x.io", "16:00", 2))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overBooking"], true);
    assert_eq!(body["reason"], "daily_limit_reached");
    assert_eq!(body["code"], 3004);
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = TestApp::new();
    app.capacity(2, &[("12:00", 1)]).await;
    let token = app.token("a@x.io");

    let (status, _) = app
        .post("/bookings", Some(&token), booking("other@x.io", "12:00", 2))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/bookings", Some(&token), booking("a@x.io", "23:00", 2))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3002);

    let (status, _) = app
        .post("/bookings", Some(&token), booking("a@x.io", "12:00", 9))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .get(&format!("/booking-options?date={}&guests=9", DATE), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/booking-options?date=tomorrow&guests=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let app = TestApp::new();
    app.capacity(2, &[("12:00", 1)]).await;
    let admin = app.admin("boss@x.io").await;
    let token = app.token("a@x.io");

    let (_, created) = app
        .post("/bookings", Some(&token), booking("a@x.io", "12:00", 2))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = app.get("/bookings/a@x.io", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/bookings/b@x.io", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // only admins confirm
    let uri = format!("/bookings/{}", id);
    let (status, _) = app.send("PATCH", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.send("PATCH", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
    let (status, _) = app.send("PATCH", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // cancelling frees the seat
    let (status, body) = app
        .send("PATCH", &format!("{}/cancel", uri), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    let (_, body) = app
        .get(&format!("/booking-options?date={}&guests=2", DATE), None)
        .await;
    assert_eq!(body[0]["left"], 1);

    let stranger = app.token("c@x.io");
    let (status, _) = app.send("DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);

    let (status, body) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3005);

    let (status, body) = app.get("/bookings", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

async fn assert_created_booking_reads_back(app: &TestApp) {
    app.capacity(3, &[("20:00", 4)]).await;
    let token = app.token("a@x.io");

    let (status, created) = app
        .post("/bookings", Some(&token), booking("a@x.io", "20:00", 3))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = app.get("/bookings/a@x.io", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    let stored = &listed[0];

    for field in ["id", "email", "date", "guests", "slot", "status", "createdAt"] {
        assert_eq!(stored[field], created[field], "field {field}");
    }
    assert_eq!(stored["email"], "a@x.io");
    assert_eq!(stored["date"], DATE);
    assert_eq!(stored["guests"], 3);
    assert_eq!(stored["slot"], "20:00");
    assert_eq!(stored["status"], "pending");
}

#[tokio::test]
async fn test_created_booking_reads_back_unchanged() {
    assert_created_booking_reads_back(&TestApp::new()).await;
}

#[tokio::test]
async fn test_created_booking_reads_back_unchanged_on_surreal() {
    assert_created_booking_reads_back(&TestApp::surreal().await).await;
}
