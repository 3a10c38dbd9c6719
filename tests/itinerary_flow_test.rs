//! End-to-end flow against a real MongoDB. Run with
//! `MONGODB_URI=... cargo test -- --ignored`.

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use serial_test::serial;

use common::{cleanup_test_data, get_test_email, get_test_password, send, TestApp};

fn oid(value: &Value) -> String {
    value["_id"]["$oid"]
        .as_str()
        .expect("document id")
        .to_string()
}

#[actix_rt::test]
#[serial]
#[ignore = "needs a running MongoDB"]
async fn test_generate_and_list_itinerary() {
    let test_app = TestApp::with_indexes().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "email": get_test_email(),
            "password": get_test_password(),
            "full_name": "Test Traveler"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let auth = ("Authorization", format!("Bearer {}", body["auth_token"].as_str().unwrap()));

    let req = test::TestRequest::post()
        .uri("/api/trips")
        .insert_header(auth.clone())
        .set_json(json!({
            "title": "Kyoto",
            "start_date": "2024-01-01",
            "end_date": "2024-01-04"
        }))
        .to_request();
    let (status, trip) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trip["is_public"], false);
    let trip_id = oid(&trip);

    let req = test::TestRequest::post()
        .uri(&format!("/api/trips/{}/itineraries", trip_id))
        .insert_header(auth.clone())
        .set_json(json!({"useAI": true, "travelStyle": "foodie"}))
        .to_request();
    let (status, itinerary) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(itinerary["title"], "3-Day Kyoto Foodie Itinerary");

    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}/itineraries", trip_id))
        .insert_header(auth.clone())
        .to_request();
    let (status, listed) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let days = listed[0]["days"].as_array().expect("days");
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], "2024-01-01");
    for day in days {
        let activities = day["activities"].as_array().expect("activities");
        assert!((3..=4).contains(&activities.len()));
        assert_eq!(activities[0]["start_time"], "08:00");
    }

    // Anonymous callers can't read a private trip
    let req = test::TestRequest::get()
        .uri(&format!("/api/trips/{}/itineraries", trip_id))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Another account can't modify it either
    let req = test::TestRequest::delete()
        .uri(&format!("/api/trips/{}", trip_id))
        .insert_header(test_app.bearer())
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/trips/{}", trip_id))
        .insert_header(auth)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    cleanup_test_data(&test_app.database).await;
}

#[actix_rt::test]
#[serial]
#[ignore = "needs a running MongoDB"]
async fn test_duplicate_signup_conflicts() {
    let test_app = TestApp::with_indexes().await;
    let app = test::init_service(test_app.create_app()).await;

    let signup = || {
        test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({
                "email": get_test_email(),
                "password": get_test_password()
            }))
            .to_request()
    };

    let (status, _) = send(&app, signup()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, signup()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    cleanup_test_data(&test_app.database).await;
}
