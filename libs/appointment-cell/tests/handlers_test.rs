mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::models::TimeSlot;
use appointment_cell::router::appointment_routes;

use common::{booking, date, Fixture};

fn create_test_app(fx: &Fixture) -> Router {
    appointment_routes(fx.service.clone())
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_book_confirm_and_conflict_over_http() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    let second = fx.add_patient("Emma", "Doyle").await;
    let app = create_test_app(&fx);

    let response = send(&app, post_json("/", json!({
        "patient_id": patient.id,
        "doctor_id": doctor.id,
        "date": "2025-06-01",
        "time_slot": "a9_10",
        "reason": "Checkup"
    }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = read_json(response).await;
    assert_eq!(created["appointment"]["status"], "PENDING");
    assert_eq!(created["appointment"]["reason"], "Checkup");
    assert_eq!(created["appointment"]["doctor"]["first_name"], "Jane");
    let appointment_id = created["appointment"]["id"].as_str().unwrap().to_string();

    let response = send(&app, post_json(&format!("/{}/confirm", appointment_id), json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["appointment"]["status"], "CONFIRMED");

    let response = send(&app, post_json("/", json!({
        "patient_id": second.id,
        "doctor_id": doctor.id,
        "date": "2025-06-01",
        "time_slot": "a9_10"
    }))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error = read_json(response).await;
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("already booked with Dr. Jane Smith on 01-06-2025"));
}

#[tokio::test]
async fn test_confirm_cancelled_is_bad_request() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    let created = fx
        .service
        .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), TimeSlot::A9_10))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let response = send(&app, post_json(&format!("/{}/cancel", created.appointment.id), json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, post_json(&format!("/{}/confirm", created.appointment.id), json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_appointment_is_not_found() {
    let fx = Fixture::new().await;
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!("/{}", Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reschedule_route() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    let created = fx
        .service
        .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), TimeSlot::A9_10))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}/reschedule", created.appointment.id))
        .header("content-type", "application/json")
        .body(Body::from(json!({
            "doctor_id": doctor.id,
            "date": "2025-06-02",
            "time_slot": "a12_13"
        }).to_string()))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["appointment"]["date"], "2025-06-02");
    assert_eq!(body["appointment"]["time_slot"], "a12_13");
}

#[tokio::test]
async fn test_available_slots_route() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    fx.service
        .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), TimeSlot::A10_11))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!("/doctors/{}/available-slots?date=2025-06-01", doctor.id))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 13);
    assert_eq!(body["available_slots"][0], "a7_8");
    assert!(!body["available_slots"].as_array().unwrap().contains(&json!("a10_11")));
}

#[tokio::test]
async fn test_slot_availability_route() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    fx.service
        .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), TimeSlot::A10_11))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let taken = send(&app, get(&format!(
        "/doctors/{}/slot-availability?date=2025-06-01&time_slot=a10_11",
        doctor.id
    ))).await;
    assert_eq!(read_json(taken).await["available"], false);

    let free = send(&app, get(&format!(
        "/doctors/{}/slot-availability?date=2025-06-01&time_slot=a11_12",
        doctor.id
    ))).await;
    assert_eq!(read_json(free).await["available"], true);
}

#[tokio::test]
async fn test_malformed_slot_is_rejected_before_the_service() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!(
        "/doctors/{}/slot-availability?date=2025-06-01&time_slot=a22_23",
        doctor.id
    ))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, get(&format!(
        "/doctors/{}/available-slots?date=01-06-2025",
        doctor.id
    ))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_doctors_route() {
    let fx = Fixture::new().await;
    let jane = fx.add_doctor("Jane", "Smith").await;
    let sean = fx.add_doctor("Sean", "Walsh").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    fx.service
        .create_appointment(booking(&patient, &jane, date(2025, 6, 1), TimeSlot::A9_10))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!(
        "/available-doctors?date=2025-06-01&time_slot=a9_10&department_id={}",
        fx.department.id
    ))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["id"], json!(sean.id));
}

#[tokio::test]
async fn test_doctor_listing_route_pages() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    for slot in [TimeSlot::A7_8, TimeSlot::A8_9, TimeSlot::A9_10] {
        fx.service
            .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), slot))
            .await
            .unwrap();
    }
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!(
        "/doctors/{}?page=2&per_page=2&order=ASC&date_to=2025-06-01",
        doctor.id
    ))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 3);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["time_slot"], "a9_10");
}

#[tokio::test]
async fn test_patient_listing_route() {
    let fx = Fixture::new().await;
    let doctor = fx.add_doctor("Jane", "Smith").await;
    let patient = fx.add_patient("Liam", "Byrne").await;
    fx.service
        .create_appointment(booking(&patient, &doctor, date(2025, 6, 1), TimeSlot::A9_10))
        .await
        .unwrap();
    let app = create_test_app(&fx);

    let response = send(&app, get(&format!("/patients/{}", patient.id))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["total_items"], 1);
    assert_eq!(body["page"], 1);
}
