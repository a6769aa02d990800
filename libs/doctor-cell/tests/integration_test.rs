use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use assert_matches::assert_matches;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{Department, Doctor, DoctorError};
use doctor_cell::router::doctor_routes;
use doctor_cell::services::{DoctorDirectory, DoctorService, InMemoryDoctorDirectory};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn supabase_service(uri: String) -> DoctorService {
    DoctorService::new(&TestConfig::with_url(uri).to_app_config())
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_get_by_id_embeds_department_when_requested() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let department_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(query_param("select", "*,department:departments(*)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_with_department_response(
                &doctor_id.to_string(),
                "Jane",
                "Smith",
                &department_id.to_string(),
                "Cardiology",
            )
        ])))
        .mount(&mock_server)
        .await;

    let doctor = supabase_service(mock_server.uri())
        .get_by_id(doctor_id, true)
        .await
        .unwrap();

    assert_eq!(doctor.display_name(), "Dr. Jane Smith");
    assert_eq!(doctor.department.map(|d| d.name), Some("Cardiology".to_string()));
}

#[tokio::test]
async fn test_get_by_id_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = supabase_service(mock_server.uri())
        .get_by_id(Uuid::new_v4(), false)
        .await;

    assert_matches!(result, Err(DoctorError::NotFound(_)));
}

#[tokio::test]
async fn test_list_filters_by_department() {
    let mock_server = MockServer::start().await;
    let department_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("department_id", format!("eq.{}", department_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&Uuid::new_v4().to_string(), "Jane", "Smith", &department_id.to_string()),
            MockSupabaseResponses::doctor_response(&Uuid::new_v4().to_string(), "Sean", "Byrne", &department_id.to_string()),
        ])))
        .mount(&mock_server)
        .await;

    let doctors = supabase_service(mock_server.uri())
        .list(Some(department_id))
        .await
        .unwrap();

    assert_eq!(doctors.len(), 2);
    assert!(doctors.iter().all(|d| d.department_id == Some(department_id)));
}

#[tokio::test]
async fn test_list_surfaces_database_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let result = supabase_service(mock_server.uri()).list(None).await;
    assert_matches!(result, Err(DoctorError::DatabaseError(_)));
}

async fn create_test_app() -> (Router, Doctor) {
    let directory = Arc::new(InMemoryDoctorDirectory::new());
    let department = Department { id: Uuid::new_v4(), name: "Neurology".to_string() };
    directory.add_department(department.clone()).await;

    let doctor = Doctor {
        id: Uuid::new_v4(),
        first_name: "Aoife".to_string(),
        last_name: "Walsh".to_string(),
        department_id: Some(department.id),
        department: None,
    };
    directory.upsert(doctor.clone()).await;

    (doctor_routes(directory), doctor)
}

#[tokio::test]
async fn test_list_doctors_route() {
    let (app, doctor) = create_test_app().await;

    let request = Request::builder()
        .uri(format!("/?department_id={}", doctor.department_id.unwrap()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json_response = read_json(response).await;
    assert_eq!(json_response["total"], 1);
    assert_eq!(json_response["doctors"][0]["first_name"], "Aoife");
}

#[tokio::test]
async fn test_get_doctor_route() {
    let (app, doctor) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri(format!("/{}", doctor.id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_response = read_json(response).await;
    assert_eq!(json_response["doctor"]["department"]["name"], "Neurology");

    let missing = app
        .oneshot(Request::builder().uri(format!("/{}", Uuid::new_v4())).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
