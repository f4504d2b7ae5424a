use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storage::repository::{InMemoryRepairRepository, RepairStore};
use tower::ServiceExt;

use crate::routes::router;
use crate::state::AppState;

struct TestApp {
    router: Router,
    store: Arc<InMemoryRepairRepository>,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryRepairRepository::new());
        let router = router(AppState::new(store.clone()));
        Self { router, store }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn create(&self, payload: Value) -> TestResponse {
        self.send(Method::POST, "/api/repairs", Some(payload)).await
    }

    async fn create_ok(&self, brand: &str, model: &str) -> i64 {
        let response = self.create(payload(brand, model)).await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["id"].as_i64().unwrap()
    }
}

fn payload(brand: &str, model: &str) -> Value {
    json!({
        "entryDate": "01/03/2024",
        "mechanicName": "Ana",
        "vehicleBrand": brand,
        "vehicleModel": model,
        "vehicleYear": "2010"
    })
}

fn ids(page: &Value) -> Vec<i64> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_delete_lifecycle() {
    let app = TestApp::new();

    let created = app.create(payload("Fiat", "Uno")).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json();
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["active"], json!(true));
    assert_eq!(body["mechanicName"], json!("Ana"));
    assert_eq!(
        created.headers[header::LOCATION],
        format!("/api/repairs/{id}").as_str()
    );

    let fetched = app.send(Method::GET, &format!("/api/repairs/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["vehicleModel"], json!("Uno"));

    let deleted = app.send(Method::DELETE, &format!("/api/repairs/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_empty());

    let fetched = app.send(Method::GET, &format!("/api/repairs/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);
    assert!(fetched.body.is_empty());

    let listed = app.send(Method::GET, "/api/repairs", None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(ids(&listed.json()).is_empty());
    assert_eq!(listed.json()["pagination"]["totalItems"], json!(0));

    let summary = app.send(Method::GET, "/api/repairs/summary", None).await;
    assert_eq!(summary.status, StatusCode::OK);
    assert_eq!(summary.json(), json!([]));

    let stored = app.store.find_by_id(id).await.unwrap();
    assert!(!stored.active);
    assert_eq!(stored.vehicle_brand, "Fiat");
}

#[tokio::test]
async fn test_create_rejects_every_invalid_field() {
    let app = TestApp::new();

    let response = app
        .create(json!({
            "entryDate": "2024-03-01",
            "mechanicName": "  ",
            "vehicleBrand": "Fiat",
            "vehicleYear": "10"
        }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], json!("Validation failed"));
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 4);
    assert!(details.iter().any(|d| d.as_str().unwrap().contains("dd/mm/yyyy")));
    assert!(details.iter().any(|d| d.as_str().unwrap().contains("4 digits")));

    let (_, total) = app
        .store
        .list_active(&Default::default())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_create_reports_null_required_fields() {
    let app = TestApp::new();

    let response = app
        .create(json!({
            "entryDate": null,
            "mechanicName": null,
            "vehicleBrand": null,
            "vehicleModel": null,
            "vehicleYear": null
        }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], json!("Validation failed"));
    assert_eq!(body["details"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_rejects_mistyped_body() {
    let app = TestApp::new();

    let mut body = payload("Fiat", "Uno");
    body["mechanicYearsExperience"] = json!("ten");
    let response = app.create(body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_get_unknown_repair_is_404() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/repairs/999", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_400_with_json_error() {
    let app = TestApp::new();

    let patch = json!({ "exitDate": "10/03/2024" });
    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(patch)),
        (Method::DELETE, None),
    ] {
        let response = app.send(method.clone(), "/api/repairs/abc", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{method}");
        assert!(response.json()["error"].is_string(), "{method}");
    }
}

#[tokio::test]
async fn test_update_only_changes_supplied_fields() {
    let app = TestApp::new();
    let mut body = payload("Fiat", "Uno");
    body["mechanicYearsExperience"] = json!(5);
    body["vehicleColor"] = json!("Red");
    let created = app.create(body).await.json();
    let id = created["id"].as_i64().unwrap();

    let response = app
        .send(
            Method::PUT,
            &format!("/api/repairs/{id}"),
            Some(json!({ "exitDate": "10/03/2024" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let updated = response.json();
    assert_eq!(updated["exitDate"], json!("10/03/2024"));
    for field in [
        "entryDate",
        "mechanicName",
        "mechanicYearsExperience",
        "vehicleBrand",
        "vehicleModel",
        "vehicleYear",
        "vehicleColor",
        "active",
    ] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
}

#[tokio::test]
async fn test_invalid_update_leaves_record_untouched() {
    let app = TestApp::new();
    let id = app.create_ok("Fiat", "Uno").await;

    let response = app
        .send(
            Method::PUT,
            &format!("/api/repairs/{id}"),
            Some(json!({ "mechanicName": "Bruno", "vehicleYear": "20X0" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let stored = app.store.find_by_id(id).await.unwrap();
    assert_eq!(stored.mechanic_name, "Ana");
    assert_eq!(stored.vehicle_year, "2010");
}

#[tokio::test]
async fn test_update_of_inactive_or_unknown_repair_is_404() {
    let app = TestApp::new();
    let id = app.create_ok("Fiat", "Uno").await;
    app.send(Method::DELETE, &format!("/api/repairs/{id}"), None)
        .await;

    let patch = json!({ "exitDate": "10/03/2024" });
    let inactive = app
        .send(Method::PUT, &format!("/api/repairs/{id}"), Some(patch.clone()))
        .await;
    let unknown = app
        .send(Method::PUT, "/api/repairs/4242", Some(patch))
        .await;

    assert_eq!(inactive.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_repeatable_but_needs_existing_id() {
    let app = TestApp::new();
    let id = app.create_ok("Fiat", "Uno").await;

    let first = app.send(Method::DELETE, &format!("/api/repairs/{id}"), None).await;
    let second = app.send(Method::DELETE, &format!("/api/repairs/{id}"), None).await;
    let unknown = app.send(Method::DELETE, "/api/repairs/4242", None).await;

    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::NO_CONTENT);
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_filters_by_brand_and_model() {
    let app = TestApp::new();
    let corolla = app.create_ok("Toyota", "Corolla").await;
    let hilux = app.create_ok("Toyota", "Hilux").await;
    app.create_ok("Fiat", "Uno").await;

    let by_brand = app.send(Method::GET, "/api/repairs?brand=toy", None).await;
    assert_eq!(by_brand.status, StatusCode::OK);
    assert_eq!(ids(&by_brand.json()), vec![corolla, hilux]);
    assert_eq!(by_brand.json()["pagination"]["totalItems"], json!(2));

    let by_both = app
        .send(Method::GET, "/api/repairs?brand=TOYOTA&model=lux", None)
        .await;
    assert_eq!(ids(&by_both.json()), vec![hilux]);

    let none = app.send(Method::GET, "/api/repairs?model=civic", None).await;
    assert!(ids(&none.json()).is_empty());
}

#[tokio::test]
async fn test_listing_pages_active_records() {
    let app = TestApp::new();
    let mut created = Vec::new();
    for model in ["Uno", "Palio", "Siena", "Strada", "Toro"] {
        created.push(app.create_ok("Fiat", model).await);
    }
    app.send(Method::DELETE, &format!("/api/repairs/{}", created[0]), None)
        .await;

    let first = app
        .send(Method::GET, "/api/repairs?page=0&pageSize=3", None)
        .await
        .json();
    assert_eq!(ids(&first), created[1..4].to_vec());
    assert_eq!(first["pagination"]["totalItems"], json!(4));
    assert_eq!(first["pagination"]["totalPages"], json!(2));

    let second = app
        .send(Method::GET, "/api/repairs?page=1&size=3", None)
        .await
        .json();
    assert_eq!(ids(&second), vec![created[4]]);
    assert_eq!(second["pagination"]["page"], json!(1));
    assert_eq!(second["pagination"]["pageSize"], json!(3));
}

#[tokio::test]
async fn test_listing_first_page_is_page_zero() {
    let app = TestApp::new();
    let id = app.create_ok("Fiat", "Uno").await;

    let explicit = app
        .send(Method::GET, "/api/repairs?page=0&size=10", None)
        .await;
    assert_eq!(explicit.status, StatusCode::OK);
    assert_eq!(ids(&explicit.json()), vec![id]);
    assert_eq!(explicit.json()["pagination"]["page"], json!(0));

    let default = app.send(Method::GET, "/api/repairs", None).await.json();
    assert_eq!(ids(&default), vec![id]);
    assert_eq!(default["pagination"]["page"], json!(0));
    assert_eq!(default["pagination"]["pageSize"], json!(20));
}

#[tokio::test]
async fn test_listing_rejects_bad_pagination() {
    let app = TestApp::new();

    for uri in [
        "/api/repairs?page=-1",
        "/api/repairs?pageSize=0",
        "/api/repairs?pageSize=101",
        "/api/repairs?page=first",
    ] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_summary_lists_condensed_active_records() {
    let app = TestApp::new();
    let id = app.create_ok("Fiat", "Uno").await;

    let response = app.send(Method::GET, "/api/repairs/summary", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{
            "id": id,
            "entryDate": "01/03/2024",
            "exitDate": null,
            "mechanicName": "Ana",
            "vehicleBrand": "Fiat",
            "vehicleModel": "Uno"
        }])
    );
}

#[tokio::test]
async fn test_health_and_openapi_are_served() {
    let app = TestApp::new();

    let health = app.send(Method::GET, "/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json(), json!({ "status": "ok" }));

    let openapi = app.send(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(openapi.status, StatusCode::OK);
    assert!(openapi.json()["paths"]["/api/repairs/{id}"].is_object());
}
