mod common;

use lead_finder::core::{Database, SearchCache};
use lead_finder::lead_search::{parse, LeadApiClient, RawLeadRecord, SearchService};
use lead_finder::web::{build_rocket, AppState};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use std::time::Duration;

async fn client_with_upstream(upstream_url: String) -> Client {
    let db = Database::in_memory().await.unwrap();
    let api = LeadApiClient::with_url(upstream_url, Duration::from_secs(5)).unwrap();
    let search = SearchService::new(api, Some(SearchCache::new(Duration::from_secs(60))), 25);
    Client::tracked(build_rocket(AppState { db, search }, 0))
        .await
        .unwrap()
}

async fn offline_client() -> Client {
    client_with_upstream("http://127.0.0.1:9/fetch_lead2".to_string()).await
}

fn lead_json(index: usize) -> Value {
    let lead = parse(&RawLeadRecord::try_from(common::lead_record(index)).unwrap()).unwrap();
    serde_json::to_value(lead).unwrap()
}

#[rocket::async_test]
async fn health_reports_running() {
    let client = offline_client().await;
    let response = client.get("/api/health").dispatch().await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "text");
}

#[rocket::async_test]
async fn search_returns_locally_filtered_leads() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/fetch_lead2")
        .match_body(mockito::Matcher::Json(json!({"limit": 50, "position": ["Manager"]})))
        .with_status(200)
        .with_body(common::results_body(&common::lead_records(8)))
        .create_async()
        .await;

    let client = client_with_upstream(format!("{}/fetch_lead2", server.url())).await;
    let response = client
        .get("/api/leads/search?title=Manager&page=1")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["leads"][0]["current_title"], "Marketing Manager");
    assert_eq!(body["leads"][0]["seniority_level"], "manager");
}

#[rocket::async_test]
async fn upstream_failure_is_a_bad_gateway() {
    let client = offline_client().await;
    let response = client.get("/api/leads/search?title=CTO").dispatch().await;

    assert_eq!(response.status(), Status::BadGateway);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "upstream_connection_error");
}

#[rocket::async_test]
async fn list_lifecycle_with_export() {
    let client = offline_client().await;

    let created = client
        .post("/api/lists")
        .json(&json!({"name": "Fintech CTOs", "description": "Q3 outreach"}))
        .dispatch()
        .await;
    assert_eq!(created.status(), Status::Ok);
    let created: Value = created.into_json().await.unwrap();
    let list_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["slug"], "fintech-ctos");

    let duplicate = client
        .post("/api/lists")
        .json(&json!({"name": "Fintech CTOs"}))
        .dispatch()
        .await;
    assert_eq!(duplicate.status(), Status::Conflict);
    let duplicate: Value = duplicate.into_json().await.unwrap();
    assert_eq!(duplicate["error_code"], "LIST_EXISTS");

    let added = client
        .post("/api/lists/add")
        .json(&json!({"lead": lead_json(0), "list_name": "Fintech CTOs"}))
        .dispatch()
        .await;
    assert_eq!(added.status(), Status::Ok);

    let again = client
        .post("/api/lists/add")
        .json(&json!({"lead": lead_json(0), "list_name": "Fintech CTOs"}))
        .dispatch()
        .await;
    assert_eq!(again.status(), Status::Conflict);

    let bulk = client
        .post("/api/lists/bulk-add")
        .json(&json!({"leads": [lead_json(0), lead_json(1)], "list_name": "Fintech CTOs"}))
        .dispatch()
        .await;
    assert_eq!(bulk.status(), Status::Ok);
    let bulk: Value = bulk.into_json().await.unwrap();
    assert_eq!(bulk["data"]["added"], 1);
    assert_eq!(bulk["data"]["skipped"], 1);
    assert_eq!(bulk["data"]["total"], 2);

    let export = client
        .get(format!("/api/lists/{}/export", list_id))
        .dispatch()
        .await;
    assert_eq!(export.status(), Status::Ok);
    assert_eq!(export.content_type(), Some(ContentType::CSV));
    assert_eq!(
        export.headers().get_one("Content-Disposition"),
        Some("attachment; filename=\"fintech-ctos_export.csv\"")
    );
    let csv = export.into_string().await.unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("First Name,Last Name,Email"));
    assert_eq!(lines.count(), 2);
    assert!(csv.contains("C-Level"));

    let deleted = client
        .delete(format!("/api/lists/{}", list_id))
        .dispatch()
        .await;
    assert_eq!(deleted.status(), Status::Ok);

    let missing = client
        .delete(format!("/api/lists/{}", list_id))
        .dispatch()
        .await;
    assert_eq!(missing.status(), Status::NotFound);
}

#[rocket::async_test]
async fn saved_leads_show_their_lists() {
    let client = offline_client().await;

    let saved = client.post("/api/leads").json(&lead_json(3)).dispatch().await;
    assert_eq!(saved.status(), Status::Ok);
    let saved: Value = saved.into_json().await.unwrap();
    let lead_id = saved["data"]["id"].as_i64().unwrap();

    client
        .post("/api/lists/add")
        .json(&json!({"lead": lead_json(3), "list_name": "Watchlist", "notes": "follow up"}))
        .dispatch()
        .await;

    let detail = client.get(format!("/api/leads/{}", lead_id)).dispatch().await;
    assert_eq!(detail.status(), Status::Ok);
    let detail: Value = detail.into_json().await.unwrap();
    assert_eq!(detail["data"]["external_id"], "1003");
    assert_eq!(detail["data"]["lists"][0]["name"], "Watchlist");

    let list_id = detail["data"]["lists"][0]["id"].as_i64().unwrap();
    let removed = client
        .delete(format!("/api/lists/{}/leads/{}", list_id, lead_id))
        .dispatch()
        .await;
    assert_eq!(removed.status(), Status::Ok);
}

#[rocket::async_test]
async fn leads_without_external_id_are_rejected() {
    let client = offline_client().await;
    let mut blank = lead_json(2);
    blank["external_id"] = json!("  ");

    let saved = client.post("/api/leads").json(&blank).dispatch().await;
    assert_eq!(saved.status(), Status::BadRequest);
    let saved: Value = saved.into_json().await.unwrap();
    assert_eq!(saved["error_code"], "VALIDATION_ERROR");

    let added = client
        .post("/api/lists/add")
        .json(&json!({"lead": blank, "list_name": "Watchlist"}))
        .dispatch()
        .await;
    assert_eq!(added.status(), Status::BadRequest);
    let added: Value = added.into_json().await.unwrap();
    assert_eq!(added["error_code"], "VALIDATION_ERROR");

    let bulk = client
        .post("/api/lists/bulk-add")
        .json(&json!({"leads": [blank, lead_json(4)], "list_name": "Watchlist"}))
        .dispatch()
        .await;
    assert_eq!(bulk.status(), Status::Ok);
    let bulk: Value = bulk.into_json().await.unwrap();
    assert_eq!(bulk["data"]["added"], 1);
    assert_eq!(bulk["data"]["errors"], 1);
    assert_eq!(bulk["data"]["total"], 2);

    let lists: Value = client.get("/api/lists").dispatch().await.into_json().await.unwrap();
    assert_eq!(lists["data"][0]["leads"].as_array().unwrap().len(), 1);
}

#[rocket::async_test]
async fn unknown_routes_get_a_json_error() {
    let client = offline_client().await;

    let response = client.get("/api/leads/999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "LEAD_NOT_FOUND");

    let response = client.get("/api/nowhere").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error_code"], "NOT_FOUND");
}
