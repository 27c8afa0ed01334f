mod common;

use lead_finder::core::SearchCache;
use lead_finder::lead_search::{FetchErrorKind, FilterSet, LeadApiClient, SearchService};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn service_for(server: &mockito::ServerGuard, cached: bool) -> SearchService {
    let client =
        LeadApiClient::with_url(format!("{}/fetch_lead2", server.url()), Duration::from_secs(5))
            .unwrap();
    let cache = cached.then(|| SearchCache::new(Duration::from_secs(60)));
    SearchService::new(client, cache, 25)
}

#[tokio::test]
async fn filters_that_upstream_ignores_are_applied_locally() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/fetch_lead2")
        .match_body(Matcher::Json(json!({"limit": 50, "location": ["Germany"]})))
        .with_status(200)
        .with_body(common::results_body(&common::lead_records(24)))
        .expect(1)
        .create_async()
        .await;

    let filters = FilterSet::new().with_location("Germany").with_title("head");
    let outcome = service_for(&server, false).search(&filters, None).await;

    mock.assert_async().await;
    assert!(outcome.success);
    assert_eq!(outcome.total_results, 2);
    let ids: Vec<_> = outcome.leads.iter().map(|l| l.external_id.as_str()).collect();
    assert_eq!(ids, vec!["1001", "1013"]);
    assert!(outcome
        .leads
        .iter()
        .all(|l| l.location == "Germany" && l.current_title == "Head of Sales"));
}

#[tokio::test]
async fn identical_searches_hit_the_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/fetch_lead2")
        .with_status(200)
        .with_body(common::results_body(&common::lead_records(5)))
        .expect(1)
        .create_async()
        .await;

    let service = service_for(&server, true);
    let filters = FilterSet::new().with_industry("Software");

    let first = service.search(&filters, None).await;
    let second = service.search(&filters.clone().with_limit(""), None).await;

    mock.assert_async().await;
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.total_results, second.total_results);
}

#[tokio::test]
async fn invalidating_the_cache_forces_a_fresh_fetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/fetch_lead2")
        .with_status(200)
        .with_body(common::results_body(&common::lead_records(5)))
        .expect(2)
        .create_async()
        .await;

    let service = service_for(&server, true);
    let filters = FilterSet::new().with_title("Engineer");

    service.search(&filters, None).await;
    assert_eq!(service.invalidate_cache().await, 1);
    let again = service.search(&filters, None).await;

    mock.assert_async().await;
    assert!(!again.from_cache);
}

#[tokio::test]
async fn failures_are_reported_and_not_cached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/fetch_lead2")
        .with_status(503)
        .with_body("maintenance")
        .expect(2)
        .create_async()
        .await;

    let service = service_for(&server, true);
    let filters = FilterSet::new().with_title("CTO");

    let outcome = service.search(&filters, None).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(FetchErrorKind::UpstreamHttpError));
    assert!(outcome.leads.is_empty());
    assert_eq!(outcome.pagination.num_pages, 1);

    let retried = service.search(&filters, None).await;
    assert!(!retried.from_cache);
    mock.assert_async().await;
}

#[tokio::test]
async fn results_are_paginated() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/fetch_lead2")
        .with_status(200)
        .with_body(common::results_body(&common::lead_records(30)))
        .create_async()
        .await;

    let service = service_for(&server, false);
    let outcome = service.search(&FilterSet::new(), Some("2")).await;

    assert_eq!(outcome.total_results, 30);
    assert_eq!(outcome.leads.len(), 5);
    assert_eq!(outcome.pagination.page, 2);
    assert_eq!(outcome.pagination.num_pages, 2);
    assert_eq!(outcome.leads[0].external_id, "1025");

    let clamped = service.search(&FilterSet::new(), Some("7")).await;
    assert_eq!(clamped.pagination.page, 2);
}
